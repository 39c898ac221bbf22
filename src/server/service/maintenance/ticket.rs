use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

/// Formats `MNT-<YYMMDD>-<6 upper hex>` from the first three bytes of
/// SHA-256 over `property_id:requested_by:nanos:title`.
pub fn ticket_number(
    property_id: i32,
    requested_by: i32,
    created_at: NaiveDateTime,
    title: &str,
) -> String {
    let nanos = created_at
        .and_utc()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| created_at.and_utc().timestamp_micros() * 1_000);

    let digest = Sha256::digest(format!(
        "{}:{}:{}:{}",
        property_id, requested_by, nanos, title
    ));

    format!(
        "MNT-{}-{:02X}{:02X}{:02X}",
        created_at.format("%y%m%d"),
        digest[0],
        digest[1],
        digest[2]
    )
}
