//! Daily housekeeping jobs run by the [`Scheduler`](super::Scheduler).
//!
//! Each job receives its own database connection handle and returns the
//! number of rows it touched.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{invitation::InvitationRepository, login_code::LoginCodeRepository},
    error::Error,
    service::{lease::LeaseService, rent::RentService},
};

/// Marks unpaid rent due before today as overdue and notifies tenants
pub async fn mark_overdue_rent(db: DatabaseConnection) -> Result<u64, Error> {
    let today = Utc::now().date_naive();

    RentService::new(&db).mark_overdue(today).await
}

/// Expires active leases whose end date has passed
pub async fn expire_ended_leases(db: DatabaseConnection) -> Result<u64, Error> {
    let today = Utc::now().date_naive();

    LeaseService::new(&db).expire_ended(today).await
}

/// Expires pending invitations past their expiry
pub async fn expire_stale_invitations(db: DatabaseConnection) -> Result<u64, Error> {
    let now = Utc::now().naive_utc();

    Ok(InvitationRepository::new(&db).expire_stale(now).await?)
}

/// Removes consumed or expired login codes
pub async fn purge_login_codes(db: DatabaseConnection) -> Result<u64, Error> {
    let now = Utc::now().naive_utc();

    Ok(LoginCodeRepository::new(&db).purge_stale(now).await?)
}
