use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use tenantry::{
    model::lease::{CreateLeaseDto, RecordPaymentDto, TerminateLeaseDto},
    server::controller::{
        lease::{activate_lease, create_lease, remove_tenant, terminate_lease},
        rent::{list_lease_payments, record_payment},
        util::json::ApiJson,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_lease(unit_id: i32, tenant_ids: Vec<i32>) -> CreateLeaseDto {
    CreateLeaseDto {
        unit_id,
        tenant_ids,
        start_date: date(2027, 3, 1),
        end_date: date(2028, 2, 29),
        rent_cents: 150_000,
        deposit_cents: 150_000,
        rent_due_day: 1,
    }
}

#[tokio::test]
/// Expect a created then activated lease to carry twelve monthly payments
async fn create_and_activate_schedules_rent() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let state = app_state(&test);
    sign_in(&test, &landlord).await;

    let created = create_lease(
        State(state.clone()),
        test.session.clone(),
        ApiJson(new_lease(unit.id, vec![tenant.id])),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(created.status(), StatusCode::CREATED);
    let lease_id = body_json(created).await["data"]["id"].as_i64().unwrap() as i32;

    let activated = activate_lease(State(state.clone()), test.session.clone(), Path(lease_id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(activated.status(), StatusCode::OK);
    assert_eq!(body_json(activated).await["data"]["status"], "active");

    sign_in(&test, &tenant).await;
    let payments = list_lease_payments(State(state), test.session.clone(), Path(lease_id))
        .await
        .unwrap()
        .into_response();
    let body = body_json(payments).await;
    let payments = body["data"].as_array().unwrap();
    assert_eq!(payments.len(), 12);
    assert_eq!(payments[0]["due_date"], "2027-03-01");
    assert_eq!(payments[0]["status"], "pending");

    Ok(())
}

#[tokio::test]
/// Expect 409 for a lease overlapping an active one on the same unit
async fn overlapping_lease_conflicts() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    test.lease()
        .insert_lease(
            unit.id,
            &[tenant.id],
            entity::lease::LeaseStatus::Active,
            date(2027, 1, 1),
            date(2027, 12, 31),
        )
        .await?;
    sign_in(&test, &landlord).await;

    let result = create_lease(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(new_lease(unit.id, vec![tenant.id])),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::CONFLICT
    );

    Ok(())
}

#[tokio::test]
/// Expect 400 when the last tenant is removed
async fn cannot_remove_last_tenant() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_draft_lease(unit.id, &[tenant.id]).await?;
    sign_in(&test, &landlord).await;

    let result = remove_tenant(
        State(app_state(&test)),
        test.session.clone(),
        Path((lease.id, tenant.id)),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

#[tokio::test]
/// Expect 400 when terminating a lease that is still a draft
async fn terminate_requires_active_lease() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_draft_lease(unit.id, &[tenant.id]).await?;
    sign_in(&test, &landlord).await;

    let result = terminate_lease(
        State(app_state(&test)),
        test.session.clone(),
        Path(lease.id),
        ApiJson(TerminateLeaseDto::default()),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

#[tokio::test]
/// Expect partial then full payment, and 400 once the row is paid
async fn record_payment_progresses_to_paid() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    let payment = test
        .lease()
        .insert_rent_payment(
            lease.id,
            date(2027, 1, 1),
            100_000,
            entity::rent_payment::RentStatus::Pending,
        )
        .await?;
    let state = app_state(&test);
    sign_in(&test, &landlord).await;
    let record = |amount_cents| RecordPaymentDto {
        amount_cents,
        method: Some("bank_transfer".to_string()),
        paid_at: None,
        notes: None,
    };

    let partial = record_payment(
        State(state.clone()),
        test.session.clone(),
        Path(payment.id),
        ApiJson(record(40_000)),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(body_json(partial).await["data"]["status"], "partial");

    let paid = record_payment(
        State(state.clone()),
        test.session.clone(),
        Path(payment.id),
        ApiJson(record(60_000)),
    )
    .await
    .unwrap()
    .into_response();
    let body = body_json(paid).await;
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["amount_paid_cents"], 100_000);

    let again = record_payment(
        State(state),
        test.session.clone(),
        Path(payment.id),
        ApiJson(record(1)),
    )
    .await;
    assert_eq!(
        again.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

#[tokio::test]
/// Expect 403 when a tenant outside the lease reads its payments
async fn stranger_cannot_read_payments() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let stranger = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    sign_in(&test, &stranger).await;

    let result = list_lease_payments(State(app_state(&test)), test.session.clone(), Path(lease.id))
        .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}
