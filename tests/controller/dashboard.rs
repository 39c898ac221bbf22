use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Days, Utc};
use entity::{maintenance_request::Priority, rent_payment::RentStatus, unit::UnitStatus};
use tenantry::server::controller::dashboard::get_dashboard;
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

#[tokio::test]
/// Expect manager figures limited to the landlord's own properties
async fn landlord_sees_manager_dashboard() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let stranger = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let occupied = test
        .property()
        .insert_unit_with_status(property.id, UnitStatus::Occupied)
        .await?;
    test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(occupied.id, &[tenant.id]).await?;
    let last_week = Utc::now().date_naive() - Days::new(7);
    test.lease()
        .insert_rent_payment(lease.id, last_week, 120_000, RentStatus::Overdue)
        .await?;
    test.maintenance()
        .insert_request(property.id, Some(occupied.id), tenant.id, Priority::Medium)
        .await?;
    let other_property = test.property().insert_property(stranger.id).await?;
    test.property().insert_unit(other_property.id).await?;
    sign_in(&test, &landlord).await;

    let result = get_dashboard(State(app_state(&test)), test.session.clone())
        .await
        .unwrap()
        .into_response();

    assert_eq!(result.status(), StatusCode::OK);
    let body = body_json(result).await;
    let data = &body["data"];
    assert_eq!(data["kind"], "manager");
    assert_eq!(data["properties"], 1);
    assert_eq!(data["units"], 2);
    assert_eq!(data["occupied_units"], 1);
    assert_eq!(data["occupancy_rate"], 0.5);
    assert_eq!(data["open_maintenance"], 1);
    assert_eq!(data["overdue_rent_cents"], 120_000);

    Ok(())
}

#[tokio::test]
/// Expect a tenant dashboard with the nearest unpaid payment
async fn tenant_sees_next_payment() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    let today = Utc::now().date_naive();
    test.lease()
        .insert_rent_payment(lease.id, today + Days::new(40), 95_000, RentStatus::Pending)
        .await?;
    let next = test
        .lease()
        .insert_rent_payment(lease.id, today + Days::new(10), 95_000, RentStatus::Pending)
        .await?;
    sign_in(&test, &tenant).await;

    let result = get_dashboard(State(app_state(&test)), test.session.clone())
        .await
        .unwrap()
        .into_response();

    let body = body_json(result).await;
    assert_eq!(body["data"]["kind"], "tenant");
    assert_eq!(body["data"]["active_leases"], 1);
    assert_eq!(body["data"]["next_payment"]["id"], next.id);

    Ok(())
}
