use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use entity::maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority};
use tenantry::{
    model::maintenance::{
        ApprovalDecisionDto, AssignVendorDto, CreateMaintenanceDto, UpdateMaintenanceStatusDto,
    },
    server::controller::{
        maintenance::{assign_vendor, create_request, decide_approval, update_status},
        util::json::ApiJson,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

#[tokio::test]
/// Expect a leasing tenant to file a request with a generated ticket number
async fn tenant_files_request() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    sign_in(&test, &tenant).await;

    let result = create_request(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(CreateMaintenanceDto {
            property_id: property.id,
            unit_id: Some(unit.id),
            title: "Broken heater".to_string(),
            description: "No heat in the bedroom since Monday".to_string(),
            priority: Priority::High,
        }),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    let ticket = body["data"]["ticket_number"].as_str().unwrap();
    assert!(ticket.starts_with("MNT-"));
    assert_eq!(ticket.len(), "MNT-YYMMDD-XXXXXX".len());
    assert_eq!(body["data"]["status"], "open");

    Ok(())
}

#[tokio::test]
/// Expect 403 for a tenant without a lease at the property
async fn tenant_without_lease_is_forbidden() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    sign_in(&test, &tenant).await;

    let result = create_request(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(CreateMaintenanceDto {
            property_id: property.id,
            unit_id: None,
            title: "Broken heater".to_string(),
            description: "No heat".to_string(),
            priority: Priority::Low,
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

#[tokio::test]
/// Expect a PMC estimate above the limit to wait for the landlord, who then approves it
async fn pmc_estimate_above_limit_needs_landlord() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let pmc = test.user().insert_pmc().await?;
    let vendor = test.user().insert_vendor().await?;
    let property = test
        .property()
        .insert_property_with_pmc(landlord.id, Some(pmc.id))
        .await?;
    let request = test
        .maintenance()
        .insert_request(property.id, None, pmc.id, Priority::Low)
        .await?;
    let state = app_state(&test);
    sign_in(&test, &pmc).await;

    let assigned = assign_vendor(
        State(state.clone()),
        test.session.clone(),
        Path(request.id),
        ApiJson(AssignVendorDto {
            vendor_id: vendor.id,
            estimated_cost_cents: 75_000,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let body = body_json(assigned).await;
    assert_eq!(body["data"]["approval_status"], "pending_approval");
    assert_eq!(body["data"]["status"], "assigned");

    // Only the owner decides
    let by_pmc = decide_approval(
        State(state.clone()),
        test.session.clone(),
        Path(request.id),
        ApiJson(ApprovalDecisionDto { approve: true }),
    )
    .await;
    assert_eq!(
        by_pmc.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    sign_in(&test, &landlord).await;
    let approved = decide_approval(
        State(state),
        test.session.clone(),
        Path(request.id),
        ApiJson(ApprovalDecisionDto { approve: true }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(body_json(approved).await["data"]["approval_status"], "approved");

    Ok(())
}

#[tokio::test]
/// Expect the assigned vendor to start and complete the work
async fn vendor_moves_request_to_completed() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let vendor = test.user().insert_vendor().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let request = test
        .maintenance()
        .insert_request(property.id, None, landlord.id, Priority::Medium)
        .await?;
    let request = test
        .maintenance()
        .assign_vendor(request, vendor.id, 20_000, ApprovalStatus::Approved)
        .await?;
    let state = app_state(&test);
    sign_in(&test, &vendor).await;
    let status = |status| UpdateMaintenanceStatusDto { status };

    let started = update_status(
        State(state.clone()),
        test.session.clone(),
        Path(request.id),
        ApiJson(status(MaintenanceStatus::InProgress)),
    )
    .await;
    assert_eq!(started.unwrap().into_response().status(), StatusCode::OK);

    let completed = update_status(
        State(state.clone()),
        test.session.clone(),
        Path(request.id),
        ApiJson(status(MaintenanceStatus::Completed)),
    )
    .await
    .unwrap()
    .into_response();
    let body = body_json(completed).await;
    assert_eq!(body["data"]["status"], "completed");
    assert!(!body["data"]["completed_at"].is_null());

    let reopened = update_status(
        State(state),
        test.session.clone(),
        Path(request.id),
        ApiJson(status(MaintenanceStatus::Open)),
    )
    .await;
    assert_eq!(
        reopened.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}
