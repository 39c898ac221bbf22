use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use entity::property::PropertyType;
use tenantry::{
    model::{
        api::PageQuery,
        property::{AssignPmcDto, CreatePropertyDto, CreateUnitDto},
    },
    server::controller::{
        property::{assign_pmc, create_property, delete_property, get_property, list_properties},
        unit::create_unit,
        util::json::ApiJson,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

fn new_property(landlord_id: Option<i32>) -> CreatePropertyDto {
    CreatePropertyDto {
        landlord_id,
        name: "Maple Court".to_string(),
        address_line1: "12 Maple Street".to_string(),
        address_line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
        property_type: PropertyType::MultiFamily,
    }
}

#[tokio::test]
/// Expect 201 with the caller as landlord
async fn landlord_creates_property() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    sign_in(&test, &landlord).await;

    let result = create_property(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(new_property(None)),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["landlord_id"], landlord.id);
    assert_eq!(body["data"]["property_type"], "multi_family");

    Ok(())
}

#[tokio::test]
/// Expect 403 when a tenant tries to create a property
async fn tenant_cannot_create_property() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let tenant = test.user().insert_tenant().await?;
    sign_in(&test, &tenant).await;

    let result = create_property(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(new_property(None)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect listings to only contain the landlord's own properties
async fn list_is_scoped_to_landlord() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let other = test.user().insert_landlord().await?;
    let own = test.property().insert_property(landlord.id).await?;
    test.property().insert_property(other.id).await?;
    sign_in(&test, &landlord).await;

    let result = list_properties(
        State(app_state(&test)),
        test.session.clone(),
        Query(PageQuery::default()),
    )
    .await;

    let body = body_json(result.unwrap().into_response()).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["id"], own.id);

    Ok(())
}

#[tokio::test]
/// Expect 404 before 403: a missing property is reported as missing
async fn get_reports_missing_before_forbidden() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let other = test.user().insert_landlord().await?;
    let foreign = test.property().insert_property(other.id).await?;
    sign_in(&test, &landlord).await;
    let state = app_state(&test);

    let missing = get_property(State(state.clone()), test.session.clone(), Path(9999)).await;
    let forbidden = get_property(State(state), test.session.clone(), Path(foreign.id)).await;

    assert_eq!(
        missing.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        forbidden.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

#[tokio::test]
/// Expect 409 when deleting a property whose unit has an active lease
async fn delete_conflicts_with_active_lease() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    sign_in(&test, &landlord).await;

    let result = delete_property(
        State(app_state(&test)),
        test.session.clone(),
        Path(property.id),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
/// Expect the assigned PMC to gain access to the property
async fn assigned_pmc_can_read_property() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let pmc = test.user().insert_pmc().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let state = app_state(&test);
    sign_in(&test, &landlord).await;

    let assigned = assign_pmc(
        State(state.clone()),
        test.session.clone(),
        Path(property.id),
        ApiJson(AssignPmcDto {
            pmc_id: Some(pmc.id),
        }),
    )
    .await;
    assert_eq!(assigned.unwrap().into_response().status(), StatusCode::OK);

    sign_in(&test, &pmc).await;
    let result = get_property(State(state), test.session.clone(), Path(property.id)).await;

    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
/// Expect 409 for a duplicate unit number within a property
async fn duplicate_unit_number_conflicts() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let state = app_state(&test);
    sign_in(&test, &landlord).await;
    let unit = || CreateUnitDto {
        unit_number: "2B".to_string(),
        bedrooms: 2,
        bathrooms: 1.5,
        square_feet: Some(850),
        market_rent_cents: 145_000,
    };

    let first = create_unit(
        State(state.clone()),
        test.session.clone(),
        Path(property.id),
        ApiJson(unit()),
    )
    .await;
    let second = create_unit(
        State(state),
        test.session.clone(),
        Path(property.id),
        ApiJson(unit()),
    )
    .await;

    let first = first.unwrap().into_response();
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(body_json(first).await["data"]["status"], "vacant");
    assert_eq!(
        second.err().unwrap().into_response().status(),
        StatusCode::CONFLICT
    );

    Ok(())
}
