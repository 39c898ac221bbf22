//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every endpoint is registered through `utoipa_axum::routes!` so its OpenAPI path item is
//! collected alongside the route. Swagger UI is served at `/api/docs` and the raw document at
//! `/api/docs/openapi.json`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::api::ErrorDto,
    server::{controller, model::app::AppState},
};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// Unknown paths answer 404 and known paths called with the wrong method answer 405, both with
/// the JSON error body used by every other failure.
///
/// # Example
/// ```ignore
/// let app_state = AppState { db, mail, rate_limiter, app_url };
/// let router = routes().with_state(app_state);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Tenantry", description = "Tenantry property management API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Passwordless sign-in and sessions"),
        (name = controller::user::USER_TAG, description = "User accounts"),
        (name = controller::property::PROPERTY_TAG, description = "Properties and PMC assignment"),
        (name = controller::unit::UNIT_TAG, description = "Units of a property"),
        (name = controller::lease::LEASE_TAG, description = "Leases and their tenants"),
        (name = controller::rent::RENT_TAG, description = "Rent schedules and payments"),
        (name = controller::maintenance::MAINTENANCE_TAG, description = "Maintenance requests and vendor approval"),
        (name = controller::document::DOCUMENT_TAG, description = "Documents with two-party approval"),
        (name = controller::notification::NOTIFICATION_TAG, description = "In-app notifications"),
        (name = controller::invitation::INVITATION_TAG, description = "Invitations for tenants, vendors and PMCs"),
        (name = controller::expense::EXPENSE_TAG, description = "Property expenses"),
        (name = controller::dashboard::DASHBOARD_TAG, description = "Role-specific dashboards"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::register))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::verify))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::me))
        .routes(routes!(controller::user::list_users))
        .routes(routes!(controller::user::get_user))
        .routes(routes!(controller::user::update_profile))
        .routes(routes!(
            controller::property::list_properties,
            controller::property::create_property
        ))
        .routes(routes!(
            controller::property::get_property,
            controller::property::update_property,
            controller::property::delete_property
        ))
        .routes(routes!(controller::property::assign_pmc))
        .routes(routes!(
            controller::unit::list_units,
            controller::unit::create_unit
        ))
        .routes(routes!(
            controller::unit::get_unit,
            controller::unit::update_unit,
            controller::unit::delete_unit
        ))
        .routes(routes!(
            controller::lease::list_leases,
            controller::lease::create_lease
        ))
        .routes(routes!(
            controller::lease::get_lease,
            controller::lease::update_lease
        ))
        .routes(routes!(controller::lease::activate_lease))
        .routes(routes!(controller::lease::terminate_lease))
        .routes(routes!(controller::lease::add_tenant))
        .routes(routes!(controller::lease::remove_tenant))
        .routes(routes!(controller::rent::list_lease_payments))
        .routes(routes!(controller::rent::list_payments))
        .routes(routes!(controller::rent::record_payment))
        .routes(routes!(controller::rent::waive_payment))
        .routes(routes!(
            controller::maintenance::list_requests,
            controller::maintenance::create_request
        ))
        .routes(routes!(controller::maintenance::get_request))
        .routes(routes!(controller::maintenance::assign_vendor))
        .routes(routes!(controller::maintenance::decide_approval))
        .routes(routes!(controller::maintenance::update_status))
        .routes(routes!(controller::maintenance::add_comment))
        .routes(routes!(
            controller::document::list_documents,
            controller::document::create_document
        ))
        .routes(routes!(
            controller::document::get_document,
            controller::document::delete_document
        ))
        .routes(routes!(controller::document::add_version))
        .routes(routes!(controller::document::mutual_approve))
        .routes(routes!(controller::document::approve_deletion))
        .routes(routes!(controller::notification::list_notifications))
        .routes(routes!(controller::notification::unread_count))
        .routes(routes!(controller::notification::mark_read))
        .routes(routes!(controller::notification::mark_all_read))
        .routes(routes!(controller::notification::delete_notification))
        .routes(routes!(
            controller::invitation::list_invitations,
            controller::invitation::create_invitation
        ))
        .routes(routes!(controller::invitation::revoke_invitation))
        .routes(routes!(controller::invitation::preview_invitation))
        .routes(routes!(controller::invitation::accept_invitation))
        .routes(routes!(
            controller::expense::expense_report,
            controller::expense::create_expense
        ))
        .routes(routes!(controller::expense::delete_expense))
        .routes(routes!(controller::dashboard::get_dashboard))
        .split_for_parts();

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorDto::new("Not found"))).into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorDto::new("Method not allowed")),
    )
        .into_response()
}
