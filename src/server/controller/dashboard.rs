use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, dashboard::DashboardDto},
    server::{
        controller::util::{get_user::get_actor, response::ok},
        error::Error,
        model::app::AppState,
        service::dashboard::DashboardService,
    },
};

pub static DASHBOARD_TAG: &str = "dashboard";

/// Aggregate figures for the caller's role
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = DASHBOARD_TAG,
    responses(
        (status = 200, description = "Role-specific dashboard", body = DashboardDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let dashboard = DashboardService::new(&state.db).get(&actor).await?;

    Ok(ok(dashboard))
}
