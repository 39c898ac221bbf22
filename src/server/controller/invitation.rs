use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PageQuery},
        invitation::{
            AcceptInvitationDto, CreateInvitationDto, InvitationDto, InvitationPreviewDto,
        },
        user::UserDto,
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{created, ok, paginated},
        },
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::invitation::InvitationService,
    },
};

pub static INVITATION_TAG: &str = "invitation";

/// Invite a tenant, vendor or PMC by e-mail
#[utoipa::path(
    post,
    path = "/api/v1/invitations",
    tag = INVITATION_TAG,
    request_body = CreateInvitationDto,
    responses(
        (status = 201, description = "Invitation sent", body = InvitationDto),
        (status = 400, description = "Invalid e-mail, role or lease", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller may not invite this role or to this lease", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_invitation(
    State(state): State<AppState>,
    session: Session,
    ApiJson(invitation): ApiJson<CreateInvitationDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let invitation = InvitationService::new(&state.db, &state.mail, &state.app_url)
        .create(&actor, invitation)
        .await?;

    Ok(created(invitation))
}

/// Invitations sent by the caller, all of them for admins
#[utoipa::path(
    get,
    path = "/api/v1/invitations",
    tag = INVITATION_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "One page of invitations", body = Vec<InvitationDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let invitations = InvitationService::new(&state.db, &state.mail, &state.app_url)
        .list(&actor, page)
        .await?;

    Ok(paginated(invitations))
}

/// Revoke a pending invitation
#[utoipa::path(
    delete,
    path = "/api/v1/invitations/{id}",
    tag = INVITATION_TAG,
    params(("id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Revoked invitation", body = InvitationDto),
        (status = 400, description = "Invitation is no longer pending", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller neither sent the invitation nor is admin", body = ErrorDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn revoke_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let invitation = InvitationService::new(&state.db, &state.mail, &state.app_url)
        .revoke(&actor, invitation_id)
        .await?;

    Ok(ok(invitation))
}

/// Public preview of an invitation
#[utoipa::path(
    get,
    path = "/api/v1/invitations/token/{token}",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Invitation details", body = InvitationPreviewDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn preview_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let preview = InvitationService::new(&state.db, &state.mail, &state.app_url)
        .preview(&token)
        .await?;

    Ok(ok(preview))
}

/// Accept an invitation and sign in as the invited user
#[utoipa::path(
    post,
    path = "/api/v1/invitations/token/{token}/accept",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token")),
    request_body = AcceptInvitationDto,
    responses(
        (status = 200, description = "Signed in as the invited user", body = UserDto),
        (status = 400, description = "Invitation expired or no longer pending, or blank name", body = ErrorDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 409, description = "E-mail belongs to an account with another role", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
    ApiJson(acceptance): ApiJson<AcceptInvitationDto>,
) -> Result<impl IntoResponse, Error> {
    let user = InvitationService::new(&state.db, &state.mail, &state.app_url)
        .accept(&token, acceptance)
        .await?;

    SessionUserId::insert(&session, user.id).await?;

    Ok(ok(UserDto::from(user)))
}
