use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{DeletionResultDto, ErrorDto},
        document::{
            CreateDocumentDto, DocumentDetailDto, DocumentDto, DocumentListQuery, NewVersionDto,
        },
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{accepted, created, ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::document::DocumentService,
    },
};

pub static DOCUMENT_TAG: &str = "document";

/// 200 once the row is gone, 202 while the other side still has to approve
fn deletion_response(result: DeletionResultDto) -> Response {
    if result.deleted {
        ok(result)
    } else {
        accepted(result)
    }
}

/// List documents visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = DOCUMENT_TAG,
    params(DocumentListQuery),
    responses(
        (status = 200, description = "One page of documents", body = Vec<DocumentDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_documents(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DocumentListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let documents = DocumentService::new(&state.db).list(&actor, query).await?;

    Ok(paginated(documents))
}

/// Register a document for a property or a lease
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = DOCUMENT_TAG,
    request_body = CreateDocumentDto,
    responses(
        (status = 201, description = "Document created", body = DocumentDto),
        (status = 400, description = "Invalid document or missing property and lease", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller may not add documents here", body = ErrorDto),
        (status = 404, description = "Property or lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_document(
    State(state): State<AppState>,
    session: Session,
    ApiJson(document): ApiJson<CreateDocumentDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let document = DocumentService::new(&state.db)
        .create(&actor, document)
        .await?;

    Ok(created(document))
}

/// Get a document with its version history and approval state
#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = DOCUMENT_TAG,
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "The document", body = DocumentDetailDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Document not visible to the caller", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_document(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let document = DocumentService::new(&state.db)
        .get(&actor, document_id)
        .await?;

    Ok(ok(document))
}

/// Propose a new file version
///
/// Lease documents keep the change pending until the other side approves.
#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/versions",
    tag = DOCUMENT_TAG,
    params(("id" = i32, Path, description = "Document ID")),
    request_body = NewVersionDto,
    responses(
        (status = 200, description = "Document with the new or pending version", body = DocumentDto),
        (status = 400, description = "Invalid file fields", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller is on neither side of the document", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 409, description = "A change is already pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_version(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<i32>,
    ApiJson(version): ApiJson<NewVersionDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let document = DocumentService::new(&state.db)
        .add_version(&actor, document_id, version)
        .await?;

    Ok(ok(document))
}

/// Approve the pending change for the caller's side
#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/mutual-approve",
    tag = DOCUMENT_TAG,
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document after the approval", body = DocumentDto),
        (status = 400, description = "No change is pending", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller is on neither side of the document", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mutual_approve(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let document = DocumentService::new(&state.db)
        .mutual_approve(&actor, document_id)
        .await?;

    Ok(ok(document))
}

/// Delete a property document or request deletion of a lease document
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = DOCUMENT_TAG,
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = DeletionResultDto),
        (status = 202, description = "Deletion awaits the other side", body = DeletionResultDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller may not delete the document", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_document(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let result = DocumentService::new(&state.db)
        .delete(&actor, document_id)
        .await?;

    Ok(deletion_response(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/approve-deletion",
    tag = DOCUMENT_TAG,
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Deletion approved", body = DeletionResultDto),
        (status = 400, description = "No deletion is pending", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller is on neither side of the document", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_deletion(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let result = DocumentService::new(&state.db)
        .approve_deletion(&actor, document_id)
        .await?;

    Ok(ok(result))
}
