use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tenantry::server::router;
use tenantry_test_utils::prelude::*;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::util::{app_state, body_json};

fn app(test: &TestContext) -> Router {
    router::routes()
        .with_state(app_state(test))
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

#[tokio::test]
/// Expect a JSON 404 for an unknown path
async fn unknown_path_returns_json_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/v1/nowhere")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);

    Ok(())
}

#[tokio::test]
/// Expect a JSON 405 for a known path with the wrong method
async fn wrong_method_returns_json_method_not_allowed() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);

    Ok(())
}

#[tokio::test]
/// Expect 400 with the error envelope for a malformed JSON body
async fn malformed_body_returns_bad_request() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
/// Expect 401 from an authenticated endpoint without a session
async fn protected_endpoint_requires_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/v1/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
/// Expect the OpenAPI document to list the API paths
async fn openapi_document_is_served() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["info"]["title"], "Tenantry");
    assert!(body["paths"]["/api/v1/leases/{id}/activate"].is_object());

    Ok(())
}
