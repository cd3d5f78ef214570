mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use autoplant_cli::server::{build_router, ServeState};
use common::{portal, request_json, runner, PortalScript};

fn app(script: PortalScript, artifacts: &std::path::Path) -> Router {
    let (runner, _sessions) = runner(portal(script), artifacts);
    build_router(ServeState::new(Arc::new(runner)))
}

async fn post(router: Router, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn process_data_success_envelope() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(PortalScript::default(), artifacts.path());

    let (status, body) = post(
        router,
        "/process-data",
        Body::from(request_json().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Data processed successfully");
    assert_eq!(body["processed_data"], request_json());
}

#[tokio::test]
async fn process_data_failure_envelope() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(
        PortalScript {
            final_dialog: false,
            ..PortalScript::default()
        },
        artifacts.path(),
    );

    let (status, body) = post(
        router,
        "/process-data",
        Body::from(request_json().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "An error occurred during script execution: Could not handle final confirmation popup"
    );
    assert!(body["processed_data"].is_null());
}

#[tokio::test]
async fn missing_fields_fail_without_browser() {
    let artifacts = tempfile::tempdir().unwrap();
    let (runner, sessions) = runner(portal(PortalScript::default()), artifacts.path());
    let router = build_router(ServeState::new(Arc::new(runner)));

    let (status, body) = post(
        router,
        "/process-data",
        Body::from(json!({ "so_no": "2200123456" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("missing required field"));
    assert_eq!(sessions.sessions_opened(), 0);
}

#[tokio::test]
async fn malformed_body_is_500_with_error() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(PortalScript::default(), artifacts.path());

    let (status, body) = post(router, "/process-data", Body::from("{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_reports_idle_runner() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(PortalScript::default(), artifacts.path());

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["busy"], false);
    assert_eq!(body["runs_started"], 0);
}

#[tokio::test]
async fn extract_builds_request_from_message_and_reply() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(PortalScript::default(), artifacts.path());

    let (status, body) = post(
        router,
        "/extract",
        Body::from(
            json!({
                "message": "MH12AB1234\nNagpur Depot 25 MT\n2200123456\n9876543210",
                "reply": "ap kara\nshahzad kha- 9471"
            })
            .to_string(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complete"], true);
    assert_eq!(body["processed_data"]["so_no"], "2200123456");
    assert_eq!(body["processed_data"]["driver_name"], "shahzad kha");
    assert_eq!(body["processed_data"]["weight"], "25");
}

#[tokio::test]
async fn extract_without_fields_is_unprocessable() {
    let artifacts = tempfile::tempdir().unwrap();
    let router = app(PortalScript::default(), artifacts.path());

    let (status, body) = post(
        router,
        "/extract",
        Body::from(json!({ "message": "good morning" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}
