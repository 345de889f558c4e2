use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::admission::validation::FieldValidator;
use crate::admission::AdmissionService;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn start_route_creates_a_session() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request("POST", "/api/v1/admissions"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload["session_id"]
        .as_str()
        .is_some_and(|id| id.starts_with("ses-")));
    assert_eq!(payload["evaluation"]["completion_percent"], 0);
}

#[tokio::test]
async fn patch_route_applies_section_updates() {
    let (service, _) = build_service();
    let session = service.start().expect("session starts");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/admissions/{}/sections", session.session_id),
            json!({
                "section": "academic_history",
                "fields": {
                    "school_code": "abc1234567",
                    "school_code_confirmation": "XYZ0000000"
                }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["academic_history"]["school_code"], "ABC1234567");
    let confirmation = payload["evaluation"]["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .find(|field| field["key"] == "academic_history.school_code_confirmation")
        .expect("confirmation reported")
        .clone();
    assert_eq!(confirmation["status"], "invalid");
    assert_eq!(confirmation["message"], "School codes do not match");
}

#[tokio::test]
async fn patch_route_rejects_unknown_fields() {
    let (service, _) = build_service();
    let session = service.start().expect("session starts");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/admissions/{}/sections", session.session_id),
            json!({ "section": "career", "fields": { "favourite_color": "verde" } }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn session_handler_returns_not_found_for_unknown_sessions() {
    let (service, _) = build_service();

    let response = crate::admission::router::session_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path("ses-unknown".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "session not found");
}

#[tokio::test]
async fn start_handler_returns_internal_error_on_repository_failure() {
    let service = AdmissionService::new(Arc::new(UnavailableRepository), FieldValidator::default());

    let response =
        crate::admission::router::start_handler::<UnavailableRepository>(State(Arc::new(service)))
            .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn next_step_route_validates_the_step_name() {
    let (service, _) = build_service();
    let session = service.start().expect("session starts");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/admissions/{}/steps/summary/next", session.session_id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/admissions/{}/steps/career/next", session.session_id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["step"], "career");
    assert_eq!(payload["can_advance"], false);
    assert_eq!(payload["previous_step"], "personal");
}

#[tokio::test]
async fn next_step_route_accepts_a_pinned_date() {
    let (service, _) = build_service();
    let session = service.start().expect("session starts");
    let router = router_with_service(service);
    let uri = format!("/api/v1/admissions/{}/steps/personal/next", session.session_id);

    let response = router
        .clone()
        .oneshot(empty_request("GET", &format!("{uri}?as_of=2025-08-01")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["step"], "personal");
    assert_eq!(payload["completion_percent"], 0);

    let response = router
        .oneshot(empty_request("GET", &format!("{uri}?as_of=01-08-2025")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_route_discards_sessions() {
    let (service, repository) = build_service();
    let session = service.start().expect("session starts");
    let router = router_with_service(service);
    let uri = format!("/api/v1/admissions/{}", session.session_id);

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(repository.len(), 0);

    let response = router
        .oneshot(empty_request("GET", &uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluate_route_scores_full_records() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/admissions/evaluate",
            json!({ "record": complete_record(), "as_of": "2025-08-01" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["completion_percent"], 100);
    assert_eq!(payload["step_valid"]["academic_history"], true);
    assert_eq!(repository.len(), 0);
}
