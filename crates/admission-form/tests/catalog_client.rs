//! Contract tests for the remote catalog client and its fallback behaviour.

use std::sync::Arc;
use std::time::Duration;

use admission_form::catalog::{
    CatalogEntry, CatalogError, CatalogKind, CatalogService, CatalogSource, HttpCatalogClient,
};
use admission_form::config::CatalogConfig;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpCatalogClient {
    let base_url = Url::parse(&format!("{}/api", server.uri())).expect("mock server url");
    HttpCatalogClient::new(base_url, Duration::from_secs(5), 1).expect("client builds")
}

#[tokio::test]
async fn fetches_states_for_the_configured_country() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states/country/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 9, "name": "Ciudad de México", "abrevation": "CDMX" },
            { "id": 17, "name": "Morelos", "abbreviation": "MOR" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let states = client_for(&server)
        .fetch_states()
        .await
        .expect("states fetched");

    assert_eq!(
        states,
        vec![
            CatalogEntry {
                id: 9,
                name: "Ciudad de México".to_string(),
                abbreviation: Some("CDMX".to_string()),
            },
            CatalogEntry {
                id: 17,
                name: "Morelos".to_string(),
                abbreviation: Some("MOR".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn unwraps_data_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/municipalities/state/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "id": "1", "name": "Amacuzac" },
                { "id": "2", "name": "Atlatlahucan" }
            ]
        })))
        .mount(&server)
        .await;

    let municipalities = client_for(&server)
        .fetch_municipalities(17)
        .await
        .expect("municipalities fetched");

    assert_eq!(municipalities.len(), 2);
    assert_eq!(municipalities[0], CatalogEntry::new(1, "Amacuzac"));
}

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/careers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    match client_for(&server).fetch_careers().await {
        Err(CatalogError::Api {
            endpoint,
            status,
            body,
        }) => {
            assert_eq!(endpoint, "GET /careers");
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_payloads_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/disabilities"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/civil-status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.fetch_disabilities().await,
        Err(CatalogError::Malformed { .. })
    ));
    assert!(matches!(
        client.fetch_civil_statuses().await,
        Err(CatalogError::Malformed { .. })
    ));
}

#[tokio::test]
async fn kinds_without_endpoints_are_served_locally() {
    let server = MockServer::start().await;

    let channels = client_for(&server)
        .fetch(CatalogKind::AwarenessChannels)
        .await
        .expect("channels listed");

    assert!(!channels.is_empty());
    assert!(server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn service_falls_back_when_the_api_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/high-school-types"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/disabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "Visual" },
            { "id": 2, "name": "Ninguna" }
        ])))
        .mount(&server)
        .await;

    let service = CatalogService::new(Arc::new(client_for(&server)));

    let school_types = service.list(CatalogKind::HighSchoolTypes).await;
    assert!(school_types.used_fallback);
    assert!(school_types
        .error
        .as_deref()
        .is_some_and(|error| error.contains("500")));
    assert!(school_types.names().contains(&"CONALEP".to_string()));

    let disabilities = service.list(CatalogKind::Disabilities).await;
    assert!(!disabilities.used_fallback);
    assert_eq!(disabilities.names(), vec!["Ninguna", "Visual"]);
}

#[test]
fn from_config_requires_a_base_url() {
    let config = CatalogConfig::default();
    assert!(matches!(
        HttpCatalogClient::from_config(&config),
        Err(CatalogError::NotConfigured)
    ));
}
