//! Integration tests for `HttpSource` using wiremock HTTP mocks.

use std::sync::Arc;

use poimap::PoiMapError;
use poimap::loader::{ConfigLoader, DocumentSource, HttpSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document() -> serde_json::Value {
    serde_json::json!({
        "center": {"lat": 48.8566, "lng": 2.3522},
        "locations": [
            {
                "pos": {"lat": 48.8584, "lng": 2.2945},
                "name": "Eiffel Tower",
                "url": "https://www.toureiffel.paris/",
                "description": "Iron lattice tower.",
                "rating": 8,
                "type": "architecture"
            },
            {
                "pos": {"lat": 48.8530, "lng": 2.3499},
                "name": "Notre-Dame",
                "url": "https://www.notredamedeparis.fr/",
                "description": "Cathedral."
            }
        ]
    })
}

#[tokio::test]
async fn fetches_named_document_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/paris.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document()))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSource::new(&format!("{}/maps/", server.uri()), 5).expect("source");
    let loader = ConfigLoader::new(Arc::new(source));
    let config = loader.load(Some("paris")).await.expect("should load");

    assert_eq!(config.locations.len(), 2);
    assert_eq!(config.locations[0].rating, Some(8.0));
    assert_eq!(config.locations[1].name, "Notre-Dame");
}

#[tokio::test]
async fn missing_parameter_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document()))
        .expect(0)
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri(), 5).expect("source");
    let loader = ConfigLoader::new(Arc::new(source));
    let err = loader.load(None).await.expect_err("should fail");

    assert!(matches!(err, PoiMapError::MissingParameter { .. }));
}

#[tokio::test]
async fn not_found_status_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri(), 5).expect("source");
    let err = source.fetch("lyon").await.expect_err("should fail");

    assert!(matches!(err, PoiMapError::NotFound { identifier } if identifier == "lyon"));
}

#[tokio::test]
async fn server_error_maps_to_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri(), 5).expect("source");
    let err = source.fetch("paris").await.expect_err("should fail");

    assert!(matches!(err, PoiMapError::Fetch { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn invalid_remote_document_is_rejected() {
    let server = MockServer::start().await;
    let mut body = document();
    body["locations"][1]["name"] = serde_json::json!("Eiffel Tower");
    Mock::given(method("GET"))
        .and(path("/paris.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let loader = ConfigLoader::new(Arc::new(HttpSource::new(&server.uri(), 5).expect("source")));
    let err = loader.load(Some("paris")).await.expect_err("should fail");

    match err {
        PoiMapError::Validation { violations } => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].path, "locations[1].name");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
