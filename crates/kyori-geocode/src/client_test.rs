use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kyori_core::Geocoder;

use super::*;

fn test_client(base_url: &str) -> NominatimClient {
    NominatimClient::with_base_url(base_url, 5, "kyori-test/0.1", Some("ja"), 0, 0)
        .expect("client construction should not fail")
}

fn place_json(lat: &str, lon: &str, name: &str) -> serde_json::Value {
    serde_json::json!([{ "lat": lat, "lon": lon, "display_name": name }])
}

#[test]
fn build_url_includes_query_format_and_language() {
    let client = test_client("https://nominatim.openstreetmap.org/search");
    let url = client.build_url("京都大学医学部附属病院");
    let rendered = url.as_str();
    assert!(rendered.contains("format=jsonv2"));
    assert!(rendered.contains("limit=1"));
    assert!(rendered.contains("accept-language=ja"));
    // The label must be percent-encoded, not passed raw.
    assert!(!rendered.contains("病院"));
}

#[test]
fn build_url_omits_language_when_unset() {
    let client = NominatimClient::with_base_url(
        "https://nominatim.openstreetmap.org/search",
        5,
        "kyori-test/0.1",
        None,
        0,
        0,
    )
    .unwrap();
    let url = client.build_url("tokyo");
    assert!(!url.as_str().contains("accept-language"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = NominatimClient::with_base_url("not a url", 5, "ua", None, 0, 0);
    assert!(matches!(result, Err(NominatimError::InvalidBaseUrl { .. })));
}

#[tokio::test]
async fn search_returns_first_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "京都大学医学部附属病院"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place_json(
            "35.0252",
            "135.7680",
            "京都大学医学部附属病院, 京都市, 日本",
        )))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let place = client.search("京都大学医学部附属病院").await.unwrap();
    assert_eq!(place.lat, "35.0252");
    assert_eq!(
        place.display_name.as_deref(),
        Some("京都大学医学部附属病院, 京都市, 日本")
    );
}

#[tokio::test]
async fn empty_result_list_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.search("nowhere at all").await.unwrap_err();
    assert!(matches!(err, NominatimError::NotFound { .. }));
}

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.search("q").await.unwrap_err();
    assert!(matches!(
        err,
        NominatimError::UnexpectedStatus { status: 403, .. }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.search("q").await.unwrap_err();
    assert!(matches!(err, NominatimError::Deserialize { .. }));
}

#[tokio::test]
async fn geocode_parses_coordinates_and_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(place_json(
            "35.0252",
            "135.7680",
            "京都大学医学部附属病院",
        )))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let geocoded = client.geocode("京都大学医学部附属病院").await.unwrap();
    let point = geocoded.point.unwrap();
    assert!((point.lat - 35.0252).abs() < 1e-9);
    assert!((point.lon - 135.7680).abs() < 1e-9);
    assert_eq!(
        geocoded.formatted_address.as_deref(),
        Some("京都大学医学部附属病院")
    );
}

#[tokio::test]
async fn geocode_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.geocode("H2").await.unwrap_err();
    assert_eq!(err, kyori_core::GeocodeError::NotFound);
}

#[tokio::test]
async fn geocode_maps_backend_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.geocode("H1").await.unwrap_err();
    assert!(matches!(err, kyori_core::GeocodeError::Backend(_)));
}

#[tokio::test]
async fn geocode_rejects_unparseable_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(place_json("north", "east", "somewhere")),
        )
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/search", server.uri()));
    let err = client.geocode("H1").await.unwrap_err();
    assert!(matches!(err, kyori_core::GeocodeError::Backend(_)));
}
