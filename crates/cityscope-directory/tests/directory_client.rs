//! Integration tests for DirectoryClient using wiremock.

use cityscope_directory::{City, CitySource, DirectoryClient, DirectoryError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/api/records/1.0/search/";

/// Helper to create a dataset record
fn record(name: &str, country: &str, timezone: &str) -> serde_json::Value {
    serde_json::json!({
        "datasetid": "geonames-all-cities-with-a-population-1000",
        "recordid": format!("rec-{}", name),
        "fields": {
            "name": name,
            "cou_name_en": country,
            "timezone": timezone,
            "population": 1000
        }
    })
}

#[tokio::test]
async fn test_fetch_page_maps_and_sorts_descending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("dataset", "geonames-all-cities-with-a-population-1000"))
        .and(query_param("rows", "3"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 3,
            "records": [
                record("Berlin", "Germany", "Europe/Berlin"),
                record("Zurich", "Switzerland", "Europe/Zurich"),
                record("amsterdam", "Netherlands", "Europe/Amsterdam"),
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 3);
    let cities = client.fetch_page(1).await.unwrap();

    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Zurich", "Berlin", "amsterdam"]);
    assert_eq!(cities[1], City::new("Berlin", "Germany", "Europe/Berlin"));
}

#[tokio::test]
async fn test_fetch_page_uses_offset_for_later_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("rows", "100"))
        .and(query_param("start", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [record("Oslo", "Norway", "Europe/Oslo")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 100);
    let cities = client.fetch_page(3).await.unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].country, "Norway");
}

#[tokio::test]
async fn test_empty_records_is_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 0,
            "records": []
        })))
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 10);
    let cities = client.fetch_page(9).await.unwrap();

    assert!(cities.is_empty());
}

#[tokio::test]
async fn test_server_error_is_reported_not_swallowed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 10);
    let err = client.fetch_page(1).await.unwrap_err();

    match err {
        DirectoryError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 10);
    let err = client.fetch_page(1).await.unwrap_err();

    assert!(matches!(err, DirectoryError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 1
    let client = DirectoryClient::with_base_url("http://127.0.0.1:1", 10);
    let err = client.fetch_page(1).await.unwrap_err();

    assert!(matches!(err, DirectoryError::Network(_)));
}

#[tokio::test]
async fn test_client_serves_as_city_source() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [record("Lima", "Peru", "America/Lima")]
        })))
        .mount(&mock_server)
        .await;

    let source: std::sync::Arc<dyn CitySource> =
        std::sync::Arc::new(DirectoryClient::with_base_url(&mock_server.uri(), 10));
    let cities = source.fetch_page(1).await.unwrap();

    assert_eq!(cities[0].name, "Lima");
}

#[tokio::test]
async fn test_fetch_page_orders_names_by_collation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [
                record("Zürich", "Switzerland", "Europe/Zurich"),
                record("Évry", "France", "Europe/Paris"),
                record("rome", "Italy", "Europe/Rome"),
                record("Rome", "Italy", "Europe/Rome"),
                record("Zagreb", "Croatia", "Europe/Zagreb"),
                record("Ängelholm", "Sweden", "Europe/Stockholm"),
                record("Berlin", "Germany", "Europe/Berlin"),
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = DirectoryClient::with_base_url(&mock_server.uri(), 7);
    let cities = client.fetch_page(1).await.unwrap();

    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Zürich", "Zagreb", "Rome", "rome", "Évry", "Berlin", "Ängelholm"]
    );
}
