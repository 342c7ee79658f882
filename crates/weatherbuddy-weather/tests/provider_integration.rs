//! Integration tests for WeatherProvider using wiremock.

use std::time::Duration;

use weatherbuddy_weather::{AqiValue, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> WeatherProvider {
    WeatherProvider::new(&server.uri(), "test-key", Duration::from_secs(5)).unwrap()
}

fn current_body(name: &str, pm2_5: f64) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": name, "country": "India", "localtime": "2025-12-26 10:00" },
        "current": {
            "temp_c": 28.4,
            "feelslike_c": 30.1,
            "humidity": 70,
            "condition": { "text": "Partly cloudy" },
            "air_quality": { "pm2_5": pm2_5, "pm10": 40.2, "us-epa-index": 2 }
        }
    })
}

#[tokio::test]
async fn test_fetch_current_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "New Delhi"))
        .and(query_param("aqi", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New Delhi", 6.0)))
        .mount(&server)
        .await;

    let report = provider(&server).fetch_current("New Delhi").await.unwrap();

    assert_eq!(report.location.name, "New Delhi");
    assert_eq!(report.current.humidity, Some(70));
    let reading = report.current.air_quality.unwrap().reading();
    assert_eq!(reading.headline_aqi(), AqiValue::Index(25));
}

#[tokio::test]
async fn test_fetch_current_no_matching_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current("Qwertyville").await.unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got {:?}", err);
    assert!(matches!(err, WeatherError::LocationNotFound(q) if q == "Qwertyville"));
}

#[tokio::test]
async fn test_fetch_current_invalid_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": 2006, "message": "API key provided is invalid" }
        })))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current("Pune").await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidApiKey));
}

#[tokio::test]
async fn test_fetch_current_server_error_without_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current("Pune").await.unwrap_err();
    assert!(matches!(err, WeatherError::Api { code: 503, .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_fetch_current_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current("Pune").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_forecast_average_temperatures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": { "name": "Jaipur" },
            "forecast": { "forecastday": [
                { "date": "2025-12-26", "day": { "avgtemp_c": 18.2 } },
                { "date": "2025-12-27", "day": { "avgtemp_c": 19.0 } },
                { "date": "2025-12-28", "day": { "avgtemp_c": 17.5 } }
            ]}
        })))
        .mount(&server)
        .await;

    let temps = provider(&server).fetch_forecast("Jaipur", 3).await.unwrap();
    assert_eq!(temps, vec![18.2, 19.0, 17.5]);
}

#[tokio::test]
async fn test_search_cities() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .and(query_param("q", "Lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "London", "region": "City of London", "country": "United Kingdom" },
            { "id": 2, "name": "London", "region": "Ontario", "country": "Canada" }
        ])))
        .mount(&server)
        .await;

    let cities = provider(&server).search_cities("Lon").await.unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].country, "United Kingdom");
    assert_eq!(cities[1].query_text(), "London Canada");
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let provider =
        WeatherProvider::new("http://127.0.0.1:9", "k", Duration::from_millis(500)).unwrap();
    let err = provider.fetch_current("Pune").await.unwrap_err();
    assert!(matches!(err, WeatherError::Network(_)));
}
