//! End-to-end client flow against mocked weather API and gateway.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use weatherbuddy_weather::cache::LAST_CITY_KEY;
use weatherbuddy_weather::session::FALLBACK_FORECAST;
use weatherbuddy_weather::{
    AqiValue, KeyValueStore, LocationClient, LocationResponse, MemoryStore, SeverityLevel,
    WeatherCache, WeatherProvider, WeatherSession, WeatherView,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn current_body(name: &str, temp_c: f64) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": name },
        "current": {
            "temp_c": temp_c,
            "condition": { "text": "Clear" },
            "air_quality": { "pm2_5": 45.0, "pm10": 60.0, "us-epa-index": 3 }
        }
    })
}

fn session(
    weather: &MockServer,
    gateway: &MockServer,
    store: Arc<MemoryStore>,
    cities: &[&str],
) -> WeatherSession {
    WeatherSession::new(
        WeatherProvider::new(&weather.uri(), "test-key", TIMEOUT).unwrap(),
        LocationClient::new(&gateway.uri(), "New York", TIMEOUT).unwrap(),
        WeatherCache::new(store),
        3,
        cities.iter().map(|c| c.to_string()).collect(),
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()
}

#[tokio::test]
async fn test_startup_prefers_last_city() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gateway)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Pune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Pune", 24.0)))
        .mount(&weather)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(LAST_CITY_KEY, "Pune").unwrap();

    let view = session(&weather, &gateway, store, &[]).startup().await;
    assert_eq!(view.city(), Some("Pune"));
}

#[tokio::test]
async fn test_startup_uses_gateway_and_remembers_city() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Indore", "source": "ip"
        })))
        .mount(&gateway)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Indore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Indore", 27.0)))
        .mount(&weather)
        .await;

    let store = Arc::new(MemoryStore::new());
    let view = session(&weather, &gateway, store.clone(), &[]).startup().await;

    let WeatherView::Ready { air_quality, .. } = view else {
        panic!("expected ready view");
    };
    assert_eq!(air_quality.aqi, AqiValue::Index(124));
    assert_eq!(air_quality.tier.level, SeverityLevel::Poor);
    assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Indore"));
}

#[tokio::test]
async fn test_gateway_failure_falls_back_to_default_city() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&gateway)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New York", 5.0)))
        .mount(&weather)
        .await;

    let store = Arc::new(MemoryStore::new());
    let s = session(&weather, &gateway, store, &[]);
    assert_eq!(s.initial_city().await, "New York");
}

#[tokio::test]
async fn test_search_not_found_keeps_last_city() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&weather)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(LAST_CITY_KEY, "Surat").unwrap();

    let view = session(&weather, &gateway, store.clone(), &[])
        .search("  Nowhereville ")
        .await
        .unwrap();

    assert!(matches!(view, WeatherView::LocationNotFound { ref query } if query == "Nowhereville"));
    assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Surat"));
}

#[tokio::test]
async fn test_search_upstream_failure_is_unavailable() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&weather)
        .await;

    let store = Arc::new(MemoryStore::new());
    let view = session(&weather, &gateway, store, &[])
        .search("Patna")
        .await
        .unwrap();

    assert!(matches!(view, WeatherView::Unavailable { message } if !message.is_empty()));
}

#[tokio::test]
async fn test_blank_search_is_ignored() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;
    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &[]);
    assert!(s.search("   ").await.is_none());
}

#[tokio::test]
async fn test_short_query_skips_suggestion_call() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&weather)
        .await;

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &[]);
    assert!(s.suggestions("Pu").await.is_empty());
}

#[tokio::test]
async fn test_forecast_failure_uses_fallback() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&weather)
        .await;

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &[]);
    assert_eq!(s.forecast("Thane").await, FALLBACK_FORECAST.to_vec());
}

#[tokio::test]
async fn test_city_table_fetched_once_per_day() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    for (city, temp) in [("Mumbai", 31.0), ("Bhopal", 14.0)] {
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body(city, temp)))
            .expect(1)
            .mount(&weather)
            .await;
    }

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &["Mumbai", "Bhopal"]);

    let first = s.city_table(today()).await;
    let second = s.city_table(today()).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].city, "Mumbai");
    assert_eq!(first[1].city, "Bhopal");
}

#[tokio::test]
async fn test_city_table_failure_keeps_stale_rows() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Nagpur", 36.0)))
        .up_to_n_times(1)
        .mount(&weather)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&weather)
        .await;

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &["Nagpur"]);

    let yesterday = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
    let cached = s.city_table(yesterday).await;
    assert_eq!(cached.len(), 1);

    let today_rows = s.city_table(today()).await;
    assert_eq!(today_rows, cached);
}

#[tokio::test]
async fn test_suggestion_failure_is_empty() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&weather)
        .await;

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &[]);
    assert!(s.suggestions("Ahmed").await.is_empty());
}

#[tokio::test]
async fn test_empty_forecast_uses_fallback() {
    let weather = MockServer::start().await;
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "forecast": { "forecastday": [] }
        })))
        .mount(&weather)
        .await;

    let s = session(&weather, &gateway, Arc::new(MemoryStore::new()), &[]);
    assert_eq!(s.forecast("Kanpur").await, FALLBACK_FORECAST.to_vec());
}

#[tokio::test]
async fn test_blank_gateway_city_falls_back() {
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "  ", "source": "ip"
        })))
        .mount(&gateway)
        .await;

    let client = LocationClient::new(&gateway.uri(), "New York", TIMEOUT).unwrap();
    assert!(client.fetch().await.is_err());
    assert_eq!(client.resolve().await, LocationResponse::fallback("New York"));
}
