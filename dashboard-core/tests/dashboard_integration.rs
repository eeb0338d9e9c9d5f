//! Integration tests for WeatherDashboard against a mock WeatherAPI server.

use std::sync::Arc;
use std::time::Duration;

use weather_dashboard_core::{
    DashboardError, JsonFileStore, KeyValueStore, Panel, SearchInput, WeatherDashboard,
    provider::weatherapi::WeatherApiProvider, recent::RECENT_SEARCHES_KEY,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "integration-key-0123";

fn condition(code: u32) -> serde_json::Value {
    serde_json::json!({
        "text": "Partly cloudy",
        "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
        "code": code
    })
}

fn location() -> serde_json::Value {
    serde_json::json!({
        "name": "London",
        "region": "City of London, Greater London",
        "country": "United Kingdom",
        "lat": 51.5171,
        "lon": -0.1062,
        "tz_id": "Europe/London",
        "localtime_epoch": 1756120000,
        "localtime": "2025-08-25 12:06"
    })
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "location": location(),
        "current": {
            "last_updated_epoch": 1756119600,
            "temp_c": 19.1,
            "temp_f": 66.4,
            "is_day": 1,
            "condition": condition(1003),
            "wind_mph": 9.4,
            "wind_kph": 15.1,
            "humidity": 60,
            "feelslike_c": 19.1,
            "feelslike_f": 66.4,
            "vis_km": 10.0,
            "uv": 5.2
        }
    })
}

fn forecast_body() -> serde_json::Value {
    let days: Vec<_> = (0..5)
        .map(|i| {
            serde_json::json!({
                "date": format!("2025-08-{}", 25 + i),
                "date_epoch": 1756080000 + i * 86400,
                "day": {
                    "maxtemp_c": 21.0 + f64::from(i),
                    "maxtemp_f": 69.8,
                    "mintemp_c": 12.0,
                    "mintemp_f": 53.6,
                    "avghumidity": 65,
                    "daily_chance_of_rain": 20 * i,
                    "condition": condition(1063)
                },
                "astro": {"sunrise": "06:01 AM"},
                "hour": []
            })
        })
        .collect();

    serde_json::json!({
        "location": location(),
        "current": current_body()["current"].clone(),
        "forecast": {"forecastday": days}
    })
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(serde_json::json!({
        "error": {"code": 1006, "message": "No matching location found."}
    }))
}

async fn mount_london(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "London"))
        .and(query_param("days", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

fn open(server: &MockServer, key: &str, store: Arc<dyn KeyValueStore>) -> WeatherDashboard {
    let provider = WeatherApiProvider::with_base_url(key, server.uri()).unwrap();
    WeatherDashboard::open(Arc::new(provider), store)
}

#[tokio::test]
async fn test_search_london_populates_snapshot_and_forecast() {
    let server = MockServer::start().await;
    mount_london(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("storage.json")));
    let dashboard = open(&server, KEY, store.clone());

    dashboard.search_weather("London").await.unwrap();

    let state = dashboard.state();
    let snapshot = state.snapshot.expect("snapshot present");
    let forecast = state.forecast.expect("forecast present");

    assert_eq!(snapshot.location.name, "London");
    assert_eq!(snapshot.current.uv, 5.2);
    assert_eq!(forecast.days.len(), 5);
    assert!(forecast.days.windows(2).all(|w| w[0].date_epoch < w[1].date_epoch));
    assert_eq!(forecast.days[0].label(0), "Today");
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.recent.as_slice(), ["London"]);

    // A fresh dashboard over the same file sees the recent search.
    let reopened = open(&server, KEY, store);
    assert_eq!(reopened.state().recent.as_slice(), ["London"]);
}

#[tokio::test]
async fn test_search_unknown_city_reports_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(not_found())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let store = Arc::new(weather_dashboard_core::MemoryStore::new());
    let dashboard = open(&server, KEY, store.clone());

    let err = dashboard.search_weather("Zzzqqq123").await.unwrap_err();
    let state = dashboard.state();

    assert_eq!(err, DashboardError::CityNotFound);
    assert!(state.error.unwrap().contains("City not found"));
    assert!(state.snapshot.is_none());
    assert!(state.forecast.is_none());
    assert!(!state.loading);
    assert_eq!(store.get(RECENT_SEARCHES_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_forecast_failure_alone_clears_everything() {
    let server = MockServer::start().await;
    mount_london(&server).await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dashboard = open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new()));
    dashboard.search_weather("London").await.unwrap();
    assert!(dashboard.state().snapshot.is_some());

    dashboard.search_weather("Atlantis").await.unwrap_err();
    let state = dashboard.state();
    assert!(state.snapshot.is_none());
    assert!(state.forecast.is_none());
    assert!(state.error.is_some());
    assert_eq!(state.recent.as_slice(), ["London"]);
}

#[tokio::test]
async fn test_placeholder_key_reports_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": 1002, "message": "API key is invalid or not provided."}
        })))
        .mount(&server)
        .await;

    let dashboard = open(&server, "KEY", Arc::new(weather_dashboard_core::MemoryStore::new()));
    let err = dashboard.search_weather("London").await.unwrap_err();

    assert_eq!(err, DashboardError::Credential);
    assert!(dashboard.state().error.unwrap().contains("API key"));
}

#[tokio::test]
async fn test_malformed_json_is_a_lookup_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"location\": "))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let dashboard = open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new()));
    let err = dashboard.search_weather("London").await.unwrap_err();

    assert_eq!(err, DashboardError::LookupFailed);
    assert!(dashboard.state().snapshot.is_none());
}

#[tokio::test]
async fn test_whitespace_search_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new()));
    dashboard.search_weather("   ").await.unwrap();
    assert!(dashboard.search_locations("a").await.is_empty());
}

#[tokio::test]
async fn test_recent_list_stays_bounded_and_unique() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let dashboard = open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new()));
    for city in ["Paris", "Rome", "Paris", "Oslo", "Bern", "Kyiv", "Riga", "Rome"] {
        dashboard.search_weather(city).await.unwrap();

        let recent = dashboard.state().recent;
        assert_eq!(recent.latest(), Some(city));
        assert!(recent.len() <= 5);
        let mut unique = recent.as_slice().to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), recent.len());
    }

    assert_eq!(
        dashboard.state().recent.as_slice(),
        ["Rome", "Riga", "Kyiv", "Bern", "Oslo"]
    );
}

#[tokio::test]
async fn test_suggestions_are_best_effort() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "Lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2801268, "name": "London", "region": "City of London, Greater London",
             "country": "United Kingdom", "lat": 51.52, "lon": -0.11,
             "url": "london-city-of-london-greater-london-united-kingdom"},
            {"id": 315398, "name": "London", "region": "Ontario",
             "country": "Canada", "lat": 42.98, "lon": -81.25, "url": "london-ontario-canada"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "Broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dashboard = open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new()));

    let found = dashboard.search_locations("Lon").await;
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].display_name(), "London, Canada");

    assert!(dashboard.search_locations("Broken").await.is_empty());
    assert!(dashboard.state().error.is_none());
}

#[tokio::test]
async fn test_search_input_debounces_against_dashboard() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "London", "region": "Greater London",
             "country": "United Kingdom", "lat": 51.52, "lon": -0.11, "url": ""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = Arc::new(open(&server, KEY, Arc::new(weather_dashboard_core::MemoryStore::new())));
    let (mut input, mut rx) = SearchInput::with_delay(dashboard, Duration::from_millis(50));

    for text in ["Lo", "Lon", "Lond", "Londo", "London"] {
        input.input(text);
    }

    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("debounced lookup should complete")
        .unwrap();
    assert!(input.apply(update));
    assert_eq!(input.panel(), Panel::Suggestions);
    assert_eq!(input.choose_suggestion(0).as_deref(), Some("London, United Kingdom"));
}
