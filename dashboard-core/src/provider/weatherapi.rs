use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::model::{Forecast, ForecastDay, LocationSuggestion, WeatherSnapshot};

use super::{ApiError, MIN_API_KEY_LEN, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

const USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));

/// Client for the WeatherAPI.com v1 JSON endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server in tests.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { api_key: api_key.into(), base_url, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}.json", self.base_url, endpoint);
        debug!(%url, ?params, "requesting WeatherAPI");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ApiError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, query: &str) -> Result<WeatherSnapshot, ApiError> {
        self.get_json("current", &[("q", query), ("aqi", "no")]).await
    }

    async fn forecast(&self, query: &str, days: u8) -> Result<Forecast, ApiError> {
        let days = days.to_string();
        let parsed: WaForecastResponse = self
            .get_json(
                "forecast",
                &[("q", query), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;

        Ok(Forecast { days: parsed.forecast.forecastday })
    }

    async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, ApiError> {
        self.get_json("search", &[("q", query)]).await
    }

    fn has_plausible_credential(&self) -> bool {
        self.api_key.len() >= MIN_API_KEY_LEN
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-key-0123456789";

    fn current_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "location": {
                "name": name,
                "region": "City of London, Greater London",
                "country": "United Kingdom",
                "lat": 51.52,
                "lon": -0.11,
                "tz_id": "Europe/London"
            },
            "current": {
                "temp_c": 18.2,
                "temp_f": 64.8,
                "is_day": 1,
                "condition": {
                    "text": "Partly cloudy",
                    "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                    "code": 1003
                },
                "wind_kph": 14.4,
                "wind_mph": 8.9,
                "humidity": 64,
                "feelslike_c": 18.2,
                "feelslike_f": 64.8,
                "vis_km": 10.0,
                "uv": 4.0
            }
        })
    }

    #[tokio::test]
    async fn current_sends_key_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", KEY))
            .and(query_param("q", "London"))
            .and(query_param("aqi", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_json("London")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url(KEY, server.uri()).unwrap();
        let snapshot = provider.current("London").await.unwrap();

        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.current.humidity, 64);
        assert_eq!(snapshot.current.condition.code, 1003);
    }

    #[tokio::test]
    async fn forecast_unwraps_forecastday_list() {
        let server = MockServer::start().await;

        let day = |date: &str| {
            serde_json::json!({
                "date": date,
                "date_epoch": 1756080000,
                "day": {
                    "maxtemp_c": 21.0, "maxtemp_f": 69.8,
                    "mintemp_c": 12.0, "mintemp_f": 53.6,
                    "avghumidity": 70,
                    "daily_chance_of_rain": 80,
                    "condition": {"text": "Patchy rain nearby", "icon": "//x/176.png", "code": 1063}
                },
                "hour": []
            })
        };

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("days", "2"))
            .and(query_param("alerts", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "London", "region": "", "country": "United Kingdom"},
                "forecast": {"forecastday": [day("2025-08-25"), day("2025-08-26")]}
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url(KEY, server.uri()).unwrap();
        let forecast = provider.forecast("London", 2).await.unwrap();

        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[0].date, "2025-08-25");
        assert_eq!(forecast.days[1].day.daily_chance_of_rain, 80);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url(KEY, server.uri()).unwrap();
        let err = provider.current("Zzzqqq123").await.unwrap_err();

        match err {
            ApiError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("No matching location"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url(KEY, server.uri()).unwrap();
        let err = provider.search("Lon").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse { endpoint: "search", .. }));
    }

    #[test]
    fn credential_length_threshold() {
        assert!(!WeatherApiProvider::new("short").unwrap().has_plausible_credential());
        assert!(!WeatherApiProvider::new("").unwrap().has_plausible_credential());
        assert!(WeatherApiProvider::new("0123456789").unwrap().has_plausible_credential());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = WeatherApiProvider::with_base_url(KEY, "http://localhost:1234/v1/").unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
