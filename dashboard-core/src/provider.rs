use crate::{
    Config,
    model::{Forecast, LocationSuggestion, WeatherSnapshot},
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod weatherapi;

/// Keys shorter than this are treated as placeholders rather than real credentials.
pub const MIN_API_KEY_LEN: usize = 10;

/// Failure talking to the remote weather API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to send request to WeatherAPI.com ({endpoint})")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("WeatherAPI {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse WeatherAPI {endpoint} JSON")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The three endpoints the dashboard consumes.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location query.
    async fn current(&self, query: &str) -> Result<WeatherSnapshot, ApiError>;

    /// `days` daily predictions for a free-text location query.
    async fn forecast(&self, query: &str, days: u8) -> Result<Forecast, ApiError>;

    /// Autocomplete candidates for a partial query. May be empty.
    async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, ApiError>;

    /// Whether the configured credential looks structurally valid.
    fn has_plausible_credential(&self) -> bool;
}

/// Construct the WeatherAPI.com provider from config.
///
/// A missing key is not an error here: the first search reports it to the user.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    if config.api_key.is_none() {
        tracing::warn!(
            "no API key configured; run `weather-dashboard configure` to add one"
        );
    }

    let provider = WeatherApiProvider::with_base_url(config.api_key(), config.base_url())?;
    Ok(Arc::new(provider))
}
