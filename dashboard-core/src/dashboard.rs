//! The weather data hook: owns every network call the dashboard makes and the
//! latest outcome of a search.
//!
//! State is published through a [`tokio::sync::watch`] channel, so a view can
//! re-render on each transition (including `loading` flipping on mid-request)
//! while the hook itself only needs `&self`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::DashboardError,
    model::{Forecast, LocationSuggestion, WeatherSnapshot},
    provider::{ApiError, WeatherProvider},
    recent::RecentSearches,
    storage::KeyValueStore,
};

/// Number of forecast days requested per search.
pub const FORECAST_DAYS: u8 = 5;

/// Suggestion queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Searched by [`WeatherDashboard::retry`] when nothing has been searched yet.
pub const DEFAULT_CITY: &str = "London";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub snapshot: Option<WeatherSnapshot>,
    pub forecast: Option<Forecast>,
    pub loading: bool,
    pub error: Option<String>,
    pub recent: RecentSearches,
}

#[derive(Debug)]
pub struct WeatherDashboard {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<DashboardState>,
    fallback_city: String,
}

/// Clears the loading flag on every exit path, including a dropped future.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<DashboardState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

impl WeatherDashboard {
    /// Create the hook, reading recent searches from `store` once.
    pub fn open(provider: Arc<dyn WeatherProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        let recent = RecentSearches::load(store.as_ref());
        debug!(count = recent.len(), "loaded recent searches");

        let (state, _) = watch::channel(DashboardState { recent, ..DashboardState::default() });

        Self { provider, store, state, fallback_city: DEFAULT_CITY.to_string() }
    }

    pub fn with_fallback_city(mut self, city: impl Into<String>) -> Self {
        self.fallback_city = city.into();
        self
    }

    /// Copy of the current state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Fetch current conditions and the forecast for `city` in parallel.
    ///
    /// Whitespace-only input does nothing. On failure both snapshot and forecast
    /// are cleared and the user-facing message is stored in `error`.
    pub async fn search_weather(&self, city: &str) -> Result<(), DashboardError> {
        if city.trim().is_empty() {
            return Ok(());
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let _loading = LoadingGuard { state: &self.state };

        let fetched = tokio::try_join!(
            self.provider.current(city),
            self.provider.forecast(city, FORECAST_DAYS),
        );

        match fetched {
            Ok((snapshot, forecast)) => {
                info!(city, days = forecast.days.len(), "weather search succeeded");

                let mut recent = RecentSearches::default();
                self.state.send_modify(|s| {
                    s.snapshot = Some(snapshot);
                    s.forecast = Some(forecast);
                    s.recent.record(city);
                    recent = s.recent.clone();
                });

                if let Err(err) = recent.persist(self.store.as_ref()) {
                    warn!(error = %err, "could not save recent searches");
                }
                Ok(())
            }
            Err(err) => {
                warn!(city, error = %err, "weather search failed");

                let failure = self.classify(&err);
                self.state.send_modify(|s| {
                    s.snapshot = None;
                    s.forecast = None;
                    s.error = Some(failure.to_string());
                });
                Err(failure)
            }
        }
    }

    /// Search again for the latest recent search, or the fallback city.
    pub async fn retry(&self) -> Result<(), DashboardError> {
        let city = {
            let state = self.state.borrow();
            state.recent.latest().unwrap_or(self.fallback_city.as_str()).to_string()
        };
        self.search_weather(&city).await
    }

    /// Best-effort autocomplete. Short queries and any failure yield an empty list.
    pub async fn search_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        if query.trim().is_empty() || query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match self.provider.search(query).await {
            Ok(found) => {
                debug!(query, count = found.len(), "location suggestions");
                found
            }
            Err(err) => {
                warn!(query, error = %err, "location suggestions unavailable");
                Vec::new()
            }
        }
    }

    fn classify(&self, err: &ApiError) -> DashboardError {
        if !self.provider.has_plausible_credential() {
            return DashboardError::Credential;
        }

        match err {
            ApiError::Status { .. } => DashboardError::CityNotFound,
            ApiError::Request { .. } | ApiError::Parse { .. } => DashboardError::LookupFailed,
        }
    }
}
