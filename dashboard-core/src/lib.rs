//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Shared domain models (current conditions, forecast days, location suggestions)
//! - The WeatherAPI.com client behind the [`WeatherProvider`] trait
//! - The [`WeatherDashboard`] data hook: fetch lifecycle state and recent searches
//! - The [`SearchInput`] component: debounced suggestions and dropdown panels
//! - Configuration and key-value storage
//!
//! It is used by `weather-dashboard-cli`, but can also back other front ends.

pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod model;
pub mod provider;
pub mod recent;
pub mod search;
pub mod storage;

pub use config::Config;
pub use dashboard::{DashboardState, WeatherDashboard};
pub use error::DashboardError;
pub use model::{Forecast, ForecastDay, LocationSuggestion, Unit, WeatherSnapshot};
pub use provider::{ApiError, WeatherProvider};
pub use recent::RecentSearches;
pub use search::{LocationLookup, Panel, SearchInput, SuggestionUpdate};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
