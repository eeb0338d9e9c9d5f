use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weather_dashboard_core::{
    Config, JsonFileStore, Unit, WeatherDashboard, provider::provider_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-dashboard",
    version,
    about = "Current weather and 5-day forecasts from WeatherAPI.com"
)]
pub struct Cli {
    /// Read settings from this file instead of the platform config path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Runs the interactive dashboard when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and units.
    Configure,

    /// Show current conditions and the forecast for a city.
    Show {
        /// City or free-text location, e.g. "Paris" or "48.85,2.35".
        city: String,

        /// metric (°C, km/h) or imperial (°F, mph).
        #[arg(long)]
        unit: Option<String>,
    },

    /// List location suggestions for a partial name.
    Suggest {
        query: String,
    },

    /// List recent successful searches, newest first.
    Recent,

    /// Interactive search with live suggestions.
    Dashboard {
        #[arg(long)]
        unit: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command.unwrap_or(Command::Dashboard { unit: None }) {
            Command::Configure => configure(config, self.config)?,
            Command::Show { city, unit } => {
                let unit = resolve_unit(unit.as_deref(), &config)?;
                if city.trim().is_empty() {
                    bail!("City must not be empty.");
                }

                let dashboard = open_dashboard(&config)?;
                dashboard.search_weather(&city).await?;

                let state = dashboard.state();
                if let Some(snapshot) = &state.snapshot {
                    println!("{}", render::current(snapshot, unit));
                }
                if let Some(forecast) = &state.forecast {
                    println!("{}", render::forecast(forecast, unit));
                }
            }
            Command::Suggest { query } => {
                let dashboard = open_dashboard(&config)?;
                let found = dashboard.search_locations(&query).await;
                if !found.is_empty() {
                    println!("{}", render::suggestions(&found));
                }
            }
            Command::Recent => {
                let dashboard = open_dashboard(&config)?;
                let state = dashboard.state();
                if state.recent.is_empty() {
                    println!("No recent searches.");
                } else {
                    println!("{}", render::recent(state.recent.as_slice()));
                }
            }
            Command::Dashboard { unit } => {
                let unit = resolve_unit(unit.as_deref(), &config)?;
                let dashboard = Arc::new(open_dashboard(&config)?);
                interactive::run(dashboard, config.default_city(), unit).await?;
            }
        }

        Ok(())
    }
}

fn open_dashboard(config: &Config) -> anyhow::Result<WeatherDashboard> {
    let provider = provider_from_config(config)?;
    let store = JsonFileStore::new(Config::storage_file_path()?);
    tracing::debug!(path = %store.path().display(), base_url = config.base_url(), "opening dashboard");

    Ok(WeatherDashboard::open(provider, Arc::new(store))
        .with_fallback_city(config.default_city()))
}

fn resolve_unit(flag: Option<&str>, config: &Config) -> anyhow::Result<Unit> {
    match flag {
        Some(raw) => Unit::try_from(raw),
        None => Ok(config.unit),
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let key_prompt = if config.api_key.is_some() {
        "WeatherAPI.com API key (leave empty to keep the current one):"
    } else {
        "WeatherAPI.com API key:"
    };

    let api_key = Password::new(key_prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(&api_key);
    }

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(&city);

    let starting = if config.unit == Unit::Imperial { 1 } else { 0 };
    config.unit = Select::new("Units:", vec![Unit::Metric, Unit::Imperial])
        .with_starting_cursor(starting)
        .prompt()
        .context("Failed to read units")?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Saved configuration to {}", saved_to.display());
    Ok(())
}
