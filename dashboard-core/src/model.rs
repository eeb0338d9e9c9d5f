use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display unit system. Entities keep both units; this only picks one at render time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// °C and km/h.
    #[default]
    Metric,
    /// °F and mph.
    Imperial,
}

impl Unit {
    pub fn toggle(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Unit::Metric => "km/h",
            Unit::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Unit::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Unit::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Broad weather category derived from a WeatherAPI condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Other,
}

const CLOUDY_CODES: &[u32] = &[1003, 1006, 1009];
const RAIN_CODES: &[u32] = &[1063, 1180, 1183, 1186, 1189, 1192, 1195, 1198, 1201];
const SNOW_CODES: &[u32] = &[
    1066, 1069, 1072, 1114, 1117, 1204, 1207, 1210, 1213, 1216, 1219, 1222, 1225, 1237, 1249,
    1252, 1255, 1258, 1261, 1264, 1279, 1282,
];

impl ConditionKind {
    pub fn from_code(code: u32) -> Self {
        if code == 1000 {
            ConditionKind::Clear
        } else if CLOUDY_CODES.contains(&code) {
            ConditionKind::Cloudy
        } else if RAIN_CODES.contains(&code) {
            ConditionKind::Rain
        } else if SNOW_CODES.contains(&code) {
            ConditionKind::Snow
        } else {
            ConditionKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative as returned by the API, e.g. `//cdn.weatherapi.com/...`.
    pub icon: String,
    pub code: u32,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }

    pub fn kind(&self) -> ConditionKind {
        ConditionKind::from_code(self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub humidity: u8,
    pub vis_km: f64,
    pub uv: f64,
    pub condition: Condition,
}

/// Current conditions for one location at fetch time (`current.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
}

impl WeatherSnapshot {
    pub fn temperature(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.current.temp_c,
            Unit::Imperial => self.current.temp_f,
        }
    }

    pub fn feels_like(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.current.feelslike_c,
            Unit::Imperial => self.current.feelslike_f,
        }
    }

    pub fn wind_speed(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.current.wind_kph,
            Unit::Imperial => self.current.wind_mph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub condition: Condition,
    #[serde(rename = "avghumidity", alias = "humidity", default)]
    pub humidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD` in the location's local time.
    pub date: String,
    pub date_epoch: i64,
    pub day: DaySummary,
}

impl ForecastDay {
    pub fn max_temp(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.day.maxtemp_c,
            Unit::Imperial => self.day.maxtemp_f,
        }
    }

    pub fn min_temp(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.day.mintemp_c,
            Unit::Imperial => self.day.mintemp_f,
        }
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// "Today" for the first entry, otherwise the short weekday name.
    pub fn label(&self, index: usize) -> String {
        if index == 0 {
            return "Today".to_string();
        }
        self.naive_date()
            .map(|d| d.format("%a").to_string())
            .unwrap_or_else(|| self.date.clone())
    }

    /// e.g. "Aug 25".
    pub fn short_date(&self) -> String {
        self.naive_date()
            .map(|d| d.format("%b %-d").to_string())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Daily predictions for one location, chronological, first entry is today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub days: Vec<ForecastDay>,
}

/// A location candidate from the autocomplete endpoint (`search.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: u64,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub url: String,
}

impl LocationSuggestion {
    /// The query string submitted when this suggestion is picked.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    pub fn detail(&self) -> String {
        format!("{}, {}", self.region, self.country)
    }
}
