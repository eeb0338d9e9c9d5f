//! Plain-text views of dashboard state.

use std::fmt::Write;

use weather_dashboard_core::{
    Forecast, LocationSuggestion, Unit, WeatherSnapshot, model::ConditionKind,
};

fn round(value: f64) -> i64 {
    value.round() as i64
}

fn kind_label(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Clear => "clear",
        ConditionKind::Cloudy => "cloudy",
        ConditionKind::Rain => "rain",
        ConditionKind::Snow => "snow",
        ConditionKind::Other => "other",
    }
}

pub fn current(snapshot: &WeatherSnapshot, unit: Unit) -> String {
    let loc = &snapshot.location;
    let now = &snapshot.current;
    let deg = unit.temperature_suffix();

    let mut out = String::new();
    let _ = writeln!(out, "{}", loc.name);
    let _ = writeln!(out, "{}, {}", loc.region, loc.country);
    let _ = writeln!(
        out,
        "{}{deg}  feels like {}{deg}  {} ({})",
        round(snapshot.temperature(unit)),
        round(snapshot.feels_like(unit)),
        now.condition.text,
        kind_label(now.condition.kind()),
    );
    let _ = writeln!(out, "{}", chrono::Local::now().format("%A, %B %-d, %Y"));
    let _ = writeln!(
        out,
        "Humidity {}%  Wind {} {}  Visibility {} km  UV {}",
        now.humidity,
        round(snapshot.wind_speed(unit)),
        unit.speed_suffix(),
        now.vis_km,
        now.uv,
    );
    let _ = write!(out, "Icon: {}", now.condition.icon_url());
    out
}

pub fn forecast(forecast: &Forecast, unit: Unit) -> String {
    let mut out = String::from("5-Day Forecast");
    for (i, day) in forecast.days.iter().enumerate() {
        let _ = write!(
            out,
            "\n{:<6} {:<7} {:>4}° / {:>4}°  rain {:>3}%  {}",
            day.label(i),
            day.short_date(),
            round(day.max_temp(unit)),
            round(day.min_temp(unit)),
            day.day.daily_chance_of_rain,
            day.day.condition.text,
        );
    }
    out
}

pub fn suggestions(found: &[LocationSuggestion]) -> String {
    let mut out = String::from("Suggestions");
    for (i, loc) in found.iter().enumerate() {
        let _ = write!(out, "\n  #{} {} ({})", i + 1, loc.name, loc.detail());
    }
    out
}

pub fn recent(cities: &[String]) -> String {
    let mut out = String::from("Recent Searches");
    for (i, city) in cities.iter().enumerate() {
        let _ = write!(out, "\n  #{} {}", i + 1, city);
    }
    out
}

pub fn error(message: &str) -> String {
    format!("Error: {message}\nType :retry to try again.")
}

pub fn welcome() -> &'static str {
    "Welcome to Weather Dashboard\nSearch for a city to get started with weather information."
}
