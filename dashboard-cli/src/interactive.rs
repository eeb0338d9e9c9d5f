//! Line-driven dashboard loop.
//!
//! Each line is one interaction with the search box: plain text replaces the
//! input (suggestions follow after the debounce), an empty line submits, and
//! `#N` or `:command` lines stand in for clicks.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_dashboard_core::{DashboardError, Panel, SearchInput, Unit, WeatherDashboard};

use crate::render;

const HELP: &str = "\
Type a city to see suggestions, press Enter on an empty line to search it.
  #N       pick item N from the open list
  :recent  show recent searches
  :esc     close the open list
  :unit    switch between metric and imperial
  :retry   repeat the last search
  :help    show this help
  :quit    exit";

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Input(String),
    Submit,
    Pick(usize),
    Focus,
    Dismiss,
    ToggleUnit,
    Retry,
    Help,
    Quit,
}

fn parse_action(line: &str) -> Action {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Action::Submit;
    }
    if let Some(n) = trimmed.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
        return Action::Pick(n);
    }

    match trimmed {
        ":recent" => Action::Focus,
        ":esc" => Action::Dismiss,
        ":unit" => Action::ToggleUnit,
        ":retry" => Action::Retry,
        ":help" | ":h" => Action::Help,
        ":quit" | ":q" => Action::Quit,
        _ => Action::Input(line.to_string()),
    }
}

pub async fn run(
    dashboard: Arc<WeatherDashboard>,
    initial_city: &str,
    mut unit: Unit,
) -> anyhow::Result<()> {
    let (mut input, mut updates) = SearchInput::new(Arc::clone(&dashboard));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    search(&dashboard, initial_city, unit).await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_action(&line) {
                    Action::Input(text) => input.input(text),
                    Action::Submit => {
                        if let Some(city) = input.submit() {
                            search(&dashboard, &city, unit).await;
                        }
                    }
                    Action::Pick(n) => {
                        let Some(index) = n.checked_sub(1) else {
                            println!("Lists are numbered from 1.");
                            continue;
                        };
                        let city = match input.panel() {
                            Panel::Suggestions => input.choose_suggestion(index),
                            Panel::Recent => {
                                let recent = dashboard.state().recent;
                                recent.as_slice().get(index).map(|city| input.choose_recent(city))
                            }
                            Panel::Hidden => None,
                        };
                        match city {
                            Some(city) => search(&dashboard, &city, unit).await,
                            None => println!("Nothing to pick at #{n}."),
                        }
                    }
                    Action::Focus => {
                        input.focus(dashboard.state().recent.as_slice());
                        if input.panel() == Panel::Recent {
                            println!("{}", render::recent(dashboard.state().recent.as_slice()));
                        }
                    }
                    Action::Dismiss => input.dismiss(),
                    Action::ToggleUnit => {
                        unit = unit.toggle();
                        println!("Units: {unit}");
                        show(&dashboard, unit);
                    }
                    Action::Retry => {
                        let outcome = dashboard.retry().await;
                        finish(&dashboard, outcome, unit);
                    }
                    Action::Help => println!("{HELP}"),
                    Action::Quit => break,
                }
            }
            Some(update) = updates.recv() => {
                if input.apply(update) && input.panel() == Panel::Suggestions {
                    if input.suggestions().is_empty() {
                        println!("No matching locations.");
                    } else {
                        println!("{}", render::suggestions(input.suggestions()));
                    }
                }
            }
        }
    }

    Ok(())
}

async fn search(dashboard: &WeatherDashboard, city: &str, unit: Unit) {
    println!("Loading weather for {city}...");
    let outcome = dashboard.search_weather(city).await;
    finish(dashboard, outcome, unit);
}

fn finish(dashboard: &WeatherDashboard, outcome: Result<(), DashboardError>, unit: Unit) {
    match outcome {
        Ok(()) => show(dashboard, unit),
        Err(err) => println!("{}", render::error(&err.to_string())),
    }
}

fn show(dashboard: &WeatherDashboard, unit: Unit) {
    let state = dashboard.state();

    if let Some(message) = &state.error {
        println!("{}", render::error(message));
        return;
    }

    match (&state.snapshot, &state.forecast) {
        (Some(snapshot), forecast) => {
            println!("{}", render::current(snapshot, unit));
            if let Some(forecast) = forecast {
                println!("\n{}", render::forecast(forecast, unit));
            }
        }
        (None, _) => println!("{}", render::welcome()),
    }
}
