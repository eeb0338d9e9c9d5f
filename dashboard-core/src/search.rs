//! Search box state: debounced location suggestions and the dropdown panels.
//!
//! Lookups run on spawned tasks; their results come back as
//! [`SuggestionUpdate`]s on the channel returned by [`SearchInput::new`], and
//! the owner feeds them to [`SearchInput::apply`] from its event loop.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    dashboard::{MIN_QUERY_LEN, WeatherDashboard},
    debounce::Debouncer,
    model::LocationSuggestion,
};

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Source of autocomplete candidates. Never fails; no match is an empty list.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Vec<LocationSuggestion>;
}

#[async_trait]
impl LocationLookup for WeatherDashboard {
    async fn lookup(&self, query: &str) -> Vec<LocationSuggestion> {
        self.search_locations(query).await
    }
}

/// Which dropdown is visible. The two panels are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Hidden,
    Suggestions,
    Recent,
}

/// Outcome of a debounced lookup for `query`. `None` hides the suggestion panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionUpdate {
    /// Input generation the lookup was scheduled for.
    pub generation: u64,
    pub query: String,
    pub results: Option<Vec<LocationSuggestion>>,
}

pub struct SearchInput<L: LocationLookup + ?Sized> {
    text: String,
    suggestions: Vec<LocationSuggestion>,
    panel: Panel,
    // Bumped on every edit and close; updates from older generations are dropped.
    generation: u64,
    lookup: Arc<L>,
    debouncer: Debouncer,
    updates: mpsc::UnboundedSender<SuggestionUpdate>,
}

impl<L: LocationLookup + ?Sized + 'static> SearchInput<L> {
    pub fn new(lookup: Arc<L>) -> (Self, mpsc::UnboundedReceiver<SuggestionUpdate>) {
        Self::with_delay(lookup, DEBOUNCE_DELAY)
    }

    pub fn with_delay(
        lookup: Arc<L>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let input = Self {
            text: String::new(),
            suggestions: Vec::new(),
            panel: Panel::Hidden,
            generation: 0,
            lookup,
            debouncer: Debouncer::new(delay),
            updates,
        };
        (input, rx)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn suggestions(&self) -> &[LocationSuggestion] {
        &self.suggestions
    }

    /// Replace the text and restart the debounce timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.generation += 1;

        let generation = self.generation;
        let query = self.text.clone();
        let lookup = Arc::clone(&self.lookup);
        let updates = self.updates.clone();

        self.debouncer.schedule(async move {
            let results = if query.chars().count() >= MIN_QUERY_LEN {
                Some(lookup.lookup(&query).await)
            } else {
                None
            };
            // The receiver is gone only once the owner has shut down.
            let _ = updates.send(SuggestionUpdate { generation, query, results });
        });
    }

    /// Apply a finished lookup. Returns `false` if the text was edited, or the
    /// panels closed, after the lookup was scheduled.
    pub fn apply(&mut self, update: SuggestionUpdate) -> bool {
        if update.generation != self.generation {
            debug!(stale = %update.query, current = %self.text, "dropping stale suggestions");
            return false;
        }

        match update.results {
            Some(results) => {
                self.suggestions = results;
                self.panel = Panel::Suggestions;
            }
            None => {
                self.suggestions.clear();
                if self.panel == Panel::Suggestions {
                    self.panel = Panel::Hidden;
                }
            }
        }
        true
    }

    /// Show recent searches when the box is (nearly) empty and there are any.
    pub fn focus(&mut self, recent: &[String]) {
        if self.text.chars().count() < MIN_QUERY_LEN && !recent.is_empty() {
            self.panel = Panel::Recent;
        }
    }

    /// The trimmed text to search for, if any. Hides both panels.
    pub fn submit(&mut self) -> Option<String> {
        let city = self.text.trim();
        if city.is_empty() {
            return None;
        }

        let city = city.to_string();
        self.close();
        Some(city)
    }

    /// Pick the suggestion at `index`; the search string is "name, country".
    pub fn choose_suggestion(&mut self, index: usize) -> Option<String> {
        let city = self.suggestions.get(index)?.display_name();
        self.text = city.clone();
        self.close();
        Some(city)
    }

    pub fn choose_recent(&mut self, city: &str) -> String {
        self.text = city.to_string();
        self.invalidate();
        if self.panel == Panel::Recent {
            self.panel = Panel::Hidden;
        }
        city.to_string()
    }

    /// A pointer interaction outside the box and its dropdown.
    pub fn dismiss(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.invalidate();
        self.panel = Panel::Hidden;
    }

    /// Cancel the pending lookup and orphan any result already queued.
    fn invalidate(&mut self) {
        self.debouncer.cancel();
        self.generation += 1;
    }
}
