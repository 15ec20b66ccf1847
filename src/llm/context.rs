//! Gather calendar context for classifier prompts
//!
//! The classifier resolves relative dates ("tomorrow evening", "the day
//! after tomorrow") itself, so the prompt needs today's date. Known upcoming
//! events help it pick the right title for update/delete requests.

use crate::core::types::Event;
use crate::store::EventStore;
use chrono::{Datelike, Local, NaiveDate};

/// Maximum number of upcoming events included in a prompt
const MAX_UPCOMING: usize = 10;

/// Calendar context for classifier prompts
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    /// The user's current date
    pub today: NaiveDate,
    /// Events on or after `today`, sorted by date and time
    pub upcoming: Vec<Event>,
}

impl ScheduleContext {
    /// Context with a fixed date and no known events
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            today,
            upcoming: Vec::new(),
        }
    }

    /// Context for the local date, with the store's upcoming events
    pub fn for_today(store: &dyn EventStore) -> Self {
        Self::from_store(store, Local::now().date_naive())
    }

    /// Build a context from the store's upcoming events
    ///
    /// A failing store only costs the prompt its event list.
    pub fn from_store(store: &dyn EventStore, today: NaiveDate) -> Self {
        let mut context = Self::for_date(today);
        let cutoff = today.format("%Y-%m-%d").to_string();
        context.upcoming = match store.read(&Event::new()) {
            Ok(events) => events
                .into_iter()
                .filter(|e| e.date.as_deref().is_some_and(|d| d >= cutoff.as_str()))
                .take(MAX_UPCOMING)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load upcoming events for prompt context");
                Vec::new()
            }
        };
        context
    }

    /// Generate a text summary of the context for LLM prompts
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Today: {} ({})\n",
            self.today.format("%Y-%m-%d"),
            self.today.weekday()
        );

        if !self.upcoming.is_empty() {
            s.push_str("\nUpcoming events:\n");
            for event in &self.upcoming {
                s.push_str(&format!(
                    "- {} {} {}\n",
                    event.date.as_deref().unwrap_or("?"),
                    event.time.as_deref().unwrap_or("?"),
                    event.title.as_deref().unwrap_or("(untitled)")
                ));
            }
        }

        s
    }
}
