//! Intent resolution - decides what to do with one intent and renders the outcome
//!
//! Decision order:
//! 1. `needs_clarification` wins over everything and never touches the store
//! 2. dispatch on the action (create runs a conflict check first)
//! 3. store errors become a failure fragment for this intent only
//!
//! Free text interpolated into a fragment is folded onto one line so a
//! fragment never contains the blank-line separator.

use crate::command::outcome::{Disposition, OutcomeFragment};
use crate::core::error::Result;
use crate::core::types::{Event, Intent, IntentAction};
use crate::store::{EventStore, StoreStatus};

pub const NO_EVENTS_TEXT: &str = "📭 No events found for that date.";
pub const UPDATED_TEXT: &str = "✏️ Event updated.";
pub const DELETED_TEXT: &str = "🗑️ Event deleted.";
pub const NEUTRAL_ACK_TEXT: &str = "🤖 Scheduler: I'm here whenever you want to plan something.";

/// Resolves one intent against the event store
pub struct IntentResolver<'a> {
    store: &'a dyn EventStore,
}

impl<'a> IntentResolver<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    /// Resolve an intent to exactly one outcome fragment
    ///
    /// `utterance` is the user's original text, echoed back (whitespace
    /// collapsed) by the generic fallback when present.
    pub fn resolve(&self, intent: &Intent, utterance: Option<&str>) -> OutcomeFragment {
        if intent.needs_clarification {
            tracing::debug!(
                action = intent.action.as_str(),
                missing = ?intent.missing_fields,
                "Intent needs clarification"
            );
            return clarification(&intent.missing_fields);
        }

        tracing::debug!(action = intent.action.as_str(), event = ?intent.event, "Dispatching intent");

        let outcome = match intent.action {
            IntentAction::Create => self.create(&intent.event),
            IntentAction::Read => self.read(&intent.event),
            IntentAction::Update => self.update(&intent.event),
            IntentAction::Delete => self.delete(&intent.event),
            IntentAction::None => return generic(utterance),
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!(action = intent.action.as_str(), error = %e, "Store call failed");
            failure(intent.action)
        })
    }

    fn create(&self, event: &Event) -> Result<OutcomeFragment> {
        let check = self.store.check_conflict(event)?;
        if check.conflict {
            let existing = check.existing_event.unwrap_or_default();
            tracing::info!(
                date = ?event.date,
                time = ?event.time,
                existing = ?existing.title,
                "Scheduling conflict detected"
            );
            return Ok(conflict(&existing));
        }

        match self.store.create(event)? {
            StoreStatus::Success => {
                tracing::info!(title = ?event.title, date = ?event.date, time = ?event.time, "Event created");
                Ok(OutcomeFragment::new(
                    Disposition::Success,
                    format!(
                        "✅ Event added: {} - {} {}{}",
                        title_of(event),
                        field_or_unknown(&event.date),
                        field_or_unknown(&event.time),
                        participants_suffix(event)
                    ),
                ))
            }
            _ => Ok(failure(IntentAction::Create)),
        }
    }

    fn read(&self, query: &Event) -> Result<OutcomeFragment> {
        let events = self.store.read(query)?;
        if events.is_empty() {
            return Ok(OutcomeFragment::new(Disposition::Success, NO_EVENTS_TEXT));
        }

        let lines: Vec<String> = events.iter().map(event_line).collect();
        Ok(OutcomeFragment::new(
            Disposition::Success,
            format!("📅 Events:\n{}", lines.join("\n")),
        ))
    }

    // No conflict check here: moving an event onto an occupied slot goes undetected.
    fn update(&self, event: &Event) -> Result<OutcomeFragment> {
        Ok(match self.store.update(event)? {
            StoreStatus::Updated => OutcomeFragment::new(Disposition::Success, UPDATED_TEXT),
            _ => failure(IntentAction::Update),
        })
    }

    fn delete(&self, event: &Event) -> Result<OutcomeFragment> {
        Ok(match self.store.delete(event)? {
            StoreStatus::Deleted => OutcomeFragment::new(Disposition::Success, DELETED_TEXT),
            _ => failure(IntentAction::Delete),
        })
    }
}

fn clarification(missing: &[String]) -> OutcomeFragment {
    let fields = if missing.is_empty() {
        "more details".to_string()
    } else {
        missing.iter().map(|f| one_line(f)).collect::<Vec<_>>().join(", ")
    };
    OutcomeFragment::new(
        Disposition::ClarificationRequested,
        format!("❓ I need '{}' to schedule this. Could you tell me?", fields),
    )
}

fn conflict(existing: &Event) -> OutcomeFragment {
    OutcomeFragment::new(
        Disposition::ConflictDetected,
        format!(
            "⚠️ '{}' is already scheduled at that time.\n\
             👉 Should I add the new event alongside it, or replace the existing one?",
            title_of(existing)
        ),
    )
}

fn generic(utterance: Option<&str>) -> OutcomeFragment {
    let text = match utterance.map(one_line).filter(|u| !u.is_empty()) {
        Some(u) => format!("🤖 Scheduler: '{}'", u),
        None => NEUTRAL_ACK_TEXT.to_string(),
    };
    OutcomeFragment::new(Disposition::Generic, text)
}

/// Short apology naming the attempted action
pub fn failure(action: IntentAction) -> OutcomeFragment {
    let verb = match action {
        IntentAction::Create => "add the event",
        IntentAction::Read => "look up events",
        IntentAction::Update => "update the event",
        IntentAction::Delete => "delete the event",
        IntentAction::None => "handle that request",
    };
    OutcomeFragment::new(Disposition::Failure, format!("❌ Sorry, I couldn't {}.", verb))
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field_or_unknown(field: &Option<String>) -> String {
    field.as_deref().map_or_else(|| "?".to_string(), one_line)
}

fn title_of(event: &Event) -> String {
    event
        .title
        .as_deref()
        .map_or_else(|| "(untitled)".to_string(), one_line)
}

fn participants_suffix(event: &Event) -> String {
    let participants = event.participants();
    if participants.is_empty() {
        String::new()
    } else {
        let names: Vec<String> = participants.iter().map(|p| one_line(p)).collect();
        format!(" (with: {})", names.join(", "))
    }
}

fn event_line(event: &Event) -> String {
    format!(
        "{} {} → {}{}",
        field_or_unknown(&event.date),
        field_or_unknown(&event.time),
        title_of(event),
        participants_suffix(event)
    )
}
