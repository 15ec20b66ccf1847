//! Core type definitions used throughout the codebase
//!
//! Intents and events arrive as JSON from the classifier, so every field is
//! lenient: absent or `null` values fall back to their defaults instead of
//! failing the whole intent.

use serde::{Deserialize, Deserializer, Serialize};

/// Calendar operation requested by one intent
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    /// Add a new event
    Create,
    /// List events matching a filter
    Read,
    /// Modify an existing event
    Update,
    /// Remove an existing event
    Delete,
    /// Small talk or anything that is not a calendar operation
    #[default]
    #[serde(other)]
    None,
}

impl IntentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentAction::Create => "create",
            IntentAction::Read => "read",
            IntentAction::Update => "update",
            IntentAction::Delete => "delete",
            IntentAction::None => "none",
        }
    }
}

/// A partial calendar event
///
/// Used both as a write payload and as a query filter, so any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO calendar date, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// 24-hour clock, `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display order only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Participants in display order (empty if none were given)
    pub fn participants(&self) -> &[String] {
        self.participants.as_deref().unwrap_or(&[])
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.participants().is_empty()
    }

    /// The slot used for collision detection, if both parts are known
    pub fn slot(&self) -> Option<(&str, &str)> {
        Some((self.date.as_deref()?, self.time.as_deref()?))
    }
}

/// One classifier-produced request for a single calendar operation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: IntentAction,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: Event,
    #[serde(
        default,
        alias = "needsClarification",
        deserialize_with = "null_as_default"
    )]
    pub needs_clarification: bool,
    #[serde(
        default,
        alias = "missingFields",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub missing_fields: Vec<String>,
}

impl Intent {
    pub fn new(action: IntentAction, event: Event) -> Self {
        Self {
            action,
            event,
            needs_clarification: false,
            missing_fields: Vec::new(),
        }
    }

    /// An intent the classifier flagged as incomplete
    pub fn clarify<I, S>(action: IntentAction, event: Event, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action,
            event,
            needs_clarification: true,
            missing_fields: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Fallback intent used whenever classification degrades
    pub fn none() -> Self {
        Self::default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_action_serialization() {
        let json = serde_json::to_string(&IntentAction::Create).unwrap();
        assert_eq!(json, "\"create\"");
    }

    #[test]
    fn test_unknown_action_is_none() {
        let action: IntentAction = serde_json::from_str("\"reschedule\"").unwrap();
        assert_eq!(action, IntentAction::None);
    }

    #[test]
    fn test_full_intent_deserialization() {
        let json = r#"{
            "action": "create",
            "event": {
                "title": "Workout",
                "date": "2025-09-26",
                "time": "19:00",
                "participants": ["Minsu"],
                "location": "Jamsil gym"
            }
        }"#;
        let intent: Intent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.action, IntentAction::Create);
        assert_eq!(intent.event.title.as_deref(), Some("Workout"));
        assert_eq!(intent.event.participants(), ["Minsu".to_string()]);
        assert_eq!(intent.event.location.as_deref(), Some("Jamsil gym"));
        assert!(!intent.needs_clarification);
        assert!(intent.missing_fields.is_empty());
    }

    #[test]
    fn test_clarification_fields_accept_both_casings() {
        let snake = r#"{"action": "create", "needs_clarification": true, "missing_fields": ["title"]}"#;
        let camel = r#"{"action": "create", "needsClarification": true, "missingFields": ["title"]}"#;
        let a: Intent = serde_json::from_str(snake).unwrap();
        let b: Intent = serde_json::from_str(camel).unwrap();
        assert_eq!(a, b);
        assert!(a.needs_clarification);
        assert_eq!(a.missing_fields, vec!["title".to_string()]);
    }

    #[test]
    fn test_nulls_and_missing_fields_default() {
        let json = r#"{"action": null, "event": null, "needs_clarification": null}"#;
        let intent: Intent = serde_json::from_str(json).unwrap();
        assert_eq!(intent, Intent::none());

        let event: Event = serde_json::from_str(r#"{"participants": null}"#).unwrap();
        assert!(event.participants().is_empty());
        assert!(event.is_empty());
    }

    #[test]
    fn test_slot_requires_date_and_time() {
        let event = Event::new().with_date("2025-09-26");
        assert_eq!(event.slot(), None);
        let event = event.with_time("19:00");
        assert_eq!(event.slot(), Some(("2025-09-26", "19:00")));
    }
}
