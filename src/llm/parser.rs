//! Classify natural language requests into structured intents
//!
//! Classification never fails from the caller's point of view:
//! - transport/API errors or a reply without JSON -> a single `none` intent
//! - missing or non-array `actions` -> no intents
//! - one malformed entry -> a `none` intent in its place

use crate::core::error::{Result, ScheduleError};
use crate::core::types::Intent;
use crate::llm::client::LlmClient;
use crate::llm::context::ScheduleContext;
use serde_json::Value;
use std::future::Future;

/// Turns user text into the ordered intents of one turn
pub trait IntentClassifier {
    fn classify(&self, input: &str) -> impl Future<Output = Vec<Intent>> + Send;
}

/// Classifier backed by an LLM completion endpoint
pub struct LlmClassifier {
    client: LlmClient,
    context: ScheduleContext,
}

impl LlmClassifier {
    pub fn new(client: LlmClient, context: ScheduleContext) -> Self {
        Self { client, context }
    }

    /// Replace the prompt context (e.g. after the date rolls over or events change)
    pub fn set_context(&mut self, context: ScheduleContext) {
        self.context = context;
    }

    async fn request(&self, input: &str) -> Result<String> {
        let user_prompt = format!(
            "CONTEXT:\n{}\nUSER INPUT:\n{}\n\nClassify this request into JSON:",
            self.context.summary(),
            input
        );
        self.client.complete(CLASSIFY_SYSTEM_PROMPT, &user_prompt).await
    }
}

impl IntentClassifier for LlmClassifier {
    fn classify(&self, input: &str) -> impl Future<Output = Vec<Intent>> + Send {
        async move {
            match self.request(input).await {
                Ok(response) => parse_classification(&response),
                Err(e) => {
                    tracing::warn!(error = %e, "Classifier call failed, treating input as small talk");
                    vec![Intent::none()]
                }
            }
        }
    }
}

/// Classifier that reads already-classified JSON from the input itself
///
/// Lets a driver replay classifier output without calling a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonClassifier;

impl IntentClassifier for JsonClassifier {
    fn classify(&self, input: &str) -> impl Future<Output = Vec<Intent>> + Send {
        let intents = parse_classification(input);
        async move { intents }
    }
}

/// Parse a classifier reply into intents
pub fn parse_classification(response: &str) -> Vec<Intent> {
    let value = match extract_json(response).and_then(|json| Ok(serde_json::from_str::<Value>(json)?)) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable classifier reply");
            return vec![Intent::none()];
        }
    };

    let Some(actions) = value.get("actions").and_then(Value::as_array) else {
        tracing::debug!("Classifier reply has no actions array");
        return Vec::new();
    };

    actions
        .iter()
        .map(|entry| {
            serde_json::from_value::<Intent>(entry.clone()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, entry = %entry, "Malformed action entry");
                Intent::none()
            })
        })
        .collect()
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| ScheduleError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| ScheduleError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(ScheduleError::LlmError("Unbalanced braces in response".into()));
    }
    Ok(&response[start..=end])
}

/// System prompt for intent classification
const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are a scheduling assistant that outputs JSON only.
Read the user's input and convert it into calendar actions.

RULES:
- The input may contain several requests; put each one in the "actions" array, in the order given.
- Resolve relative dates ("tomorrow", "the day after tomorrow", "next Monday") against today's date from the context.
- Dates are YYYY-MM-DD, times are 24-hour HH:MM.
- If required information (title, date, time) is missing or ambiguous for a create,
  add "needs_clarification": true and "missing_fields": [...] to that action.
- Anything that is not a calendar request is {"action": "none"}.

AVAILABLE ACTIONS:
- create: add an event
- read: list events (use the event fields as a filter)
- update: change an existing event, identified by its title
- delete: remove an existing event
- none: small talk or unrelated requests

OUTPUT FORMAT (JSON only, no explanation):
{
  "actions": [
    {
      "action": "create" | "read" | "update" | "delete" | "none",
      "event": {
        "title": string (optional),
        "date": "YYYY-MM-DD" (optional),
        "time": "HH:MM" (optional),
        "participants": [string] (optional),
        "location": string (optional)
      },
      "needs_clarification": bool (optional),
      "missing_fields": [string] (optional)
    }
  ]
}

Examples (today is 2025-09-25):
"add a workout with Minsu at the Jamsil gym tomorrow at 7pm" -> {"actions": [{"action": "create", "event": {"title": "Workout", "date": "2025-09-26", "time": "19:00", "participants": ["Minsu"], "location": "Jamsil gym"}}]}
"book something tomorrow at 5" -> {"actions": [{"action": "create", "event": {"date": "2025-09-26", "time": "17:00"}, "needs_clarification": true, "missing_fields": ["title"]}]}
"add a workout tomorrow at 7pm and show me the day after" -> {"actions": [{"action": "create", "event": {"title": "Workout", "date": "2025-09-26", "time": "19:00"}}, {"action": "read", "event": {"date": "2025-09-27"}}]}
"delete tomorrow's workout" -> {"actions": [{"action": "delete", "event": {"title": "Workout", "date": "2025-09-26"}}]}
"I've been so tired lately" -> {"actions": [{"action": "none"}]}
"#;
