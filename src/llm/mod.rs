//! Intent extraction: user text in, structured intents out

pub mod client;
pub mod context;
pub mod parser;

pub use client::LlmClient;
pub use context::ScheduleContext;
pub use parser::{parse_classification, IntentClassifier, JsonClassifier, LlmClassifier};
