pub mod config;
pub mod error;
pub mod types;

pub use config::AssistantConfig;
pub use types::{Event, Intent, IntentAction};
