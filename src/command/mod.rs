//! Intent dispatch pipeline
//!
//! Turns classified intents into store operations and a user-facing reply:
//! Vec<Intent> -> TurnProcessor -> IntentResolver (per intent) -> OutcomeFragment -> TurnResult

pub mod executor;
pub mod outcome;
pub mod resolver;

pub use executor::TurnProcessor;
pub use outcome::{Disposition, OutcomeFragment, TurnResult};
pub use resolver::IntentResolver;
