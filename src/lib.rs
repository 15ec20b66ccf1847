//! Schedule Assistant - natural language calendar management
//!
//! Text is classified into intents by an LLM, then each intent is resolved
//! against an event store (clarify, detect conflict, execute, or chat back).

pub mod assistant;
pub mod command;
pub mod core;
pub mod llm;
pub mod store;
