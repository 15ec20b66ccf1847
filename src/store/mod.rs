//! Event store boundary
//!
//! The resolver talks to storage only through [`EventStore`]. Two backends
//! ship with the crate and behave identically:
//! - [`InMemoryEventStore`]: volatile, used by tests and the demo driver
//! - [`SqliteEventStore`]: file-backed via rusqlite
//!
//! Every call is blocking request/response and treated as atomic by callers.
//! Mutable state lives entirely behind this trait.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryEventStore;
pub use sqlite::SqliteEventStore;

use crate::core::config::{StoreBackend, StoreConfig};
use crate::core::error::Result;
use crate::core::types::Event;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status reported by a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Success,
    Updated,
    Deleted,
    /// Rejected or matched nothing
    #[serde(other)]
    Failed,
}

/// Answer to a conflict check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCheck {
    pub conflict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_event: Option<Event>,
}

impl ConflictCheck {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn with(existing: Event) -> Self {
        Self {
            conflict: true,
            existing_event: Some(existing),
        }
    }
}

/// Calendar storage operations used by the resolver
///
/// Semantics shared by all backends:
/// - `create` rejects events without both `date` and `time`
/// - `read` matches every present field among title, date, time, location;
///   an empty filter returns everything, sorted by date then time
/// - `update` is keyed by `title` (plus `date` when given) and overwrites
///   `time`, `location` and `participants` when present
/// - `delete` matches every present field among title, date, time and
///   refuses an empty filter
/// - `check_conflict` compares `date` and `time` only
pub trait EventStore {
    fn create(&self, event: &Event) -> Result<StoreStatus>;
    fn read(&self, query: &Event) -> Result<Vec<Event>>;
    fn update(&self, event: &Event) -> Result<StoreStatus>;
    fn delete(&self, event: &Event) -> Result<StoreStatus>;
    fn check_conflict(&self, event: &Event) -> Result<ConflictCheck>;
}

/// Open the backend selected in the config
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn EventStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!(backend = "memory", "Opening event store");
            Ok(Box::new(InMemoryEventStore::new()))
        }
        StoreBackend::Sqlite => {
            tracing::info!(backend = "sqlite", path = %config.path.display(), "Opening event store");
            let store = SqliteEventStore::open(
                &config.path,
                Duration::from_millis(config.busy_timeout_ms),
            )?;
            Ok(Box::new(store))
        }
    }
}
