//! In-memory event store

use crate::core::error::{Result, ScheduleError};
use crate::core::types::Event;
use crate::store::{ConflictCheck, EventStore, StoreStatus};
use std::sync::{Mutex, MutexGuard};

/// Volatile event table guarded by a mutex
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with events
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
        }
    }

    /// Number of stored events; fails if the table lock is poisoned
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Event>>> {
        self.events
            .lock()
            .map_err(|_| ScheduleError::StoreError("event table lock poisoned".into()))
    }
}

/// True if `value` equals `filter`, or the filter leaves the field open
fn field_matches(filter: &Option<String>, value: &Option<String>) -> bool {
    match filter {
        Some(wanted) => value.as_deref() == Some(wanted.as_str()),
        None => true,
    }
}

fn sort_key(event: &Event) -> (String, String) {
    (
        event.date.clone().unwrap_or_default(),
        event.time.clone().unwrap_or_default(),
    )
}

impl EventStore for InMemoryEventStore {
    fn create(&self, event: &Event) -> Result<StoreStatus> {
        if event.slot().is_none() {
            return Ok(StoreStatus::Failed);
        }
        self.lock()?.push(event.clone());
        Ok(StoreStatus::Success)
    }

    fn read(&self, query: &Event) -> Result<Vec<Event>> {
        let mut found: Vec<Event> = self
            .lock()?
            .iter()
            .filter(|e| {
                field_matches(&query.title, &e.title)
                    && field_matches(&query.date, &e.date)
                    && field_matches(&query.time, &e.time)
                    && field_matches(&query.location, &e.location)
            })
            .cloned()
            .collect();
        found.sort_by_key(sort_key);
        Ok(found)
    }

    fn update(&self, event: &Event) -> Result<StoreStatus> {
        if event.title.is_none() {
            return Ok(StoreStatus::Failed);
        }

        let mut events = self.lock()?;
        let mut changed = 0;
        for existing in events
            .iter_mut()
            .filter(|e| field_matches(&event.title, &e.title) && field_matches(&event.date, &e.date))
        {
            if event.time.is_some() {
                existing.time = event.time.clone();
            }
            if event.location.is_some() {
                existing.location = event.location.clone();
            }
            if event.participants.is_some() {
                existing.participants = event.participants.clone();
            }
            changed += 1;
        }

        Ok(if changed > 0 {
            StoreStatus::Updated
        } else {
            StoreStatus::Failed
        })
    }

    fn delete(&self, event: &Event) -> Result<StoreStatus> {
        if event.title.is_none() && event.date.is_none() && event.time.is_none() {
            return Ok(StoreStatus::Failed);
        }

        let mut events = self.lock()?;
        let before = events.len();
        events.retain(|e| {
            !(field_matches(&event.title, &e.title)
                && field_matches(&event.date, &e.date)
                && field_matches(&event.time, &e.time))
        });

        Ok(if events.len() < before {
            StoreStatus::Deleted
        } else {
            StoreStatus::Failed
        })
    }

    fn check_conflict(&self, event: &Event) -> Result<ConflictCheck> {
        let Some(slot) = event.slot() else {
            return Ok(ConflictCheck::clear());
        };

        let events = self.lock()?;
        Ok(events
            .iter()
            .find(|e| e.slot() == Some(slot))
            .cloned()
            .map(ConflictCheck::with)
            .unwrap_or_default())
    }
}
