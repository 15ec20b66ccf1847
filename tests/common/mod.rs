//! Store doubles shared by the integration tests

#![allow(dead_code)]

use schedule_assistant::core::error::{Result, ScheduleError};
use schedule_assistant::core::types::Event;
use schedule_assistant::store::{ConflictCheck, EventStore, InMemoryEventStore, StoreStatus};
use std::cell::RefCell;

/// Wraps an in-memory store and records every call by operation name
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryEventStore,
    calls: RefCell<Vec<&'static str>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            inner: InMemoryEventStore::with_events(events),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, op: &'static str) {
        self.calls.borrow_mut().push(op);
    }
}

impl EventStore for RecordingStore {
    fn create(&self, event: &Event) -> Result<StoreStatus> {
        self.record("create");
        self.inner.create(event)
    }

    fn read(&self, query: &Event) -> Result<Vec<Event>> {
        self.record("read");
        self.inner.read(query)
    }

    fn update(&self, event: &Event) -> Result<StoreStatus> {
        self.record("update");
        self.inner.update(event)
    }

    fn delete(&self, event: &Event) -> Result<StoreStatus> {
        self.record("delete");
        self.inner.delete(event)
    }

    fn check_conflict(&self, event: &Event) -> Result<ConflictCheck> {
        self.record("check_conflict");
        self.inner.check_conflict(event)
    }
}

/// A store whose every call errors, as if the backend were unreachable
pub struct FailingStore;

fn unreachable_backend<T>() -> Result<T> {
    Err(ScheduleError::StoreError("backend unreachable".into()))
}

impl EventStore for FailingStore {
    fn create(&self, _event: &Event) -> Result<StoreStatus> {
        unreachable_backend()
    }

    fn read(&self, _query: &Event) -> Result<Vec<Event>> {
        unreachable_backend()
    }

    fn update(&self, _event: &Event) -> Result<StoreStatus> {
        unreachable_backend()
    }

    fn delete(&self, _event: &Event) -> Result<StoreStatus> {
        unreachable_backend()
    }

    fn check_conflict(&self, _event: &Event) -> Result<ConflictCheck> {
        unreachable_backend()
    }
}

pub fn event_at(title: &str, date: &str, time: &str) -> Event {
    Event::new().with_title(title).with_date(date).with_time(time)
}
