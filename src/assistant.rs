//! One conversational turn: classify the text, resolve every intent, reply

use crate::command::{TurnProcessor, TurnResult};
use crate::llm::parser::IntentClassifier;
use crate::store::EventStore;

/// Scheduling assistant wired to a classifier and an event store
///
/// The caller opens the store and gets it back from [`Assistant::close`].
pub struct Assistant<C> {
    classifier: C,
    store: Box<dyn EventStore>,
}

impl<C: IntentClassifier> Assistant<C> {
    pub fn new(classifier: C, store: Box<dyn EventStore>) -> Self {
        Self { classifier, store }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }

    /// Handle one user input and return the full turn result
    pub async fn handle_turn(&self, input: &str) -> TurnResult {
        let intents = self.classifier.classify(input).await;
        tracing::debug!(intents = intents.len(), "Input classified");
        TurnProcessor::new(self.store.as_ref()).process_turn(Some(input), &intents)
    }

    /// Handle one user input and return the reply text
    pub async fn handle_input(&self, input: &str) -> String {
        self.handle_turn(input).await.text()
    }

    /// Release the store back to the caller
    pub fn close(self) -> Box<dyn EventStore> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Event, Intent, IntentAction};
    use crate::store::InMemoryEventStore;
    use std::future::Future;

    struct FixedClassifier(Vec<Intent>);

    impl IntentClassifier for FixedClassifier {
        fn classify(&self, _input: &str) -> impl Future<Output = Vec<Intent>> + Send {
            let intents = self.0.clone();
            async move { intents }
        }
    }

    #[tokio::test]
    async fn test_small_talk_echoes_input() {
        let assistant = Assistant::new(
            FixedClassifier(vec![Intent::none()]),
            Box::new(InMemoryEventStore::new()),
        );
        let reply = assistant.handle_input("I'm so tired lately").await;
        assert_eq!(reply, "🤖 Scheduler: 'I'm so tired lately'");
    }

    #[tokio::test]
    async fn test_store_survives_turns() {
        let create = Intent::new(
            IntentAction::Create,
            Event::new()
                .with_title("Dinner")
                .with_date("2025-09-26")
                .with_time("20:00"),
        );
        let assistant = Assistant::new(
            FixedClassifier(vec![create]),
            Box::new(InMemoryEventStore::new()),
        );

        let first = assistant.handle_input("dinner tomorrow at 8").await;
        assert!(first.starts_with("✅"));

        let second = assistant.handle_input("dinner tomorrow at 8").await;
        assert!(second.starts_with("⚠️"));
        assert!(second.contains("Dinner"));

        let store = assistant.close();
        assert_eq!(store.read(&Event::new()).unwrap().len(), 1);
    }
}
