//! Turn processing - resolves each intent of a turn and joins the outcomes

use crate::command::outcome::TurnResult;
use crate::command::resolver::IntentResolver;
use crate::core::types::Intent;
use crate::store::EventStore;

/// Processes the ordered intents of one user turn
pub struct TurnProcessor<'a> {
    resolver: IntentResolver<'a>,
}

impl<'a> TurnProcessor<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self {
            resolver: IntentResolver::new(store),
        }
    }

    /// Resolve every intent in order, one fragment per intent
    ///
    /// Intents are independent: a failure in one never stops the rest, and
    /// fragments keep the input order.
    pub fn process_turn(&self, utterance: Option<&str>, intents: &[Intent]) -> TurnResult {
        let fragments = intents
            .iter()
            .map(|intent| self.resolver.resolve(intent, utterance))
            .collect();

        let result = TurnResult { fragments };
        tracing::debug!(
            intents = intents.len(),
            dispositions = ?result.dispositions(),
            "Turn processed"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::outcome::Disposition;
    use crate::core::types::{Event, IntentAction};
    use crate::store::InMemoryEventStore;

    #[test]
    fn test_empty_turn() {
        let store = InMemoryEventStore::new();
        let result = TurnProcessor::new(&store).process_turn(Some("hello"), &[]);
        assert!(result.is_empty());
        assert_eq!(result.text(), "");
    }

    #[test]
    fn test_mixed_turn_keeps_order() {
        let store = InMemoryEventStore::new();
        let intents = vec![
            Intent::new(
                IntentAction::Create,
                Event::new()
                    .with_title("Workout")
                    .with_date("2025-09-26")
                    .with_time("19:00"),
            ),
            Intent::new(IntentAction::Read, Event::new().with_date("2025-09-27")),
            Intent::new(IntentAction::Delete, Event::new().with_title("Nothing")),
        ];

        let result = TurnProcessor::new(&store).process_turn(None, &intents);

        assert_eq!(
            result.dispositions(),
            vec![Disposition::Success, Disposition::Success, Disposition::Failure]
        );
        assert_eq!(result.text().split("\n\n").count(), 3);
    }

    #[test]
    fn test_earlier_create_visible_to_later_read() {
        let store = InMemoryEventStore::new();
        let event = Event::new()
            .with_title("Dinner")
            .with_date("2025-09-26")
            .with_time("20:00");
        let intents = vec![
            Intent::new(IntentAction::Create, event),
            Intent::new(IntentAction::Read, Event::new().with_date("2025-09-26")),
        ];

        let result = TurnProcessor::new(&store).process_turn(None, &intents);

        assert!(result.fragments[1].text.contains("20:00 → Dinner"));
    }
}
