//! Per-intent outcomes and the joined turn reply

use std::fmt;

/// How one intent was disposed of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Missing fields were requested back from the user
    ClarificationRequested,
    /// The requested slot is already taken; nothing was written
    ConflictDetected,
    Success,
    Failure,
    /// Not a calendar operation
    Generic,
}

/// Rendered result of resolving one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeFragment {
    pub disposition: Disposition,
    pub text: String,
}

impl OutcomeFragment {
    pub fn new(disposition: Disposition, text: impl Into<String>) -> Self {
        Self {
            disposition,
            text: text.into(),
        }
    }
}

/// Separator between fragments in the reply
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Ordered fragments for one user turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnResult {
    pub fragments: Vec<OutcomeFragment>,
}

impl TurnResult {
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn dispositions(&self) -> Vec<Disposition> {
        self.fragments.iter().map(|f| f.disposition).collect()
    }

    /// The reply shown to the user
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR)
    }
}

impl fmt::Display for TurnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_turn_is_empty_string() {
        assert_eq!(TurnResult::default().text(), "");
    }

    #[test]
    fn test_fragments_joined_by_blank_line() {
        let turn = TurnResult {
            fragments: vec![
                OutcomeFragment::new(Disposition::Success, "one"),
                OutcomeFragment::new(Disposition::Generic, "two\nlines"),
            ],
        };
        assert_eq!(turn.to_string(), "one\n\ntwo\nlines");
        assert_eq!(
            turn.dispositions(),
            vec![Disposition::Success, Disposition::Generic]
        );
    }
}
