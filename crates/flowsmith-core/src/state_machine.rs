//! Run phases and the legal transitions between them

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Phase of one coordination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Classifying the requirement
    Analyzing,
    /// Building the graph and bundle
    Composing,
    /// Checking the bundle
    Validating,
    /// Waiting for a caller decision
    AwaitingOverride,
    /// Bundle accepted
    Done,
}

impl Phase {
    /// Every phase, in pipeline order
    pub const ALL: [Phase; 5] = [
        Phase::Analyzing,
        Phase::Composing,
        Phase::Validating,
        Phase::AwaitingOverride,
        Phase::Done,
    ];

    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Analyzing => "ANALYZING",
            Phase::Composing => "COMPOSING",
            Phase::Validating => "VALIDATING",
            Phase::AwaitingOverride => "AWAITING_OVERRIDE",
            Phase::Done => "DONE",
        }
    }

    /// Whether the run can no longer change
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        allowed_transitions(*self).is_empty()
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: Phase) -> &'static [Phase] {
    match from {
        Phase::Analyzing => &[Phase::Composing, Phase::AwaitingOverride],
        Phase::Composing => &[Phase::Validating, Phase::AwaitingOverride],
        Phase::Validating => &[Phase::Done, Phase::AwaitingOverride],
        Phase::AwaitingOverride => &[Phase::Analyzing],
        Phase::Done => &[],
    }
}

/// Whether `from -> to` is a legal step
#[inline]
#[must_use]
pub fn can_transition(from: Phase, to: Phase) -> bool {
    allowed_transitions(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_done_is_terminal() {
        let terminal: Vec<Phase> = Phase::ALL.into_iter().filter(Phase::is_terminal).collect();
        assert_eq!(terminal, vec![Phase::Done]);
    }

    #[test]
    fn override_only_restarts_analysis() {
        assert!(can_transition(Phase::AwaitingOverride, Phase::Analyzing));
        assert!(!can_transition(Phase::AwaitingOverride, Phase::Composing));
        assert!(!can_transition(Phase::Done, Phase::Analyzing));
        assert!(!can_transition(Phase::Analyzing, Phase::Done));
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Phase::AwaitingOverride).unwrap();
        assert_eq!(json, "\"AWAITING_OVERRIDE\"");
        for phase in Phase::ALL {
            assert_eq!(serde_json::to_string(&phase).unwrap(), format!("\"{phase}\""));
        }
    }
}
