//! Broadcast delivery report

use crate::registry::{ChatKind, Member};

use super::outcome::DeliveryState;

/// Informational note about one member that did not simply succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryNote {
    /// Access was revoked; the member was removed
    Removed { title: String, kind: ChatKind },
    /// Access was revoked but the removal could not be persisted
    RemovalFailed {
        title: String,
        kind: ChatKind,
        error: String,
    },
    /// Delivery failed for a reason that may go away
    Failed { title: String, reason: String },
}

impl std::fmt::Display for DeliveryNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryNote::Removed { title, kind } => {
                write!(f, "Lost access to {} ({}). Removed from list.", title, kind)
            }
            DeliveryNote::RemovalFailed { title, kind, error } => write!(
                f,
                "Lost access to {} ({}). Failed to remove from list: {}",
                title, kind, error
            ),
            DeliveryNote::Failed { title, reason } => write!(f, "{}: {}", title, reason),
        }
    }
}

/// Final state of one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub member: Member,
    pub state: DeliveryState,
}

/// Result of one broadcast
///
/// Partial failure is the normal case, so a broadcast always produces a
/// report rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of members that accepted the message
    pub delivered: usize,
    /// Notes in dispatch order
    pub notes: Vec<DeliveryNote>,
    /// Every member of the snapshot, in dispatch order
    pub attempts: Vec<Attempt>,
}

impl DeliveryReport {
    pub(crate) fn with_capacity(members: usize) -> Self {
        Self {
            delivered: 0,
            notes: Vec::new(),
            attempts: Vec::with_capacity(members),
        }
    }

    pub(crate) fn record(
        &mut self,
        member: Member,
        state: DeliveryState,
        note: Option<DeliveryNote>,
    ) {
        if state == DeliveryState::Delivered {
            self.delivered += 1;
        }
        if let Some(note) = note {
            self.notes.push(note);
        }
        self.attempts.push(Attempt { member, state });
    }

    /// Whether the snapshot was empty and nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Number of members that were evicted
    pub fn evicted(&self) -> usize {
        self.count_state(DeliveryState::Evicted)
    }

    /// Number of members that failed transiently
    pub fn failed(&self) -> usize {
        self.count_state(DeliveryState::FailedTransient)
    }

    fn count_state(&self, state: DeliveryState) -> usize {
        self.attempts.iter().filter(|a| a.state == state).count()
    }

    /// Text shown to the author after a broadcast
    pub fn summary(&self) -> String {
        let mut text = format!("Broadcast delivered to {} chat(s).", self.delivered);

        if !self.notes.is_empty() {
            text.push_str("\nIssues:");
            for note in &self.notes {
                text.push_str("\n- ");
                text.push_str(&note.to_string());
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_text() {
        let removed = DeliveryNote::Removed {
            title: "Beta Group".into(),
            kind: ChatKind::Group,
        };
        assert_eq!(
            removed.to_string(),
            "Lost access to Beta Group (group). Removed from list."
        );

        let failed = DeliveryNote::Failed {
            title: "Team Alpha".into(),
            reason: "Bad Request: message to copy not found".into(),
        };
        assert_eq!(
            failed.to_string(),
            "Team Alpha: Bad Request: message to copy not found"
        );
    }

    #[test]
    fn test_summary_without_issues() {
        let mut report = DeliveryReport::default();
        report.record(
            Member::new(1, "A", ChatKind::Group),
            DeliveryState::Delivered,
            None,
        );

        assert_eq!(report.summary(), "Broadcast delivered to 1 chat(s).");
    }

    #[test]
    fn test_summary_with_issues() {
        let mut report = DeliveryReport::default();
        report.record(
            Member::new(1, "A", ChatKind::Group),
            DeliveryState::Delivered,
            None,
        );
        report.record(
            Member::new(2, "B", ChatKind::Channel),
            DeliveryState::Evicted,
            Some(DeliveryNote::Removed {
                title: "B".into(),
                kind: ChatKind::Channel,
            }),
        );
        report.record(
            Member::new(3, "C", ChatKind::Group),
            DeliveryState::FailedTransient,
            Some(DeliveryNote::Failed {
                title: "C".into(),
                reason: "timed out".into(),
            }),
        );

        assert_eq!(
            report.summary(),
            "Broadcast delivered to 1 chat(s).\n\
             Issues:\n\
             - Lost access to B (channel). Removed from list.\n\
             - C: timed out"
        );
        assert_eq!(report.evicted(), 1);
        assert_eq!(report.failed(), 1);
    }
}
