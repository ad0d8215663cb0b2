//! Per-member delivery outcomes

use crate::transport::{Ack, TransportError};

/// Classified result of a single send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The destination accepted the copy
    Delivered(Ack),
    /// The destination will never accept delivery again
    PermanentRevocation,
    /// Anything else, including timeouts
    TransientFailure(String),
}

impl From<Result<Ack, TransportError>> for DeliveryOutcome {
    fn from(result: Result<Ack, TransportError>) -> Self {
        match result {
            Ok(ack) => DeliveryOutcome::Delivered(ack),
            Err(TransportError::PermanentRevocation) => DeliveryOutcome::PermanentRevocation,
            Err(TransportError::Other(message)) => DeliveryOutcome::TransientFailure(message),
        }
    }
}

/// Where a member stands within one broadcast
///
/// Every member starts `Pending` and ends in exactly one of the other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Pending,
    Delivered,
    /// Access was revoked and the member was dropped from the registry
    Evicted,
    /// Delivery failed but the member stays registered
    FailedTransient,
}

impl DeliveryState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeliveryState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            DeliveryOutcome::from(Ok(Ack::default())),
            DeliveryOutcome::Delivered(Ack::default())
        );
        assert_eq!(
            DeliveryOutcome::from(Err(TransportError::PermanentRevocation)),
            DeliveryOutcome::PermanentRevocation
        );
        assert_eq!(
            DeliveryOutcome::from(Err(TransportError::other("Too Many Requests"))),
            DeliveryOutcome::TransientFailure("Too Many Requests".into())
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!DeliveryState::Pending.is_terminal());
        assert!(DeliveryState::Delivered.is_terminal());
        assert!(DeliveryState::Evicted.is_terminal());
        assert!(DeliveryState::FailedTransient.is_terminal());
    }
}
