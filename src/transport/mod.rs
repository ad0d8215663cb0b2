//! Transport adapter interface
//!
//! The relay never talks to the messaging network itself. Whatever connects to
//! it (a bot API client, a test double) implements [`Transport`] and is shared
//! as an `Arc<T>`. Implementations must be safe to call concurrently.

use std::future::Future;

use thiserror::Error;

use crate::registry::{ChatDescriptor, MemberId};

#[cfg(test)]
pub(crate) mod mock;

/// Identifier of a user acting on the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the message being relayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// Chat the original message lives in
    pub chat: MemberId,
    /// Message id within that chat
    pub message_id: i64,
}

impl MessageRef {
    pub fn new(chat: impl Into<MemberId>, message_id: i64) -> Self {
        Self {
            chat: chat.into(),
            message_id,
        }
    }
}

/// Successful delivery acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
    /// Id of the copy in the destination chat, if the transport reports one
    pub message_id: Option<i64>,
}

/// Why a delivery failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The bot was removed from, or blocked by, the destination
    #[error("access to the destination was revoked")]
    PermanentRevocation,

    /// Any other failure; the destination may accept later
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Build an `Other` error from anything displayable
    pub fn other(message: impl std::fmt::Display) -> Self {
        TransportError::Other(message.to_string())
    }
}

/// A user's standing in a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Whether the user may manage the chat's subscription
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberStatus::Owner | MemberStatus::Administrator)
    }
}

/// Operations the relay needs from the messaging network
pub trait Transport: Send + Sync + 'static {
    /// Copy `source` into the destination chat
    fn send_copy(
        &self,
        destination: MemberId,
        source: &MessageRef,
    ) -> impl Future<Output = Result<Ack, TransportError>> + Send;

    /// Look up a user's status in a chat
    fn member_status(
        &self,
        chat: MemberId,
        user: UserId,
    ) -> impl Future<Output = Result<MemberStatus, TransportError>> + Send;

    /// Human-readable name for a chat, used once at registration
    fn resolve_display_name(&self, chat: &ChatDescriptor) -> String {
        chat.display_name()
    }
}
