//! Scripted transport for tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{Ack, MemberStatus, MessageRef, Transport, TransportError, UserId};
use crate::registry::MemberId;

/// Transport whose per-destination behavior is set up front
#[derive(Default)]
pub(crate) struct MockTransport {
    failures: HashMap<MemberId, TransportError>,
    delays: HashMap<MemberId, Duration>,
    statuses: HashMap<(MemberId, UserId), MemberStatus>,
    status_errors: bool,
    sent: Mutex<Vec<MemberId>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make sends to `id` fail with `error`
    pub(crate) fn fail(mut self, id: impl Into<MemberId>, error: TransportError) -> Self {
        self.failures.insert(id.into(), error);
        self
    }

    /// Make sends to `id` take `delay` before answering
    pub(crate) fn delay(mut self, id: impl Into<MemberId>, delay: Duration) -> Self {
        self.delays.insert(id.into(), delay);
        self
    }

    /// Report `status` for `user` in `chat`
    pub(crate) fn status(
        mut self,
        chat: impl Into<MemberId>,
        user: UserId,
        status: MemberStatus,
    ) -> Self {
        self.statuses.insert((chat.into(), user), status);
        self
    }

    /// Make every status lookup fail
    pub(crate) fn status_errors(mut self) -> Self {
        self.status_errors = true;
        self
    }

    /// Destinations attempted so far, in call order
    pub(crate) fn attempts(&self) -> Vec<MemberId> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn send_copy(
        &self,
        destination: MemberId,
        source: &MessageRef,
    ) -> Result<Ack, TransportError> {
        self.sent.lock().unwrap().push(destination);

        if let Some(delay) = self.delays.get(&destination) {
            tokio::time::sleep(*delay).await;
        }

        match self.failures.get(&destination) {
            Some(error) => Err(error.clone()),
            None => Ok(Ack {
                message_id: Some(source.message_id),
            }),
        }
    }

    async fn member_status(
        &self,
        chat: MemberId,
        user: UserId,
    ) -> Result<MemberStatus, TransportError> {
        if self.status_errors {
            return Err(TransportError::other("chat not found"));
        }
        Ok(self
            .statuses
            .get(&(chat, user))
            .copied()
            .unwrap_or(MemberStatus::Member))
    }
}
