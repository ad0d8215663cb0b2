//! Authorization
//!
//! Decides who may change a chat's subscription and who may broadcast. The
//! relay consults an [`Authorizer`] before touching the registry or the
//! dispatcher.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use crate::registry::{ChatDescriptor, ChatKind};
use crate::transport::{Transport, UserId};

/// Permission checks consulted by the relay
pub trait Authorizer: Send + Sync + 'static {
    /// May `actor` subscribe or unsubscribe `chat`
    fn is_authorized_to_subscribe(
        &self,
        actor: Option<UserId>,
        chat: &ChatDescriptor,
    ) -> impl Future<Output = bool> + Send;

    /// May `actor` broadcast
    fn is_authorized_to_broadcast(&self, actor: Option<UserId>) -> impl Future<Output = bool> + Send;

    /// Whether broadcasting is limited to some users, for help text
    fn broadcast_restricted(&self) -> bool {
        false
    }
}

/// Users allowed to broadcast; empty means everyone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    users: BTreeSet<UserId>,
}

impl AllowList {
    /// Allow everyone
    pub fn open() -> Self {
        Self::default()
    }

    /// Parse a `,` or `;` separated list of user ids
    ///
    /// Blank tokens are skipped, invalid ones are logged and skipped.
    pub fn parse(raw: &str) -> Self {
        let mut users = BTreeSet::new();

        for token in raw.split([',', ';']).map(str::trim) {
            if token.is_empty() {
                continue;
            }
            match token.parse::<i64>() {
                Ok(id) => {
                    users.insert(UserId(id));
                }
                Err(_) => {
                    tracing::warn!(value = %token, "Ignoring invalid user id value");
                }
            }
        }

        Self { users }
    }

    /// Whether broadcasting is limited to listed users
    pub fn is_restricted(&self) -> bool {
        !self.users.is_empty()
    }

    /// Whether `user` may broadcast
    pub fn permits(&self, user: Option<UserId>) -> bool {
        if !self.is_restricted() {
            return true;
        }
        user.map_or(false, |u| self.users.contains(&u))
    }

    /// Listed users, ascending
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.iter().copied()
    }
}

impl FromIterator<UserId> for AllowList {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}

/// Default policy
///
/// Subscription changes in groups need a chat admin, checked through the
/// transport; channels pass since only admins can post there. Broadcasting is
/// gated by an [`AllowList`].
pub struct AccessPolicy<T: Transport> {
    transport: Arc<T>,
    allowed: AllowList,
}

impl<T: Transport> AccessPolicy<T> {
    pub fn new(transport: Arc<T>, allowed: AllowList) -> Self {
        Self { transport, allowed }
    }

    /// Broadcast allow-list
    pub fn allow_list(&self) -> &AllowList {
        &self.allowed
    }
}

impl<T: Transport> Authorizer for AccessPolicy<T> {
    async fn is_authorized_to_subscribe(
        &self,
        actor: Option<UserId>,
        chat: &ChatDescriptor,
    ) -> bool {
        if chat.kind == ChatKind::Channel {
            return true;
        }
        let Some(user) = actor else {
            return true;
        };

        match self.transport.member_status(chat.id, user).await {
            Ok(status) => status.is_admin(),
            Err(e) => {
                tracing::warn!(
                    chat = %chat.id,
                    user = %user,
                    error = %e,
                    "Could not check chat admin status"
                );
                false
            }
        }
    }

    async fn is_authorized_to_broadcast(&self, actor: Option<UserId>) -> bool {
        self.allowed.permits(actor)
    }

    fn broadcast_restricted(&self) -> bool {
        self.allowed.is_restricted()
    }
}
