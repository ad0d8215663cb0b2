//! Relay command handlers
//!
//! Each handler takes an already-parsed inbound event and returns the reply
//! text for the chat it came from. Authorization is checked here, before the
//! registry or the dispatcher is touched.

use std::sync::Arc;

use crate::auth::{AccessPolicy, Authorizer};
use crate::dispatch::{BroadcastDispatcher, DispatchConfig};
use crate::error::Result;
use crate::registry::{ChatDescriptor, ChatKind, Member, SubscriptionRegistry};
use crate::transport::{MessageRef, Transport, UserId};

use super::config::RelayConfig;

pub const SUBSCRIBE_IN_PRIVATE: &str =
    "Use /subscribe inside a group, supergroup, or channel where I'm an admin.";
pub const UNSUBSCRIBE_IN_PRIVATE: &str =
    "Use /unsubscribe inside a group, supergroup, or channel to remove it.";
pub const SUBSCRIBE_DENIED: &str = "Only chat admins can subscribe me.";
pub const UNSUBSCRIBE_DENIED: &str = "Only chat admins can unsubscribe me.";
pub const SUBSCRIBED: &str = "Subscribed! I'll broadcast here.";
pub const ALREADY_SUBSCRIBED: &str = "Already subscribed.";
pub const UNSUBSCRIBED: &str = "Removed from the broadcast list.";
pub const NOT_SUBSCRIBED: &str = "This chat was not subscribed.";
pub const NO_MEMBERS_TO_LIST: &str = "No chats subscribed yet.";
pub const NO_MEMBERS_TO_BROADCAST: &str = "No chats have subscribed yet. Use /subscribe first.";
pub const BROADCAST_DENIED: &str = "You're not allowed to broadcast with this bot.";

/// Ties the registry, dispatcher and authorization together
pub struct RelayService<T: Transport, A: Authorizer> {
    registry: Arc<SubscriptionRegistry>,
    dispatcher: BroadcastDispatcher<T>,
    transport: Arc<T>,
    authorizer: A,
}

impl<T: Transport> RelayService<T, AccessPolicy<T>> {
    /// Open the registry and build the service with the default policy
    pub async fn open(config: RelayConfig, transport: Arc<T>) -> Result<Self> {
        let registry = Arc::new(SubscriptionRegistry::open(config.registry).await?);

        if config.allowed_users.is_restricted() {
            let users: Vec<i64> = config.allowed_users.users().map(|u| u.0).collect();
            tracing::info!(users = ?users, "Broadcast restricted to user ids");
        } else {
            tracing::warn!("No allowed user ids set, anyone who messages the bot can broadcast");
        }

        let authorizer = AccessPolicy::new(Arc::clone(&transport), config.allowed_users);
        Ok(Self::new(registry, transport, authorizer, config.dispatch))
    }
}

impl<T: Transport, A: Authorizer> RelayService<T, A> {
    /// Build a service around an existing registry
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        transport: Arc<T>,
        authorizer: A,
        dispatch: DispatchConfig,
    ) -> Self {
        let dispatcher = BroadcastDispatcher::with_config(
            Arc::clone(&registry),
            Arc::clone(&transport),
            dispatch,
        );

        Self {
            registry,
            dispatcher,
            transport,
            authorizer,
        }
    }

    /// Get the shared registry
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Get the dispatcher
    pub fn dispatcher(&self) -> &BroadcastDispatcher<T> {
        &self.dispatcher
    }

    /// Help text for `/start`
    pub fn start(&self, chat_kind: ChatKind) -> String {
        let mut lines = vec![
            "Hi! I relay announcements to every chat that subscribed via /subscribe.",
            "Use /subscribe or /unsubscribe inside a group/channel where I'm an admin.",
            "Send any non-command message here in a private chat to broadcast it everywhere.",
        ];
        if self.authorizer.broadcast_restricted() {
            lines.push("Only authorized users can broadcast via DM.");
        }
        if !chat_kind.is_private() {
            lines.push("For best results, DM me with /start for detailed help.");
        }
        lines.join("\n")
    }

    /// Handle `/subscribe` sent in `chat`
    pub async fn subscribe(
        &self,
        actor: Option<UserId>,
        chat: &ChatDescriptor,
    ) -> Result<String> {
        if chat.kind.is_private() {
            return Ok(SUBSCRIBE_IN_PRIVATE.to_string());
        }
        if !self.authorizer.is_authorized_to_subscribe(actor, chat).await {
            tracing::debug!(chat = %chat.id, actor = ?actor, "Subscribe denied");
            return Ok(SUBSCRIBE_DENIED.to_string());
        }

        let title = self.transport.resolve_display_name(chat);
        let is_new = self.registry.add(Member::new(chat.id, title, chat.kind)).await?;

        let reply = if is_new { SUBSCRIBED } else { ALREADY_SUBSCRIBED };
        Ok(reply.to_string())
    }

    /// Handle `/unsubscribe` sent in `chat`
    pub async fn unsubscribe(
        &self,
        actor: Option<UserId>,
        chat: &ChatDescriptor,
    ) -> Result<String> {
        if chat.kind.is_private() {
            return Ok(UNSUBSCRIBE_IN_PRIVATE.to_string());
        }
        if !self.authorizer.is_authorized_to_subscribe(actor, chat).await {
            tracing::debug!(chat = %chat.id, actor = ?actor, "Unsubscribe denied");
            return Ok(UNSUBSCRIBE_DENIED.to_string());
        }

        let removed = self.registry.remove(chat.id).await?;
        let reply = if removed { UNSUBSCRIBED } else { NOT_SUBSCRIBED };
        Ok(reply.to_string())
    }

    /// Handle `/list`
    pub async fn list(&self) -> String {
        let members = self.registry.list().await;
        if members.is_empty() {
            return NO_MEMBERS_TO_LIST.to_string();
        }

        let mut text = String::from("Broadcast targets:");
        for (idx, member) in members.iter().enumerate() {
            text.push_str(&format!("\n{}. {} ({})", idx + 1, member.title, member.kind));
        }
        text
    }

    /// Relay `message` to every subscribed chat
    pub async fn broadcast(&self, actor: Option<UserId>, message: &MessageRef) -> String {
        if !self.authorizer.is_authorized_to_broadcast(actor).await {
            tracing::info!(actor = ?actor, "Broadcast denied");
            return BROADCAST_DENIED.to_string();
        }

        let report = self.dispatcher.broadcast(message).await;
        if report.is_empty() {
            return NO_MEMBERS_TO_BROADCAST.to_string();
        }
        report.summary()
    }
}
