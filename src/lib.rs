//! # chat-relay
//!
//! Relays one author's messages to every chat that subscribed to them.
//!
//! Chats register and deregister at runtime; membership is kept in a durable
//! JSON document. A broadcast copies the message to each member in turn,
//! keeps going when individual chats fail, and drops chats that revoked the
//! bot's access.
//!
//! The messaging network is not part of this crate. Plug it in by implementing
//! [`transport::Transport`].
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use chat_relay::registry::{ChatDescriptor, ChatKind};
//! use chat_relay::transport::{MessageRef, UserId};
//! use chat_relay::{RelayConfig, RelayService};
//! # use chat_relay::transport::{Ack, MemberStatus, Transport, TransportError};
//! # use chat_relay::registry::MemberId;
//! # struct Bot;
//! # impl Transport for Bot {
//! #     async fn send_copy(&self, _: MemberId, _: &MessageRef) -> Result<Ack, TransportError> {
//! #         Ok(Ack::default())
//! #     }
//! #     async fn member_status(&self, _: MemberId, _: UserId) -> Result<MemberStatus, TransportError> {
//! #         Ok(MemberStatus::Administrator)
//! #     }
//! # }
//!
//! # async fn example() -> chat_relay::Result<()> {
//! let relay = RelayService::open(RelayConfig::from_env()?, Arc::new(Bot)).await?;
//!
//! let group = ChatDescriptor::new(-1001, ChatKind::Supergroup).title("Team Alpha");
//! println!("{}", relay.subscribe(Some(UserId(42)), &group).await?);
//!
//! let summary = relay.broadcast(Some(UserId(42)), &MessageRef::new(42, 7)).await;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod relay;
pub mod transport;

pub use dispatch::{BroadcastDispatcher, DeliveryReport};
pub use error::{Error, Result};
pub use registry::{RegistryConfig, SubscriptionRegistry};
pub use relay::{RelayConfig, RelayService};
