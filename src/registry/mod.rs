//! Subscription registry
//!
//! The registry is the durable set of chats that receive broadcasts. It is
//! shared as an `Arc<SubscriptionRegistry>` between the command handlers that
//! register chats and the dispatcher that fans messages out.
//!
//! # Architecture
//!
//! ```text
//!                     Arc<SubscriptionRegistry>
//!                 ┌──────────────────────────────┐
//!                 │ document: RwLock<            │
//!                 │   chats: { id -> record }    │
//!                 │ >                            │
//!                 │ store: RegistryStore ────────┼──► subscriptions.json
//!                 └──────────────┬───────────────┘       (tmp + rename)
//!                                │
//!         ┌──────────────────────┼──────────────────────┐
//!         │                      │                      │
//!         ▼                      ▼                      ▼
//!   /subscribe             /unsubscribe           BroadcastDispatcher
//!   registry.add()         registry.remove()      registry.list() snapshot
//!                                                 registry.remove() on revocation
//! ```
//!
//! # Durability
//!
//! Every mutation flushes the full document before it returns. A flush that
//! fails leaves the in-memory view at its previous state.

pub mod config;
pub mod error;
pub mod member;
pub mod persist;
pub mod store;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use member::{ChatDescriptor, ChatKind, Member, MemberId, MemberRecord};
pub use persist::{RegistryDocument, RegistryStore};
pub use store::SubscriptionRegistry;
