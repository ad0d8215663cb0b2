//! Subscription registry implementation
//!
//! The authoritative in-memory view of all members, kept in lockstep with the
//! document on disk.

use std::path::Path;

use tokio::sync::RwLock;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::member::{Member, MemberId};
use super::persist::{RegistryDocument, RegistryStore};

/// Central registry of subscribed chats
///
/// Mutations hold the write lock across the in-memory update and the durable
/// flush, and only commit the new document once the flush succeeded. Readers
/// therefore never observe a member that is not on disk yet. The lock is never
/// held across a network call.
pub struct SubscriptionRegistry {
    /// Committed document
    document: RwLock<RegistryDocument>,

    /// Backing storage
    store: RegistryStore,
}

impl SubscriptionRegistry {
    /// Open the registry, loading whatever is on disk
    pub async fn open(config: RegistryConfig) -> Result<Self, RegistryError> {
        let store = RegistryStore::new(config);
        let document = store.load().await?;

        Ok(Self {
            document: RwLock::new(document),
            store,
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Insert or overwrite a member
    ///
    /// Returns `true` if the id was not registered before. A repeated add
    /// refreshes title and kind but leaves the count unchanged.
    pub async fn add(&self, member: Member) -> Result<bool, RegistryError> {
        let mut document = self.document.write().await;

        let mut next = document.clone();
        let previous = next.chats.insert(member.id, member.to_record());
        self.store.flush(&next).await?;
        *document = next;

        let was_new = previous.is_none();
        tracing::info!(
            member = %member.id,
            title = %member.title,
            kind = %member.kind,
            new = was_new,
            members = document.len(),
            "Member registered"
        );

        Ok(was_new)
    }

    /// Remove a member
    ///
    /// Returns `true` if a member was actually deleted. Removing an unknown id
    /// does not touch the disk.
    pub async fn remove(&self, id: MemberId) -> Result<bool, RegistryError> {
        let mut document = self.document.write().await;

        if !document.chats.contains_key(&id) {
            tracing::debug!(member = %id, "Remove of unknown member ignored");
            return Ok(false);
        }

        let mut next = document.clone();
        next.chats.remove(&id);
        self.store.flush(&next).await?;
        *document = next;

        tracing::info!(member = %id, members = document.len(), "Member removed");
        Ok(true)
    }

    /// Snapshot of all members, sorted by case-insensitive title
    ///
    /// Ties are broken by id so the order is fully deterministic.
    pub async fn list(&self) -> Vec<Member> {
        let document = self.document.read().await;

        let mut members: Vec<Member> = document
            .chats
            .iter()
            .map(|(id, record)| Member::from_record(*id, record))
            .collect();
        drop(document);

        members.sort_by_cached_key(Member::sort_key);
        members
    }

    /// Look up a single member
    pub async fn get(&self, id: MemberId) -> Option<Member> {
        let document = self.document.read().await;
        document
            .chats
            .get(&id)
            .map(|record| Member::from_record(id, record))
    }

    /// Check whether an id is registered
    pub async fn contains(&self, id: MemberId) -> bool {
        self.document.read().await.chats.contains_key(&id)
    }

    /// Current number of members
    pub async fn count(&self) -> usize {
        self.document.read().await.len()
    }
}
