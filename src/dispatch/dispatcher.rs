//! Broadcast dispatcher implementation
//!
//! Fans one message out to every member of a registry snapshot. A failure on
//! one member never stops the loop; members whose access was revoked are
//! evicted from the registry as they are found.

use std::sync::Arc;

use crate::registry::{Member, SubscriptionRegistry};
use crate::transport::{MessageRef, Transport, TransportError};

use super::config::DispatchConfig;
use super::outcome::{DeliveryOutcome, DeliveryState};
use super::report::{DeliveryNote, DeliveryReport};

/// Delivers broadcasts to all registered members
pub struct BroadcastDispatcher<T: Transport> {
    registry: Arc<SubscriptionRegistry>,
    transport: Arc<T>,
    config: DispatchConfig,
}

impl<T: Transport> BroadcastDispatcher<T> {
    /// Create a dispatcher with default configuration
    pub fn new(registry: Arc<SubscriptionRegistry>, transport: Arc<T>) -> Self {
        Self::with_config(registry, transport, DispatchConfig::default())
    }

    /// Create a dispatcher with custom configuration
    pub fn with_config(
        registry: Arc<SubscriptionRegistry>,
        transport: Arc<T>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            registry,
            transport,
            config,
        }
    }

    /// Get the registry this dispatcher reads from
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Get the dispatcher configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Copy `source` to every current member
    ///
    /// The member list is snapshotted once up front; sends happen outside the
    /// registry lock, in title order. Members registered after the snapshot
    /// are not included, members removed after it are still attempted.
    pub async fn broadcast(&self, source: &MessageRef) -> DeliveryReport {
        let snapshot = self.registry.list().await;
        let mut report = DeliveryReport::with_capacity(snapshot.len());

        if snapshot.is_empty() {
            tracing::debug!(source = source.message_id, "Broadcast skipped, no members");
            return report;
        }

        for member in snapshot {
            let outcome = self.deliver(&member, source).await;
            let (state, note) = self.settle(&member, outcome).await;
            report.record(member, state, note);
        }

        tracing::info!(
            source = source.message_id,
            members = report.attempts.len(),
            delivered = report.delivered,
            evicted = report.evicted(),
            failed = report.failed(),
            "Broadcast finished"
        );

        report
    }

    /// Send to a single member and classify the result
    async fn deliver(&self, member: &Member, source: &MessageRef) -> DeliveryOutcome {
        let send = self.transport.send_copy(member.id, source);

        let result = match self.config.send_timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Other(format!(
                    "timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => send.await,
        };

        DeliveryOutcome::from(result)
    }

    /// Apply the outcome to the registry and produce the report entry
    async fn settle(
        &self,
        member: &Member,
        outcome: DeliveryOutcome,
    ) -> (DeliveryState, Option<DeliveryNote>) {
        match outcome {
            DeliveryOutcome::Delivered(_) => {
                tracing::debug!(member = %member.id, title = %member.title, "Delivered");
                (DeliveryState::Delivered, None)
            }
            DeliveryOutcome::PermanentRevocation => {
                let note = match self.registry.remove(member.id).await {
                    Ok(_) => {
                        tracing::info!(
                            member = %member.id,
                            title = %member.title,
                            "Access revoked, member evicted"
                        );
                        DeliveryNote::Removed {
                            title: member.title.clone(),
                            kind: member.kind,
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            member = %member.id,
                            title = %member.title,
                            error = %e,
                            "Access revoked but eviction could not be persisted"
                        );
                        DeliveryNote::RemovalFailed {
                            title: member.title.clone(),
                            kind: member.kind,
                            error: e.to_string(),
                        }
                    }
                };
                (DeliveryState::Evicted, Some(note))
            }
            DeliveryOutcome::TransientFailure(reason) => {
                tracing::warn!(
                    member = %member.id,
                    title = %member.title,
                    error = %reason,
                    "Failed to relay"
                );
                let note = DeliveryNote::Failed {
                    title: member.title.clone(),
                    reason,
                };
                (DeliveryState::FailedTransient, Some(note))
            }
        }
    }
}
