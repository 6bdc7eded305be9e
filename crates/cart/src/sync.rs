//! Cross-context synchronization.
//!
//! Mutations write through to the persistent store; sibling contexts learn
//! of the change from the store's notification channel or, failing that,
//! from a fallback reconciliation poll. Focus/visibility transitions map to
//! an explicit [`CartService::resync`] call by the host. The guarantee is
//! eventual consistency within one poll interval; at the store level the
//! last write wins.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::service::CartService;

/// Notification published on a context's in-process cart channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// This context mutated the cart; `item_count` is the new badge count.
    Local { item_count: u32 },
    /// Another context changed the persisted cart and reconciliation
    /// replaced the snapshot.
    External { item_count: u32 },
}

impl CartEvent {
    /// Badge count after the event, whatever its origin.
    #[must_use]
    pub const fn item_count(self) -> u32 {
        match self {
            Self::Local { item_count } | Self::External { item_count } => item_count,
        }
    }
}

/// Spawn the external-change watcher for one context.
///
/// The task reacts to store change notifications and runs the fallback
/// reconciliation poll; either trigger reloads the persisted cart, compares
/// it with the snapshot, and broadcasts [`CartEvent::External`] on
/// divergence. The context's own writes are skipped. Abort the returned
/// handle to stop watching.
pub fn watch(service: Arc<CartService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut changes = service.store_changes();
        let mut ticker = tokio::time::interval(service.config().sync.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; swallow the initial tick
        ticker.tick().await;

        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Ok(change) => {
                        if change.key == service.config().storage_key
                            && change.writer != service.context_id()
                        {
                            service.resync();
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // missed notifications; reconcile unconditionally
                        tracing::debug!(skipped, "change channel lagged, reconciling");
                        service.resync();
                    }
                    Err(RecvError::Closed) => {
                        // notifier gone; last resort is the poll alone
                        loop {
                            ticker.tick().await;
                            service.resync();
                        }
                    }
                },
                _ = ticker.tick() => {
                    service.resync();
                }
            }
        }
    })
}
