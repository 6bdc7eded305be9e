//! The cart aggregate.
//!
//! One `CartService` is constructed per context (tab/page instance) and
//! injected into whatever needs cart access. Every mutation is a full
//! read-modify-write of the persisted list: read the entire list, mutate in
//! memory, write the entire list back, then broadcast. There is no locking
//! across contexts; two contexts racing on the same key clobber each other
//! and the last write wins (accepted, documented weakness - see DESIGN.md).

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use nextstore_core::{CurrencyCode, Product};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::CartConfig;
use crate::discount::{Discount, compute_discount};
use crate::error::{CartError, Result};
use crate::item::{LineItem, LineKey};
use crate::storage::{CartStore, StoreChange};
use crate::sync::CartEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What a cart operation did.
///
/// Expected "failures" (missing line, clamped quantity) are outcomes, not
/// errors; hosts decide whether to notify the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// A new line was appended.
    Added,
    /// The add merged into an existing line. `capped` reports that the
    /// increment was truncated at the quantity cap.
    Merged { quantity: u32, capped: bool },
    /// The line's quantity was set (after clamping).
    Updated { quantity: u32 },
    /// The line was removed.
    Removed,
    /// The referenced line does not exist; the cart is unchanged.
    NotFound,
    /// The cart was emptied.
    Cleared,
}

/// Derived cart totals. Recomputed on every read, never persisted or cached,
/// so it cannot go stale relative to the cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub discount: Discount,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub currency: CurrencyCode,
    /// Total quantity across all lines (the navigation badge count).
    pub item_count: u32,
}

/// Per-context cart service.
pub struct CartService {
    store: Arc<dyn CartStore>,
    config: CartConfig,
    context_id: Uuid,
    /// Last-known-good snapshot, compared against the store during
    /// reconciliation to detect external changes.
    snapshot: RwLock<Vec<LineItem>>,
    events: broadcast::Sender<CartEvent>,
}

impl CartService {
    /// Create the service for one context and load the initial snapshot.
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, config: CartConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let service = Self {
            store,
            config,
            context_id: Uuid::new_v4(),
            snapshot: RwLock::new(Vec::new()),
            events,
        };
        let initial = service.load_list();
        *service.write_snapshot() = initial;
        service
    }

    /// Engine configuration for this context.
    #[must_use]
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Identity of this context; its own store writes are skipped during
    /// reconciliation.
    #[must_use]
    pub const fn context_id(&self) -> Uuid {
        self.context_id
    }

    /// Subscribe to this context's cart events (same-page re-render channel).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub(crate) fn store_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.store.changes()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart lines, read fresh from the persistent store.
    ///
    /// An absent or malformed stored value yields an empty cart, never an
    /// error.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.load_list()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        count_items(&self.load_list())
    }

    /// Derive the summary: subtotal, discount, total, item count.
    ///
    /// Currency defaults to the first line's currency, or the store default
    /// for an empty cart. The discount threshold follows the cart currency.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let items = self.load_list();
        let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
        let currency = items
            .first()
            .map_or(self.config.currency, |line| line.currency);
        let discount = compute_discount(
            subtotal,
            self.config.discount.threshold_for(currency),
            self.config.discount.rate,
        );
        let total = subtotal - discount.amount;
        let item_count = count_items(&items);

        CartSummary {
            items,
            subtotal,
            discount,
            total,
            currency,
            item_count,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product + variant selection to the cart.
    ///
    /// Merges into an existing line when the derived key matches, clamping
    /// at the quantity cap; otherwise appends a new line in add order.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the product fails validation, is not
    /// orderable, or the persistence write fails.
    pub fn add_item(
        &self,
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> Result<CartOutcome> {
        product.validate()?;
        if !product.status.is_orderable() {
            return Err(CartError::ProductUnavailable(product.id.clone()));
        }

        let max = self.config.max_quantity;
        let quantity = quantity.clamp(1, max);
        let key = LineKey::derive(&product.id, size, color);

        let mut list = self.load_list();
        let outcome = match list.iter_mut().find(|line| line.id == key) {
            Some(line) => {
                let wanted = line.quantity.saturating_add(quantity);
                let capped = wanted > max;
                line.quantity = wanted.min(max);
                CartOutcome::Merged {
                    quantity: line.quantity,
                    capped,
                }
            }
            None => {
                list.push(LineItem::new(product, size, color, quantity));
                CartOutcome::Added
            }
        };

        self.persist(list)?;
        tracing::debug!(key = %key, "item added to cart");
        Ok(outcome)
    }

    /// Set a line's quantity. Zero removes the line; other values clamp to
    /// `1..=max_quantity`. A missing line is `CartOutcome::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` only when the persistence write fails.
    pub fn update_quantity(&self, id: &LineKey, quantity: u32) -> Result<CartOutcome> {
        if quantity == 0 {
            return self.remove_item(id);
        }

        let mut list = self.load_list();
        let Some(line) = list.iter_mut().find(|line| line.id == *id) else {
            tracing::debug!(id = %id, "quantity update for missing cart line ignored");
            return Ok(CartOutcome::NotFound);
        };
        line.quantity = quantity.clamp(1, self.config.max_quantity);
        let applied = line.quantity;

        self.persist(list)?;
        Ok(CartOutcome::Updated { quantity: applied })
    }

    /// Remove a line. A missing line is `CartOutcome::NotFound` and writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `CartError` only when the persistence write fails.
    pub fn remove_item(&self, id: &LineKey) -> Result<CartOutcome> {
        let mut list = self.load_list();
        let before = list.len();
        list.retain(|line| line.id != *id);
        if list.len() == before {
            return Ok(CartOutcome::NotFound);
        }

        self.persist(list)?;
        Ok(CartOutcome::Removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the persisted entry cannot be removed; the
    /// in-memory snapshot is emptied regardless.
    pub fn clear(&self) -> Result<CartOutcome> {
        *self.write_snapshot() = Vec::new();
        match self.store.remove(&self.config.storage_key, self.context_id) {
            Ok(()) => {
                let _ = self.events.send(CartEvent::Local { item_count: 0 });
                Ok(CartOutcome::Cleared)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not clear persisted cart");
                Err(CartError::Save(e))
            }
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Reload from the persistent store and compare with the snapshot.
    ///
    /// Hosts call this when the context gains focus or becomes visible; the
    /// [`crate::sync::watch`] task calls it on change notification and on
    /// the fallback poll. Returns whether the snapshot was replaced (and a
    /// [`CartEvent::External`] broadcast).
    pub fn resync(&self) -> bool {
        let fresh = self.load_list();
        if *self.read_snapshot() == fresh {
            return false;
        }

        let item_count = count_items(&fresh);
        *self.write_snapshot() = fresh;
        tracing::debug!(item_count, "cart changed in another context, snapshot replaced");
        let _ = self.events.send(CartEvent::External { item_count });
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn load_list(&self) -> Vec<LineItem> {
        let raw = match self.store.load(&self.config.storage_key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "cart storage unreadable, treating as empty");
                None
            }
        };
        raw.map_or_else(Vec::new, |json| parse_cart(&json))
    }

    /// Write-through: replace the snapshot, persist the full list, broadcast.
    ///
    /// On write failure the snapshot keeps the mutation and diverges from
    /// the store until the next reconciliation.
    fn persist(&self, list: Vec<LineItem>) -> Result<()> {
        let json = serde_json::to_string(&list)?;
        let item_count = count_items(&list);
        *self.write_snapshot() = list;

        match self
            .store
            .store(&self.config.storage_key, &json, self.context_id)
        {
            Ok(()) => {
                let _ = self.events.send(CartEvent::Local { item_count });
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "could not save cart");
                Err(CartError::Save(e))
            }
        }
    }

    fn read_snapshot(&self) -> RwLockReadGuard<'_, Vec<LineItem>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_snapshot(&self) -> RwLockWriteGuard<'_, Vec<LineItem>> {
        self.snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decode a persisted cart list; malformed JSON yields an empty cart.
fn parse_cart(json: &str) -> Vec<LineItem> {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed persisted cart, treating as empty");
        Vec::new()
    })
}

fn count_items(list: &[LineItem]) -> u32 {
    list.iter().map(|line| line.quantity).sum()
}
