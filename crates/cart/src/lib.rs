//! Next Store cart engine.
//!
//! The cart/pricing/discount computation engine and its synchronization
//! protocol across browser contexts (tabs/pages sharing one persisted
//! store). Rendering, navigation, and authentication are external
//! collaborators; this crate owns only the behavioral contract:
//!
//! - [`storage`] - durable key-value store for the cart list, with a change
//!   notification channel shared by all open contexts
//! - [`item`] - line items and the composite identity/merge rule
//! - [`service`] - the cart aggregate: add/update/remove/clear and the
//!   derived summary (subtotal, discount, total)
//! - [`discount`] - threshold-based discount policy
//! - [`sync`] - reload-and-compare reconciliation across contexts
//! - [`checkout`] - plain-text order message and messaging deep link
//! - [`catalog`] - the external catalog provider boundary
//! - [`dispatch`] - UI-agnostic command surface
//!
//! One [`CartService`] is constructed per context and injected wherever the
//! host needs cart access; there are no module-level singletons.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod discount;
pub mod dispatch;
pub mod error;
pub mod item;
pub mod service;
pub mod storage;
pub mod sync;

pub use catalog::{CatalogError, CatalogProvider, StaticCatalog};
pub use checkout::{OrderRef, checkout_url, format_order_message};
pub use config::{CartConfig, ConfigError, DiscountConfig, MessagingConfig, SyncConfig};
pub use discount::{Discount, compute_discount};
pub use dispatch::CartAction;
pub use error::{CartError, Result};
pub use item::{LineItem, LineKey};
pub use service::{CartOutcome, CartService, CartSummary};
pub use storage::{CartStore, MemoryStore, StorageError, StoreChange};
pub use sync::{CartEvent, watch};
