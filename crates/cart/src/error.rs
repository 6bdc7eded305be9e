//! Unified error handling for the cart engine.
//!
//! Expected conditions (missing line, malformed persisted state, quantity
//! out of bounds) are not errors: operations report them through
//! [`crate::service::CartOutcome`] or absorb them at the storage boundary.
//! `CartError` covers the cases a host must surface to the user.

use nextstore_core::{ProductError, ProductId};
use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type for the cart engine.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed; the in-memory state keeps the mutation
    /// and diverges from the store until the next reconciliation.
    #[error("could not save cart: {0}")]
    Save(#[source] StorageError),

    /// The cart list could not be encoded for persistence.
    #[error("could not encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The product's status does not allow ordering.
    #[error("product {0} is not available for purchase")]
    ProductUnavailable(ProductId),

    /// Product failed validation at the catalog boundary.
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
