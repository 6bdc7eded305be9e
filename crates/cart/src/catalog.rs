//! Catalog provider boundary.
//!
//! The catalog is an external collaborator with a simple request/response
//! contract; the cart engine only needs validated [`Product`] values from
//! it. Hosts plug in a real provider; [`StaticCatalog`] serves tests and
//! fixture-driven pages.

use nextstore_core::{Product, ProductError, ProductId};
use thiserror::Error;

/// Catalog boundary errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog entry failed shape validation.
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),

    /// The provider could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// External catalog provider contract.
pub trait CatalogProvider: Send + Sync {
    /// All catalog products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the provider is unreachable or returns
    /// malformed entries.
    fn all_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Look up one product; `Ok(None)` when the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the provider is unreachable.
    fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;
}

/// Fixed in-memory catalog, validated on construction.
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Build a catalog from pre-loaded products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProduct` if any entry fails validation.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for product in &products {
            product.validate()?;
        }
        Ok(Self { products })
    }
}

impl CatalogProvider for StaticCatalog {
    fn all_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }

    fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.iter().find(|p| p.id == *id).cloned())
    }
}
