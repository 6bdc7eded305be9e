//! Validated catalog product shape.
//!
//! The catalog provider is an external collaborator; products cross into the
//! cart engine only through this explicit structure, validated at the
//! boundary instead of duck-typed at every use site.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::ProductId;
use crate::types::price::CurrencyCode;

/// Validation errors for catalog products.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Product ID is empty.
    #[error("product id must not be empty")]
    EmptyId,

    /// Product has no display name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),

    /// Product price is negative.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Availability status of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    #[default]
    Available,
    OutOfStock,
    ComingSoon,
}

impl ProductStatus {
    /// Whether a product in this status can be added to a cart.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// A catalog product as consumed by the cart engine.
///
/// `sizes`/`colors` are the variant dimensions; an empty list means the
/// product has no such dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    /// Validate the product shape at the catalog boundary.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` for an empty ID, an empty name, or a negative
    /// price. Zero-priced products are allowed (giveaways).
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.is_empty() {
            return Err(ProductError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName(self.id.clone()));
        }
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.id.clone()));
        }
        Ok(())
    }

    /// The product's primary image reference, if it has one.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "قميص كلاسيكي".to_string(),
            price: Decimal::from(10_000),
            currency: CurrencyCode::YER,
            images: vec!["shirt-front.webp".to_string(), "shirt-back.webp".to_string()],
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            colors: vec!["أسود".to_string(), "أبيض".to_string()],
            description: None,
            status: ProductStatus::Available,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_id() {
        let mut p = sample();
        p.id = ProductId::new("");
        assert!(matches!(p.validate(), Err(ProductError::EmptyId)));
    }

    #[test]
    fn test_validate_blank_name() {
        let mut p = sample();
        p.name = "   ".to_string();
        assert!(matches!(p.validate(), Err(ProductError::EmptyName(_))));
    }

    #[test]
    fn test_validate_negative_price() {
        let mut p = sample();
        p.price = Decimal::from(-1);
        assert!(matches!(p.validate(), Err(ProductError::NegativePrice(_))));
    }

    #[test]
    fn test_zero_price_is_valid() {
        let mut p = sample();
        p.price = Decimal::ZERO;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_status_orderable() {
        assert!(ProductStatus::Available.is_orderable());
        assert!(!ProductStatus::OutOfStock.is_orderable());
        assert!(!ProductStatus::ComingSoon.is_orderable());
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&ProductStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out-of-stock\"");

        let back: ProductStatus = serde_json::from_str("\"coming-soon\"").unwrap();
        assert_eq!(back, ProductStatus::ComingSoon);
    }

    #[test]
    fn test_primary_image() {
        assert_eq!(sample().primary_image(), Some("shirt-front.webp"));

        let mut p = sample();
        p.images.clear();
        assert_eq!(p.primary_image(), None);
    }

    #[test]
    fn test_deserialize_minimal_catalog_entry() {
        // External catalog entries may omit every optional field
        let p: Product =
            serde_json::from_str(r#"{"id":"p9","name":"حذاء رياضي","price":15000}"#).unwrap();
        assert_eq!(p.currency, CurrencyCode::YER);
        assert_eq!(p.status, ProductStatus::Available);
        assert!(p.sizes.is_empty());
        assert_eq!(p.price, Decimal::from(15_000));
    }
}
