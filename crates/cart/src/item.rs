//! Line items and the composite identity rule.
//!
//! Two add-operations refer to the same cart line iff they derive the same
//! [`LineKey`]: a case-insensitive, whitespace-normalized concatenation of
//! product ID, size, and color. Missing variant dimensions are replaced by a
//! fixed placeholder so `(P, None, None)` and `(P, "", "")` collide.

use chrono::{DateTime, Utc};
use nextstore_core::{CurrencyCode, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder for a missing variant dimension.
const VARIANT_PLACEHOLDER: &str = "-";

/// Composite identity of a cart line within one cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    /// Derive the key for a product + variant selection.
    ///
    /// Deterministic and pure: lowercase, interior whitespace runs collapsed
    /// to `_`, missing or blank dimensions replaced by `-`.
    #[must_use]
    pub fn derive(product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> Self {
        Self(format!(
            "{}_{}_{}",
            normalize(Some(product_id.as_str())),
            normalize(size),
            normalize(color)
        ))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rehydrate a key that round-tripped through a rendering host (e.g. a DOM
/// data attribute). Not re-normalized; derived keys are already canonical.
impl From<&str> for LineKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for LineKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

fn normalize(part: Option<&str>) -> String {
    part.map(str::trim)
        .filter(|p| !p.is_empty())
        .map_or_else(
            || VARIANT_PLACEHOLDER.to_string(),
            |p| {
                p.to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_")
            },
        )
}

/// One cart line: a product + variant selection + quantity.
///
/// Field names serialize in camelCase so persisted carts written by earlier
/// storefront builds stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineKey,
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    /// Informational only; never part of identity or ordering.
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Build a new line from a catalog product and variant selection.
    #[must_use]
    pub fn new(
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> Self {
        Self {
            id: LineKey::derive(&product.id, size, color),
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            currency: product.currency,
            size: size.map(str::to_string),
            color: color.map(str::to_string),
            image: product.primary_image().map(str::to_string),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
