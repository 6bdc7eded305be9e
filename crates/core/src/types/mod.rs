//! Core types for Next Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::{CurrencyCode, format_thousands};
pub use product::{Product, ProductError, ProductStatus};
