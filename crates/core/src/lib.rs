//! Next Store Core - Shared types library.
//!
//! This crate provides common types used across all Next Store components:
//! - `cart` - Cart/pricing engine and cross-context synchronization
//! - any UI host embedding the engine (vanilla DOM or component framework)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no timers. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identity, currency/price formatting, and the
//!   validated catalog product shape

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
