//! Cart engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults match the store's observed
//! configuration.
//!
//! - `NEXTSTORE_CART_KEY` - Persistent store key (default: `nextstore_cart`)
//! - `NEXTSTORE_CURRENCY` - Store currency code (default: `YER`)
//! - `NEXTSTORE_MAX_QUANTITY` - Per-line quantity cap (default: 20)
//! - `NEXTSTORE_DISCOUNT_THRESHOLD` - YER discount threshold (default: 30000)
//! - `NEXTSTORE_DISCOUNT_FOREIGN_THRESHOLD` - non-YER threshold (default: 200)
//! - `NEXTSTORE_DISCOUNT_RATE` - Discount rate (default: 0.10)
//! - `NEXTSTORE_SYNC_INTERVAL_MS` - Fallback reconciliation poll (default: 2000)
//! - `NEXTSTORE_WHATSAPP_PHONE` - Store order phone (default: +966500000000)
//! - `NEXTSTORE_WHATSAPP_HOST` - Messaging host (default: wa.me)

use std::time::Duration;

use nextstore_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

/// Default persistent store key for the cart list.
pub const DEFAULT_STORAGE_KEY: &str = "nextstore_cart";

/// Observed per-line quantity cap.
pub const DEFAULT_MAX_QUANTITY: u32 = 20;

/// Observed fallback reconciliation interval.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration, one per context.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Persistent store key holding the JSON cart list.
    pub storage_key: String,
    /// Store default currency (used for empty carts).
    pub currency: CurrencyCode,
    /// Per-line quantity cap; increments past it are clamped.
    pub max_quantity: u32,
    /// Discount policy constants.
    pub discount: DiscountConfig,
    /// Cross-context synchronization settings.
    pub sync: SyncConfig,
    /// Checkout messaging channel settings.
    pub messaging: MessagingConfig,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: CurrencyCode::default(),
            max_quantity: DEFAULT_MAX_QUANTITY,
            discount: DiscountConfig::default(),
            sync: SyncConfig::default(),
            messaging: MessagingConfig::default(),
        }
    }
}

/// Threshold-based discount constants.
///
/// The threshold is currency-dependent: 30 000 in the primary YER domain,
/// 200 for carts priced in SAR/USD. The rate applies uniformly.
#[derive(Debug, Clone)]
pub struct DiscountConfig {
    /// Discount rate applied above the threshold.
    pub rate: Decimal,
    /// Subtotal threshold for YER carts.
    pub threshold: Decimal,
    /// Subtotal threshold for non-YER carts.
    pub foreign_threshold: Decimal,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            rate: Decimal::new(10, 2),          // 0.10
            threshold: Decimal::from(30_000),   // YER
            foreign_threshold: Decimal::from(200),
        }
    }
}

impl DiscountConfig {
    /// Threshold applicable to a cart priced in `currency`.
    #[must_use]
    pub const fn threshold_for(&self, currency: CurrencyCode) -> Decimal {
        match currency {
            CurrencyCode::YER => self.threshold,
            CurrencyCode::SAR | CurrencyCode::USD => self.foreign_threshold,
        }
    }
}

/// Cross-context synchronization settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Fallback reconciliation poll interval for contexts that miss the
    /// change notification.
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

/// Checkout messaging channel (WhatsApp deep link) settings.
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    /// Messaging host the order link points at.
    pub host: String,
    /// Store phone number in international format.
    pub phone: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            host: "wa.me".to_string(),
            phone: "+966500000000".to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Every
    /// variable has a default, so only malformed values fail.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let storage_key = get_env_or_default("NEXTSTORE_CART_KEY", &defaults.storage_key);
        let currency = parse_env("NEXTSTORE_CURRENCY", defaults.currency, parse_currency)?;
        let max_quantity = parse_env("NEXTSTORE_MAX_QUANTITY", defaults.max_quantity, |v| {
            v.parse::<u32>().ok().filter(|&n| n >= 1)
        })?;

        let discount = DiscountConfig {
            rate: parse_env("NEXTSTORE_DISCOUNT_RATE", defaults.discount.rate, |v| {
                v.parse::<Decimal>().ok()
            })?,
            threshold: parse_env(
                "NEXTSTORE_DISCOUNT_THRESHOLD",
                defaults.discount.threshold,
                |v| v.parse::<Decimal>().ok(),
            )?,
            foreign_threshold: parse_env(
                "NEXTSTORE_DISCOUNT_FOREIGN_THRESHOLD",
                defaults.discount.foreign_threshold,
                |v| v.parse::<Decimal>().ok(),
            )?,
        };

        let sync = SyncConfig {
            poll_interval: parse_env(
                "NEXTSTORE_SYNC_INTERVAL_MS",
                defaults.sync.poll_interval,
                |v| v.parse::<u64>().ok().map(Duration::from_millis),
            )?,
        };

        let messaging = MessagingConfig {
            host: get_env_or_default("NEXTSTORE_WHATSAPP_HOST", &defaults.messaging.host),
            phone: get_env_or_default("NEXTSTORE_WHATSAPP_PHONE", &defaults.messaging.phone),
        };

        Ok(Self {
            storage_key,
            currency,
            max_quantity,
            discount,
            sync,
            messaging,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when
/// unset and failing when set but malformed.
fn parse_env<T>(
    key: &str,
    default: T,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse(&value)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), value.clone())),
        Err(_) => Ok(default),
    }
}

fn parse_currency(value: &str) -> Option<CurrencyCode> {
    match value.trim().to_ascii_uppercase().as_str() {
        "YER" => Some(CurrencyCode::YER),
        "SAR" => Some(CurrencyCode::SAR),
        "USD" => Some(CurrencyCode::USD),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_constants() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "nextstore_cart");
        assert_eq!(config.currency, CurrencyCode::YER);
        assert_eq!(config.max_quantity, 20);
        assert_eq!(config.discount.rate, Decimal::new(10, 2));
        assert_eq!(config.discount.threshold, Decimal::from(30_000));
        assert_eq!(config.sync.poll_interval, Duration::from_secs(2));
        assert_eq!(config.messaging.host, "wa.me");
    }

    #[test]
    fn test_threshold_for_currency() {
        let discount = DiscountConfig::default();
        assert_eq!(
            discount.threshold_for(CurrencyCode::YER),
            Decimal::from(30_000)
        );
        assert_eq!(
            discount.threshold_for(CurrencyCode::SAR),
            Decimal::from(200)
        );
        assert_eq!(
            discount.threshold_for(CurrencyCode::USD),
            Decimal::from(200)
        );
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("yer"), Some(CurrencyCode::YER));
        assert_eq!(parse_currency(" SAR "), Some(CurrencyCode::SAR));
        assert_eq!(parse_currency("EUR"), None);
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        let value = parse_env("NEXTSTORE_TEST_UNSET_VAR", 5_u32, |v| v.parse().ok());
        assert_eq!(value.unwrap(), 5);
    }
}
