//! Currency codes and price formatting using decimal arithmetic.
//!
//! Amounts in this store's currency domain are whole units: formatted
//! output uses thousands separators and no decimal places
//! (e.g. `30,000 ر.ي`). Arithmetic stays on [`Decimal`] so discount
//! computation (`subtotal * rate`) is exact.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Currencies the store prices in.
///
/// YER is the primary store currency; SAR and USD appear on imported
/// catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    YER,
    SAR,
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::YER => "ر.ي",
            Self::SAR => "ر.س",
            Self::USD => "$",
        }
    }

    /// ISO 4217 currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::YER => "YER",
            Self::SAR => "SAR",
            Self::USD => "USD",
        }
    }

    /// Format an amount for display (e.g. `10,000 ر.ي` or `$1,200`).
    ///
    /// Arabic currency symbols trail the amount; the dollar sign leads.
    #[must_use]
    pub fn format(self, amount: Decimal) -> String {
        match self {
            Self::YER | Self::SAR => format!("{} {}", format_thousands(amount), self.symbol()),
            Self::USD => format!("{}{}", self.symbol(), format_thousands(amount)),
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Format an amount as a thousands-separated integer, no decimal places.
///
/// Fractional amounts are rounded to the nearest whole unit first.
#[must_use]
pub fn format_thousands(amount: Decimal) -> String {
    let whole = amount.round().to_i128().unwrap_or(0);
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
