//! Checkout handoff to the messaging channel.
//!
//! Checkout renders a plain-text order summary and a `wa.me` deep link the
//! host opens in a new browsing context. No escaping beyond URL encoding:
//! the target is a plain-text chat. Generating the link does **not** clear
//! the cart, so an abandoned handoff can be resumed (DESIGN.md, D3).

use std::fmt::Write as _;

use chrono::Utc;
use url::Url;

use crate::config::MessagingConfig;
use crate::service::CartSummary;

/// Human-facing order reference included in the handoff message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRef(String);

impl OrderRef {
    /// Generate a reference from the wall clock: `ORD-` followed by the
    /// last eight digits of the epoch-millis timestamp.
    #[must_use]
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().to_string();
        let tail_start = millis.len().saturating_sub(8);
        let tail = millis.get(tail_start..).unwrap_or(&millis);
        Self(format!("ORD-{tail}"))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render the order summary for the messaging channel.
///
/// Deterministic template: greeting, optional order reference, one block per
/// line item (name, quantity, variant dimensions when present, line price),
/// subtotal, discount (only when applied), total, fixed closing phrase.
/// Amounts are thousands-separated integers in the cart currency.
#[must_use]
pub fn format_order_message(summary: &CartSummary, order: Option<&OrderRef>) -> String {
    let currency = summary.currency;
    let mut message = String::from("مرحباً، أريد طلب المنتجات التالية من متجر نكست:\n\n");

    if let Some(order) = order {
        let _ = writeln!(message, "رقم الطلب: {order}\n");
    }

    for (index, item) in summary.items.iter().enumerate() {
        let _ = writeln!(message, "🛍️ المنتج {}:", index + 1);
        let _ = writeln!(message, "📦 الاسم: {}", item.name);
        let _ = writeln!(message, "🔢 الكمية: {}", item.quantity);
        if let Some(size) = &item.size {
            let _ = writeln!(message, "📏 المقاس: {size}");
        }
        if let Some(color) = &item.color {
            let _ = writeln!(message, "🎨 اللون: {color}");
        }
        let _ = writeln!(message, "💵 السعر: {}\n", currency.format(item.line_total()));
    }

    let _ = writeln!(
        message,
        "💰 المجموع الفرعي: {}",
        currency.format(summary.subtotal)
    );
    if summary.discount.is_applied() {
        let _ = writeln!(
            message,
            "🎁 الخصم: -{}",
            currency.format(summary.discount.amount)
        );
    }
    let _ = writeln!(message, "💎 المجموع الكلي: {}\n", currency.format(summary.total));
    message.push_str("شكراً لخدمتكم! 🎉");

    message
}

/// Build the messaging deep link: `https://<host>/<phone>?text=<encoded>`.
///
/// The phone number is reduced to its digits (international format without
/// the leading `+`), the way the messaging API expects it.
///
/// # Errors
///
/// Returns `url::ParseError` if the configured host does not form a valid
/// URL.
pub fn checkout_url(messaging: &MessagingConfig, message: &str) -> Result<Url, url::ParseError> {
    let phone: String = messaging
        .phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let link = format!(
        "https://{}/{}?text={}",
        messaging.host,
        phone,
        urlencoding::encode(message)
    );
    Url::parse(&link)
}
