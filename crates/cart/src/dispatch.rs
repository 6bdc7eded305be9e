//! UI-agnostic command surface.
//!
//! Rendering hosts (vanilla DOM wiring or a component framework) translate
//! their click handlers into [`CartAction`] values and dispatch them, so the
//! same aggregate serves any UI layer.

use nextstore_core::Product;

use crate::error::Result;
use crate::item::LineKey;
use crate::service::{CartOutcome, CartService};

/// A cart command originating from the UI.
#[derive(Debug, Clone)]
pub enum CartAction {
    Add {
        product: Product,
        size: Option<String>,
        color: Option<String>,
        quantity: u32,
    },
    SetQuantity {
        id: LineKey,
        quantity: u32,
    },
    /// The cart page's `+` button.
    Increase {
        id: LineKey,
    },
    /// The cart page's `-` button; a no-op at quantity 1.
    Decrease {
        id: LineKey,
    },
    Remove {
        id: LineKey,
    },
    Clear,
}

impl CartService {
    /// Apply a UI-originated command to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` under the same conditions as the underlying
    /// operation.
    pub fn dispatch(&self, action: CartAction) -> Result<CartOutcome> {
        match action {
            CartAction::Add {
                product,
                size,
                color,
                quantity,
            } => self.add_item(&product, size.as_deref(), color.as_deref(), quantity),
            CartAction::SetQuantity { id, quantity } => self.update_quantity(&id, quantity),
            CartAction::Increase { id } => self.step_quantity(&id, 1),
            CartAction::Decrease { id } => self.step_quantity(&id, -1),
            CartAction::Remove { id } => self.remove_item(&id),
            CartAction::Clear => self.clear(),
        }
    }

    /// Step an existing line's quantity, never below 1 (decreasing past 1
    /// does not remove; removal is its own action).
    fn step_quantity(&self, id: &LineKey, delta: i64) -> Result<CartOutcome> {
        let Some(current) = self
            .items()
            .into_iter()
            .find(|line| line.id == *id)
            .map(|line| line.quantity)
        else {
            return Ok(CartOutcome::NotFound);
        };

        let target = i64::from(current).saturating_add(delta).max(1);
        let target = u32::try_from(target).unwrap_or(1);
        if target == current {
            return Ok(CartOutcome::Updated { quantity: current });
        }
        self.update_quantity(id, target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CartConfig;
    use crate::storage::MemoryStore;
    use nextstore_core::{CurrencyCode, ProductId, ProductStatus};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "منتج".to_string(),
            price: Decimal::from(1_000),
            currency: CurrencyCode::YER,
            images: vec![],
            sizes: vec![],
            colors: vec![],
            description: None,
            status: ProductStatus::Available,
        }
    }

    fn service() -> CartService {
        CartService::new(Arc::new(MemoryStore::new()), CartConfig::default())
    }

    #[test]
    fn test_dispatch_add_then_increase() {
        let cart = service();
        let key = LineKey::derive(&product().id, None, None);

        cart.dispatch(CartAction::Add {
            product: product(),
            size: None,
            color: None,
            quantity: 1,
        })
        .unwrap();

        let outcome = cart.dispatch(CartAction::Increase { id: key.clone() }).unwrap();
        assert_eq!(outcome, CartOutcome::Updated { quantity: 2 });
        assert_eq!(cart.items().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_decrease_stops_at_one() {
        let cart = service();
        let key = LineKey::derive(&product().id, None, None);
        cart.add_item(&product(), None, None, 1).unwrap();

        let outcome = cart.dispatch(CartAction::Decrease { id: key }).unwrap();
        assert_eq!(outcome, CartOutcome::Updated { quantity: 1 });
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_increase_clamps_at_cap() {
        let cart = service();
        let key = LineKey::derive(&product().id, None, None);
        cart.add_item(&product(), None, None, 20).unwrap();

        let outcome = cart.dispatch(CartAction::Increase { id: key }).unwrap();
        assert_eq!(outcome, CartOutcome::Updated { quantity: 20 });
    }

    #[test]
    fn test_step_on_missing_line_is_not_found() {
        let cart = service();
        let outcome = cart
            .dispatch(CartAction::Increase {
                id: LineKey::from("ghost"),
            })
            .unwrap();
        assert_eq!(outcome, CartOutcome::NotFound);
    }

    #[test]
    fn test_dispatch_clear() {
        let cart = service();
        cart.add_item(&product(), None, None, 2).unwrap();
        assert_eq!(cart.dispatch(CartAction::Clear).unwrap(), CartOutcome::Cleared);
        assert!(cart.items().is_empty());
    }
}
