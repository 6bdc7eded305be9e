//! Integration tests for the Next Store cart engine.
//!
//! # Test Categories
//!
//! - `cart_flow` - End-to-end cart scenarios within one context
//! - `cross_context` - Synchronization between contexts sharing one store
//!
//! The [`support`] module holds fixtures shared by the test binaries.

pub mod support {
    use nextstore_cart::{CartStore, MemoryStore, StorageError, StoreChange};
    use nextstore_core::{CurrencyCode, Product, ProductId, ProductStatus};
    use rust_decimal::Decimal;
    use tokio::sync::broadcast;
    use uuid::Uuid;

    /// A catalog product fixture priced in the store currency.
    #[must_use]
    pub fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            currency: CurrencyCode::YER,
            images: vec![format!("{id}.webp")],
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            colors: vec!["أسود".to_string(), "أبيض".to_string()],
            description: None,
            status: ProductStatus::Available,
        }
    }

    /// A store whose change channel never fires, standing in for a host
    /// environment without cross-context storage events. Contexts sharing it
    /// can only converge through the fallback reconciliation poll.
    pub struct SilentStore {
        inner: MemoryStore,
        silent: broadcast::Sender<StoreChange>,
    }

    impl SilentStore {
        #[must_use]
        pub fn new() -> Self {
            let (silent, _) = broadcast::channel(1);
            Self {
                inner: MemoryStore::new(),
                silent,
            }
        }
    }

    impl Default for SilentStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CartStore for SilentStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn store(&self, key: &str, value: &str, writer: Uuid) -> Result<(), StorageError> {
            self.inner.store(key, value, writer)
        }

        fn remove(&self, key: &str, writer: Uuid) -> Result<(), StorageError> {
            self.inner.remove(key, writer)
        }

        fn changes(&self) -> broadcast::Receiver<StoreChange> {
            self.silent.subscribe()
        }
    }
}
