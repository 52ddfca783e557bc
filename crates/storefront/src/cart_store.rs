//! The cart store: a visitor's [`Cart`] mirrored to durable storage.
//!
//! A [`CartStore`] is created per interaction. It loads the cart snapshot from
//! storage, applies cart operations, and writes the whole snapshot back after
//! every change, so a renderer never sees a state that was not persisted.
//!
//! Storage problems never fail an interaction:
//! - a missing snapshot is an empty cart
//! - an unreadable or malformed snapshot is logged and treated as an empty cart
//! - a failed write is logged; the in-memory result is still rendered

use std::future::Future;

use static_shop_core::{Cart, Catalog, Price, ProductId};
use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;
use crate::notice::Notice;

/// Errors reading or writing the cart snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value storage holding one serialized cart.
///
/// `write` replaces the previous snapshot as a whole.
pub trait CartStorage {
    /// Read the stored snapshot, `None` if nothing has been stored yet.
    fn read(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the stored snapshot.
    fn write(&self, snapshot: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl CartStorage for Session {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.get::<String>(session_keys::CART).await?)
    }

    async fn write(&self, snapshot: String) -> Result<(), StorageError> {
        Ok(self.insert(session_keys::CART, snapshot).await?)
    }
}

/// A visitor's cart bound to its storage and the catalog.
pub struct CartStore<'a, S> {
    storage: S,
    catalog: &'a Catalog,
    cart: Cart,
}

impl<'a, S> CartStore<'a, S> {
    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The catalog this store resolves product ids against.
    #[must_use]
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Sum of all line quantities, for the header badge.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }
}

impl<'a, S: CartStorage> CartStore<'a, S> {
    /// Load the cart from `storage`.
    pub async fn load(storage: S, catalog: &'a Catalog) -> Self {
        let cart = match storage.read().await {
            Ok(Some(snapshot)) => Cart::from_snapshot(&snapshot).unwrap_or_else(|e| {
                tracing::warn!("Stored cart is malformed, starting empty: {e}");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored cart, starting empty: {e}");
                Cart::new()
            }
        };
        Self {
            storage,
            catalog,
            cart,
        }
    }

    /// Add one unit of a catalog product.
    ///
    /// Returns the confirmation notice, or `None` when the product is not in
    /// the catalog (the cart is left untouched).
    pub async fn add_item(&mut self, id: ProductId) -> Option<Notice> {
        let Some(product) = self.cart.add_item(self.catalog, id) else {
            tracing::debug!(product_id = %id, "Ignoring add for unknown product");
            return None;
        };
        let notice = Notice::added(&product.name);
        self.persist().await;
        Some(notice)
    }

    /// Adjust a line's quantity; a result of zero or less removes the line.
    ///
    /// Returns `false` when the cart has no line for `id`.
    pub async fn change_quantity(&mut self, id: ProductId, delta: i32) -> bool {
        let changed = self.cart.change_quantity(id, delta);
        if changed {
            self.persist().await;
        }
        changed
    }

    /// Remove a line. Removing an absent line is a no-op.
    pub async fn remove_item(&mut self, id: ProductId) -> bool {
        let changed = self.cart.remove(id);
        if changed {
            self.persist().await;
        }
        changed
    }

    /// Empty the cart. Always writes, so storage holds an empty cart afterwards.
    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    /// Simulated checkout: clear a non-empty cart and confirm.
    ///
    /// An empty cart has nothing to purchase; returns `None` without writing.
    pub async fn checkout(&mut self) -> Option<Notice> {
        if self.cart.is_empty() {
            return None;
        }
        let items = self.cart.total_item_count();
        let total = self.cart.total_price();
        self.clear().await;
        tracing::info!(items, total = %total, "Checkout completed");
        Some(Notice::purchased())
    }

    async fn persist(&self) {
        let snapshot = match self.cart.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Failed to encode cart snapshot: {}", StorageError::from(e));
                return;
            }
        };
        if let Err(e) = self.storage.write(snapshot).await {
            tracing::error!("Failed to persist cart: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use super::*;
    use crate::catalog::embedded_catalog;

    /// In-process storage, shared between clones.
    #[derive(Debug, Clone, Default)]
    struct MemoryStorage {
        snapshot: Arc<Mutex<Option<String>>>,
    }

    impl MemoryStorage {
        /// Storage pre-seeded with `snapshot`.
        #[must_use]
        fn with_snapshot(snapshot: impl Into<String>) -> Self {
            Self {
                snapshot: Arc::new(Mutex::new(Some(snapshot.into()))),
            }
        }

        /// The currently stored snapshot.
        #[must_use]
        fn snapshot(&self) -> Option<String> {
            self.snapshot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl CartStorage for MemoryStorage {
        async fn read(&self) -> Result<Option<String>, StorageError> {
            Ok(self.snapshot())
        }

        async fn write(&self, snapshot: String) -> Result<(), StorageError> {
            *self
                .snapshot
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
            Ok(())
        }
    }

    /// Storage that reads nothing and rejects every write.
    struct FailingStorage;

    impl CartStorage for FailingStorage {
        async fn read(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn write(&self, _snapshot: String) -> Result<(), StorageError> {
            Err(serde_json::from_str::<()>("unwritable").unwrap_err().into())
        }
    }

    fn id(value: i32) -> ProductId {
        ProductId::new(value)
    }

    fn stored(storage: &MemoryStorage) -> Cart {
        Cart::from_snapshot(&storage.snapshot().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let catalog = embedded_catalog().unwrap();
        let store = CartStore::load(MemoryStorage::default(), &catalog).await;
        assert!(store.cart().is_empty());
        assert_eq!(store.total_item_count(), 0);
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let catalog = embedded_catalog().unwrap();
        for garbage in ["{not json", "null", "{}", "[{\"id\": \"x\"}]"] {
            let store = CartStore::load(MemoryStorage::with_snapshot(garbage), &catalog).await;
            assert!(store.cart().is_empty(), "{garbage} should load as empty");
        }
    }

    #[tokio::test]
    async fn test_add_item_persists_and_confirms() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;

        let notice = store.add_item(id(2)).await.unwrap();
        assert_eq!(notice.message(), "Smart Watch has been added to your cart!");
        assert_eq!(stored(&storage), *store.cart());
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_silent() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;

        assert!(store.add_item(id(404)).await.is_none());
        assert!(store.cart().is_empty());
        assert!(storage.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_scenario_totals_survive_reload() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;
        store.add_item(id(1)).await;
        store.add_item(id(2)).await;
        store.add_item(id(1)).await;

        let reloaded = CartStore::load(storage, &catalog).await;
        let lines: Vec<(i32, u32)> = reloaded
            .cart()
            .lines()
            .iter()
            .map(|line| (line.id.as_i32(), line.quantity))
            .collect();
        assert_eq!(lines, vec![(1, 2), (2, 1)]);
        assert_eq!(reloaded.total_item_count(), 3);
        assert_eq!(reloaded.total_price().to_fixed(), "399.97");
    }

    #[tokio::test]
    async fn test_decrement_last_unit_removes_line() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::with_snapshot(
            r#"[{"id": 3, "name": "Cotton T-Shirt", "price": 24.99, "image": "t.jpg", "quantity": 1}]"#,
        );
        let mut store = CartStore::load(storage.clone(), &catalog).await;

        assert!(store.change_quantity(id(3), -1).await);
        assert!(store.cart().is_empty());
        assert_eq!(store.total_item_count(), 0);
        assert!(stored(&storage).is_empty());

        assert!(!store.change_quantity(id(3), -1).await);
    }

    #[tokio::test]
    async fn test_remove_item_is_idempotent() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;
        store.add_item(id(1)).await;
        store.add_item(id(3)).await;

        assert!(store.remove_item(id(1)).await);
        let after_once = storage.snapshot();
        assert!(!store.remove_item(id(1)).await);
        assert_eq!(storage.snapshot(), after_once);
        assert_eq!(store.total_item_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_clears_storage() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;
        store.add_item(id(2)).await;

        assert_eq!(store.checkout().await, Some(Notice::purchased()));
        assert!(store.cart().is_empty());
        assert_eq!(storage.snapshot().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_noop() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::default();
        let mut store = CartStore::load(storage.clone(), &catalog).await;

        assert!(store.checkout().await.is_none());
        assert!(storage.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_clear_overwrites_malformed_snapshot() {
        let catalog = embedded_catalog().unwrap();
        let storage = MemoryStorage::with_snapshot("garbage");
        let mut store = CartStore::load(storage.clone(), &catalog).await;

        store.clear().await;
        assert_eq!(storage.snapshot().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_result() {
        let catalog = embedded_catalog().unwrap();
        let mut store = CartStore::load(FailingStorage, &catalog).await;

        let notice = store.add_item(id(1)).await;
        assert!(notice.is_some());
        assert_eq!(store.total_item_count(), 1);
        assert!(store.change_quantity(id(1), 2).await);
        assert_eq!(store.total_item_count(), 3);
    }

    #[tokio::test]
    async fn test_session_storage_roundtrip() {
        use tower_sessions::MemoryStore;

        let catalog = embedded_catalog().unwrap();
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut store = CartStore::load(session.clone(), &catalog).await;
        store.add_item(id(3)).await;
        store.add_item(id(3)).await;

        let raw = session.get::<String>(session_keys::CART).await.unwrap().unwrap();
        assert_eq!(Cart::from_snapshot(&raw).unwrap(), *store.cart());

        let reloaded = CartStore::load(session, &catalog).await;
        assert_eq!(reloaded.total_item_count(), 2);
    }
}
