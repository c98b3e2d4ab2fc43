//! Durable client-side cart storage.
//!
//! The cart mirrors every successful mutation into a string store (the
//! browser-local storage of the original surface). Persistence is strictly
//! best-effort: a failed write degrades to dropping the persisted copy and
//! never fails the in-memory mutation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::cart::{Cart, CartError, CartLine, CartSnapshot};
use crate::product::{Product, ProductId};

/// Error produced by a cart store backend.
#[derive(Debug, Error)]
#[error("cart store error: {0}")]
pub struct CartStoreError(pub String);

/// Durable string storage for serialized carts.
pub trait CartStore {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, CartStoreError>;

    /// Writes `value` under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), CartStoreError>;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str) -> Result<(), CartStoreError>;
}

#[derive(Debug, Default)]
struct InMemoryCartStoreState {
    entries: HashMap<String, String>,
    fail_on_write: bool,
}

/// In-memory cart store for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    state: Arc<RwLock<InMemoryCartStoreState>>,
}

impl InMemoryCartStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail writes, simulating quota exhaustion.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.state.write().unwrap().fail_on_write = fail;
    }

    /// Returns the raw stored value for a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.read().unwrap().entries.get(key).cloned()
    }
}

impl CartStore for InMemoryCartStore {
    fn read(&self, key: &str) -> Result<Option<String>, CartStoreError> {
        Ok(self.state.read().unwrap().entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CartStoreError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_write {
            return Err(CartStoreError("quota exceeded".to_string()));
        }
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CartStoreError> {
        self.state.write().unwrap().entries.remove(key);
        Ok(())
    }
}

/// A cart bound to a storage key, persisting on every successful mutation.
///
/// Mutations succeed or fail strictly on capacity grounds; storage failures
/// are logged and swallowed.
pub struct CartSession<S: CartStore> {
    cart: Cart,
    store: S,
    key: String,
}

impl<S: CartStore> CartSession<S> {
    /// Opens a session, re-hydrating any persisted cart under `key`.
    ///
    /// A missing, unparsable, or partially corrupt persisted cart heals to
    /// whatever well-formed lines survive.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match store.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => Cart::from_persisted_lines(lines),
                Err(err) => {
                    tracing::warn!(%key, error = %err, "persisted cart unreadable, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(%key, error = %err, "cart store read failed, starting empty");
                Cart::new()
            }
        };
        Self { cart, store, key }
    }

    /// Returns the underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns an immutable snapshot of the cart.
    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    /// Adds a product, then persists.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        self.cart.add_item(product, quantity)?;
        self.persist();
        Ok(())
    }

    /// Removes a product line, then persists.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.cart.remove_item(product_id);
        self.persist();
    }

    /// Sets a line quantity, then persists.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        self.cart.set_quantity(product_id, quantity)?;
        self.persist();
        Ok(())
    }

    /// Empties the cart, then persists.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(self.cart.lines()) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "cart serialization failed, dropping persisted copy");
                return;
            }
        };
        if let Err(err) = self.store.write(&self.key, &payload) {
            tracing::warn!(key = %self.key, error = %err, "cart persist failed, keeping in-memory state");
        }
    }
}
