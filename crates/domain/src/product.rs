//! Product identifier and catalog snapshot types.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Product identifier (catalog SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Catalog snapshot of a product as seen when it is put in the cart.
///
/// The cart copies these fields into its line; later catalog edits do not
/// reach back into open carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub vendor: String,
    pub category: String,
    pub stock_hint: Option<u32>,
}

impl Product {
    /// Creates a product snapshot.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        vendor: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            vendor: vendor.into(),
            category: category.into(),
            stock_hint: None,
        }
    }

    /// Sets the stock hint.
    pub fn with_stock_hint(mut self, stock: u32) -> Self {
        self.stock_hint = Some(stock);
        self
    }
}
