//! Cart aggregate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;
use crate::product::{Product, ProductId};

/// Maximum quantity of one product in a cart.
pub const QUANTITY_CAP: u32 = 15;

/// Maximum number of distinct lines in a cart.
pub const LINE_CAP: usize = 15;

/// Errors that can occur during cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Adding or setting would push a product past the per-product cap.
    #[error("quantity {requested} for {product_id} exceeds the cap of {QUANTITY_CAP}")]
    CapacityExceeded { product_id: String, requested: u32 },

    /// The cart already holds the maximum number of distinct lines.
    #[error("cart already holds {LINE_CAP} distinct products")]
    CartFull,

    /// Quantity must be at least 1 when adding.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub vendor: String,
    pub category: String,
    pub stock_hint: Option<u32>,
}

impl CartLine {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            vendor: product.vendor.clone(),
            category: product.category.clone(),
            stock_hint: product.stock_hint,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Basic integrity check applied when re-hydrating a persisted cart.
    pub fn is_well_formed(&self) -> bool {
        !self.product_id.is_empty()
            && !self.name.is_empty()
            && !self.unit_price.is_negative()
            && self.quantity >= 1
            && self.quantity <= QUANTITY_CAP
    }
}

/// Immutable copy of a cart's contents plus derived quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Sum of all line quantities.
    pub item_count: u32,
    /// True when the distinct-line count has reached the cap.
    pub is_full: bool,
}

impl CartSnapshot {
    /// Returns true if the snapshot has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

/// Cart for one customer session.
///
/// Lines keep insertion order for display; mutation is upsert-or-fail with
/// the quantity and distinct-line caps enforced on every call. Exceeding a
/// cap is rejected, never clamped, and leaves the cart untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted lines, dropping any that fail the
    /// integrity check. A persisted cart is self-healing, never fatally
    /// corrupt.
    pub fn from_persisted_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if !line.is_well_formed() {
                continue;
            }
            if cart.lines.len() == LINE_CAP {
                break;
            }
            if cart.get(&line.product_id).is_none() {
                cart.lines.push(line);
            }
        }
        cart
    }

    /// Adds a product to the cart, merging into an existing line.
    ///
    /// Fails with [`CartError::CapacityExceeded`] when the merged quantity
    /// would pass the per-product cap, or [`CartError::CartFull`] when a new
    /// line would pass the distinct-line cap.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_quantity = existing.quantity + quantity;
            if new_quantity > QUANTITY_CAP {
                return Err(CartError::CapacityExceeded {
                    product_id: product.id.to_string(),
                    requested: new_quantity,
                });
            }
            existing.quantity = new_quantity;
            return Ok(());
        }

        if self.lines.len() == LINE_CAP {
            return Err(CartError::CartFull);
        }
        if quantity > QUANTITY_CAP {
            return Err(CartError::CapacityExceeded {
                product_id: product.id.to_string(),
                requested: quantity,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Removes a product line. Idempotent; absent products are a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product_id != product_id);
    }

    /// Sets the quantity of an existing line.
    ///
    /// Zero is equivalent to [`Cart::remove_item`]; a quantity over the cap
    /// fails. An absent product is a no-op: cart operations only fail on
    /// capacity grounds.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        if quantity > QUANTITY_CAP {
            return Err(CartError::CapacityExceeded {
                product_id: product_id.to_string(),
                requested: quantity,
            });
        }
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns a line by product ID.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Returns the sum of all line quantities.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Returns the number of distinct lines.
    pub fn distinct_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the distinct-line count has reached the cap.
    pub fn is_full(&self) -> bool {
        self.lines.len() == LINE_CAP
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns an immutable copy of the cart with derived quantities.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            item_count: self.item_count(),
            is_full: self.is_full(),
        }
    }
}
