//! Checkout request types.

use common::CorrelationId;
use domain::{
    CartLine, CartSnapshot, CustomerIdentity, PaymentMethod, Product, ShippingInfo,
};
use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// What is being bought: the customer's whole cart, or a single product
/// bought directly from its listing page.
///
/// The two modes differ only in where the lines come from and in whether
/// the cart is cleared afterwards; everything downstream of normalization
/// treats them identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CheckoutRequest {
    /// Buy everything in the cart snapshot.
    Cart { snapshot: CartSnapshot },
    /// Buy one product without touching the cart.
    Direct { product: Product, quantity: u32 },
}

impl CheckoutRequest {
    /// Returns true for cart-mode checkouts.
    pub fn is_cart_mode(&self) -> bool {
        matches!(self, CheckoutRequest::Cart { .. })
    }

    /// Flattens the request into cart lines for pricing and order creation.
    ///
    /// Fails with [`CheckoutError::EmptyCart`] when there is nothing to buy.
    pub fn normalize(&self) -> Result<Vec<CartLine>, CheckoutError> {
        let lines = match self {
            CheckoutRequest::Cart { snapshot } => snapshot.lines.clone(),
            CheckoutRequest::Direct { product, quantity } => {
                if *quantity == 0 {
                    return Err(CheckoutError::EmptyCart);
                }
                vec![CartLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: product.unit_price,
                    quantity: *quantity,
                    vendor: product.vendor.clone(),
                    category: product.category.clone(),
                    stock_hint: product.stock_hint,
                }]
            }
        };

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(lines)
    }
}

/// Everything the customer supplies alongside the request: who they are,
/// where to ship, how to pay, and which discounts to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutInput {
    pub identity: CustomerIdentity,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    /// Coupon code, validated against the registry during pricing.
    pub coupon: Option<String>,
    /// Loyalty points the customer asked to redeem; clamped during pricing.
    pub requested_points: i64,
    /// Client-supplied idempotency key. Retries of the same attempt must
    /// reuse the same value.
    pub correlation_id: CorrelationId,
}
