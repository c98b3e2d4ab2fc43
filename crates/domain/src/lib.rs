//! Domain layer for the marketplace checkout system.
//!
//! This crate provides the business rules the storefront glue hangs off:
//! - Cart aggregate with per-product and per-cart capacity caps
//! - Durable (best-effort) client-side cart persistence
//! - Pure pricing engine (shipping, tax, coupons, loyalty points)
//! - Shipping input validation
//! - Order record and its status machine

pub mod cart;
pub mod cart_store;
pub mod identity;
pub mod money;
pub mod order;
pub mod pricing;
pub mod product;
pub mod shipping;

pub use cart::{Cart, CartError, CartLine, CartSnapshot, LINE_CAP, QUANTITY_CAP};
pub use cart_store::{CartSession, CartStore, CartStoreError, InMemoryCartStore};
pub use identity::{CustomerId, CustomerIdentity};
pub use money::Money;
pub use order::{
    Order, OrderDraft, OrderLine, OrderNumber, OrderStatus, PaymentInfo, PaymentMethod,
    TimelineEntry,
};
pub use pricing::{Coupon, PricingBreakdown, PricingError, lookup_coupon, price};
pub use product::{Product, ProductId};
pub use shipping::{ShippingInfo, ValidationErrors};
