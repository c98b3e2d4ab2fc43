//! Order persistence for the marketplace checkout system.
//!
//! Exposes the [`OrderRepository`] trait plus an in-memory implementation
//! for tests/embedded use and a PostgreSQL implementation for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use store::OrderRepository;
