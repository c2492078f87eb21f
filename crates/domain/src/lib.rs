//! Domain core for the orders service.
//!
//! This crate owns all business logic:
//! - Order and OrderItem entities with payload validation
//! - the order status lifecycle and cancel transition rules
//! - the query model and list-filter precedence
//! - the `OrderStore` port implemented by storage backends
//! - `OrderService`, the public API over a store

pub mod error;
pub mod order;
pub mod store;

pub use error::{DomainError, Result, ValidationError};
pub use order::{ListFilter, Order, OrderItem, OrderQuery, OrderService, OrderStatus};
pub use store::{OrderStore, StoreError, StoreResult};
