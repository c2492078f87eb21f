//! Storage backends for the orders service.
//!
//! Both backends implement the `OrderStore` port from the domain crate:
//! - `MemoryStore` keeps everything in locked in-memory tables
//! - `PostgresStore` persists to PostgreSQL via sqlx

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
