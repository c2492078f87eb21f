pub mod types;

pub use types::{CustomerId, ItemId, OrderId, ProductId};
