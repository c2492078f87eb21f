//! Storage collaborator contract.

use async_trait::async_trait;
use common::{ItemId, OrderId};
use thiserror::Error;

use crate::order::{Order, OrderItem, OrderQuery};

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was attempted for a record that has no assigned id.
    #[error("update called with empty ID field")]
    MissingId,

    /// The backend failed.
    #[error("database error: {0}")]
    Database(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Transactional keyed store for orders and their items.
///
/// Ids are assigned by the store on insertion; any id carried by the record
/// being inserted is discarded. Each operation commits or fails atomically,
/// including the cascade from an order to its items. All implementations
/// must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order, assigning a fresh id.
    ///
    /// Items embedded in the order are inserted with it, each receiving a
    /// fresh id and the new order's id. Returns the stored order.
    async fn insert_order(&self, order: Order) -> StoreResult<Order>;

    /// Writes an existing order's scalar fields.
    ///
    /// The order's `items` collection is never written through this
    /// operation, and `created_on` is immutable. Fails with `MissingId`
    /// when the order has no id.
    async fn update_order(&self, order: &Order) -> StoreResult<()>;

    /// Removes an order and, in the same transaction, all items it owns.
    ///
    /// Removing an absent order is a no-op.
    async fn delete_order(&self, id: OrderId) -> StoreResult<()>;

    /// Retrieves an order by id, with its items populated in insertion
    /// order.
    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>>;

    /// Retrieves orders matching a query, with items populated.
    ///
    /// All predicates set on the query must hold.
    async fn query_orders(&self, query: OrderQuery) -> StoreResult<Vec<Order>>;

    /// Inserts a new item, assigning a fresh id. Returns the stored item.
    async fn insert_item(&self, item: OrderItem) -> StoreResult<OrderItem>;

    /// Writes an existing item's fields (`created_on` is immutable).
    ///
    /// Fails with `MissingId` when the item has no id.
    async fn update_item(&self, item: &OrderItem) -> StoreResult<()>;

    /// Removes an item. Removing an absent item is a no-op.
    async fn delete_item(&self, id: ItemId) -> StoreResult<()>;

    /// Retrieves an item by id.
    async fn get_item(&self, id: ItemId) -> StoreResult<Option<OrderItem>>;

    /// Retrieves all items owned by an order, in insertion order.
    async fn items_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItem>>;
}
