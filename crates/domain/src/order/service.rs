//! Order service providing the public API over a storage backend.

use common::{CustomerId, ItemId, OrderId, ProductId};
use serde_json::Value;

use crate::error::{DomainError, Result};
use crate::order::payload;
use crate::order::{ListFilter, Order, OrderItem, OrderQuery, OrderStatus};
use crate::store::OrderStore;

/// Service for managing orders and their items.
///
/// Wraps a storage backend and owns all business rules: payload validation,
/// the cancel state machine, item scoping, and list-filter resolution. Each
/// operation commits or fails atomically through the store's transaction
/// boundary.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Order operations --

    /// Validates a payload and persists a new order.
    ///
    /// Any client-supplied id is discarded; the store assigns a fresh one.
    /// Items embedded in the payload are persisted with the order.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_order(&self, payload: &Value) -> Result<Order> {
        let mut order = Order::deserialize(payload)?;
        order.id = None;

        let order = self.store.insert_order(order).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = ?order.id, "order created");
        Ok(order)
    }

    /// Loads an order by id. Returns `None` if it doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.get_order(id).await?)
    }

    /// Returns every order.
    #[tracing::instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.query_orders(OrderQuery::new()).await?)
    }

    /// Returns the orders placed by a customer.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        Ok(self
            .store
            .query_orders(OrderQuery::new().customer_id(customer_id))
            .await?)
    }

    /// Returns the orders in a status; `None` means `CONFIRMED`.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_status(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        Ok(self
            .store
            .query_orders(OrderQuery::new().status(status.unwrap_or_default()))
            .await?)
    }

    /// Returns the orders owning at least one item for a product.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_product(&self, product_id: ProductId) -> Result<Vec<Order>> {
        Ok(self
            .store
            .query_orders(OrderQuery::new().product_id(product_id))
            .await?)
    }

    /// Returns the orders matching a resolved list filter.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, filter: ListFilter) -> Result<Vec<Order>> {
        Ok(self.store.query_orders(filter.into_query()).await?)
    }

    /// Validates a payload and writes it over an existing order.
    ///
    /// Item mutation goes through the item operations only: an `items`
    /// array embedded in the payload is dropped before validation and the
    /// persisted items survive untouched. `created_on` is preserved;
    /// `updated_on` is refreshed.
    #[tracing::instrument(skip(self, payload))]
    pub async fn update_order(&self, id: OrderId, payload: &Value) -> Result<Order> {
        let existing = self
            .store
            .get_order(id)
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;

        let mut scrubbed = payload.clone();
        if let Some(map) = scrubbed.as_object_mut() {
            map.remove("items");
        }

        let mut order = Order::deserialize(&scrubbed)?;
        order.id = Some(id);
        order.created_on = existing.created_on;
        order.items = existing.items;

        self.store.update_order(&order).await?;
        tracing::info!(order_id = %id, "order updated");
        Ok(order)
    }

    /// Removes an order and all items it owns. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        self.store.delete_order(id).await?;
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Transitions an order to `CANCELLED`.
    ///
    /// Legal only from `CONFIRMED` or `IN_PROGRESS`. A second cancel and a
    /// cancel after shipping are distinct conflicts; both leave the order
    /// unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order> {
        let mut order = self
            .store
            .get_order(id)
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;

        match order.status {
            OrderStatus::Cancelled => return Err(DomainError::AlreadyCancelled(id)),
            status if !status.can_cancel() => {
                return Err(DomainError::CancelConflict { id, status });
            }
            _ => {}
        }

        order.status = OrderStatus::Cancelled;
        order.updated_on = payload::today();
        self.store.update_order(&order).await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(order_id = %id, "order cancelled");
        Ok(order)
    }

    // -- Item operations --

    /// Validates a payload and attaches a new item to an order.
    ///
    /// The owning order id always comes from the caller's path; a payload
    /// `order_id` is never trusted to attach the item elsewhere.
    #[tracing::instrument(skip(self, payload))]
    pub async fn add_item(&self, order_id: OrderId, payload: &Value) -> Result<OrderItem> {
        self.require_order(order_id).await?;

        let mut item = OrderItem::deserialize(payload)?;
        item.id = None;
        item.order_id = Some(order_id);

        let item = self.store.insert_item(item).await?;
        metrics::counter!("order_items_created_total").increment(1);
        tracing::info!(order_id = %order_id, item_id = ?item.id, "item added");
        Ok(item)
    }

    /// Returns the items owned by an order.
    #[tracing::instrument(skip(self))]
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        self.require_order(order_id).await?;
        Ok(self.store.items_for_order(order_id).await?)
    }

    /// Looks up an item through its owning order.
    ///
    /// Returns `Some` only when the item exists and belongs to the order;
    /// an item reached through the wrong order's path appears not to exist.
    #[tracing::instrument(skip(self))]
    pub async fn find_item_in_order(
        &self,
        order_id: OrderId,
        item_id: ItemId,
    ) -> Result<Option<OrderItem>> {
        let item = self
            .store
            .get_item(item_id)
            .await?
            .filter(|item| item.order_id == Some(order_id));
        Ok(item)
    }

    /// Loads an item scoped to an order, failing with not-found signals.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, order_id: OrderId, item_id: ItemId) -> Result<OrderItem> {
        self.require_order(order_id).await?;
        self.find_item_in_order(order_id, item_id)
            .await?
            .ok_or(DomainError::ItemNotFound(item_id))
    }

    /// Validates a payload and writes it over an existing item.
    ///
    /// The payload's `id` and `order_id` are ignored: identity comes from
    /// the caller's path and `created_on` is preserved.
    #[tracing::instrument(skip(self, payload))]
    pub async fn update_item(
        &self,
        order_id: OrderId,
        item_id: ItemId,
        payload: &Value,
    ) -> Result<OrderItem> {
        let existing = self.get_item(order_id, item_id).await?;

        let mut item = OrderItem::deserialize(payload)?;
        item.id = Some(item_id);
        item.order_id = Some(order_id);
        item.created_on = existing.created_on;

        self.store.update_item(&item).await?;
        tracing::info!(order_id = %order_id, item_id = %item_id, "item updated");
        Ok(item)
    }

    /// Removes an item from an order. Idempotent over the item, but the
    /// order itself must exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, order_id: OrderId, item_id: ItemId) -> Result<()> {
        self.require_order(order_id).await?;

        if self.find_item_in_order(order_id, item_id).await?.is_some() {
            self.store.delete_item(item_id).await?;
            tracing::info!(order_id = %order_id, item_id = %item_id, "item deleted");
        }
        Ok(())
    }

    async fn require_order(&self, id: OrderId) -> Result<()> {
        if self.store.get_order(id).await?.is_none() {
            return Err(DomainError::OrderNotFound(id));
        }
        Ok(())
    }
}
