//! In-memory store implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{ItemId, OrderId};
use domain::store::{OrderStore, StoreError, StoreResult};
use domain::{Order, OrderItem, OrderQuery};

/// In-memory store implementation.
///
/// Keeps orders and items in locked tables with monotonically assigned ids
/// and provides the same interface and cascade semantics as the PostgreSQL
/// implementation. Each operation takes the write lock once, so it commits
/// or fails as a unit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    orders: BTreeMap<i64, Order>,
    items: BTreeMap<i64, OrderItem>,
    last_order_id: i64,
    last_item_id: i64,
}

impl Tables {
    fn items_of(&self, order_id: OrderId) -> Vec<OrderItem> {
        self.items
            .values()
            .filter(|item| item.order_id == Some(order_id))
            .cloned()
            .collect()
    }

    // Orders are stored with an empty item list; reads join the items in.
    fn with_items(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.items = match order.id {
            Some(id) => self.items_of(id),
            None => Vec::new(),
        };
        order
    }

    fn matches(&self, order: &Order, query: &OrderQuery) -> bool {
        if let Some(customer_id) = query.customer_id
            && order.customer_id != customer_id
        {
            return false;
        }
        if let Some(status) = query.status
            && order.status != status
        {
            return false;
        }
        if let Some(product_id) = query.product_id {
            let owns_product = order.id.is_some_and(|id| {
                self.items
                    .values()
                    .any(|item| item.order_id == Some(id) && item.product_id == product_id)
            });
            if !owns_product {
                return false;
            }
        }
        true
    }
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Returns the number of items stored.
    pub async fn item_count(&self) -> usize {
        self.inner.read().await.items.len()
    }

    /// Clears all orders and items.
    pub async fn clear(&self) {
        let mut tables = self.inner.write().await;
        tables.orders.clear();
        tables.items.clear();
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, mut order: Order) -> StoreResult<Order> {
        let mut tables = self.inner.write().await;

        tables.last_order_id += 1;
        let id = OrderId::new(tables.last_order_id);
        order.id = Some(id);

        for mut item in std::mem::take(&mut order.items) {
            tables.last_item_id += 1;
            let item_id = tables.last_item_id;
            item.id = Some(ItemId::new(item_id));
            item.order_id = Some(id);
            tables.items.insert(item_id, item);
        }
        tables.orders.insert(id.as_i64(), order.clone());

        Ok(tables.with_items(&order))
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        let id = order.id.ok_or(StoreError::MissingId)?;

        let mut tables = self.inner.write().await;
        if let Some(stored) = tables.orders.get_mut(&id.as_i64()) {
            stored.customer_id = order.customer_id;
            stored.status = order.status;
            stored.updated_on = order.updated_on;
        }
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<()> {
        let mut tables = self.inner.write().await;
        tables.orders.remove(&id.as_i64());
        tables.items.retain(|_, item| item.order_id != Some(id));
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let tables = self.inner.read().await;
        Ok(tables
            .orders
            .get(&id.as_i64())
            .map(|order| tables.with_items(order)))
    }

    async fn query_orders(&self, query: OrderQuery) -> StoreResult<Vec<Order>> {
        let tables = self.inner.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|order| tables.matches(order, &query))
            .map(|order| tables.with_items(order))
            .collect())
    }

    async fn insert_item(&self, mut item: OrderItem) -> StoreResult<OrderItem> {
        let mut tables = self.inner.write().await;

        tables.last_item_id += 1;
        let item_id = tables.last_item_id;
        item.id = Some(ItemId::new(item_id));
        tables.items.insert(item_id, item.clone());

        Ok(item)
    }

    async fn update_item(&self, item: &OrderItem) -> StoreResult<()> {
        let id = item.id.ok_or(StoreError::MissingId)?;

        let mut tables = self.inner.write().await;
        if let Some(stored) = tables.items.get_mut(&id.as_i64()) {
            stored.product_id = item.product_id;
            stored.quantity = item.quantity;
            stored.price = item.price;
            stored.order_id = item.order_id;
            stored.updated_on = item.updated_on;
        }
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        let mut tables = self.inner.write().await;
        tables.items.remove(&id.as_i64());
        Ok(())
    }

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<OrderItem>> {
        let tables = self.inner.read().await;
        Ok(tables.items.get(&id.as_i64()).cloned())
    }

    async fn items_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItem>> {
        let tables = self.inner.read().await;
        Ok(tables.items_of(order_id))
    }
}
