//! PostgreSQL-backed store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use common::{CustomerId, ItemId, OrderId, ProductId};
use domain::store::{OrderStore, StoreError, StoreResult};
use domain::{Order, OrderItem, OrderQuery, OrderStatus};

/// PostgreSQL-backed store implementation.
///
/// Ids come from `BIGSERIAL` columns and the order → item cascade from an
/// `ON DELETE CASCADE` foreign key, so every operation commits or fails
/// inside a single database transaction.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool for the given database URL.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(url).await.map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_order(row: &PgRow) -> StoreResult<Order> {
        let status_name: String = row.try_get("status").map_err(db_err)?;
        let status = OrderStatus::from_name(&status_name).ok_or_else(|| {
            StoreError::Database(format!("unknown status '{status_name}' in orders row"))
        })?;

        Ok(Order {
            id: Some(OrderId::new(row.try_get("id").map_err(db_err)?)),
            customer_id: CustomerId::new(row.try_get("customer_id").map_err(db_err)?),
            status,
            items: Vec::new(),
            created_on: row.try_get("created_on").map_err(db_err)?,
            updated_on: row.try_get("updated_on").map_err(db_err)?,
        })
    }

    fn row_to_item(row: &PgRow) -> StoreResult<OrderItem> {
        let quantity: i32 = row.try_get("quantity").map_err(db_err)?;

        Ok(OrderItem {
            id: Some(ItemId::new(row.try_get("id").map_err(db_err)?)),
            product_id: ProductId::new(row.try_get("product_id").map_err(db_err)?),
            quantity: quantity as u32,
            price: row.try_get("price").map_err(db_err)?,
            order_id: Some(OrderId::new(row.try_get("order_id").map_err(db_err)?)),
            created_on: row.try_get("created_on").map_err(db_err)?,
            updated_on: row.try_get("updated_on").map_err(db_err)?,
        })
    }

    async fn load_items(&self, order_id: OrderId) -> StoreResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, price, order_id, created_on, updated_on
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::row_to_item).collect()
    }
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert_order(&self, order: Order) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, status, created_on, updated_on)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order.customer_id.as_i64())
        .bind(order.status.as_str())
        .bind(order.created_on)
        .bind(order.updated_on)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        let order_id = OrderId::new(row.try_get("id").map_err(db_err)?);

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let row = sqlx::query(
                r#"
                INSERT INTO order_items (product_id, quantity, price, order_id, created_on, updated_on)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(item.product_id.as_i64())
            .bind(item.quantity as i32)
            .bind(item.price)
            .bind(order_id.as_i64())
            .bind(item.created_on)
            .bind(item.updated_on)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

            let mut stored = item.clone();
            stored.id = Some(ItemId::new(row.try_get("id").map_err(db_err)?));
            stored.order_id = Some(order_id);
            items.push(stored);
        }

        tx.commit().await.map_err(db_err)?;
        tracing::debug!(order_id = %order_id, "order inserted");

        let mut order = order;
        order.id = Some(order_id);
        order.items = items;
        Ok(order)
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        let id = order.id.ok_or(StoreError::MissingId)?;

        sqlx::query(
            r#"
            UPDATE orders
            SET customer_id = $1, status = $2, updated_on = $3
            WHERE id = $4
            "#,
        )
        .bind(order.customer_id.as_i64())
        .bind(order.status.as_str())
        .bind(order.updated_on)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<()> {
        // The ON DELETE CASCADE foreign key removes the order's items in
        // the same transaction.
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        tracing::debug!(order_id = %id, "order deleted");
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, status, created_on, updated_on
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let mut order = Self::row_to_order(&row)?;
                order.items = self.load_items(id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn query_orders(&self, query: OrderQuery) -> StoreResult<Vec<Order>> {
        let mut sql =
            String::from("SELECT id, customer_id, status, created_on, updated_on FROM orders WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.customer_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND customer_id = ${param_count}"));
        }
        if query.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }
        if query.product_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(
                " AND id IN (SELECT order_id FROM order_items WHERE product_id = ${param_count})"
            ));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut sqlx_query = sqlx::query(&sql);

        if let Some(customer_id) = query.customer_id {
            sqlx_query = sqlx_query.bind(customer_id.as_i64());
        }
        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(product_id) = query.product_id {
            sqlx_query = sqlx_query.bind(product_id.as_i64());
        }

        let rows = sqlx_query.fetch_all(&self.pool).await.map_err(db_err)?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = Self::row_to_order(row)?;
            if let Some(id) = order.id {
                order.items = self.load_items(id).await?;
            }
            orders.push(order);
        }
        Ok(orders)
    }

    async fn insert_item(&self, item: OrderItem) -> StoreResult<OrderItem> {
        let order_id = item.order_id.ok_or_else(|| {
            StoreError::Database("cannot insert an item without an owning order".to_string())
        })?;

        let row = sqlx::query(
            r#"
            INSERT INTO order_items (product_id, quantity, price, order_id, created_on, updated_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(item.product_id.as_i64())
        .bind(item.quantity as i32)
        .bind(item.price)
        .bind(order_id.as_i64())
        .bind(item.created_on)
        .bind(item.updated_on)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let mut stored = item;
        stored.id = Some(ItemId::new(row.try_get("id").map_err(db_err)?));
        Ok(stored)
    }

    async fn update_item(&self, item: &OrderItem) -> StoreResult<()> {
        let id = item.id.ok_or(StoreError::MissingId)?;
        let order_id = item.order_id.ok_or_else(|| {
            StoreError::Database("cannot update an item without an owning order".to_string())
        })?;

        sqlx::query(
            r#"
            UPDATE order_items
            SET product_id = $1, quantity = $2, price = $3, order_id = $4, updated_on = $5
            WHERE id = $6
            "#,
        )
        .bind(item.product_id.as_i64())
        .bind(item.quantity as i32)
        .bind(item.price)
        .bind(order_id.as_i64())
        .bind(item.updated_on)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<OrderItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, quantity, price, order_id, created_on, updated_on
            FROM order_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn items_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItem>> {
        self.load_items(order_id).await
    }
}
