//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{CustomerId, OrderId, ProductId};
use domain::store::{OrderStore, StoreError};
use domain::{Order, OrderItem, OrderQuery, OrderStatus};
use serde_json::json;
use serial_test::serial;
use sqlx::PgPool;
use store::PostgresStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Run the schema setup using raw_sql to execute multiple statements
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_orders_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn fresh_store() -> PostgresStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();

    sqlx::raw_sql("TRUNCATE orders, order_items RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

fn order_with_items() -> Order {
    Order::deserialize(&json!({
        "customer_id": 4,
        "items": [
            {"product_id": 3, "quantity": 2, "price": 100.0},
            {"product_id": 7, "quantity": 1, "price": 9.99}
        ]
    }))
    .unwrap()
}

#[tokio::test]
#[serial]
async fn insert_and_get_order_round_trip() {
    let store = fresh_store().await;

    let stored = store.insert_order(order_with_items()).await.unwrap();
    let id = stored.id.expect("store assigns an id");

    let reloaded = store.get_order(id).await.unwrap().unwrap();
    assert_eq!(reloaded.customer_id, CustomerId::new(4));
    assert_eq!(reloaded.status, OrderStatus::Confirmed);
    assert_eq!(reloaded.items.len(), 2);
    assert_eq!(reloaded.items[0].product_id, ProductId::new(3));
    assert_eq!(reloaded.items[0].quantity, 2);
    assert!(reloaded.items.iter().all(|item| item.order_id == Some(id)));
    assert_eq!(reloaded.created_on, stored.created_on);

    store.close().await;
}

#[tokio::test]
#[serial]
async fn get_order_returns_none_for_missing_id() {
    let store = fresh_store().await;

    let result = store.get_order(OrderId::new(12345)).await.unwrap();
    assert!(result.is_none());

    store.close().await;
}

#[tokio::test]
#[serial]
async fn update_order_writes_scalars_but_never_items() {
    let store = fresh_store().await;

    let stored = store.insert_order(order_with_items()).await.unwrap();
    let id = stored.id.unwrap();

    let mut changed = stored.clone();
    changed.status = OrderStatus::InProgress;
    changed.customer_id = CustomerId::new(9);
    changed.items = Vec::new();
    store.update_order(&changed).await.unwrap();

    let reloaded = store.get_order(id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, OrderStatus::InProgress);
    assert_eq!(reloaded.customer_id, CustomerId::new(9));
    assert_eq!(reloaded.items.len(), 2);

    store.close().await;
}

#[tokio::test]
#[serial]
async fn update_order_requires_an_id() {
    let store = fresh_store().await;

    let order = Order::deserialize(&json!({"customer_id": 4})).unwrap();
    let result = store.update_order(&order).await;
    assert!(matches!(result, Err(StoreError::MissingId)));

    store.close().await;
}

#[tokio::test]
#[serial]
async fn delete_order_cascades_to_items() {
    let store = fresh_store().await;

    let stored = store.insert_order(order_with_items()).await.unwrap();
    let id = stored.id.unwrap();
    let item_ids: Vec<_> = stored.items.iter().filter_map(|item| item.id).collect();
    assert_eq!(item_ids.len(), 2);

    store.delete_order(id).await.unwrap();

    assert!(store.get_order(id).await.unwrap().is_none());
    for item_id in item_ids {
        assert!(store.get_item(item_id).await.unwrap().is_none());
    }

    // Deleting again is a no-op.
    store.delete_order(id).await.unwrap();

    store.close().await;
}

#[tokio::test]
#[serial]
async fn query_orders_filters_by_each_predicate() {
    let store = fresh_store().await;

    let first = store
        .insert_order(Order::deserialize(&json!({"customer_id": 1, "status": "SHIPPED"})).unwrap())
        .await
        .unwrap();
    let second = store
        .insert_order(Order::deserialize(&json!({"customer_id": 2})).unwrap())
        .await
        .unwrap();

    let mut item = OrderItem::deserialize(&json!({"product_id": 12, "quantity": 1, "price": 5.0}))
        .unwrap();
    item.order_id = second.id;
    store.insert_item(item).await.unwrap();

    let by_customer = store
        .query_orders(OrderQuery::new().customer_id(CustomerId::new(1)))
        .await
        .unwrap();
    assert_eq!(by_customer.len(), 1);
    assert_eq!(by_customer[0].id, first.id);

    let by_status = store
        .query_orders(OrderQuery::new().status(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].id, second.id);

    let by_product = store
        .query_orders(OrderQuery::new().product_id(ProductId::new(12)))
        .await
        .unwrap();
    assert_eq!(by_product.len(), 1);
    assert_eq!(by_product[0].id, second.id);
    assert_eq!(by_product[0].items.len(), 1);

    let all = store.query_orders(OrderQuery::new()).await.unwrap();
    assert_eq!(all.len(), 2);

    store.close().await;
}

#[tokio::test]
#[serial]
async fn item_round_trip_and_scoped_listing() {
    let store = fresh_store().await;

    let first = store
        .insert_order(Order::deserialize(&json!({"customer_id": 1})).unwrap())
        .await
        .unwrap();
    let second = store
        .insert_order(Order::deserialize(&json!({"customer_id": 2})).unwrap())
        .await
        .unwrap();

    let mut item = OrderItem::deserialize(&json!({"product_id": 3, "quantity": 2, "price": 100.0}))
        .unwrap();
    item.order_id = first.id;
    let stored = store.insert_item(item).await.unwrap();
    let item_id = stored.id.expect("store assigns an id");

    let reloaded = store.get_item(item_id).await.unwrap().unwrap();
    assert_eq!(reloaded.product_id, ProductId::new(3));
    assert_eq!(reloaded.quantity, 2);
    assert_eq!(reloaded.price, 100.0);
    assert_eq!(reloaded.order_id, first.id);

    assert_eq!(store.items_for_order(first.id.unwrap()).await.unwrap().len(), 1);
    assert!(
        store
            .items_for_order(second.id.unwrap())
            .await
            .unwrap()
            .is_empty()
    );

    store.close().await;
}

#[tokio::test]
#[serial]
async fn update_item_preserves_created_on() {
    let store = fresh_store().await;

    let order = store
        .insert_order(Order::deserialize(&json!({"customer_id": 1})).unwrap())
        .await
        .unwrap();

    let mut item = OrderItem::deserialize(&json!({"product_id": 3, "quantity": 2, "price": 100.0}))
        .unwrap();
    item.order_id = order.id;
    let stored = store.insert_item(item).await.unwrap();

    let mut changed = stored.clone();
    changed.quantity = 5;
    changed.price = 42.0;
    store.update_item(&changed).await.unwrap();

    let reloaded = store.get_item(stored.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(reloaded.quantity, 5);
    assert_eq!(reloaded.price, 42.0);
    assert_eq!(reloaded.created_on, stored.created_on);

    store.close().await;
}

#[tokio::test]
#[serial]
async fn delete_item_is_idempotent() {
    let store = fresh_store().await;

    let order = store
        .insert_order(Order::deserialize(&json!({"customer_id": 1})).unwrap())
        .await
        .unwrap();

    let mut item = OrderItem::deserialize(&json!({"product_id": 3, "quantity": 1, "price": 1.0}))
        .unwrap();
    item.order_id = order.id;
    let stored = store.insert_item(item).await.unwrap();
    let item_id = stored.id.unwrap();

    store.delete_item(item_id).await.unwrap();
    assert!(store.get_item(item_id).await.unwrap().is_none());
    store.delete_item(item_id).await.unwrap();

    store.close().await;
}
