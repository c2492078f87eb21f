//! Order item endpoints, nested under their owning order.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::{ItemId, OrderId};
use domain::{OrderItem, OrderStore};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;

/// POST /orders/{order_id}/items — attach a new item to an order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let order_id = OrderId::new(order_id);
    let item = state.service.add_item(order_id, &body).await?;

    let location = item
        .id
        .map(|id| format!("/orders/{order_id}/items/{id}"))
        .unwrap_or_else(|| format!("/orders/{order_id}/items"));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    ))
}

/// GET /orders/{order_id}/items — list the items owned by an order.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<i64>,
) -> Result<Json<Vec<OrderItem>>, ApiError> {
    let items = state.service.items(OrderId::new(order_id)).await?;
    Ok(Json(items))
}

/// GET /orders/{order_id}/items/{item_id} — load an item through its order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((order_id, item_id)): Path<(i64, i64)>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = state
        .service
        .get_item(OrderId::new(order_id), ItemId::new(item_id))
        .await?;
    Ok(Json(item))
}

/// PUT /orders/{order_id}/items/{item_id} — update an item; client-supplied
/// `id`/`order_id` in the payload are ignored.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((order_id, item_id)): Path<(i64, i64)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OrderItem>, ApiError> {
    let Json(body) = payload?;
    let item = state
        .service
        .update_item(OrderId::new(order_id), ItemId::new(item_id), &body)
        .await?;
    Ok(Json(item))
}

/// DELETE /orders/{order_id}/items/{item_id} — remove an item; idempotent
/// over the item.
#[tracing::instrument(skip(state))]
pub async fn delete<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((order_id, item_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_item(OrderId::new(order_id), ItemId::new(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
