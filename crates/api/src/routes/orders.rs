//! Order CRUD and cancel endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::OrderId;
use domain::{ListFilter, Order, OrderStore};
use serde::Deserialize;
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;

/// Query parameters accepted by the list endpoint.
///
/// When several are supplied, `customer_id` wins over `status`, which wins
/// over `product_id`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    pub product_id: Option<i64>,
}

/// POST /orders — create a new order from the request payload.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let order = state.service.create_order(&body).await?;

    let location = order
        .id
        .map(|id| format!("/orders/{id}"))
        .unwrap_or_else(|| "/orders".to_string());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(order),
    ))
}

/// GET /orders/{id} — load a single order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, ApiError> {
    let id = OrderId::new(id);
    let order = state
        .service
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order with id '{id}' was not found.")))?;
    Ok(Json(order))
}

/// GET /orders — list orders, optionally filtered by customer, status, or
/// product.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let filter = ListFilter::resolve(
        params.customer_id,
        params.status.as_deref(),
        params.product_id,
    )?;
    let orders = state.service.list_orders(filter).await?;
    Ok(Json(orders))
}

/// PUT /orders/{id} — update an order's fields; any `items` in the payload
/// are ignored.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let Json(body) = payload?;
    let order = state.service.update_order(OrderId::new(id), &body).await?;
    Ok(Json(order))
}

/// DELETE /orders/{id} — remove an order and its items; idempotent.
#[tracing::instrument(skip(state))]
pub async fn delete<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_order(OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /orders/{id}/cancel — cancel an order.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, ApiError> {
    let order = state.service.cancel_order(OrderId::new(id)).await?;
    Ok(Json(order))
}
