//! HTTP transport adapter for the orders service.
//!
//! Maps the REST surface onto the domain core, with structured logging
//! (tracing) and Prometheus metrics. All business rules live in the domain
//! crate; handlers only translate requests and errors.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use domain::{OrderService, OrderStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub service: OrderService<S>,
}

/// Creates application state over the given store.
pub fn create_state<S: OrderStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        service: OrderService::new(store),
    })
}

/// Creates the axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/", get(routes::index::get))
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{order_id}", get(routes::orders::get::<S>))
        .route("/orders/{order_id}", put(routes::orders::update::<S>))
        .route("/orders/{order_id}", delete(routes::orders::delete::<S>))
        .route("/orders/{order_id}/cancel", put(routes::orders::cancel::<S>))
        .route("/orders/{order_id}/items", post(routes::items::create::<S>))
        .route("/orders/{order_id}/items", get(routes::items::list::<S>))
        .route(
            "/orders/{order_id}/items/{item_id}",
            get(routes::items::get::<S>),
        )
        .route(
            "/orders/{order_id}/items/{item_id}",
            put(routes::items::update::<S>),
        )
        .route(
            "/orders/{order_id}/items/{item_id}",
            delete(routes::items::delete::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
