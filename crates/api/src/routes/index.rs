//! Root URL endpoint.

use axum::Json;
use serde_json::{Value, json};

/// GET / — basic information about the service and where to find it.
pub async fn get() -> Json<Value> {
    Json(json!({
        "name": "Orders REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": {
            "orders": "/orders",
        },
    }))
}
