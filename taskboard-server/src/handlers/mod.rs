//! Request handlers.

pub mod devices;
pub mod tasks;

use axum::Json;
use serde_json::{json, Value};

/// Liveness only; does not touch the database.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}
