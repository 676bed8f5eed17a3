//! Axum router setup.

use crate::config::ServerConfig;
use crate::handlers::{devices, health, tasks};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route(
            "/api/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/api/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/api/devices/{id}",
            get(devices::get_device)
                .put(devices::update_device)
                .patch(devices::update_device)
                .delete(devices::delete_device),
        );

    Router::new()
        .merge(api)
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Enforced by the Json extractor so oversized bodies get a JSON 413
        .layer(DefaultBodyLimit::max(config.max_payload_size))
        .with_state(state)
}
