use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{cors::cors_layer, handlers, middleware::metrics_middleware, upload};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let server = &state.config().server;
    let base_path = server.base_path.clone();
    let body_limit = server.max_upload_bytes;
    let cors = cors_layer(&state.config().cors)?;

    let api_routes = Router::new()
        // Conversion
        .route("/upload", post(upload::upload_files))
        // Operational
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state);

    Ok(Router::new()
        .nest(&base_path, api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http()))
}
