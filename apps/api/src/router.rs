use std::sync::Arc;

use axum::{routing::get, Router};

use directory_cell::router::directory_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .merge(scheduling_routes(state.clone()))
        .merge(directory_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/api", api)
}
