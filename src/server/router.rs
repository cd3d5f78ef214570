use axum::{extract::State, http::Method, routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};

mod extract;
mod placement;

use super::state::{ServeHealth, ServeState};

/// Full HTTP surface: placement, extraction and health.
pub fn build_router(state: ServeState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(placement::router())
        .merge(extract::router())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<ServeState>) -> Json<ServeHealth> {
    Json(state.health_snapshot())
}
