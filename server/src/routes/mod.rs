//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API consumed by canvas front ends: durable
//! image CRUD under `/api/images` and the generation proxy under
//! `/api/generate` and `/api/variations`. CORS is open; every request is
//! traced.

pub mod generate;
pub mod images;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/images",
            get(images::list_images)
                .post(images::save_image)
                .delete(images::clear_images),
        )
        .route(
            "/api/images/{id}",
            put(images::update_image)
                .get(images::get_image)
                .delete(images::delete_image),
        )
        .route("/api/generate", post(generate::generate_image))
        .route("/api/variations", post(generate::generate_variations))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
