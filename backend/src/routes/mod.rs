//! Route definitions for the Vertical Farm Platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/farms", farm_routes())
        .nest("/crops", crop_routes())
}

/// Farm lifecycle routes
fn farm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_farms).post(handlers::create_farm))
        .route("/:id", get(handlers::get_farm))
        .route("/:id/owners", post(handlers::add_owner))
        .route(
            "/:id/readings",
            get(handlers::list_readings).post(handlers::add_reading),
        )
        .route("/:id/status", put(handlers::change_status))
}

/// Crop specification routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops))
        .route(
            "/:name",
            get(handlers::get_crop)
                .put(handlers::upsert_crop)
                .delete(handlers::delete_crop),
        )
}
