//! Crop specification HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::crop::{CropCatalog, UpsertCropInput};
use crate::AppState;

/// List all crop specifications
pub async fn list_crops(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = CropCatalog::new(state.store.clone());

    match catalog.list().await {
        Ok(crops) => (StatusCode::OK, Json(serde_json::json!({ "crops": crops }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a crop specification
pub async fn get_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let catalog = CropCatalog::new(state.store.clone());

    match catalog.get(&name).await {
        Ok(spec) => (StatusCode::OK, Json(spec)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create or replace a crop specification
pub async fn upsert_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<UpsertCropInput>,
) -> impl IntoResponse {
    let catalog = CropCatalog::new(state.store.clone());

    match catalog.upsert(&name, input).await {
        Ok(spec) => (StatusCode::OK, Json(spec)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a crop specification
pub async fn delete_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let catalog = CropCatalog::new(state.store.clone());

    match catalog.remove(&name).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
