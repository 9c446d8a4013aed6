//! Vertical farm HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{Pagination, SensorSample};
use uuid::Uuid;

use crate::services::farm::{AddOwnerInput, ChangeStatusInput, CreateFarmInput, FarmService};
use crate::AppState;

/// List farms, newest first
pub async fn list_farms(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.list_farms(pagination).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new farm
pub async fn create_farm(
    State(state): State<AppState>,
    Json(input): Json<CreateFarmInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.create_farm(input).await {
        Ok(farm) => (StatusCode::CREATED, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a farm with its owners and readings
pub async fn get_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.get_status(farm_id).await {
        Ok(farm) => (StatusCode::OK, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Add an owner to a farm
pub async fn add_owner(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<AddOwnerInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.add_owner(farm_id, input).await {
        Ok(farm) => (StatusCode::CREATED, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a sensor reading
pub async fn add_reading(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(sample): Json<SensorSample>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.add_reading(farm_id, sample).await {
        Ok(reading) => (StatusCode::CREATED, Json(reading)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List a farm's readings, newest first
pub async fn list_readings(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.list_readings(farm_id, pagination).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Change a farm's status
pub async fn change_status(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<ChangeStatusInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.store.clone());

    match service.change_status(farm_id, input).await {
        Ok(farm) => (StatusCode::OK, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}
