//! Farm lifecycle service
//!
//! Creates farms, records ownership changes, ingests sensor readings and
//! moves farms between statuses. Every call loads what it needs from the
//! store and writes back through the store's guarded primitives; nothing is
//! cached between calls.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    add_owner, score, validate_dimensions, validate_sensor_sample, DomainError, FarmStatus,
    FarmSummary, IoTReading, PaginatedResponse, Pagination, SensorSample, VerticalFarm,
};
use uuid::Uuid;
use validator::Validate;

use super::crop::CropCatalog;
use crate::error::{AppError, AppResult};
use crate::store::FarmStore;

/// Farm service for managing vertical farms
#[derive(Clone)]
pub struct FarmService {
    store: Arc<dyn FarmStore>,
    crops: CropCatalog,
}

/// Input for creating a farm
#[derive(Debug, Deserialize)]
pub struct CreateFarmInput {
    /// Meters
    pub width: f64,
    /// Meters
    pub height: f64,
    /// Any name without a stored specification is an unsupported crop
    pub crop_type: String,
}

/// Input for adding an owner
#[derive(Debug, Deserialize, Validate)]
pub struct AddOwnerInput {
    #[validate(length(min = 1, max = 128))]
    pub address: String,
    /// Percentage of ownership
    pub share_size: Decimal,
}

/// Input for changing a farm's status
#[derive(Debug, Deserialize)]
pub struct ChangeStatusInput {
    pub status: FarmStatus,
}

impl FarmService {
    /// Create a new FarmService instance
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self {
            crops: CropCatalog::new(store.clone()),
            store,
        }
    }

    /// Create a new vertical farm.
    ///
    /// Dimensions are checked before the crop so bad dimensions are always
    /// reported as such.
    pub async fn create_farm(&self, input: CreateFarmInput) -> AppResult<VerticalFarm> {
        validate_dimensions(input.width, input.height).map_err(|_| {
            DomainError::InvalidDimensions {
                width: input.width,
                height: input.height,
            }
        })?;

        let spec = self
            .crops
            .lookup(&input.crop_type)
            .await?
            .ok_or_else(|| AppError::UnsupportedCrop(input.crop_type.clone()))?;

        let mut farm = VerticalFarm::plant(input.width, input.height, &spec, Utc::now())?;
        farm.id = self.store.create_farm(&farm).await?;

        tracing::info!(
            "Farm {} created: {} m² of {}, harvest expected {}",
            farm.id,
            farm.total_area,
            farm.crop_type,
            farm.estimated_harvest_time
        );

        Ok(farm)
    }

    /// Add an owner to a farm, keeping total ownership at or below 100%
    pub async fn add_owner(&self, farm_id: Uuid, input: AddOwnerInput) -> AppResult<VerticalFarm> {
        input.validate()?;

        let mut farm = self.load_farm(farm_id).await?;
        let owner = add_owner(&mut farm, &input.address, input.share_size, Utc::now())?;

        let farm = self.store.update_farm(&farm).await?;
        tracing::info!(
            "Owner {} joined farm {} with {}% share",
            owner.id,
            farm_id,
            owner.share_size
        );

        Ok(farm)
    }

    /// Score a sensor sample against the farm's crop and append it.
    ///
    /// The crop specification is looked up again on every reading since it
    /// may have been changed or removed after the farm was created.
    pub async fn add_reading(&self, farm_id: Uuid, sample: SensorSample) -> AppResult<IoTReading> {
        validate_sensor_sample(&sample).map_err(DomainError::InvalidReading)?;

        let farm = self.load_farm(farm_id).await?;
        if !farm.status.accepts_readings() {
            return Err(DomainError::FarmNotActive(farm.status).into());
        }

        let spec = self
            .crops
            .lookup(&farm.crop_type)
            .await?
            .ok_or_else(|| AppError::CropSpecNotFound(farm.crop_type.clone()))?;

        let health = score(&sample, &spec, farm.total_area);
        let reading = IoTReading::new(sample, health);
        let farm = self.store.append_reading(farm_id, &reading).await?;

        tracing::debug!(
            "Farm {} reading recorded: health {}, expected yield {:.2} kg ({} readings)",
            farm_id,
            reading.crop_health,
            reading.expected_yield,
            farm.iot_data.len()
        );

        Ok(reading)
    }

    /// Current state of a farm
    pub async fn get_status(&self, farm_id: Uuid) -> AppResult<VerticalFarm> {
        self.load_farm(farm_id).await
    }

    /// Page through all farms
    pub async fn list_farms(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<FarmSummary>> {
        let (farms, total) = self
            .store
            .list_farms(pagination.limit(), pagination.offset())
            .await?;
        Ok(PaginatedResponse::new(farms, &pagination, total))
    }

    /// Page through a farm's readings, newest first
    pub async fn list_readings(
        &self,
        farm_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<IoTReading>> {
        let (readings, total) = self
            .store
            .list_readings(farm_id, pagination.limit(), pagination.offset())
            .await?;
        Ok(PaginatedResponse::new(readings, &pagination, total))
    }

    /// Move a farm to a new status
    pub async fn change_status(
        &self,
        farm_id: Uuid,
        input: ChangeStatusInput,
    ) -> AppResult<VerticalFarm> {
        let mut farm = self.load_farm(farm_id).await?;
        let previous = farm.status;
        farm.transition_to(input.status, Utc::now())?;

        let farm = self.store.update_farm(&farm).await?;
        tracing::info!("Farm {} status changed: {} -> {}", farm_id, previous, farm.status);

        Ok(farm)
    }

    async fn load_farm(&self, farm_id: Uuid) -> AppResult<VerticalFarm> {
        self.store
            .get_farm(farm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }
}
