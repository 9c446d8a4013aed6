//! Crop specification catalog
//!
//! Specifications are validated whenever they cross the store boundary, in
//! either direction, so the health calculator only ever sees scoreable
//! parameters.

use std::sync::Arc;

use serde::Deserialize;
use shared::CropSpecification;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::FarmStore;

/// Crop catalog backed by the farm store
#[derive(Clone)]
pub struct CropCatalog {
    store: Arc<dyn FarmStore>,
}

/// Input for creating or replacing a crop specification
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertCropInput {
    pub optimal_ph: f64,
    pub optimal_humidity: f64,
    pub optimal_temp: f64,
    pub nutrient_needs: f64,
    pub expected_yield_per_m2: f64,
    #[validate(range(min = 1, max = 3650))]
    pub growth_period_days: u32,
}

impl CropCatalog {
    /// Create a new CropCatalog instance
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self { store }
    }

    /// Look up the specification for a crop type.
    ///
    /// `Ok(None)` means the crop is unknown; callers decide which error that
    /// is. A stored specification that fails validation is a configuration
    /// error.
    pub async fn lookup(&self, crop_type: &str) -> AppResult<Option<CropSpecification>> {
        let name = CropSpecification::normalize_name(crop_type);
        let Some(spec) = self.store.get_crop_specification(&name).await? else {
            tracing::debug!("No crop specification for '{}'", name);
            return Ok(None);
        };

        if let Err(e) = spec.validate() {
            tracing::error!("Stored crop specification is unusable: {}", e);
            return Err(e.into());
        }
        Ok(Some(spec))
    }

    /// Get a crop specification by name
    pub async fn get(&self, crop_type: &str) -> AppResult<CropSpecification> {
        self.lookup(crop_type)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop specification".to_string()))
    }

    /// All specifications ordered by name
    pub async fn list(&self) -> AppResult<Vec<CropSpecification>> {
        self.store.list_crop_specifications().await
    }

    /// Create or replace the specification for `crop_type`
    pub async fn upsert(
        &self,
        crop_type: &str,
        input: UpsertCropInput,
    ) -> AppResult<CropSpecification> {
        input.validate()?;

        let spec = CropSpecification {
            name: CropSpecification::normalize_name(crop_type),
            optimal_ph: input.optimal_ph,
            optimal_humidity: input.optimal_humidity,
            optimal_temp: input.optimal_temp,
            nutrient_needs: input.nutrient_needs,
            expected_yield_per_m2: input.expected_yield_per_m2,
            growth_period_days: i64::from(input.growth_period_days),
        };

        // Reject here rather than failing later at scoring time
        spec.validate().map_err(|e| AppError::Validation {
            field: "crop_specification".to_string(),
            message: e.to_string(),
        })?;

        self.store.upsert_crop_specification(&spec).await?;
        tracing::info!("Crop specification '{}' saved", spec.name);

        Ok(spec)
    }

    /// Remove a crop specification.
    ///
    /// Farms already planted with this crop keep existing but can no longer
    /// accept readings until the specification is restored.
    pub async fn remove(&self, crop_type: &str) -> AppResult<()> {
        let name = CropSpecification::normalize_name(crop_type);
        if !self.store.remove_crop_specification(&name).await? {
            return Err(AppError::NotFound("Crop specification".to_string()));
        }
        tracing::info!("Crop specification '{}' removed", name);
        Ok(())
    }
}
