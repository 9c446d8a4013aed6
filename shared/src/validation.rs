//! Validation utilities for the Vertical Farm Platform
//!
//! Plain checks returning a static reason; the domain types wrap them into
//! [`DomainError`](crate::DomainError) variants.

use rust_decimal::Decimal;

use crate::models::{CropSpecification, SensorSample};
use crate::ownership::FULL_OWNERSHIP;

/// Soil pH scale bounds
pub const MIN_SOIL_PH: f64 = 0.0;
pub const MAX_SOIL_PH: f64 = 14.0;

pub const MAX_OWNER_ADDRESS_LEN: usize = 128;

/// Smallest nutrient need a crop may declare
pub const MIN_NUTRIENT_NEEDS: f64 = f64::EPSILON;

// ============================================================================
// Farm Validations
// ============================================================================

/// Validate farm dimensions (both strictly positive, area finite)
pub fn validate_dimensions(width: f64, height: f64) -> Result<(), &'static str> {
    if !width.is_finite() || !height.is_finite() {
        return Err("Dimensions must be finite numbers");
    }
    if width <= 0.0 || height <= 0.0 {
        return Err("Width and height must be greater than zero");
    }
    if !(width * height).is_finite() {
        return Err("Farm area is too large");
    }
    Ok(())
}

/// Validate a single owner's share (0 < share <= 100)
pub fn validate_share_size(share_size: Decimal) -> Result<(), &'static str> {
    if share_size <= Decimal::ZERO {
        return Err("Share size must be greater than zero");
    }
    if share_size > FULL_OWNERSHIP {
        return Err("Share size cannot exceed 100%");
    }
    Ok(())
}

/// Validate an owner address or account reference
pub fn validate_owner_address(address: &str) -> Result<(), &'static str> {
    let address = address.trim();
    if address.is_empty() {
        return Err("Owner address cannot be empty");
    }
    if address.len() > MAX_OWNER_ADDRESS_LEN {
        return Err("Owner address is too long");
    }
    Ok(())
}

// ============================================================================
// Sensor Validations
// ============================================================================

/// Validate a raw sensor sample before scoring
pub fn validate_sensor_sample(sample: &SensorSample) -> Result<(), &'static str> {
    if !sample.soil_ph.is_finite()
        || !sample.humidity.is_finite()
        || !sample.nutrient_level.is_finite()
        || !sample.temperature.is_finite()
    {
        return Err("Sensor values must be finite numbers");
    }
    if sample.soil_ph < MIN_SOIL_PH || sample.soil_ph > MAX_SOIL_PH {
        return Err("Soil pH must be between 0 and 14");
    }
    if sample.humidity < 0.0 || sample.humidity > 100.0 {
        return Err("Humidity must be between 0 and 100%");
    }
    if sample.nutrient_level < 0.0 {
        return Err("Nutrient level cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Crop Specification Validations
// ============================================================================

/// Validate a crop specification so scoring stays finite
pub fn validate_crop_specification(spec: &CropSpecification) -> Result<(), &'static str> {
    if spec.name.trim().is_empty() {
        return Err("Crop name cannot be empty");
    }
    if !spec.optimal_ph.is_finite()
        || !spec.optimal_humidity.is_finite()
        || !spec.optimal_temp.is_finite()
    {
        return Err("Optimal conditions must be finite numbers");
    }
    if !spec.nutrient_needs.is_finite() || spec.nutrient_needs < MIN_NUTRIENT_NEEDS {
        return Err("Nutrient needs must be greater than zero");
    }
    if !spec.expected_yield_per_m2.is_finite() || spec.expected_yield_per_m2 < 0.0 {
        return Err("Expected yield per square meter cannot be negative");
    }
    if spec.growth_period_days <= 0 {
        return Err("Growth period must be at least one day");
    }
    Ok(())
}
