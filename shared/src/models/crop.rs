//! Crop specification models

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::validation::validate_crop_specification;

/// Agronomic reference parameters for one crop type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropSpecification {
    /// Unique crop type key (e.g. "lettuce")
    pub name: String,
    pub optimal_ph: f64,
    /// Relative humidity in percent
    pub optimal_humidity: f64,
    /// Degrees Celsius
    pub optimal_temp: f64,
    /// Unitless nutrient ratio, must be positive
    pub nutrient_needs: f64,
    /// Expected yield in kg per square meter at full health
    pub expected_yield_per_m2: f64,
    pub growth_period_days: i64,
}

impl CropSpecification {
    /// Canonical form of a crop type key
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Time from planting to expected harvest
    pub fn growth_period(&self) -> Duration {
        Duration::days(self.growth_period_days)
    }

    /// Reject specifications the calculator cannot score
    pub fn validate(&self) -> DomainResult<()> {
        validate_crop_specification(self).map_err(|reason| DomainError::InvalidCropSpecification {
            name: self.name.clone(),
            reason,
        })
    }

    /// Default lettuce parameters
    pub fn lettuce() -> Self {
        Self {
            name: "lettuce".to_string(),
            optimal_ph: 6.5,
            optimal_humidity: 65.0,
            optimal_temp: 23.0,
            nutrient_needs: 0.8,
            expected_yield_per_m2: 4.5,
            growth_period_days: 45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_period() {
        assert_eq!(CropSpecification::lettuce().growth_period(), Duration::days(45));
    }

    #[test]
    fn test_zero_nutrient_needs_rejected() {
        let spec = CropSpecification {
            nutrient_needs: 0.0,
            ..CropSpecification::lettuce()
        };
        assert!(matches!(
            spec.validate(),
            Err(DomainError::InvalidCropSpecification { .. })
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(CropSpecification::normalize_name("  Lettuce "), "lettuce");
    }

    #[test]
    fn test_default_spec_is_valid() {
        assert!(CropSpecification::lettuce().validate().is_ok());
    }
}
