//! Crop health and yield calculator
//!
//! Converts a raw sensor sample into a bounded health score by comparing it
//! against the crop's optimal growing conditions, then scales the crop's
//! expected yield by that score.
//!
//! Each factor contributes a sub-score where 100 means optimal:
//! - pH loses 10 points per unit of deviation
//! - humidity loses 1 point per percentage point of deviation
//! - temperature loses 2 points per degree of deviation
//! - nutrients score as the supplied/needed ratio, uncapped
//!
//! The four sub-scores are weighted equally and only the weighted sum is
//! clamped to 0-100, then truncated toward zero.

use serde::{Deserialize, Serialize};

use crate::models::{CropSpecification, SensorSample};

/// Weight of each of the four sub-scores
pub const SUB_SCORE_WEIGHT: f64 = 0.25;

/// Health of a failing crop, and of any sample that cannot be scored
pub const MIN_HEALTH: i32 = 0;
/// Health of a crop growing under optimal conditions
pub const MAX_HEALTH: i32 = 100;

/// Per-factor sub-scores of a single sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthBreakdown {
    pub ph: f64,
    pub humidity: f64,
    pub temperature: f64,
    pub nutrient: f64,
}

impl HealthBreakdown {
    pub fn compute(sample: &SensorSample, spec: &CropSpecification) -> Self {
        Self {
            ph: 100.0 - (sample.soil_ph - spec.optimal_ph).abs() * 10.0,
            humidity: 100.0 - (sample.humidity - spec.optimal_humidity).abs(),
            temperature: 100.0 - (sample.temperature - spec.optimal_temp).abs() * 2.0,
            nutrient: (sample.nutrient_level / spec.nutrient_needs) * 100.0,
        }
    }

    /// Unclamped weighted sum
    pub fn weighted(&self) -> f64 {
        self.ph * SUB_SCORE_WEIGHT
            + self.humidity * SUB_SCORE_WEIGHT
            + self.temperature * SUB_SCORE_WEIGHT
            + self.nutrient * SUB_SCORE_WEIGHT
    }

    /// Weighted sum clamped to 0-100 and truncated; non-finite sums score 0
    pub fn health(&self) -> i32 {
        let weighted = self.weighted();
        if !weighted.is_finite() {
            return MIN_HEALTH;
        }
        weighted.clamp(MIN_HEALTH as f64, MAX_HEALTH as f64) as i32
    }
}

/// Derived values stored on a reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthScore {
    pub health: i32,
    pub expected_yield: f64,
}

/// Health score (0-100) of a sample for the given crop
pub fn calculate_health_score(sample: &SensorSample, spec: &CropSpecification) -> i32 {
    HealthBreakdown::compute(sample, spec).health()
}

/// Projected yield in kg for a farm area at the given health
pub fn calculate_expected_yield(total_area: f64, health: i32, spec: &CropSpecification) -> f64 {
    let base_yield = total_area * spec.expected_yield_per_m2;
    let health_factor = health as f64 / 100.0;
    (base_yield * health_factor).max(0.0)
}

/// Score a sample for a farm of `total_area` square meters
pub fn score(sample: &SensorSample, spec: &CropSpecification, total_area: f64) -> HealthScore {
    let health = calculate_health_score(sample, spec);
    HealthScore {
        health,
        expected_yield: calculate_expected_yield(total_area, health, spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(soil_ph: f64, humidity: f64, temperature: f64, nutrient_level: f64) -> SensorSample {
        SensorSample {
            timestamp: Utc::now(),
            soil_ph,
            humidity,
            nutrient_level,
            temperature,
        }
    }

    #[test]
    fn test_optimal_sample_scores_full_health() {
        let spec = CropSpecification::lettuce();
        let result = score(&sample(6.5, 65.0, 23.0, 0.8), &spec, 50.0);

        assert_eq!(result.health, 100);
        assert!((result.expected_yield - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_ph_deviation_truncates() {
        let spec = CropSpecification::lettuce();
        let breakdown = HealthBreakdown::compute(&sample(7.5, 65.0, 23.0, 0.8), &spec);

        assert!((breakdown.ph - 90.0).abs() < 1e-9);
        assert!((breakdown.weighted() - 97.5).abs() < 1e-9);
        assert_eq!(breakdown.health(), 97);
    }

    #[test]
    fn test_humidity_and_temperature_penalties() {
        let spec = CropSpecification::lettuce();
        // humidity off by 10 -> 90, temperature off by 5 -> 90
        let breakdown = HealthBreakdown::compute(&sample(6.5, 55.0, 28.0, 0.8), &spec);

        assert!((breakdown.humidity - 90.0).abs() < 1e-9);
        assert!((breakdown.temperature - 90.0).abs() < 1e-9);
        assert_eq!(breakdown.health(), 95);
    }

    #[test]
    fn test_nutrient_surplus_is_not_clamped_before_averaging() {
        let spec = CropSpecification::lettuce();
        // pH off by 4 -> 60; nutrient double -> 200; (60 + 100 + 100 + 200) / 4 = 115
        let breakdown = HealthBreakdown::compute(&sample(10.5, 65.0, 23.0, 1.6), &spec);

        assert!((breakdown.nutrient - 200.0).abs() < 1e-9);
        assert!((breakdown.weighted() - 115.0).abs() < 1e-9);
        assert_eq!(breakdown.health(), 100);
    }

    #[test]
    fn test_hostile_conditions_clamp_to_zero() {
        let spec = CropSpecification::lettuce();
        // (35 + 35 - 154 + 0) / 4 < 0
        let result = score(&sample(0.0, 0.0, 150.0, 0.0), &spec, 50.0);

        assert_eq!(result.health, 0);
        assert_eq!(result.expected_yield, 0.0);
    }

    #[test]
    fn test_unvalidated_zero_nutrient_need_never_yields_nan() {
        let spec = CropSpecification {
            nutrient_needs: 0.0,
            ..CropSpecification::lettuce()
        };
        let result = score(&sample(6.5, 65.0, 23.0, 0.0), &spec, 10.0);

        assert_eq!(result.health, 0);
        assert!(result.expected_yield.is_finite());
    }

    #[test]
    fn test_infinite_nutrient_sub_score_scores_zero() {
        for nutrient_needs in [0.0, 1e-310] {
            let spec = CropSpecification {
                nutrient_needs,
                ..CropSpecification::lettuce()
            };
            let result = score(&sample(6.5, 65.0, 23.0, 0.5), &spec, 10.0);

            assert_eq!(result.health, 0);
            assert_eq!(result.expected_yield, 0.0);
        }
    }

    #[test]
    fn test_yield_scales_with_health() {
        let spec = CropSpecification::lettuce();
        let half = calculate_expected_yield(10.0, 50, &spec);
        assert!((half - 22.5).abs() < 1e-9);
        assert_eq!(calculate_expected_yield(10.0, 0, &spec), 0.0);
    }
}
