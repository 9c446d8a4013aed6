//! WebAssembly module for the Vertical Farm Platform
//!
//! Provides client-side computation for:
//! - Crop health scoring of sensor samples
//! - Expected yield projections
//! - Ownership share checks
//! - Offline input validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{available_share, calculate_expected_yield, score, HealthScore};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

fn parse_crop(crop_json: &str) -> Result<CropSpecification, String> {
    let crop: CropSpecification =
        serde_json::from_str(crop_json).map_err(|e| format!("Invalid crop JSON: {}", e))?;
    crop.validate().map_err(|e| e.to_string())?;
    Ok(crop)
}

fn parse_sample(sample_json: &str) -> Result<SensorSample, String> {
    let sample: SensorSample =
        serde_json::from_str(sample_json).map_err(|e| format!("Invalid sample JSON: {}", e))?;
    validate_sensor_sample(&sample)?;
    Ok(sample)
}

fn parse_owners(owners_json: &str) -> Result<Vec<Owner>, String> {
    serde_json::from_str(owners_json).map_err(|e| format!("Invalid owners JSON: {}", e))
}

fn score_sample(sample_json: &str, crop_json: &str, total_area: f64) -> Result<HealthScore, String> {
    validate_dimensions(total_area, 1.0)?;
    Ok(score(&parse_sample(sample_json)?, &parse_crop(crop_json)?, total_area))
}

fn share_fits(owners_json: &str, share_size: f64) -> Result<bool, String> {
    let share = Decimal::try_from(share_size).map_err(|e| e.to_string())?;
    validate_share_size(share)?;
    Ok(share <= available_share(&parse_owners(owners_json)?))
}

/// Score a sensor sample against a crop, returning `{health, expected_yield}` as JSON
#[wasm_bindgen]
pub fn score_reading(sample_json: &str, crop_json: &str, total_area: f64) -> Result<String, JsValue> {
    let scored = score_sample(sample_json, crop_json, total_area).map_err(to_js)?;
    serde_json::to_string(&scored).map_err(|e| to_js(e.to_string()))
}

/// Crop health (0-100) of a sensor sample
#[wasm_bindgen]
pub fn calculate_crop_health(sample_json: &str, crop_json: &str) -> Result<i32, JsValue> {
    score_sample(sample_json, crop_json, 1.0)
        .map(|scored| scored.health)
        .map_err(to_js)
}

/// Projected yield in kg for a farm area at the given health
#[wasm_bindgen]
pub fn calculate_crop_yield(total_area: f64, health: i32, crop_json: &str) -> Result<f64, JsValue> {
    let crop = parse_crop(crop_json).map_err(to_js)?;
    Ok(calculate_expected_yield(total_area, health, &crop))
}

/// Percentage still available to new owners
#[wasm_bindgen]
pub fn remaining_share(owners_json: &str) -> Result<f64, JsValue> {
    let owners = parse_owners(owners_json).map_err(to_js)?;
    Ok(available_share(&owners).to_string().parse().unwrap_or(0.0))
}

/// Check whether a new owner's share would keep the farm at or below 100%
#[wasm_bindgen]
pub fn can_add_share(owners_json: &str, share_size: f64) -> bool {
    share_fits(owners_json, share_size).unwrap_or(false)
}

/// Validate farm dimensions
#[wasm_bindgen]
pub fn are_valid_dimensions(width: f64, height: f64) -> bool {
    validate_dimensions(width, height).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTUCE: &str = r#"{
        "name": "lettuce",
        "optimal_ph": 6.5,
        "optimal_humidity": 65.0,
        "optimal_temp": 23.0,
        "nutrient_needs": 0.8,
        "expected_yield_per_m2": 4.5,
        "growth_period_days": 45
    }"#;

    const OPTIMAL: &str =
        r#"{"soil_ph": 6.5, "humidity": 65.0, "nutrient_level": 0.8, "temperature": 23.0}"#;

    #[test]
    fn test_score_optimal_sample() {
        let scored = score_sample(OPTIMAL, LETTUCE, 50.0).unwrap();
        assert_eq!(scored.health, 100);
        assert!((scored.expected_yield - 225.0).abs() < 0.001);
    }

    #[test]
    fn test_rejects_out_of_range_sample() {
        let sample = r#"{"soil_ph": 15.0, "humidity": 65.0, "nutrient_level": 0.8, "temperature": 23.0}"#;
        assert!(score_sample(sample, LETTUCE, 50.0).is_err());
    }

    #[test]
    fn test_rejects_unscoreable_crop() {
        let crop = LETTUCE.replace("0.8", "0.0");
        assert!(score_sample(OPTIMAL, &crop, 50.0).is_err());
    }

    #[test]
    fn test_share_fits() {
        let owners = r#"[{
            "id": "00000000-0000-0000-0000-000000000001",
            "address": "0xabc",
            "share_size": "60",
            "joined_at": "2024-06-01T00:00:00Z"
        }]"#;
        assert!(share_fits(owners, 40.0).unwrap());
        assert!(!share_fits(owners, 50.0).unwrap());
        assert!(share_fits("[]", 100.0).unwrap());
        assert!(share_fits("[]", 0.0).is_err());
    }

    #[test]
    fn test_valid_dimensions() {
        assert!(are_valid_dimensions(5.0, 3.0));
        assert!(!are_valid_dimensions(0.0, 3.0));
        assert!(!are_valid_dimensions(5.0, f64::NAN));
    }
}
