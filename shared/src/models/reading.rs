//! IoT sensor reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::HealthScore;

/// Raw sample as reported by a farm's sensors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorSample {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub soil_ph: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    pub nutrient_level: f64,
    /// Degrees Celsius
    pub temperature: f64,
}

/// A sensor sample enriched with the derived health and yield
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IoTReading {
    #[serde(flatten)]
    pub sample: SensorSample,
    /// Crop health on a 0-100 scale
    pub crop_health: i32,
    /// Projected yield in kg
    pub expected_yield: f64,
}

impl IoTReading {
    pub fn new(sample: SensorSample, score: HealthScore) -> Self {
        Self {
            sample,
            crop_health: score.health,
            expected_yield: score.expected_yield,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.sample.timestamp
    }
}
