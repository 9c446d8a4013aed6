//! Vertical farm models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CropSpecification, IoTReading};
use crate::error::{DomainError, DomainResult};
use crate::validation::validate_dimensions;

/// Health assigned to a farm before its first reading arrives
pub const INITIAL_HEALTH: i32 = 100;

/// A single vertical farming unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerticalFarm {
    pub id: Uuid,
    /// Meters
    pub width: f64,
    /// Meters
    pub height: f64,
    /// Square meters, always width * height
    pub total_area: f64,
    pub crop_type: String,
    pub planting_date: DateTime<Utc>,
    pub estimated_harvest_time: DateTime<Utc>,
    pub owners: Vec<Owner>,
    /// Append-only, in arrival order
    pub iot_data: Vec<IoTReading>,
    pub status: FarmStatus,
    pub current_health: i32,
    pub last_updated: DateTime<Utc>,
    /// Bumped by the store on every persisted mutation
    pub version: i64,
}

/// Farm without its owner and reading lists, for listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmSummary {
    pub id: Uuid,
    pub width: f64,
    pub height: f64,
    pub total_area: f64,
    pub crop_type: String,
    pub planting_date: DateTime<Utc>,
    pub estimated_harvest_time: DateTime<Utc>,
    pub status: FarmStatus,
    pub current_health: i32,
    pub last_updated: DateTime<Utc>,
}

impl From<&VerticalFarm> for FarmSummary {
    fn from(farm: &VerticalFarm) -> Self {
        Self {
            id: farm.id,
            width: farm.width,
            height: farm.height,
            total_area: farm.total_area,
            crop_type: farm.crop_type.clone(),
            planting_date: farm.planting_date,
            estimated_harvest_time: farm.estimated_harvest_time,
            status: farm.status,
            current_health: farm.current_health,
            last_updated: farm.last_updated,
        }
    }
}

/// A stakeholder in a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub id: Uuid,
    pub address: String,
    /// Percentage of ownership (0-100)
    pub share_size: Decimal,
    pub joined_at: DateTime<Utc>,
}

/// Operational status of a farm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FarmStatus {
    Active,
    Maintenance,
    Harvested,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::Active => "active",
            FarmStatus::Maintenance => "maintenance",
            FarmStatus::Harvested => "harvested",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(FarmStatus::Active),
            "maintenance" => Some(FarmStatus::Maintenance),
            "harvested" => Some(FarmStatus::Harvested),
            _ => None,
        }
    }

    /// Allowed moves: active <-> maintenance, either of them -> harvested.
    /// Harvested is terminal.
    pub fn can_transition_to(&self, next: FarmStatus) -> bool {
        matches!(
            (*self, next),
            (FarmStatus::Active, FarmStatus::Maintenance)
                | (FarmStatus::Maintenance, FarmStatus::Active)
                | (FarmStatus::Active, FarmStatus::Harvested)
                | (FarmStatus::Maintenance, FarmStatus::Harvested)
        )
    }

    pub fn accepts_readings(&self) -> bool {
        !matches!(self, FarmStatus::Harvested)
    }
}

impl std::fmt::Display for FarmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VerticalFarm {
    /// Plant a new farm for the given crop.
    ///
    /// Dimensions and crop type are fixed from here on. The harvest estimate
    /// is the planting time plus the crop's growth period.
    pub fn plant(
        width: f64,
        height: f64,
        spec: &CropSpecification,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        validate_dimensions(width, height)
            .map_err(|_| DomainError::InvalidDimensions { width, height })?;

        Ok(Self {
            id: Uuid::new_v4(),
            width,
            height,
            total_area: width * height,
            crop_type: spec.name.clone(),
            planting_date: now,
            estimated_harvest_time: now + spec.growth_period(),
            owners: Vec::new(),
            iot_data: Vec::new(),
            status: FarmStatus::Active,
            current_health: INITIAL_HEALTH,
            last_updated: now,
            version: 1,
        })
    }

    pub fn latest_reading(&self) -> Option<&IoTReading> {
        self.iot_data.last()
    }

    /// Append a scored reading and refresh the health summary from it
    pub fn record_reading(&mut self, reading: IoTReading) -> DomainResult<()> {
        if !self.status.accepts_readings() {
            return Err(DomainError::FarmNotActive(self.status));
        }
        self.current_health = reading.crop_health;
        self.last_updated = reading.timestamp();
        self.iot_data.push(reading);
        Ok(())
    }

    pub fn transition_to(&mut self, next: FarmStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.last_updated = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthScore;
    use crate::models::SensorSample;

    fn reading(health: i32) -> IoTReading {
        IoTReading::new(
            SensorSample {
                timestamp: Utc::now(),
                soil_ph: 6.5,
                humidity: 65.0,
                nutrient_level: 0.8,
                temperature: 23.0,
            },
            HealthScore {
                health,
                expected_yield: 0.0,
            },
        )
    }

    #[test]
    fn test_plant_sets_area_and_harvest_estimate() {
        let now = Utc::now();
        let farm = VerticalFarm::plant(10.0, 5.0, &CropSpecification::lettuce(), now).unwrap();

        assert_eq!(farm.total_area, 50.0);
        assert_eq!(farm.estimated_harvest_time, now + chrono::Duration::days(45));
        assert_eq!(farm.status, FarmStatus::Active);
        assert_eq!(farm.current_health, INITIAL_HEALTH);
        assert!(farm.owners.is_empty());
        assert!(farm.iot_data.is_empty());
    }

    #[test]
    fn test_plant_rejects_non_positive_dimensions() {
        let spec = CropSpecification::lettuce();
        for (w, h) in [(0.0, 5.0), (5.0, 0.0), (-1.0, 5.0), (5.0, -2.5)] {
            assert!(matches!(
                VerticalFarm::plant(w, h, &spec, Utc::now()),
                Err(DomainError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_record_reading_updates_summary() {
        let mut farm =
            VerticalFarm::plant(2.0, 2.0, &CropSpecification::lettuce(), Utc::now()).unwrap();
        let r = reading(72);
        let ts = r.timestamp();

        farm.record_reading(r).unwrap();

        assert_eq!(farm.current_health, 72);
        assert_eq!(farm.last_updated, ts);
        assert_eq!(farm.latest_reading().map(|r| r.crop_health), Some(72));
    }

    #[test]
    fn test_harvested_farm_rejects_readings() {
        let mut farm =
            VerticalFarm::plant(2.0, 2.0, &CropSpecification::lettuce(), Utc::now()).unwrap();
        farm.transition_to(FarmStatus::Harvested, Utc::now()).unwrap();

        assert_eq!(
            farm.record_reading(reading(50)),
            Err(DomainError::FarmNotActive(FarmStatus::Harvested))
        );
        assert!(farm.iot_data.is_empty());
    }

    #[test]
    fn test_status_transitions() {
        use FarmStatus::*;
        assert!(Active.can_transition_to(Maintenance));
        assert!(Maintenance.can_transition_to(Active));
        assert!(Active.can_transition_to(Harvested));
        assert!(Maintenance.can_transition_to(Harvested));
        assert!(!Harvested.can_transition_to(Active));
        assert!(!Harvested.can_transition_to(Maintenance));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [FarmStatus::Active, FarmStatus::Maintenance, FarmStatus::Harvested] {
            assert_eq!(FarmStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(FarmStatus::from_str("fallow"), None);
    }
}
