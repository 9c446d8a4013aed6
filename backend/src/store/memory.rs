//! In-memory farm store
//!
//! All state sits behind a single async mutex, so each call is atomic with
//! respect to every other call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::async_trait;
use shared::{CropSpecification, FarmSummary, IoTReading, VerticalFarm};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::FarmStore;
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct MemoryState {
    farms: HashMap<Uuid, VerticalFarm>,
    crops: HashMap<String, CropSpecification>,
}

#[derive(Default)]
pub struct InMemoryFarmStore {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

impl InMemoryFarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the given crop specifications
    pub fn with_crops(crops: impl IntoIterator<Item = CropSpecification>) -> Self {
        let mut state = MemoryState::default();
        for spec in crops {
            state.crops.insert(spec.name.clone(), spec);
        }
        Self {
            state: Mutex::new(state),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail with a persistence error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("in-memory store rejected write".to_string()));
        }
        Ok(())
    }
}

fn farm_not_found() -> AppError {
    AppError::NotFound("Farm".to_string())
}

#[async_trait]
impl FarmStore for InMemoryFarmStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_farm(&self, farm: &VerticalFarm) -> AppResult<Uuid> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        if state.farms.contains_key(&farm.id) {
            return Err(AppError::Conflict {
                resource: "farm".to_string(),
                message: format!("Farm {} already exists", farm.id),
            });
        }
        state.farms.insert(farm.id, farm.clone());
        Ok(farm.id)
    }

    async fn get_farm(&self, id: Uuid) -> AppResult<Option<VerticalFarm>> {
        Ok(self.state.lock().await.farms.get(&id).cloned())
    }

    async fn list_farms(&self, limit: u32, offset: u64) -> AppResult<(Vec<FarmSummary>, u64)> {
        let state = self.state.lock().await;
        let mut farms: Vec<&VerticalFarm> = state.farms.values().collect();
        farms.sort_by(|a, b| {
            b.planting_date
                .cmp(&a.planting_date)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = farms.len() as u64;
        let page = farms
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(FarmSummary::from)
            .collect();
        Ok((page, total))
    }

    async fn update_farm(&self, farm: &VerticalFarm) -> AppResult<VerticalFarm> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let stored = state.farms.get_mut(&farm.id).ok_or_else(farm_not_found)?;
        if stored.version != farm.version {
            return Err(AppError::Conflict {
                resource: "farm".to_string(),
                message: format!(
                    "Farm {} was modified concurrently (expected version {}, found {})",
                    farm.id, farm.version, stored.version
                ),
            });
        }

        // Readings only ever change through append_reading
        stored.owners = farm.owners.clone();
        stored.status = farm.status;
        stored.current_health = farm.current_health;
        stored.last_updated = farm.last_updated;
        stored.version += 1;
        Ok(stored.clone())
    }

    async fn append_reading(
        &self,
        farm_id: Uuid,
        reading: &IoTReading,
    ) -> AppResult<VerticalFarm> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let stored = state.farms.get_mut(&farm_id).ok_or_else(farm_not_found)?;
        stored.record_reading(reading.clone())?;
        stored.version += 1;
        Ok(stored.clone())
    }

    async fn list_readings(
        &self,
        farm_id: Uuid,
        limit: u32,
        offset: u64,
    ) -> AppResult<(Vec<IoTReading>, u64)> {
        let state = self.state.lock().await;
        let farm = state.farms.get(&farm_id).ok_or_else(farm_not_found)?;
        let total = farm.iot_data.len() as u64;
        let page = farm
            .iot_data
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn get_crop_specification(&self, name: &str) -> AppResult<Option<CropSpecification>> {
        Ok(self.state.lock().await.crops.get(name).cloned())
    }

    async fn list_crop_specifications(&self) -> AppResult<Vec<CropSpecification>> {
        let state = self.state.lock().await;
        let mut crops: Vec<CropSpecification> = state.crops.values().cloned().collect();
        crops.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(crops)
    }

    async fn upsert_crop_specification(&self, spec: &CropSpecification) -> AppResult<()> {
        self.check_writable()?;
        self.state
            .lock()
            .await
            .crops
            .insert(spec.name.clone(), spec.clone());
        Ok(())
    }

    async fn remove_crop_specification(&self, name: &str) -> AppResult<bool> {
        self.check_writable()?;
        Ok(self.state.lock().await.crops.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{HealthScore, SensorSample};

    fn farm() -> VerticalFarm {
        VerticalFarm::plant(4.0, 2.5, &CropSpecification::lettuce(), Utc::now()).unwrap()
    }

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
                expected_yield: 1.0,
            },
        )
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let store = InMemoryFarmStore::new();
        let farm = farm();
        store.create_farm(&farm).await.unwrap();

        let updated = store.update_farm(&farm).await.unwrap();
        assert_eq!(updated.version, farm.version + 1);

        // Second write still carries the old version
        let result = store.update_farm(&farm).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_append_reading_bumps_version_and_summary() {
        let store = InMemoryFarmStore::new();
        let farm = farm();
        store.create_farm(&farm).await.unwrap();

        let updated = store.append_reading(farm.id, &reading(64)).await.unwrap();

        assert_eq!(updated.iot_data.len(), 1);
        assert_eq!(updated.current_health, 64);
        assert_eq!(updated.version, farm.version + 1);
    }

    #[tokio::test]
    async fn test_list_readings_newest_first() {
        let store = InMemoryFarmStore::new();
        let farm = farm();
        store.create_farm(&farm).await.unwrap();
        for health in [10, 20, 30] {
            store.append_reading(farm.id, &reading(health)).await.unwrap();
        }

        let (page, total) = store.list_readings(farm.id, 2, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(
            page.iter().map(|r| r.crop_health).collect::<Vec<_>>(),
            vec![30, 20]
        );
    }

    #[tokio::test]
    async fn test_failed_writes_leave_state_untouched() {
        let store = InMemoryFarmStore::new();
        let farm = farm();
        store.create_farm(&farm).await.unwrap();
        store.set_fail_writes(true);

        let result = store.append_reading(farm.id, &reading(50)).await;
        assert!(matches!(result, Err(AppError::Persistence(_))));

        store.set_fail_writes(false);
        let stored = store.get_farm(farm.id).await.unwrap().unwrap();
        assert!(stored.iot_data.is_empty());
    }
}
