//! Persistence capability for farms and crop specifications
//!
//! Services depend on [`FarmStore`] only. Two adapters exist: PostgreSQL for
//! production and an in-memory map for tests and local runs.
//!
//! Mutations are guarded against lost updates. Readings are appended with
//! [`FarmStore::append_reading`], which adds the reading and refreshes the
//! farm summary in one atomic step. Every other change goes through
//! [`FarmStore::update_farm`], which only writes when the stored version still
//! matches the version the caller loaded.

use axum::async_trait;
use shared::{CropSpecification, FarmSummary, IoTReading, VerticalFarm};
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryFarmStore;
pub use postgres::PgFarmStore;

#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Short name of the backend for health reporting
    fn backend_tag(&self) -> &'static str;

    /// Check the backend is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Insert a new farm, returning its identifier
    async fn create_farm(&self, farm: &VerticalFarm) -> AppResult<Uuid>;

    /// Load a farm with its owners and readings
    async fn get_farm(&self, id: Uuid) -> AppResult<Option<VerticalFarm>>;

    /// Page through farms, newest first, with the total count
    async fn list_farms(&self, limit: u32, offset: u64) -> AppResult<(Vec<FarmSummary>, u64)>;

    /// Persist status, health summary and any new owners of `farm`.
    ///
    /// Fails with `NotFound` when the farm is gone and `Conflict` when its
    /// stored version differs from `farm.version`. Returns the stored farm
    /// with its bumped version.
    async fn update_farm(&self, farm: &VerticalFarm) -> AppResult<VerticalFarm>;

    /// Atomically append a scored reading and set the farm's current health
    /// and last-updated time from it.
    async fn append_reading(&self, farm_id: Uuid, reading: &IoTReading)
        -> AppResult<VerticalFarm>;

    /// Page through a farm's readings, newest first, with the total count
    async fn list_readings(
        &self,
        farm_id: Uuid,
        limit: u32,
        offset: u64,
    ) -> AppResult<(Vec<IoTReading>, u64)>;

    async fn get_crop_specification(&self, name: &str) -> AppResult<Option<CropSpecification>>;

    async fn list_crop_specifications(&self) -> AppResult<Vec<CropSpecification>>;

    /// Insert or replace the specification keyed by `spec.name`
    async fn upsert_crop_specification(&self, spec: &CropSpecification) -> AppResult<()>;

    /// Returns false when no specification had that name
    async fn remove_crop_specification(&self, name: &str) -> AppResult<bool>;
}
