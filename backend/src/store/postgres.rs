//! PostgreSQL farm store

use axum::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{
    CropSpecification, FarmStatus, FarmSummary, IoTReading, Owner, SensorSample, VerticalFarm,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::FarmStore;
use crate::error::{AppError, AppResult};

/// Farm store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgFarmStore {
    db: PgPool,
}

/// Database row for a farm without its child records
#[derive(Debug, Clone, sqlx::FromRow)]
struct FarmRow {
    pub id: Uuid,
    pub width: f64,
    pub height: f64,
    pub total_area: f64,
    pub crop_type: String,
    pub planting_date: DateTime<Utc>,
    pub estimated_harvest_time: DateTime<Utc>,
    pub status: String,
    pub current_health: i32,
    pub last_updated: DateTime<Utc>,
    pub version: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OwnerRow {
    pub id: Uuid,
    pub address: String,
    pub share_size: Decimal,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReadingRow {
    pub recorded_at: DateTime<Utc>,
    pub soil_ph: f64,
    pub humidity: f64,
    pub nutrient_level: f64,
    pub temperature: f64,
    pub crop_health: i32,
    pub expected_yield: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct CropSpecRow {
    pub name: String,
    pub optimal_ph: f64,
    pub optimal_humidity: f64,
    pub optimal_temp: f64,
    pub nutrient_needs: f64,
    pub expected_yield_per_m2: f64,
    pub growth_period_days: i64,
}

const FARM_COLUMNS: &str = "id, width, height, total_area, crop_type, planting_date, \
     estimated_harvest_time, status, current_health, last_updated, version";

const READING_COLUMNS: &str =
    "recorded_at, soil_ph, humidity, nutrient_level, temperature, crop_health, expected_yield";

fn parse_status(raw: &str) -> AppResult<FarmStatus> {
    FarmStatus::from_str(raw)
        .ok_or_else(|| AppError::Internal(format!("Unknown farm status in database: {}", raw)))
}

impl FarmRow {
    fn into_farm(self, owners: Vec<Owner>, iot_data: Vec<IoTReading>) -> AppResult<VerticalFarm> {
        Ok(VerticalFarm {
            id: self.id,
            width: self.width,
            height: self.height,
            total_area: self.total_area,
            crop_type: self.crop_type,
            planting_date: self.planting_date,
            estimated_harvest_time: self.estimated_harvest_time,
            owners,
            iot_data,
            status: parse_status(&self.status)?,
            current_health: self.current_health,
            last_updated: self.last_updated,
            version: self.version,
        })
    }

    fn into_summary(self) -> AppResult<FarmSummary> {
        Ok(FarmSummary {
            id: self.id,
            width: self.width,
            height: self.height,
            total_area: self.total_area,
            crop_type: self.crop_type,
            planting_date: self.planting_date,
            estimated_harvest_time: self.estimated_harvest_time,
            status: parse_status(&self.status)?,
            current_health: self.current_health,
            last_updated: self.last_updated,
        })
    }
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Self {
            id: row.id,
            address: row.address,
            share_size: row.share_size,
            joined_at: row.joined_at,
        }
    }
}

impl From<ReadingRow> for IoTReading {
    fn from(row: ReadingRow) -> Self {
        Self {
            sample: SensorSample {
                timestamp: row.recorded_at,
                soil_ph: row.soil_ph,
                humidity: row.humidity,
                nutrient_level: row.nutrient_level,
                temperature: row.temperature,
            },
            crop_health: row.crop_health,
            expected_yield: row.expected_yield,
        }
    }
}

impl From<CropSpecRow> for CropSpecification {
    fn from(row: CropSpecRow) -> Self {
        Self {
            name: row.name,
            optimal_ph: row.optimal_ph,
            optimal_humidity: row.optimal_humidity,
            optimal_temp: row.optimal_temp,
            nutrient_needs: row.nutrient_needs,
            expected_yield_per_m2: row.expected_yield_per_m2,
            growth_period_days: row.growth_period_days,
        }
    }
}

impl PgFarmStore {
    /// Create a new PgFarmStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn farm_exists(&self, id: Uuid) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vertical_farms WHERE id = $1")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl FarmStore for PgFarmStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn create_farm(&self, farm: &VerticalFarm) -> AppResult<Uuid> {
        let mut tx = self.db.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO vertical_farms (id, width, height, total_area, crop_type, planting_date,
                                        estimated_harvest_time, status, current_health,
                                        last_updated, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(farm.id)
        .bind(farm.width)
        .bind(farm.height)
        .bind(farm.total_area)
        .bind(&farm.crop_type)
        .bind(farm.planting_date)
        .bind(farm.estimated_harvest_time)
        .bind(farm.status.as_str())
        .bind(farm.current_health)
        .bind(farm.last_updated)
        .bind(farm.version)
        .fetch_one(&mut *tx)
        .await?;

        for owner in &farm.owners {
            sqlx::query(
                "INSERT INTO farm_owners (id, farm_id, address, share_size, joined_at) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(owner.id)
            .bind(id)
            .bind(&owner.address)
            .bind(owner.share_size)
            .bind(owner.joined_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn get_farm(&self, id: Uuid) -> AppResult<Option<VerticalFarm>> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            "SELECT {} FROM vertical_farms WHERE id = $1",
            FARM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let owners = sqlx::query_as::<_, OwnerRow>(
            "SELECT id, address, share_size, joined_at FROM farm_owners WHERE farm_id = $1 ORDER BY seq ASC",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        let readings = sqlx::query_as::<_, ReadingRow>(&format!(
            "SELECT {} FROM iot_readings WHERE farm_id = $1 ORDER BY seq ASC",
            READING_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        row.into_farm(
            owners.into_iter().map(Owner::from).collect(),
            readings.into_iter().map(IoTReading::from).collect(),
        )
        .map(Some)
    }

    async fn list_farms(&self, limit: u32, offset: u64) -> AppResult<(Vec<FarmSummary>, u64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vertical_farms")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, FarmRow>(&format!(
            "SELECT {} FROM vertical_farms ORDER BY planting_date DESC, id ASC LIMIT $1 OFFSET $2",
            FARM_COLUMNS
        ))
        .bind(i64::from(limit))
        .bind(offset as i64)
        .fetch_all(&self.db)
        .await?;

        let farms = rows
            .into_iter()
            .map(FarmRow::into_summary)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((farms, total as u64))
    }

    async fn update_farm(&self, farm: &VerticalFarm) -> AppResult<VerticalFarm> {
        let mut tx = self.db.begin().await?;

        // Conditional on the version the caller loaded
        let result = sqlx::query(
            r#"
            UPDATE vertical_farms
            SET status = $1, current_health = $2, last_updated = $3, version = version + 1
            WHERE id = $4 AND version = $5
            "#,
        )
        .bind(farm.status.as_str())
        .bind(farm.current_health)
        .bind(farm.last_updated)
        .bind(farm.id)
        .bind(farm.version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            if self.farm_exists(farm.id).await? {
                return Err(AppError::Conflict {
                    resource: "farm".to_string(),
                    message: format!(
                        "Farm {} was modified concurrently (expected version {})",
                        farm.id, farm.version
                    ),
                });
            }
            return Err(AppError::NotFound("Farm".to_string()));
        }

        // Owners are append-only; existing rows are left as they are
        for owner in &farm.owners {
            sqlx::query(
                r#"
                INSERT INTO farm_owners (id, farm_id, address, share_size, joined_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(owner.id)
            .bind(farm.id)
            .bind(&owner.address)
            .bind(owner.share_size)
            .bind(owner.joined_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_farm(farm.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }

    async fn append_reading(
        &self,
        farm_id: Uuid,
        reading: &IoTReading,
    ) -> AppResult<VerticalFarm> {
        let mut tx = self.db.begin().await?;

        // Row lock serializes concurrent appends to the same farm
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM vertical_farms WHERE id = $1 FOR UPDATE",
        )
        .bind(farm_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        let status = parse_status(&status)?;
        if !status.accepts_readings() {
            return Err(shared::DomainError::FarmNotActive(status).into());
        }

        sqlx::query(
            r#"
            INSERT INTO iot_readings (farm_id, recorded_at, soil_ph, humidity, nutrient_level,
                                      temperature, crop_health, expected_yield)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(farm_id)
        .bind(reading.sample.timestamp)
        .bind(reading.sample.soil_ph)
        .bind(reading.sample.humidity)
        .bind(reading.sample.nutrient_level)
        .bind(reading.sample.temperature)
        .bind(reading.crop_health)
        .bind(reading.expected_yield)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE vertical_farms
            SET current_health = $1, last_updated = $2, version = version + 1
            WHERE id = $3
            "#,
        )
        .bind(reading.crop_health)
        .bind(reading.sample.timestamp)
        .bind(farm_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_farm(farm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }

    async fn list_readings(
        &self,
        farm_id: Uuid,
        limit: u32,
        offset: u64,
    ) -> AppResult<(Vec<IoTReading>, u64)> {
        if !self.farm_exists(farm_id).await? {
            return Err(AppError::NotFound("Farm".to_string()));
        }

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM iot_readings WHERE farm_id = $1")
            .bind(farm_id)
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, ReadingRow>(&format!(
            "SELECT {} FROM iot_readings WHERE farm_id = $1 ORDER BY seq DESC LIMIT $2 OFFSET $3",
            READING_COLUMNS
        ))
        .bind(farm_id)
        .bind(i64::from(limit))
        .bind(offset as i64)
        .fetch_all(&self.db)
        .await?;

        Ok((rows.into_iter().map(IoTReading::from).collect(), total as u64))
    }

    async fn get_crop_specification(&self, name: &str) -> AppResult<Option<CropSpecification>> {
        let row = sqlx::query_as::<_, CropSpecRow>(
            r#"
            SELECT name, optimal_ph, optimal_humidity, optimal_temp, nutrient_needs,
                   expected_yield_per_m2, growth_period_days
            FROM crop_specifications
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(CropSpecification::from))
    }

    async fn list_crop_specifications(&self) -> AppResult<Vec<CropSpecification>> {
        let rows = sqlx::query_as::<_, CropSpecRow>(
            r#"
            SELECT name, optimal_ph, optimal_humidity, optimal_temp, nutrient_needs,
                   expected_yield_per_m2, growth_period_days
            FROM crop_specifications
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CropSpecification::from).collect())
    }

    async fn upsert_crop_specification(&self, spec: &CropSpecification) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO crop_specifications (name, optimal_ph, optimal_humidity, optimal_temp,
                                             nutrient_needs, expected_yield_per_m2, growth_period_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO UPDATE
            SET optimal_ph = EXCLUDED.optimal_ph,
                optimal_humidity = EXCLUDED.optimal_humidity,
                optimal_temp = EXCLUDED.optimal_temp,
                nutrient_needs = EXCLUDED.nutrient_needs,
                expected_yield_per_m2 = EXCLUDED.expected_yield_per_m2,
                growth_period_days = EXCLUDED.growth_period_days,
                updated_at = NOW()
            "#,
        )
        .bind(&spec.name)
        .bind(spec.optimal_ph)
        .bind(spec.optimal_humidity)
        .bind(spec.optimal_temp)
        .bind(spec.nutrient_needs)
        .bind(spec.expected_yield_per_m2)
        .bind(spec.growth_period_days)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn remove_crop_specification(&self, name: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM crop_specifications WHERE name = $1")
            .bind(name)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
