use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
use crate::repositories::VehicleStore;
use crate::utils::errors::StoreError;

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-index violation on the plate into a typed error.
fn map_write_error(err: sqlx::Error, license_plate: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicatePlate(license_plate.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn count(&self, status: Option<VehicleStatus>) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vehicles WHERE ($1::vehicle_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>, StoreError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, license_plate, status, created_at FROM vehicles WHERE license_plate = $1",
        )
        .bind(license_plate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, license_plate, status, created_at FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn list_all(&self) -> Result<Vec<Vehicle>, StoreError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT id, license_plate, status, created_at FROM vehicles ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, license_plate, status, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, license_plate, status, created_at
            "#,
        )
        .bind(id)
        .bind(&vehicle.license_plate)
        .bind(vehicle.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &vehicle.license_plate))
    }

    async fn update_by_id(&self, id: Uuid, changes: VehicleChanges) -> Result<Vehicle, StoreError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET license_plate = $2, status = $3
            WHERE id = $1
            RETURNING id, license_plate, status, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.license_plate)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &changes.license_plate))?;

        vehicle.ok_or(StoreError::Missing(id))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }

        Ok(())
    }
}
