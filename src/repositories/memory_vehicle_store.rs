//! In-process vehicle store
//!
//! Keeps vehicles in insertion order behind an async `RwLock`. Used by the
//! test suites and by `STORE_BACKEND=memory` deployments.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
use crate::repositories::VehicleStore;
use crate::utils::errors::StoreError;

#[derive(Default)]
pub struct MemoryVehicleStore {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that already holds the given vehicles, bypassing the
    /// registry rules. Meant for setting up fixtures.
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: RwLock::new(vehicles),
        }
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn count(&self, status: Option<VehicleStatus>) -> Result<i64, StoreError> {
        let vehicles = self.vehicles.read().await;
        let count = match status {
            Some(status) => vehicles.iter().filter(|v| v.status == status).count(),
            None => vehicles.len(),
        };
        Ok(count as i64)
    }

    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>, StoreError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .iter()
            .find(|v| v.license_plate == license_plate)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.vehicles.read().await.clone())
    }

    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, StoreError> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles
            .iter()
            .any(|v| v.license_plate == vehicle.license_plate)
        {
            return Err(StoreError::DuplicatePlate(vehicle.license_plate));
        }

        let stored = Vehicle {
            id: Uuid::new_v4(),
            license_plate: vehicle.license_plate,
            status: vehicle.status,
            created_at: Utc::now(),
        };
        vehicles.push(stored.clone());
        Ok(stored)
    }

    async fn update_by_id(&self, id: Uuid, changes: VehicleChanges) -> Result<Vehicle, StoreError> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles
            .iter()
            .any(|v| v.id != id && v.license_plate == changes.license_plate)
        {
            return Err(StoreError::DuplicatePlate(changes.license_plate));
        }

        let vehicle = vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::Missing(id))?;
        vehicle.license_plate = changes.license_plate;
        vehicle.status = changes.status;
        Ok(vehicle.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut vehicles = self.vehicles.write().await;
        let index = vehicles
            .iter()
            .position(|v| v.id == id)
            .ok_or(StoreError::Missing(id))?;
        vehicles.remove(index);
        Ok(())
    }
}
