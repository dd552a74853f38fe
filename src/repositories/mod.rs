//! Repositorios del sistema
//!
//! `VehicleStore` es el contrato de almacenamiento que usa el registry;
//! hay una implementación PostgreSQL y otra en memoria.

pub mod memory_vehicle_store;
pub mod vehicle_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
use crate::utils::errors::StoreError;

/// Durable storage of vehicles with read-your-writes consistency.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Count vehicles, optionally only those with the given status.
    async fn count(&self, status: Option<VehicleStatus>) -> Result<i64, StoreError>;

    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError>;

    /// All vehicles, in an order that is stable across calls absent writes.
    async fn list_all(&self) -> Result<Vec<Vehicle>, StoreError>;

    /// Insert a vehicle; the store assigns the id and creation timestamp.
    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, StoreError>;

    async fn update_by_id(&self, id: Uuid, changes: VehicleChanges) -> Result<Vehicle, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}

pub use memory_vehicle_store::MemoryVehicleStore;
pub use vehicle_repository::PgVehicleRepository;
