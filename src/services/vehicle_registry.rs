//! Registry de vehículos
//!
//! Fachada sobre el `VehicleStore` que valida las reglas de negocio antes
//! de cada escritura: matrícula única y de 1 a 20 caracteres, tope de
//! vehículos en mantenimiento, transiciones de estado y borrado sólo de
//! vehículos disponibles.
//!
//! Los contadores se leen siempre del store. Las operaciones que escriben
//! se serializan con un mutex para que la secuencia leer-validar-escribir
//! sea atómica dentro del proceso; el índice único de la base de datos
//! sigue protegiendo la unicidad entre procesos.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::vehicle::{maintenance_cap, NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
use crate::repositories::VehicleStore;
use crate::utils::errors::{RegistryError, RegistryResult};
use crate::utils::validation::{check_license_plate, parse_optional_status, parse_required_status};

pub struct VehicleRegistry {
    store: Arc<dyn VehicleStore>,
    write_lock: Mutex<()>,
}

impl VehicleRegistry {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> RegistryResult<Vec<Vehicle>> {
        Ok(self.store.list_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> RegistryResult<Vehicle> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(RegistryError::NotFound)
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> RegistryResult<Vehicle> {
        let license_plate = check_license_plate(request.license_plate.as_deref())?;
        let status = parse_optional_status(request.status.as_deref())?;

        let _guard = self.write_lock.lock().await;

        if self.store.find_by_plate(license_plate).await?.is_some() {
            log::warn!("Rejected create: plate '{}' already exists", license_plate);
            return Err(RegistryError::DuplicatePlate);
        }

        if status == VehicleStatus::Maintenance {
            let in_maintenance = self.store.count(Some(VehicleStatus::Maintenance)).await?;
            let total = self.store.count(None).await?;
            // The new vehicle counts towards the fleet size.
            if in_maintenance + 1 > maintenance_cap(total + 1) {
                log::warn!(
                    "Rejected create of '{}': {} of {} vehicles already in maintenance",
                    license_plate,
                    in_maintenance,
                    total
                );
                return Err(RegistryError::MaintenanceCapExceeded);
            }
        }

        let vehicle = self
            .store
            .insert(NewVehicle {
                license_plate: license_plate.to_string(),
                status,
            })
            .await?;

        log::info!(
            "Vehicle {} created with plate '{}' ({})",
            vehicle.id,
            vehicle.license_plate,
            vehicle.status
        );
        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> RegistryResult<Vehicle> {
        let license_plate = check_license_plate(request.license_plate.as_deref())?;

        let _guard = self.write_lock.lock().await;

        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        let status = parse_required_status(request.status.as_deref())?;

        if current.license_plate != license_plate {
            if let Some(other) = self.store.find_by_plate(license_plate).await? {
                if other.id != id {
                    log::warn!(
                        "Rejected update of {}: plate '{}' belongs to {}",
                        id,
                        license_plate,
                        other.id
                    );
                    return Err(RegistryError::DuplicatePlate);
                }
            }
        }

        if !current.status.can_transition_to(status) {
            log::warn!(
                "Rejected update of {}: {} -> {} is not allowed",
                id,
                current.status,
                status
            );
            return Err(RegistryError::IllegalTransition);
        }

        if status == VehicleStatus::Maintenance {
            let mut in_maintenance = self.store.count(Some(VehicleStatus::Maintenance)).await?;
            if current.status == VehicleStatus::Maintenance {
                in_maintenance -= 1;
            }
            // Updates never change the fleet size.
            let total = self.store.count(None).await?;
            if in_maintenance + 1 > maintenance_cap(total) {
                log::warn!(
                    "Rejected update of {}: {} of {} vehicles already in maintenance",
                    id,
                    in_maintenance,
                    total
                );
                return Err(RegistryError::MaintenanceCapExceeded);
            }
        }

        let vehicle = self
            .store
            .update_by_id(
                id,
                VehicleChanges {
                    license_plate: license_plate.to_string(),
                    status,
                },
            )
            .await?;

        log::info!(
            "Vehicle {} updated: plate '{}', {} -> {}",
            vehicle.id,
            vehicle.license_plate,
            current.status,
            vehicle.status
        );
        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;

        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        if !current.status.is_deletable() {
            log::warn!("Rejected delete of {}: vehicle is {}", id, current.status);
            return Err(RegistryError::DeleteBlocked);
        }

        self.store.delete_by_id(id).await?;
        log::info!("Vehicle {} ('{}') deleted", id, current.license_plate);
        Ok(())
    }

    /// Number of vehicles in the fleet.
    pub async fn total(&self) -> RegistryResult<i64> {
        Ok(self.store.count(None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryVehicleStore;
    use crate::utils::errors::PlateProblem;
    use chrono::Utc;

    fn registry() -> VehicleRegistry {
        VehicleRegistry::new(Arc::new(MemoryVehicleStore::new()))
    }

    /// Registry over a pre-populated fleet, bypassing the rules.
    fn registry_with_fleet(available: usize, maintenance: usize) -> VehicleRegistry {
        let fixture = |i: usize, status: VehicleStatus| Vehicle {
            id: Uuid::new_v4(),
            license_plate: format!("{}-{}", status, i),
            status,
            created_at: Utc::now(),
        };
        let vehicles = (0..available)
            .map(|i| fixture(i, VehicleStatus::Available))
            .chain((0..maintenance).map(|i| fixture(i, VehicleStatus::Maintenance)))
            .collect();
        VehicleRegistry::new(Arc::new(MemoryVehicleStore::with_vehicles(vehicles)))
    }

    async fn maintenance_count(registry: &VehicleRegistry) -> usize {
        registry
            .list()
            .await
            .unwrap()
            .iter()
            .filter(|v| v.status == VehicleStatus::Maintenance)
            .count()
    }

    #[tokio::test]
    async fn test_create_defaults_to_available() {
        let registry = registry();
        let vehicle = registry
            .create(CreateVehicleRequest::new("TEST-123", None))
            .await
            .unwrap();

        assert_eq!(vehicle.license_plate, "TEST-123");
        assert_eq!(vehicle.status, VehicleStatus::Available);
        assert_eq!(registry.get(vehicle.id).await.unwrap(), vehicle);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_plates() {
        let registry = registry();

        let err = registry
            .create(CreateVehicleRequest::new("X".repeat(21), None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPlate(PlateProblem::TooLong)));

        let err = registry
            .create(CreateVehicleRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPlate(PlateProblem::Missing)));

        assert!(registry
            .create(CreateVehicleRequest::new("X".repeat(20), None))
            .await
            .is_ok());
        assert_eq!(registry.total().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_status() {
        let registry = registry();
        let err = registry
            .create(CreateVehicleRequest::new("ABC", Some("Broken")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidStatus(Some(_))));
        assert_eq!(registry.total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_plate() {
        let registry = registry();
        registry
            .create(CreateVehicleRequest::new("A", Some("Available")))
            .await
            .unwrap();

        let err = registry
            .create(CreateVehicleRequest::new("A", Some("InUse")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePlate));
        assert_eq!(registry.total().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_plate_length_checked_before_status_rules() {
        let registry = registry();
        let long = "L".repeat(25);
        let err = registry
            .create(CreateVehicleRequest::new(long, Some("Maintenance")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPlate(_)));
    }

    #[tokio::test]
    async fn test_duplicate_wins_over_maintenance_cap() {
        let registry = registry();
        registry
            .create(CreateVehicleRequest::new("SAME", None))
            .await
            .unwrap();

        let err = registry
            .create(CreateVehicleRequest::new("SAME", Some("Maintenance")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePlate));
    }

    #[tokio::test]
    async fn test_create_maintenance_in_empty_fleet_is_rejected() {
        let registry = registry();
        let err = registry
            .create(CreateVehicleRequest::new("ABC123", Some("Maintenance")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::MaintenanceCapExceeded));
        assert_eq!(registry.total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_maintenance_counts_new_vehicle_in_total() {
        // 19 vehicles: cap for 20 is 1, so the 20th may enter maintenance
        let registry = registry_with_fleet(19, 0);
        let vehicle = registry
            .create(CreateVehicleRequest::new("NEW-20", Some("Maintenance")))
            .await
            .unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Maintenance);
    }

    #[tokio::test]
    async fn test_create_maintenance_up_to_cap() {
        // 100 vehicles, 4 in maintenance: cap is 5
        let registry = registry_with_fleet(96, 4);

        registry
            .create(CreateVehicleRequest::new("C", Some("Maintenance")))
            .await
            .unwrap();
        assert_eq!(maintenance_count(&registry).await, 5);

        let err = registry
            .create(CreateVehicleRequest::new("C2", Some("Maintenance")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::MaintenanceCapExceeded));
        assert_eq!(maintenance_count(&registry).await, 5);
        assert_eq!(registry.total().await.unwrap(), 101);
    }

    #[tokio::test]
    async fn test_update_into_maintenance_with_single_vehicle() {
        let registry = registry();
        let vehicle = registry
            .create(CreateVehicleRequest::new("B", Some("InUse")))
            .await
            .unwrap();

        let err = registry
            .update(vehicle.id, UpdateVehicleRequest::new("B", "Maintenance"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::MaintenanceCapExceeded));
        assert_eq!(registry.get(vehicle.id).await.unwrap().status, VehicleStatus::InUse);
    }

    #[tokio::test]
    async fn test_update_uses_existing_total() {
        // 20 vehicles: cap is 1 and updates do not grow the fleet
        let registry = registry_with_fleet(20, 0);
        let vehicles = registry.list().await.unwrap();

        registry
            .update(vehicles[0].id, UpdateVehicleRequest::new("FIRST", "Maintenance"))
            .await
            .unwrap();

        let second = &vehicles[1];
        let err = registry
            .update(
                second.id,
                UpdateVehicleRequest::new(second.license_plate.clone(), "Maintenance"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::MaintenanceCapExceeded));
        assert_eq!(maintenance_count(&registry).await, 1);
    }

    #[tokio::test]
    async fn test_update_changes_plate() {
        let registry = registry();
        let vehicle = registry
            .create(CreateVehicleRequest::new("UPD-001", None))
            .await
            .unwrap();

        let updated = registry
            .update(vehicle.id, UpdateVehicleRequest::new("UPD-002", "Available"))
            .await
            .unwrap();
        assert_eq!(updated.id, vehicle.id);
        assert_eq!(updated.license_plate, "UPD-002");
        assert_eq!(updated.created_at, vehicle.created_at);
    }

    #[tokio::test]
    async fn test_update_to_duplicate_plate() {
        let registry = registry();
        registry.create(CreateVehicleRequest::new("V1", None)).await.unwrap();
        let v2 = registry.create(CreateVehicleRequest::new("V2", None)).await.unwrap();

        let err = registry
            .update(v2.id, UpdateVehicleRequest::new("V1", "Available"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePlate));
        assert_eq!(registry.get(v2.id).await.unwrap().license_plate, "V2");
    }

    #[tokio::test]
    async fn test_update_keeping_own_plate() {
        let registry = registry();
        let vehicle = registry.create(CreateVehicleRequest::new("OWN", None)).await.unwrap();

        let updated = registry
            .update(vehicle.id, UpdateVehicleRequest::new("OWN", "InUse"))
            .await
            .unwrap();
        assert_eq!(updated.status, VehicleStatus::InUse);
    }

    #[tokio::test]
    async fn test_maintenance_only_exits_to_available() {
        let registry = registry_with_fleet(19, 1);
        let in_maintenance = registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|v| v.status == VehicleStatus::Maintenance)
            .unwrap();
        let plate = in_maintenance.license_plate.clone();

        let err = registry
            .update(in_maintenance.id, UpdateVehicleRequest::new(plate.clone(), "InUse"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::IllegalTransition));

        let err = registry
            .update(in_maintenance.id, UpdateVehicleRequest::new(plate.clone(), "Maintenance"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::IllegalTransition));

        let updated = registry
            .update(in_maintenance.id, UpdateVehicleRequest::new(plate, "Available"))
            .await
            .unwrap();
        assert_eq!(updated.status, VehicleStatus::Available);
    }

    #[tokio::test]
    async fn test_update_missing_vehicle() {
        let registry = registry();
        let err = registry
            .update(Uuid::new_v4(), UpdateVehicleRequest::new("X", "Available"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_missing_vehicle_wins_over_bad_status() {
        let registry = registry();
        let err = registry
            .update(Uuid::new_v4(), UpdateVehicleRequest::new("X", "Bogus"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound));

        let request = UpdateVehicleRequest {
            license_plate: Some("X".to_string()),
            status: None,
        };
        let err = registry.update(Uuid::new_v4(), request).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound));
    }

    #[tokio::test]
    async fn test_create_whitespace_plate() {
        let registry = registry();
        let vehicle = registry
            .create(CreateVehicleRequest::new("   ", None))
            .await
            .unwrap();
        assert_eq!(vehicle.license_plate, "   ");

        let err = registry
            .create(CreateVehicleRequest::new("   ", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePlate));
    }

    #[tokio::test]
    async fn test_update_requires_status() {
        let registry = registry();
        let vehicle = registry.create(CreateVehicleRequest::new("S", None)).await.unwrap();

        let request = UpdateVehicleRequest {
            license_plate: Some("S".to_string()),
            status: None,
        };
        let err = registry.update(vehicle.id, request).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidStatus(None)));
    }

    #[tokio::test]
    async fn test_delete_available_vehicle() {
        let registry = registry();
        let vehicle = registry.create(CreateVehicleRequest::new("D", None)).await.unwrap();
        registry.create(CreateVehicleRequest::new("E", None)).await.unwrap();

        registry.delete(vehicle.id).await.unwrap();
        assert_eq!(registry.total().await.unwrap(), 1);
        assert!(matches!(
            registry.get(vehicle.id).await,
            Err(RegistryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_for_in_use_and_maintenance() {
        let registry = registry_with_fleet(0, 1);
        let in_use = registry
            .create(CreateVehicleRequest::new("INUSE-001", Some("InUse")))
            .await
            .unwrap();
        let in_maintenance = registry.list().await.unwrap()[0].clone();

        for id in [in_use.id, in_maintenance.id] {
            let err = registry.delete(id).await.unwrap_err();
            assert!(matches!(err, RegistryError::DeleteBlocked));
        }
        assert_eq!(registry.total().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_vehicle() {
        let registry = registry();
        assert!(matches!(
            registry.delete(Uuid::new_v4()).await,
            Err(RegistryError::NotFound)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_maintenance_creates_respect_cap() {
        // 20 vehicles: the 21st may enter maintenance (cap 1), no more
        let registry = Arc::new(registry_with_fleet(20, 0));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .create(CreateVehicleRequest::new(format!("RACE-{}", i), Some("Maintenance")))
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(err) => assert!(matches!(err, RegistryError::MaintenanceCapExceeded)),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(maintenance_count(&registry).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_keep_plates_unique() {
        let registry = Arc::new(registry());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry.create(CreateVehicleRequest::new("ONLY-ONE", None)).await
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(registry.total().await.unwrap(), 1);
    }
}
