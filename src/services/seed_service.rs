//! Carga inicial de vehículos
//!
//! Lee un arreglo JSON de `{licensePlate, status?}` y crea cada vehículo a
//! través del registry, de modo que las reglas de negocio también aplican
//! a los datos iniciales. Si la flota ya tiene vehículos no se hace nada.

use std::path::Path;

use anyhow::{Context, Result};

use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::services::vehicle_registry::VehicleRegistry;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Seed the fleet from a JSON file when the store is empty.
///
/// Returns `None` when the fleet already had vehicles.
pub async fn seed_from_file(registry: &VehicleRegistry, path: &Path) -> Result<Option<SeedReport>> {
    let total = registry.total().await?;
    if total > 0 {
        log::info!(
            "Vehicles already exist ({} entries), skipping seed",
            total
        );
        return Ok(None);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let records: Vec<CreateVehicleRequest> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    log::info!("Seeding {} vehicles from {}", records.len(), path.display());
    Ok(Some(seed_records(registry, records).await))
}

/// Create each record through the registry; failures are logged and skipped.
pub async fn seed_records(registry: &VehicleRegistry, records: Vec<CreateVehicleRequest>) -> SeedReport {
    let mut report = SeedReport::default();

    for record in records {
        let plate = record.license_plate.clone().unwrap_or_default();
        match registry.create(record).await {
            Ok(vehicle) => {
                log::debug!("Inserted: {}", vehicle.license_plate);
                report.inserted += 1;
            }
            Err(e) => {
                log::warn!("Failed to insert '{}': {}", plate, e);
                report.skipped += 1;
            }
        }
    }

    log::info!(
        "Seed completed: {} inserted, {} skipped",
        report.inserted,
        report.skipped
    );
    report
}
