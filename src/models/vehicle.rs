//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su estado operativo y la tabla
//! de transiciones entre estados. Mapea a la tabla `vehicles` y al ENUM
//! `vehicle_status` de PostgreSQL.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Maximum length of a license plate, in characters.
pub const MAX_LICENSE_PLATE_LEN: usize = 20;

/// Share of the fleet allowed in maintenance, in percent.
pub const MAINTENANCE_CAP_PERCENT: i64 = 5;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_status")]
pub enum VehicleStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Available,
        VehicleStatus::InUse,
        VehicleStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::InUse => "InUse",
            VehicleStatus::Maintenance => "Maintenance",
        }
    }

    /// Transition table for status updates.
    ///
    /// A vehicle in maintenance may only leave towards `Available`; every
    /// other pair is allowed (entering maintenance is still subject to the
    /// fleet-wide cap, which is checked by the registry).
    pub fn can_transition_to(self, next: VehicleStatus) -> bool {
        match (self, next) {
            (VehicleStatus::Maintenance, VehicleStatus::Available) => true,
            (VehicleStatus::Maintenance, _) => false,
            (VehicleStatus::Available, _) | (VehicleStatus::InUse, _) => true,
        }
    }

    /// Only available vehicles can be removed from the fleet.
    pub fn is_deletable(self) -> bool {
        self == VehicleStatus::Available
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for VehicleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Maximum number of vehicles allowed in maintenance for a fleet of
/// `total` vehicles: `floor(0.05 * total)`.
pub fn maintenance_cap(total: i64) -> i64 {
    total.max(0) * MAINTENANCE_CAP_PERCENT / 100
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un vehículo; el store asigna id y fecha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub license_plate: String,
    pub status: VehicleStatus,
}

/// Campos mutables de un vehículo existente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleChanges {
    pub license_plate: String,
    pub status: VehicleStatus,
}
