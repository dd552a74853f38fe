//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos de
//! entrada y su conversión a errores del registry.

use std::str::FromStr;

use validator::ValidationError;

use crate::models::vehicle::{VehicleStatus, MAX_LICENSE_PLATE_LEN};
use crate::utils::errors::{PlateProblem, RegistryError};

/// Validar que un string no esté vacío. Los espacios cuentan como contenido.
fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud máxima, contada en caracteres
fn validate_max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        let mut error = ValidationError::new("length");
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo: no vacía y como máximo 20 caracteres
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    validate_max_length(value, MAX_LICENSE_PLATE_LEN)
}

/// Check a plate and classify the failure for the registry.
pub fn check_license_plate(value: Option<&str>) -> Result<&str, RegistryError> {
    let value = value.ok_or(RegistryError::InvalidPlate(PlateProblem::Missing))?;
    validate_license_plate(value).map_err(|e| {
        let problem = if e.code == "not_empty" {
            PlateProblem::Missing
        } else {
            PlateProblem::TooLong
        };
        RegistryError::InvalidPlate(problem)
    })?;
    Ok(value)
}

/// Parse an optional status string; absent means `Available`.
pub fn parse_optional_status(value: Option<&str>) -> Result<VehicleStatus, RegistryError> {
    match value {
        Some(raw) => parse_status(raw),
        None => Ok(VehicleStatus::default()),
    }
}

/// Parse a required status string.
pub fn parse_required_status(value: Option<&str>) -> Result<VehicleStatus, RegistryError> {
    value
        .ok_or(RegistryError::InvalidStatus(None))
        .and_then(parse_status)
}

fn parse_status(raw: &str) -> Result<VehicleStatus, RegistryError> {
    VehicleStatus::from_str(raw).map_err(|e| RegistryError::InvalidStatus(Some(e.0)))
}
