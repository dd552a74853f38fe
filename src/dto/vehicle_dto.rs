use serde::{Deserialize, Serialize};

// Request para crear un vehículo
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// Request para actualizar un vehículo
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// Response de borrado
#[derive(Debug, Serialize)]
pub struct DeleteVehicleResponse {
    pub success: bool,
}

impl CreateVehicleRequest {
    pub fn new(license_plate: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            license_plate: Some(license_plate.into()),
            status: status.map(str::to_string),
        }
    }
}

impl UpdateVehicleRequest {
    pub fn new(license_plate: impl Into<String>, status: &str) -> Self {
        Self {
            license_plate: Some(license_plate.into()),
            status: Some(status.to_string()),
        }
    }
}
