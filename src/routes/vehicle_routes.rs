use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, DeleteVehicleResponse, UpdateVehicleRequest};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::{AppResult, RegistryError};
use crate::utils::extract::ApiJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

/// Ids that are not UUIDs cannot name any vehicle.
fn parse_vehicle_id(raw: &str) -> Result<Uuid, RegistryError> {
    Uuid::parse_str(raw).map_err(|_| RegistryError::NotFound)
}

async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = state.registry.list().await?;
    Ok(Json(vehicles))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vehicle>> {
    let id = parse_vehicle_id(&id)?;
    let vehicle = state.registry.get(id).await?;
    Ok(Json(vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = state.registry.create(request).await?;
    Ok(Json(vehicle))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> AppResult<Json<Vehicle>> {
    let id = parse_vehicle_id(&id)?;
    let vehicle = state.registry.update(id, request).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteVehicleResponse>> {
    let id = parse_vehicle_id(&id)?;
    state.registry.delete(id).await?;
    Ok(Json(DeleteVehicleResponse { success: true }))
}
