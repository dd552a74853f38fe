//! Fleet registry service
//!
//! Registro de vehículos de una flota con reglas de negocio: matrícula
//! única, tope de vehículos en mantenimiento, transiciones de estado y
//! borrado sólo de vehículos disponibles. Expuesto como API HTTP con axum.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use models::vehicle::{Vehicle, VehicleStatus};
pub use services::VehicleRegistry;
pub use utils::errors::{AppError, RegistryError, StoreError};
