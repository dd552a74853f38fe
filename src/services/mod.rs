//! Servicios del sistema
//!
//! Lógica de negocio de la flota: el registry de vehículos y la carga
//! inicial de datos.

pub mod seed_service;
pub mod vehicle_registry;

pub use seed_service::{seed_from_file, SeedReport};
pub use vehicle_registry::VehicleRegistry;
