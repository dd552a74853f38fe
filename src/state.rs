//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::VehicleStore;
use crate::services::VehicleRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<VehicleRegistry>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn VehicleStore>, config: EnvironmentConfig) -> Self {
        Self {
            registry: Arc::new(VehicleRegistry::new(store)),
            config,
        }
    }
}
