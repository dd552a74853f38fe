//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Los valores se leen de
//! variables de entorno (cargadas desde `.env` en `main`); cualquier valor
//! inválido es un error de arranque.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

/// Backend de almacenamiento de vehículos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown store backend '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub seed_file: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_origins: Vec::new(),
            store_backend: StoreBackend::Postgres,
            seed_file: None,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del proceso actual
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Leer la configuración desde un mapa de variables
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?,
            None => defaults.port,
        };

        let store_backend = match get("STORE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => defaults.store_backend,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let environment = get("ENVIRONMENT")
            .map(str::to_string)
            .unwrap_or(defaults.environment);
        if !["development", "production", "test"].contains(&environment.as_str()) {
            bail!("ENVIRONMENT must be development, production or test, got '{}'", environment);
        }

        Ok(Self {
            environment,
            host: get("HOST").map(str::to_string).unwrap_or(defaults.host),
            port,
            cors_origins,
            store_backend,
            seed_file: get("SEED_FILE").map(PathBuf::from),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
