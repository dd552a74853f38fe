//! Configuración de base de datos
//!
//! Este módulo maneja la configuración del pool de PostgreSQL con SQLx.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let url = vars
            .get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .context("DATABASE_URL must be set when STORE_BACKEND is postgres")?;

        Ok(Self {
            url,
            max_connections: parse_var(vars, "DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: parse_var(vars, "DATABASE_MIN_CONNECTIONS", 1)?,
            connect_timeout: Duration::from_secs(parse_var(
                vars,
                "DATABASE_CONNECT_TIMEOUT_SECS",
                30,
            )?),
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .connect(&self.url)
            .await
    }
}

/// Leer una variable numérica en su tipo destino, sin truncar.
fn parse_var<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
