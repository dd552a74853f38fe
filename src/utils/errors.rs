//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores de cada capa (store, registry,
//! API) y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::models::vehicle::MAX_LICENSE_PLATE_LEN;

/// Errores del record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("License plate '{0}' is already stored")]
    DuplicatePlate(String),

    #[error("Vehicle {0} is not stored")]
    Missing(Uuid),
}

/// Reasons a license plate is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateProblem {
    Missing,
    TooLong,
}

/// Rejections raised by the vehicle registry.
///
/// The `Display` text of every rejection variant is the message returned
/// verbatim to API callers.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{}", plate_message(.0))]
    InvalidPlate(PlateProblem),

    #[error("License plate already exists.")]
    DuplicatePlate,

    #[error("{}", status_message(.0))]
    InvalidStatus(Option<String>),

    #[error("Too many vehicles in maintenance.")]
    MaintenanceCapExceeded,

    #[error("Maintenance vehicles can only move to Available.")]
    IllegalTransition,

    #[error("Cannot delete vehicle in use or maintenance.")]
    DeleteBlocked,

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

fn plate_message(problem: &PlateProblem) -> String {
    match problem {
        PlateProblem::Missing => "License plate is required.".to_string(),
        PlateProblem::TooLong => format!(
            "License plate cannot exceed {} characters.",
            MAX_LICENSE_PLATE_LEN
        ),
    }
}

fn status_message(value: &Option<String>) -> String {
    match value {
        Some(value) => format!(
            "Invalid status '{}'. Expected one of: Available, InUse, Maintenance.",
            value
        ),
        None => "Status is required.".to_string(),
    }
}

impl RegistryError {
    /// Stable classification code for the error, exposed in API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::InvalidPlate(_) => "INVALID_PLATE",
            RegistryError::DuplicatePlate => "DUPLICATE_PLATE",
            RegistryError::InvalidStatus(_) => "INVALID_STATUS",
            RegistryError::MaintenanceCapExceeded => "MAINTENANCE_CAP_EXCEEDED",
            RegistryError::IllegalTransition => "ILLEGAL_TRANSITION",
            RegistryError::DeleteBlocked => "DELETE_BLOCKED",
            RegistryError::NotFound => "NOT_FOUND",
            RegistryError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            // The unique index caught a plate collision the registry did not see.
            StoreError::DuplicatePlate(_) => RegistryError::DuplicatePlate,
            StoreError::Missing(_) => RegistryError::NotFound,
            other => RegistryError::Store(other),
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {message}")]
    NotFound { message: String, code: &'static str },

    #[error("Bad request: {message}")]
    BadRequest { message: String, code: &'static str },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            RegistryError::NotFound => AppError::NotFound { message, code },
            RegistryError::Store(_) => AppError::Internal(message),
            _ => AppError::BadRequest { message, code },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
            code: "INVALID_BODY",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::NotFound { message, code } => {
                tracing::debug!("Resource not found: {}", message);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: message,
                        code,
                    },
                )
            }

            AppError::BadRequest { message, code } => {
                tracing::debug!("Bad request: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: message,
                        code,
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "An unexpected error occurred".to_string(),
                        code: "INTERNAL_ERROR",
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones del registry
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Resultado tipado para handlers HTTP
pub type AppResult<T> = Result<T, AppError>;
