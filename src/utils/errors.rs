//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del motor de taller
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient stock for part {part_id}: available {available}, requested {requested}")]
    InsufficientStock {
        part_id: i32,
        available: i32,
        requested: i32,
    },

    #[error("Bill already exists for job {job_id}")]
    AlreadyBilled { job_id: i32 },

    #[error("Vehicle with plate '{plate_no}' does not belong to customer {customer_id}")]
    OwnershipMismatch { plate_no: String, customer_id: i32 },

    #[error("No active job found for vehicle '{plate_no}'")]
    NoActiveJob { plate_no: String },

    #[error("Cannot delete service request {request_id} with associated jobs")]
    HasDependentJobs { request_id: i32 },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    /// Código estable que viaja en el cuerpo JSON
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::AlreadyBilled { .. } => "ALREADY_BILLED",
            AppError::OwnershipMismatch { .. } => "OWNERSHIP_MISMATCH",
            AppError::NoActiveJob { .. } => "NO_ACTIVE_JOB",
            AppError::HasDependentJobs { .. } => "HAS_DEPENDENT_JOBS",
            AppError::DuplicateKey(_) => "DUPLICATE_KEY",
            AppError::Constraint(_) => "CONSTRAINT_VIOLATION",
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NoActiveJob { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_)
            | AppError::InsufficientStock { .. }
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyBilled { .. }
            | AppError::OwnershipMismatch { .. }
            | AppError::HasDependentJobs { .. }
            | AppError::DuplicateKey(_)
            | AppError::Constraint(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let (error, message, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "internal_error": msg })),
                )
            }
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                )
            }
            AppError::InsufficientStock { part_id, available, requested } => {
                tracing::warn!("{}", self);
                (
                    "Insufficient Stock",
                    self.to_string(),
                    Some(json!({
                        "part_id": part_id,
                        "available": available,
                        "requested": requested,
                    })),
                )
            }
            AppError::NotFound(_) | AppError::NoActiveJob { .. } => {
                tracing::warn!("Resource not found: {}", self);
                ("Not Found", self.to_string(), None)
            }
            AppError::InvalidArgument(_) => {
                tracing::warn!("Bad request: {}", self);
                ("Bad Request", self.to_string(), None)
            }
            AppError::AlreadyBilled { .. }
            | AppError::OwnershipMismatch { .. }
            | AppError::HasDependentJobs { .. }
            | AppError::DuplicateKey(_)
            | AppError::Constraint(_) => {
                tracing::warn!("Conflict: {}", self);
                ("Conflict", self.to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            details,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de argumento inválido
pub fn invalid_argument(message: impl Into<String>) -> AppError {
    AppError::InvalidArgument(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(not_found_error("Part", 3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InsufficientStock { part_id: 1, available: 2, requested: 5 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AlreadyBilled { job_id: 1 }.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::NoActiveJob { plate_no: "AB-123".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::HasDependentJobs { request_id: 9 }.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = not_found_error("Service job", 42);
        assert_eq!(err.to_string(), "Not found: Service job with id '42' not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
