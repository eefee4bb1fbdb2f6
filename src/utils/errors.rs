//! Sistema de manejo de errores
//!
//! Este módulo define los errores del cliente (`FleetError`), los errores
//! del backend (`AppError`) y su conversión a respuestas HTTP.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::utils::validation::describe_validation_errors;

/// Mensaje cuando el servidor responde con un cuerpo que no es JSON
pub const SERVER_ERROR_FALLBACK: &str = "Error de servidor";

/// Mensaje cuando el JSON de error no trae el campo `message`
pub const REQUEST_ERROR_FALLBACK: &str = "Error en la solicitud";

/// Error de red o del backend, tal como lo ve el cliente
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RequestError {
    /// Estado HTTP, ausente si la petición nunca obtuvo respuesta
    pub status: Option<http::StatusCode>,
    pub message: String,
}

impl RequestError {
    pub fn new(status: Option<http::StatusCode>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Fallo de transporte o de decodificación de `reqwest`
    pub fn transport(error: reqwest::Error) -> Self {
        Self::new(error.status(), error.to_string())
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(http::StatusCode::CONFLICT)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(http::StatusCode::NOT_FOUND)
    }
}

/// Errores del cliente: validación local o fallo de la petición
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Validation error: {}", describe_validation_errors(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl FleetError {
    /// Mensaje para el aviso en línea de la vista
    pub fn user_message(&self) -> String {
        match self {
            FleetError::Validation(errors) => describe_validation_errors(errors),
            FleetError::Request(error) => error.message.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FleetError::Validation(_))
    }

    /// Conflicto de unicidad informado por el backend (HTTP 409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, FleetError::Request(error) if error.is_conflict())
    }
}

impl From<reqwest::Error> for FleetError {
    fn from(error: reqwest::Error) -> Self {
        FleetError::Request(RequestError::transport(error))
    }
}

/// Errores principales del backend
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {}", describe_validation_errors(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

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
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: describe_validation_errors(&e),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "Ocurrió un error inesperado".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Cuerpo JSON mal formado o con campos de tipo incorrecto
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Cuerpo JSON inválido: {}", rejection.body_text()))
    }
}

/// Resultado tipado para operaciones del backend
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("No existe {} con id '{}'", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("Ya existe {} con {} '{}'", resource, field, value))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::field_error;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_renders_message_field() {
        let response = conflict_error("un autobús", "número", "B-100").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["message"], "Ya existe un autobús con número 'B-100'");
    }

    #[tokio::test]
    async fn test_validation_error_message_is_readable() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("capacity", field_error("range", "La capacidad debe ser al menos 1"));

        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "La capacidad debe ser al menos 1");
        assert!(body["details"].get("capacity").is_some());
    }

    #[test]
    fn test_fleet_error_classification() {
        let conflict = FleetError::from(RequestError::new(
            Some(http::StatusCode::CONFLICT),
            "El asiento 12 ya está reservado",
        ));
        assert!(conflict.is_conflict());
        assert!(!conflict.is_validation());
        assert_eq!(conflict.user_message(), "El asiento 12 ya está reservado");

        let offline = FleetError::from(RequestError::new(None, "connection refused"));
        assert!(!offline.is_conflict());
    }
}
