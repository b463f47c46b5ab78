use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Degenerate route: {0}")]
    DegenerateRoute(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Geocoding service error: {0}")]
    Geocoding(String),

    #[error("Isochrone service error: {0}")]
    Isochrone(String),

    #[error("Ratings artifact error: {0}")]
    RatingsArtifact(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidCoordinates(ref e) => (StatusCode::UNPROCESSABLE_ENTITY, e.clone()),
            AppError::DegenerateRoute(ref e) => {
                tracing::info!("Degenerate route rejected: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e.clone())
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::Geocoding(ref e) => {
                tracing::error!("Geocoding service error: {}", e);
                (StatusCode::BAD_GATEWAY, "Geocoding service error".to_string())
            }
            AppError::Isochrone(ref e) => {
                tracing::error!("Isochrone service error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.clone()),
            AppError::RatingsArtifact(ref e) | AppError::DataLoad(ref e) | AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Json(ref e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
