use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("No walkable route: {0}")]
    Unroutable(String),

    #[error("Loop not found: {0}")]
    LoopNotFound(Uuid),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Geocoding API error: {0}")]
    GeocodingApi(String),

    #[error("Routing API error: {0}")]
    RoutingApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short status line shown to the user when a generation fails.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidTarget(_) => "Please enter a positive distance or duration".to_string(),
            AppError::AddressNotFound(address) => format!("Address not found: {}", address),
            AppError::Unroutable(_) => {
                "No walkable loop found from this address, try again".to_string()
            }
            AppError::LoopNotFound(_) => "Loop not found".to_string(),
            AppError::InvalidRequest(e) => e.clone(),
            AppError::GeocodingApi(_) => "Address lookup is unavailable right now".to_string(),
            AppError::RoutingApi(_) => "Routing is unavailable right now".to_string(),
            AppError::Internal(_) => "Something went wrong".to_string(),
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidTarget(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AddressNotFound(ref e) => {
                tracing::info!("Address not found: {}", e);
                StatusCode::NOT_FOUND
            }
            AppError::LoopNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unroutable(ref e) => {
                tracing::warn!("Unroutable loop: {}", e);
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::GeocodingApi(ref e) => {
                tracing::error!("Geocoding API error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::RoutingApi(ref e) => {
                tracing::error!("Routing API error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": self.user_message(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
