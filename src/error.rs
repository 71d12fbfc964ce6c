use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Domain-specific error types for Adweave
#[derive(Error, Debug)]
pub enum AdweaveError {
    #[error("Failed to reach placement catalog: {0}")]
    CatalogFetch(#[from] reqwest::Error),

    #[error("Invalid placement payload: {0}")]
    InvalidPlacement(String),

    #[error("Unknown playback session: {0}")]
    SessionNotFound(String),

    #[error("Skip countdown has not elapsed")]
    SkipNotAllowed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Map domain errors onto HTTP responses for the player-facing API
impl IntoResponse for AdweaveError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AdweaveError::CatalogFetch(ref e) => {
                tracing::error!("Catalog fetch error: {:?}", e);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AdweaveError::InvalidPlacement(ref e) => {
                tracing::warn!("Invalid placement: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AdweaveError::SessionNotFound(ref id) => {
                tracing::debug!("Session not found: {}", id);
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AdweaveError::SkipNotAllowed => {
                // Expected whenever a viewer mashes the skip button early
                tracing::debug!("Skip rejected: countdown still running");
                (StatusCode::CONFLICT, self.to_string())
            }
            AdweaveError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AdweaveError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, error_message).into_response()
    }
}

// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, AdweaveError>;
