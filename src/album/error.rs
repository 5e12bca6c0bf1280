use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::ErrorResponse;

#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("Could not extract album ID from URL: {0}")]
    NoIdentifier(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("No images found in album")]
    EmptyCache,
}

impl AlbumError {
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AlbumError::Request(_) | AlbumError::UpstreamStatus { .. }
        )
    }
}

impl IntoResponse for AlbumError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AlbumError::EmptyCache => (StatusCode::NOT_FOUND, self.to_string()),
            AlbumError::Request(_) | AlbumError::UpstreamStatus { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch image: {}", self),
            ),
            AlbumError::NoIdentifier(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
