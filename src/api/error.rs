//! Mapping of request failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::news::{NewsError, ValidationErrors};

/// Message used when a failure carries no text of its own
const FALLBACK_MESSAGE: &str = "An unknown internal error occurred";

/// Errors that end an articles request
#[derive(Debug, Error)]
pub enum ApiError {
    /// No GNews API key was configured for the server
    #[error("GNews API key is not configured.")]
    NotConfigured,

    /// The query string failed validation
    #[error("Invalid query parameters.")]
    InvalidQuery(ValidationErrors),

    /// Fetching from GNews failed
    #[error("{0}")]
    News(#[from] NewsError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured | ApiError::News(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NotConfigured => json!({ "error": self.to_string() }),
            ApiError::InvalidQuery(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            ApiError::News(_) => {
                let message = message_or_fallback(self.to_string());
                error!("Articles request failed: {}", message);
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

fn message_or_fallback(message: String) -> String {
    if message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}
