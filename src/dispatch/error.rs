// ABOUTME: Error taxonomy for dispatched requests and its HTTP status mapping.
// ABOUTME: Every variant carries the client-facing message and an optional cause.

use super::params::ParamError;
use crate::runtime::ContainerError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for dispatcher operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// A request failure, decided at the point of detection.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Reference did not resolve, or the path names no resource.
    #[error("{message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<ContainerError>,
    },

    /// A query parameter was malformed or unsupported.
    #[error(transparent)]
    BadRequest(#[from] ParamError),

    /// Illegal transition for the container's current state.
    #[error("{message}")]
    Conflict { message: String },

    /// The request is already satisfied by the current state.
    #[error("{message}")]
    NotModified { message: String },

    /// Runtime call, state query, or serialization failure.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Endpoint that is recognised but not served.
    #[error("{message}")]
    NotImplemented { message: String },

    #[error("{message}")]
    MethodNotAllowed { message: String },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ApiError::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::NotModified { .. } => StatusCode::NOT_MODIFIED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// The wrapped cause chain, joined with `: `.
    pub fn cause(&self) -> Option<String> {
        let mut current = std::error::Error::source(self)?;
        let mut chain = current.to_string();
        while let Some(next) = current.source() {
            chain.push_str(": ");
            chain.push_str(&next.to_string());
            current = next;
        }
        Some(chain)
    }

    /// JSON envelope sent to the client.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            cause: self.cause(),
        }
    }
}

/// Docker API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Underlying error, when one was wrapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}
