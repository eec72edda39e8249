// ABOUTME: HTTP rendering of dispatcher replies and errors.
// ABOUTME: Errors are logged here, at the point they become responses.

use crate::dispatch::{ApiError, Reply};
use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
            Reply::Wait(body) => match serde_json::to_vec(&body) {
                Ok(bytes) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    bytes,
                )
                    .into_response(),
                Err(e) => ApiError::internal("unable to encode wait response", e).into_response(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let cause = self.cause();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                cause = cause.as_deref().unwrap_or(""),
                "{}",
                self
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                cause = cause.as_deref().unwrap_or(""),
                "{}",
                self
            );
        }

        // 304 must not carry a body.
        if status == StatusCode::NOT_MODIFIED {
            return status.into_response();
        }

        (status, Json(self.to_response())).into_response()
    }
}
