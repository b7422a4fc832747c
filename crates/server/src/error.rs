// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Server-lifecycle errors and the request-level error-to-status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use classifier::ClassifyError;

/// Fatal errors of the serving process itself. Any of these aborts
/// startup; none of them is produced while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Bad or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configured artifact failed to load or is incompatible with
    /// the serving pipeline. Raised during warm-up, before binding.
    #[error("model rejected at startup: {0}")]
    Startup(#[from] ClassifyError),

    /// Could not bind or serve on the configured address.
    #[error("cannot serve on {addr}: {detail}")]
    Bind { addr: String, detail: String },
}

/// JSON body returned for every failed request.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-scoped error assigning each failure its HTTP status:
/// client-input failures map to 422, a blown latency bound to 504, and
/// everything else is a server-side 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is not a usable image upload (no multipart file,
    /// unreadable body). Distinct from [`ClassifyError::Decode`], which
    /// covers bytes that arrived but do not decode.
    #[error("bad upload: {0}")]
    BadUpload(String),

    /// Any pipeline failure while classifying the upload.
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Classify(err) => match err {
                ClassifyError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ClassifyError::InferenceTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ClassifyError::ModelLoad(_)
                | ClassifyError::Backend(_)
                | ClassifyError::TaskFailed(_)
                | ClassifyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        if status.is_server_error() {
            tracing::error!("prediction failed: {self}");
        } else {
            tracing::debug!("rejected request: {self}");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preprocess::PreprocessError;

    fn status_of(err: ClassifyError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_decode_maps_to_422() {
        let err = ClassifyError::Decode(PreprocessError::DecodeError("bad magic".into()));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_bad_upload_maps_to_422() {
        let status = ApiError::BadUpload("no file field".into())
            .into_response()
            .status();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let err = ClassifyError::InferenceTimeout { timeout_ms: 10 };
        assert_eq!(status_of(err), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_server_side_failures_map_to_500() {
        let err = ClassifyError::TaskFailed("worker panicked".into());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ClassifyError::Configuration("wrong geometry".into());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
