// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Route table and request handlers.

use crate::{ApiError, HealthResponse, PredictResponse};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum::{Json, Router};
use classifier::Classifier;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Upper bound on an uploaded image body. Fundus photographs are a few
/// megabytes; anything near this limit is not a legitimate upload.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
}

/// Builds the application router over `state`.
///
/// The body limit is raised from axum's 2MB default so the multipart
/// path accepts the same [`MAX_UPLOAD_BYTES`] bound as the raw-body path.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /health` — liveness only; never touches the model.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// `POST /predict` — classifies one uploaded image.
///
/// Accepts either a multipart form (the first non-empty file field is
/// the image) or raw image bytes as the request body.
async fn predict(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PredictResponse>, ApiError> {
    let bytes = image_bytes(request).await?;
    let result = state.classifier.classify(&bytes).await?;
    Ok(Json(PredictResponse::from(result)))
}

/// Pulls the image payload out of the request.
async fn image_bytes(request: Request) -> Result<Bytes, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadUpload(format!("invalid multipart request: {e}")))?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadUpload(format!("unreadable multipart field: {e}")))?
        {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadUpload(format!("unreadable upload: {e}")))?;
            if !data.is_empty() {
                return Ok(data);
            }
        }
        Err(ApiError::BadUpload(
            "multipart request carries no file data".into(),
        ))
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), MAX_UPLOAD_BYTES)
            .await
            .map_err(|e| ApiError::BadUpload(format!("unreadable body: {e}")))?;
        if bytes.is_empty() {
            return Err(ApiError::BadUpload("empty request body".into()));
        }
        Ok(bytes)
    }
}
