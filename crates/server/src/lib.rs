// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # server
//!
//! The HTTP serving surface over the classifier:
//!
//! - `GET /health` — liveness probe, independent of model state.
//! - `POST /predict` — one image in (multipart file or raw body), one
//!   prediction out: top-1 class, its confidence, and the full per-class
//!   distribution.
//!
//! [`serve`] validates the configured artifact at startup (warm-up plus
//! compatibility check) and refuses to bind when the model cannot serve;
//! a broken deployment fails loudly instead of failing per request.

mod config;
mod error;
mod routes;
mod wire;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse, ServerError};
pub use routes::{router, AppState};
pub use wire::{HealthResponse, PredictResponse};

use classifier::{Classifier, LazyModel};
use std::sync::Arc;

/// Builds the classifier described by `config`. The model is not loaded
/// yet; that happens at warm-up or on the first prediction.
pub fn build_classifier(config: &ServerConfig) -> Classifier {
    let mut classifier = Classifier::new(LazyModel::from_path(config.model_path.clone()));
    if let Some(timeout) = config.inference_timeout() {
        classifier = classifier.with_timeout(timeout);
    }
    classifier
}

/// Runs the server until the process is stopped.
///
/// Loads and validates the model before binding; an unusable artifact
/// aborts startup with [`ServerError::Startup`].
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let classifier = build_classifier(&config);
    classifier.warm_up().await?;

    let state = AppState {
        classifier: Arc::new(classifier),
    };
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            detail: e.to_string(),
        })?;
    tracing::info!("serving on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Bind {
            addr,
            detail: e.to_string(),
        })
}
