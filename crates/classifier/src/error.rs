// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The closed error taxonomy for a classification request.

use model_artifact::{ArtifactError, BackendError};
use preprocess::PreprocessError;

/// Everything that can go wrong between receiving image bytes and
/// producing a prediction.
///
/// Each variant keeps its stage distinct so callers can separate
/// client-input failures ([`Decode`](ClassifyError::Decode)) from
/// backend and configuration failures. No variant is recoverable for the
/// current request, and no default prediction is ever substituted.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The uploaded bytes are not a decodable image.
    #[error(transparent)]
    Decode(#[from] PreprocessError),

    /// The artifact failed to load (missing, corrupt, or incompatible).
    /// Lazy initialization does not cache this; a later request retries.
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ArtifactError),

    /// The backend rejected the tensor shape or failed during inference.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Inference exceeded the caller-supplied latency bound.
    #[error("inference timed out after {timeout_ms} ms")]
    InferenceTimeout { timeout_ms: u64 },

    /// The inference task itself failed to run (panic or cancellation).
    #[error("inference task failed: {0}")]
    TaskFailed(String),

    /// The loaded backend disagrees with the serving assumptions
    /// (validator failure). Fatal at startup, never a per-request state.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClassifyError {
    /// `true` when the failure was caused by the client's input rather
    /// than the server's model or configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClassifyError::Decode(_))
    }
}
