// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The opaque-backend contract.

use tensor_core::{Shape, Tensor};

/// Errors a backend can report during a single prediction.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The input tensor's shape disagrees with the backend's declared input
    /// shape. Checked explicitly before any computation runs.
    #[error("input shape mismatch: backend expects {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    /// The backend failed for a reason other than shape.
    #[error("inference failed in backend '{backend}': {detail}")]
    Inference { backend: String, detail: String },
}

/// An opaque inference engine: consumes a fixed-shape tensor, returns one
/// softmax-normalized score per class.
///
/// Implementations must be stateless per call — `predict` takes `&self`
/// and never mutates backend state, so a loaded backend can be shared
/// across unlimited concurrent callers without synchronization.
///
/// The contract callers rely on:
/// - `predict` rejects any tensor whose shape differs from
///   [`input_shape`](Backend::input_shape) with
///   [`BackendError::ShapeMismatch`], never reshaping silently.
/// - The returned vector has exactly [`output_width`](Backend::output_width)
///   elements and is already normalized to a probability distribution.
pub trait Backend: Send + Sync {
    /// A short identifier for logs and error messages.
    fn name(&self) -> &str;

    /// The exact input shape this backend accepts, batch dimension included.
    fn input_shape(&self) -> &Shape;

    /// The number of classes in the score vector.
    fn output_width(&self) -> usize;

    /// Runs one inference pass. Stateless; safe for concurrent callers.
    fn predict(&self, input: &Tensor) -> Result<Vec<f32>, BackendError>;
}
