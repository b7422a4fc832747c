// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The compatibility validator: the trust boundary between a configured
//! artifact and the serving assumptions compiled into this binary.

use crate::{ClassifyError, LABELS};
use model_artifact::Backend;
use tensor_core::Shape;

/// Checks that `backend` matches the geometry the preprocessor produces
/// and the label table expects.
///
/// A mismatch means the configured artifact was not trained for this
/// pipeline. This must run once at startup (or first load) and be treated
/// as fatal — deferring it would turn a deployment mistake into a
/// per-request failure.
pub fn validate_compatibility(backend: &dyn Backend) -> Result<(), ClassifyError> {
    let expected = Shape::image(
        1,
        preprocess::TARGET_HEIGHT as usize,
        preprocess::TARGET_WIDTH as usize,
        preprocess::CHANNELS as usize,
    );

    if backend.input_shape() != &expected {
        return Err(ClassifyError::Configuration(format!(
            "backend '{}' declares input shape {}, serving requires {}",
            backend.name(),
            backend.input_shape(),
            expected,
        )));
    }

    if backend.output_width() != LABELS.len() {
        return Err(ClassifyError::Configuration(format!(
            "backend '{}' declares {} output classes, label table has {}",
            backend.name(),
            backend.output_width(),
            LABELS.len(),
        )));
    }

    Ok(())
}
