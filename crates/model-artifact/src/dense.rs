// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The production backend: a dense classification head.

use crate::{ArtifactError, Backend, BackendError};
use tensor_core::{softmax_in_place, Shape, Tensor};

/// A dense (fully connected) classification head.
///
/// Computes `softmax(x · W + b)` where `x` is the flattened input image,
/// `W` is `[features, classes]` in row-major order, and `b` is `[classes]`.
/// Weights are held in f32 regardless of how the artifact was serialized;
/// the loader widens reduced-precision variants before construction.
pub struct DenseBackend {
    name: String,
    input_shape: Shape,
    classes: usize,
    /// Row-major `[features, classes]`: `weight[i * classes + c]`.
    weight: Vec<f32>,
    bias: Vec<f32>,
}

impl DenseBackend {
    /// Builds a backend from its parts, checking internal consistency.
    pub fn new(
        name: String,
        input_shape: Shape,
        classes: usize,
        weight: Vec<f32>,
        bias: Vec<f32>,
    ) -> Result<Self, ArtifactError> {
        let features = input_shape.num_elements();
        if weight.len() != features * classes {
            return Err(ArtifactError::Invalid(format!(
                "head.weight has {} elements, expected {} ({} features x {} classes)",
                weight.len(),
                features * classes,
                features,
                classes,
            )));
        }
        if bias.len() != classes {
            return Err(ArtifactError::Invalid(format!(
                "head.bias has {} elements, expected {}",
                bias.len(),
                classes,
            )));
        }
        Ok(Self {
            name,
            input_shape,
            classes,
            weight,
            bias,
        })
    }

    /// The number of learned parameters in this head.
    pub fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Decomposes the backend into `(weight, bias, input_shape, classes)`.
    ///
    /// Used by the artifact converter to re-serialize at a different
    /// precision without re-deriving the geometry.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Shape, usize) {
        (self.weight, self.bias, self.input_shape, self.classes)
    }
}

impl Backend for DenseBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_shape(&self) -> &Shape {
        &self.input_shape
    }

    fn output_width(&self) -> usize {
        self.classes
    }

    fn predict(&self, input: &Tensor) -> Result<Vec<f32>, BackendError> {
        if input.shape() != &self.input_shape {
            return Err(BackendError::ShapeMismatch {
                expected: self.input_shape.clone(),
                actual: input.shape().clone(),
            });
        }

        let x = input.data();
        let mut logits = self.bias.clone();
        for (i, &xi) in x.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let row = &self.weight[i * self.classes..(i + 1) * self.classes];
            for (c, &w) in row.iter().enumerate() {
                logits[c] += xi * w;
            }
        }

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(BackendError::Inference {
                backend: self.name.clone(),
                detail: "non-finite logits".into(),
            });
        }

        softmax_in_place(&mut logits);
        Ok(logits)
    }
}

impl std::fmt::Debug for DenseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseBackend")
            .field("name", &self.name)
            .field("input_shape", &self.input_shape)
            .field("classes", &self.classes)
            .field("parameters", &self.num_parameters())
            .finish()
    }
}
