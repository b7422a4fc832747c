// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction and numeric helpers.

use crate::Shape;

/// Errors that can occur when constructing or operating on tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided element buffer does not match the shape's element count.
    #[error("element count mismatch for shape {shape}: expected {expected}, got {actual}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },
}
