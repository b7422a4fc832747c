// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Fixed-shape f32 tensors for the image-classification pipeline.
//!
//! This crate provides:
//! - [`Tensor`] — an owned, contiguous f32 tensor with an exact shape.
//! - [`Shape`] — runtime shape descriptors with NHWC image helpers.
//! - [`DType`] — element types an artifact may be serialized in (f32, f16).
//! - [`softmax_in_place`] and [`argmax`] — the two numeric helpers the
//!   classifier needs for score vectors.
//!
//! The pipeline computes in f32 end to end; [`DType`] exists only so the
//! artifact converter can describe reduced-precision serializations.

mod dtype;
mod error;
mod numeric;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use numeric::{argmax, softmax_in_place};
pub use shape::Shape;
pub use tensor::Tensor;
