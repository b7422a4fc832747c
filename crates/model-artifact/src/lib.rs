// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-artifact
//!
//! The artifact boundary of the serving pipeline.
//!
//! A classifier artifact is a single SafeTensors file holding a dense
//! classification head (`head.weight` `[features, classes]`, `head.bias`
//! `[classes]`) plus header metadata declaring the input geometry. This
//! crate provides:
//!
//! - [`Backend`] — the opaque-backend contract the classifier consumes:
//!   a declared input shape, a declared output width, and a stateless
//!   `predict` that returns softmax-normalized per-class scores.
//! - [`DenseBackend`] — the production backend: flatten → `W·x + b` →
//!   softmax, computed in f32.
//! - [`load_backend`] — mmap-based artifact loading ([`ArtifactError`] on
//!   a missing, corrupt, or incompatible file).
//! - [`convert_artifact`] — rewrites an artifact at reduced element
//!   precision (f16) while preserving tensor names and shapes, so the
//!   converted file passes the same compatibility checks.
//! - [`inspect_artifact`] — metadata, shapes, and parameter counts for
//!   diagnostics.

mod backend;
mod convert;
mod dense;
mod error;
mod info;
mod loader;

pub use backend::{Backend, BackendError};
pub use convert::convert_artifact;
pub use dense::DenseBackend;
pub use error::ArtifactError;
pub use info::{inspect_artifact, ArtifactInfo};
pub use loader::{load_backend, write_artifact, FORMAT_TAG};
