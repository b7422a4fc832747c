// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # classifier
//!
//! The orchestration layer of the serving pipeline:
//!
//! - [`LABELS`] — the fixed, ordered class-name table.
//! - [`LazyModel`] — an explicit, injectable model handle with exactly-once
//!   concurrent initialization. A failed load is propagated, never cached,
//!   so a later caller may retry.
//! - [`Classifier`] — preprocess → predict → label mapping. All stages run
//!   once per request with no retries; a failure at any stage is terminal
//!   for that request.
//! - [`validate_compatibility`] — the startup gate that rejects artifacts
//!   whose declared geometry disagrees with the serving assumptions baked
//!   into the preprocessor and label table.

mod classify;
mod compat;
mod error;
mod handle;
mod labels;

pub use classify::{Classifier, LabelScore, PredictionResult};
pub use compat::validate_compatibility;
pub use error::ClassifyError;
pub use handle::LazyModel;
pub use labels::{label_name, LABELS};
