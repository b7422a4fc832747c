// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for artifact loading and conversion.

use std::path::PathBuf;

/// Errors that can occur when loading, inspecting, or converting an artifact.
///
/// All of these surface to callers as "model load" failures: the artifact at
/// the configured path is missing, unreadable, or does not describe a model
/// this pipeline can serve.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact file does not exist at the configured path.
    #[error("artifact not found: {path}")]
    NotFound { path: PathBuf },

    /// The artifact file could not be read or mapped.
    #[error("cannot read artifact '{path}': {detail}")]
    Io { path: PathBuf, detail: String },

    /// The SafeTensors container is malformed.
    #[error("failed to parse artifact: {0}")]
    Parse(String),

    /// A required tensor is missing from the artifact.
    #[error("artifact is missing tensor '{name}'")]
    MissingTensor { name: String },

    /// A tensor uses an element type the loader cannot widen to f32.
    #[error("unsupported element type {dtype} in tensor '{name}'")]
    UnsupportedDType { name: String, dtype: String },

    /// The artifact parsed but violates the classifier-head contract.
    #[error("invalid artifact: {0}")]
    Invalid(String),

    /// Writing a converted artifact failed.
    #[error("failed to serialize artifact: {0}")]
    Serialize(String),
}
