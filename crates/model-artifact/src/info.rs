// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact inspection for diagnostics and the `inspect` CLI command.

use crate::loader::serialized_dtype;
use crate::{load_backend, ArtifactError, Backend};
use std::path::Path;
use tensor_core::{DType, Shape};

/// A summary of a loadable artifact.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactInfo {
    /// Model name from artifact metadata.
    pub name: String,
    /// Declared input shape, batch dimension included.
    pub input_shape: Shape,
    /// Number of classes in the score vector.
    pub output_width: usize,
    /// Total learned parameters in the classification head.
    pub num_parameters: usize,
    /// Element precision the file is serialized in.
    pub dtype: DType,
    /// Serialized file size in bytes.
    pub file_size_bytes: u64,
}

/// Loads the artifact at `path` and summarises it.
///
/// This exercises the full load path, so an artifact that inspects cleanly
/// will also serve.
pub fn inspect_artifact(path: &Path) -> Result<ArtifactInfo, ArtifactError> {
    let backend = load_backend(path)?;
    let dtype = serialized_dtype(path)?;
    let file_size_bytes = std::fs::metadata(path)
        .map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
        .len();

    Ok(ArtifactInfo {
        name: backend.name().to_string(),
        input_shape: backend.input_shape().clone(),
        output_width: backend.output_width(),
        num_parameters: backend.num_parameters(),
        dtype,
        file_size_bytes,
    })
}

impl std::fmt::Display for ArtifactInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: input {}, {} classes, {} parameters, {} elements, {:.2} MB on disk",
            self.name,
            self.input_shape,
            self.output_width,
            self.num_parameters,
            self.dtype,
            self.file_size_bytes as f64 / (1024.0 * 1024.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::write_artifact;
    use tensor_core::DType;

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.safetensors");
        let shape = Shape::image(1, 2, 2, 1);
        write_artifact(&path, "tiny", &shape, 3, &[0.0; 12], &[0.0; 3], DType::F32).unwrap();

        let info = inspect_artifact(&path).unwrap();
        assert_eq!(info.name, "tiny");
        assert_eq!(info.output_width, 3);
        assert_eq!(info.num_parameters, 15);
        assert_eq!(info.dtype, DType::F32);
        assert!(info.file_size_bytes > 0);
        assert!(info.to_string().contains("tiny"));
    }

    #[test]
    fn test_inspect_reports_f16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m16.safetensors");
        let shape = Shape::image(1, 2, 2, 1);
        write_artifact(&path, "tiny", &shape, 3, &[0.0; 12], &[0.0; 3], DType::F16).unwrap();
        assert_eq!(inspect_artifact(&path).unwrap().dtype, DType::F16);
    }

    #[test]
    fn test_inspect_missing() {
        assert!(inspect_artifact(Path::new("/missing.safetensors")).is_err());
    }
}
