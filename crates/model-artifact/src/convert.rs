// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact precision conversion.
//!
//! Produces a size-optimized variant of an artifact by re-serializing its
//! tensors at a different element precision. Tensor names, shapes, and
//! metadata are preserved, so a converted artifact loads through the same
//! [`crate::load_backend`] path and must pass the same compatibility
//! validation as the original.

use crate::loader::write_artifact;
use crate::{load_backend, ArtifactError, Backend};
use std::path::Path;
use tensor_core::DType;

/// Converts the artifact at `src` to `dst` with elements stored as `dtype`.
///
/// The conversion is value-level only: weights are widened to f32 and
/// re-narrowed, so converting f16 → f32 does not recover precision lost
/// by an earlier narrowing. Returns the loaded source backend's name.
pub fn convert_artifact(src: &Path, dst: &Path, dtype: DType) -> Result<String, ArtifactError> {
    let backend = load_backend(src)?;
    let name = backend.name().to_string();

    let (weight, bias, input_shape, classes) = backend.into_parts();
    write_artifact(dst, &name, &input_shape, classes, &weight, &bias, dtype)?;

    tracing::info!(
        "converted '{}' -> {} ({} elements as {})",
        src.display(),
        dst.display(),
        weight.len() + bias.len(),
        dtype,
    );
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Shape, Tensor};

    fn write_source(path: &Path) {
        let shape = Shape::image(1, 4, 4, 3);
        let features = shape.num_elements();
        let weight: Vec<f32> = (0..features * 4).map(|i| (i % 17) as f32 * 0.013).collect();
        let bias = vec![0.05, -0.02, 0.0, 0.11];
        write_artifact(path, "retina", &shape, 4, &weight, &bias, DType::F32).unwrap();
    }

    #[test]
    fn test_convert_preserves_contract() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("model.safetensors");
        let dst = dir.path().join("model-f16.safetensors");
        write_source(&src);

        let name = convert_artifact(&src, &dst, DType::F16).unwrap();
        assert_eq!(name, "retina");

        let original = load_backend(&src).unwrap();
        let converted = load_backend(&dst).unwrap();
        assert_eq!(converted.input_shape(), original.input_shape());
        assert_eq!(converted.output_width(), original.output_width());

        // Smaller on disk: f16 elements are half the size.
        let src_len = std::fs::metadata(&src).unwrap().len();
        let dst_len = std::fs::metadata(&dst).unwrap().len();
        assert!(dst_len < src_len);
    }

    #[test]
    fn test_converted_predictions_stay_close() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("model.safetensors");
        let dst = dir.path().join("model-f16.safetensors");
        write_source(&src);
        convert_artifact(&src, &dst, DType::F16).unwrap();

        let original = load_backend(&src).unwrap();
        let converted = load_backend(&dst).unwrap();

        let shape = Shape::image(1, 4, 4, 3);
        let n = shape.num_elements();
        let input =
            Tensor::from_vec(shape, (0..n).map(|i| (i % 255) as f32 / 255.0).collect()).unwrap();

        let a = original.predict(&input).unwrap();
        let b = converted.predict(&input).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-2);
        }
    }

    #[test]
    fn test_convert_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_artifact(
            Path::new("/nonexistent.safetensors"),
            &dir.path().join("out.safetensors"),
            DType::F16,
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }
}
