// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact loading and writing.
//!
//! An artifact is a single SafeTensors file:
//! - `head.weight` — `[features, classes]`
//! - `head.bias` — `[classes]`
//! - header `__metadata__`:
//!   `format`, `name`, `input_height`, `input_width`, `input_channels`
//!
//! The file is memory-mapped and parsed in place; element data is widened
//! to f32 at load time, so f16 artifacts produced by [`crate::convert_artifact`]
//! load through the same path. The declared input shape comes from the
//! metadata and must agree with the weight matrix — a disagreement means
//! the artifact was produced incorrectly and is rejected outright.

use crate::{ArtifactError, DenseBackend};
use half::f16;
use safetensors::{Dtype, SafeTensors};
use std::collections::HashMap;
use std::path::Path;
use tensor_core::{DType, Shape};

/// Format tag stamped into artifact metadata; the loader refuses files
/// carrying any other tag.
pub const FORMAT_TAG: &str = "retina-dense-v1";

/// Name of the weight tensor.
const WEIGHT_TENSOR: &str = "head.weight";

/// Name of the bias tensor.
const BIAS_TENSOR: &str = "head.bias";

/// Loads a classifier artifact into a ready [`DenseBackend`].
///
/// Fails with [`ArtifactError`] if the file is missing, unreadable,
/// malformed, or violates the classifier-head contract. No partial state
/// survives a failed load; a later call may retry.
pub fn load_backend(path: &Path) -> Result<DenseBackend, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        detail: format!("mmap failed: {e}"),
    })?;

    let tensors = SafeTensors::deserialize(&mmap)
        .map_err(|e| ArtifactError::Parse(format!("SafeTensors parse error: {e}")))?;

    let (_, header) = SafeTensors::read_metadata(&mmap)
        .map_err(|e| ArtifactError::Parse(format!("SafeTensors header error: {e}")))?;
    let meta = header
        .metadata()
        .as_ref()
        .ok_or_else(|| ArtifactError::Invalid("artifact carries no metadata".into()))?;

    let format = metadata_value(meta, "format")?;
    if format != FORMAT_TAG {
        return Err(ArtifactError::Invalid(format!(
            "unrecognised artifact format '{format}', expected '{FORMAT_TAG}'"
        )));
    }

    let name = meta
        .get("name")
        .cloned()
        .unwrap_or_else(|| "unnamed".to_string());
    let height = metadata_usize(meta, "input_height")?;
    let width = metadata_usize(meta, "input_width")?;
    let channels = metadata_usize(meta, "input_channels")?;
    let input_shape = Shape::image(1, height, width, channels);
    let features = height * width * channels;

    // Weight matrix: [features, classes].
    let weight_view = tensors
        .tensor(WEIGHT_TENSOR)
        .map_err(|_| ArtifactError::MissingTensor {
            name: WEIGHT_TENSOR.into(),
        })?;
    let weight_dims = weight_view.shape().to_vec();
    if weight_dims.len() != 2 {
        return Err(ArtifactError::Invalid(format!(
            "{WEIGHT_TENSOR} has rank {}, expected 2",
            weight_dims.len(),
        )));
    }
    if weight_dims[0] != features {
        return Err(ArtifactError::Invalid(format!(
            "{WEIGHT_TENSOR} has {} rows but metadata declares {} input features \
             ({height}x{width}x{channels})",
            weight_dims[0], features,
        )));
    }
    let classes = weight_dims[1];
    let weight = widen_to_f32(WEIGHT_TENSOR, weight_view.dtype(), weight_view.data())?;

    // Bias vector: [classes].
    let bias_view = tensors
        .tensor(BIAS_TENSOR)
        .map_err(|_| ArtifactError::MissingTensor {
            name: BIAS_TENSOR.into(),
        })?;
    if bias_view.shape() != &[classes][..] {
        return Err(ArtifactError::Invalid(format!(
            "{BIAS_TENSOR} has shape {:?}, expected [{classes}]",
            bias_view.shape(),
        )));
    }
    let bias = widen_to_f32(BIAS_TENSOR, bias_view.dtype(), bias_view.data())?;

    tracing::info!(
        "loaded artifact '{}' from {}: input {}, {} classes, {} dtype",
        name,
        path.display(),
        input_shape,
        classes,
        dtype_label(weight_view.dtype()),
    );

    DenseBackend::new(name, input_shape, classes, weight, bias)
}

/// Writes a classifier artifact to `path`.
///
/// `input_shape` must be the batched NHWC shape the head was trained for;
/// the batch dimension is not serialized. Used by the converter and by
/// tooling that synthesizes artifacts.
pub fn write_artifact(
    path: &Path,
    name: &str,
    input_shape: &Shape,
    classes: usize,
    weight: &[f32],
    bias: &[f32],
    dtype: DType,
) -> Result<(), ArtifactError> {
    let dims = input_shape.dims();
    if dims.len() != 4 || dims[0] != 1 {
        return Err(ArtifactError::Invalid(format!(
            "input shape must be [1, H, W, C], got {input_shape}"
        )));
    }
    let features = dims[1] * dims[2] * dims[3];
    if weight.len() != features * classes || bias.len() != classes {
        return Err(ArtifactError::Invalid(format!(
            "weight/bias element counts ({}, {}) do not match {} features x {} classes",
            weight.len(),
            bias.len(),
            features,
            classes,
        )));
    }

    let (st_dtype, weight_bytes, bias_bytes) = match dtype {
        DType::F32 => (Dtype::F32, f32_bytes(weight), f32_bytes(bias)),
        DType::F16 => (Dtype::F16, f16_bytes(weight), f16_bytes(bias)),
    };

    let weight_view =
        safetensors::tensor::TensorView::new(st_dtype, vec![features, classes], &weight_bytes)
            .map_err(|e| ArtifactError::Serialize(e.to_string()))?;
    let bias_view = safetensors::tensor::TensorView::new(st_dtype, vec![classes], &bias_bytes)
        .map_err(|e| ArtifactError::Serialize(e.to_string()))?;

    let mut meta = HashMap::new();
    meta.insert("format".to_string(), FORMAT_TAG.to_string());
    meta.insert("name".to_string(), name.to_string());
    meta.insert("input_height".to_string(), dims[1].to_string());
    meta.insert("input_width".to_string(), dims[2].to_string());
    meta.insert("input_channels".to_string(), dims[3].to_string());
    meta.insert("dtype".to_string(), dtype.as_str().to_string());

    safetensors::serialize_to_file(
        [(WEIGHT_TENSOR, weight_view), (BIAS_TENSOR, bias_view)],
        &Some(meta),
        path,
    )
    .map_err(|e| ArtifactError::Serialize(e.to_string()))
}

/// Reports the element precision the artifact at `path` is serialized in,
/// taken from the weight tensor itself.
pub fn serialized_dtype(path: &Path) -> Result<DType, ArtifactError> {
    let file = std::fs::File::open(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        detail: format!("mmap failed: {e}"),
    })?;
    let tensors = SafeTensors::deserialize(&mmap)
        .map_err(|e| ArtifactError::Parse(format!("SafeTensors parse error: {e}")))?;
    let view = tensors
        .tensor(WEIGHT_TENSOR)
        .map_err(|_| ArtifactError::MissingTensor {
            name: WEIGHT_TENSOR.into(),
        })?;

    match view.dtype() {
        Dtype::F32 => Ok(DType::F32),
        Dtype::F16 => Ok(DType::F16),
        other => Err(ArtifactError::UnsupportedDType {
            name: WEIGHT_TENSOR.into(),
            dtype: format!("{other:?}"),
        }),
    }
}

// ── Private helpers ────────────────────────────────────────────

fn metadata_value<'a>(
    meta: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, ArtifactError> {
    meta.get(key)
        .map(String::as_str)
        .ok_or_else(|| ArtifactError::Invalid(format!("metadata key '{key}' is missing")))
}

fn metadata_usize(meta: &HashMap<String, String>, key: &str) -> Result<usize, ArtifactError> {
    metadata_value(meta, key)?.parse().map_err(|_| {
        ArtifactError::Invalid(format!(
            "metadata key '{key}' is not a valid dimension: '{}'",
            meta[key],
        ))
    })
}

/// Widens serialized element data to f32. SafeTensors data is little-endian.
fn widen_to_f32(name: &str, dtype: Dtype, data: &[u8]) -> Result<Vec<f32>, ArtifactError> {
    match dtype {
        Dtype::F32 => Ok(data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()),
        Dtype::F16 => Ok(data
            .chunks_exact(2)
            .map(|c| f16::from_le_bytes([c[0], c[1]]).to_f32())
            .collect()),
        other => Err(ArtifactError::UnsupportedDType {
            name: name.into(),
            dtype: format!("{other:?}"),
        }),
    }
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn f16_bytes(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| f16::from_f32(*v).to_le_bytes())
        .collect()
}

fn dtype_label(dtype: Dtype) -> &'static str {
    match dtype {
        Dtype::F32 => "f32",
        Dtype::F16 => "f16",
        _ => "other",
    }
}
