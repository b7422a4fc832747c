// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # preprocess
//!
//! Decodes arbitrary image bytes into the fixed `[1, H, W, 3]` f32 tensor
//! the model backend consumes.
//!
//! The transform is pure and deterministic: identical input bytes always
//! produce a bit-identical tensor. Two properties are deliberate modeling
//! choices inherited from how the reference artifact was trained and must
//! not be "fixed":
//!
//! - Any alpha channel or grayscale input is collapsed to 3-channel RGB.
//! - The resize stretches to the target square; aspect ratio is discarded.

use image::imageops::FilterType;
use tensor_core::{Shape, Tensor};

/// Target spatial height for model input.
pub const TARGET_HEIGHT: u32 = 224;

/// Target spatial width for model input.
pub const TARGET_WIDTH: u32 = 224;

/// Number of color channels after normalization.
pub const CHANNELS: u32 = 3;

/// Errors produced while turning request bytes into a tensor.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// The bytes are not a decodable image (unknown format, truncated, or
    /// corrupt). Always a client-input problem, never a server fault.
    #[error("cannot decode image: {0}")]
    DecodeError(String),
}

/// Decodes `bytes` and produces a `[1, 224, 224, 3]` f32 tensor with
/// elements in `[0, 1]`.
///
/// Pipeline: guess format from magic bytes → decode → force RGB →
/// `resize_exact` with triangle (bilinear) filtering → scale by `1/255` →
/// prepend the batch dimension.
///
/// # Errors
/// [`PreprocessError::DecodeError`] if the buffer is not a recognizable,
/// complete image.
pub fn preprocess(bytes: &[u8]) -> Result<Tensor, PreprocessError> {
    preprocess_to(bytes, TARGET_HEIGHT, TARGET_WIDTH)
}

/// Same as [`preprocess`] but with an explicit target geometry, for tests
/// and tooling that work with smaller fixtures.
pub fn preprocess_to(bytes: &[u8], height: u32, width: u32) -> Result<Tensor, PreprocessError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PreprocessError::DecodeError(e.to_string()))?;

    // RGB conversion first, then a stretch resize. Triangle filtering is
    // deterministic for a given input, which the pipeline relies on.
    let rgb = img.to_rgb8();
    let resized = image::imageops::resize(&rgb, width, height, FilterType::Triangle);

    let mut data = Vec::with_capacity((height * width * CHANNELS) as usize);
    for pixel in resized.pixels() {
        data.push(pixel.0[0] as f32 / 255.0);
        data.push(pixel.0[1] as f32 / 255.0);
        data.push(pixel.0[2] as f32 / 255.0);
    }

    let shape = Shape::image(1, height as usize, width as usize, CHANNELS as usize);
    // Element count is exact by construction.
    Ok(Tensor::from_vec(shape, data).expect("pixel count matches shape"))
}
