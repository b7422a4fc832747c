// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests for the classifier crate: concurrent lazy loading
//! and the full bytes-to-prediction path over a real on-disk artifact.

use classifier::{Classifier, LazyModel, LABELS};
use model_artifact::{write_artifact, Backend};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tensor_core::{DType, Shape};

/// Writes a serving-geometry artifact whose bias strongly favours
/// `favoured` so the expected prediction is known in advance.
fn write_serving_artifact(path: &Path, favoured: usize) {
    let shape = Shape::image(1, 224, 224, 3);
    let features = 224 * 224 * 3;
    let weight = vec![0.0_f32; features * LABELS.len()];
    let mut bias = vec![0.0_f32; LABELS.len()];
    bias[favoured] = 4.0;
    write_artifact(path, "fundus-head", &shape, LABELS.len(), &weight, &bias, DType::F32)
        .unwrap();
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 48, image::Rgb([30, 140, 90]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_gets_load_exactly_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.safetensors");
    write_serving_artifact(&path, 0);

    let model = Arc::new(LazyModel::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        // Widen the race window so concurrent callers overlap the load.
        std::thread::sleep(Duration::from_millis(30));
        model_artifact::load_backend(&path).map(|b| Arc::new(b) as Arc<dyn Backend>)
    }));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let model = Arc::clone(&model);
        handles.push(tokio::spawn(async move { model.get().await.map(|b| b.output_width()) }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), LABELS.len());
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_classify_end_to_end_over_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.safetensors");
    write_serving_artifact(&path, 2);

    let classifier = Classifier::new(LazyModel::from_path(path))
        .with_timeout(Duration::from_secs(10));
    classifier.warm_up().await.unwrap();

    let result = classifier.classify(&png_bytes()).await.unwrap();
    assert_eq!(result.predicted_class, "Glaucoma");
    assert!(result.confidence > 0.9);

    assert_eq!(result.distribution.len(), LABELS.len());
    let sum: f32 = result.distribution.iter().map(|e| e.score).sum();
    assert!((sum - 1.0).abs() < 1e-4, "distribution sums to {sum}");
    for (entry, label) in result.distribution.iter().zip(LABELS) {
        assert_eq!(entry.label, label);
        assert!((0.0..=1.0).contains(&entry.score));
    }
}

#[tokio::test]
async fn test_missing_artifact_fails_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.safetensors");

    let classifier = Classifier::new(LazyModel::from_path(path.clone()));

    // First request hits the missing file.
    let err = classifier.classify(&png_bytes()).await.unwrap_err();
    assert!(!err.is_client_error());

    // The failure was not cached; once the artifact appears, requests work.
    write_serving_artifact(&path, 3);
    let result = classifier.classify(&png_bytes()).await.unwrap();
    assert_eq!(result.predicted_class, "Normal");
}

#[tokio::test]
async fn test_incompatible_artifact_rejected_at_warm_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.safetensors");

    // A 32x32 head loads fine but cannot serve 224x224 inputs.
    let shape = Shape::image(1, 32, 32, 3);
    let features = 32 * 32 * 3;
    write_artifact(
        &path,
        "small-head",
        &shape,
        LABELS.len(),
        &vec![0.0; features * LABELS.len()],
        &[0.0; 4],
        DType::F32,
    )
    .unwrap();

    let classifier = Classifier::new(LazyModel::from_path(path));
    let err = classifier.warm_up().await.unwrap_err();
    assert!(matches!(err, classifier::ClassifyError::Configuration(_)));
}
