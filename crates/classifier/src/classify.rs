// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The classification pipeline: bytes in, ranked distribution out.

use crate::{label_name, validate_compatibility, ClassifyError, LazyModel, LABELS};
use std::time::Duration;
use tensor_core::{argmax, Tensor};

/// One label with its score, in fixed label-table order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LabelScore {
    /// Class name from the label table.
    pub label: &'static str,
    /// Softmax-normalized score in `[0, 1]`.
    pub score: f32,
}

/// The result of classifying one image.
///
/// Derived per request, never persisted. `distribution` always holds
/// exactly the label-table entries in table order, and the entry with the
/// maximum score is `predicted_class`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PredictionResult {
    /// Top-1 class name.
    pub predicted_class: &'static str,
    /// The top-1 score, reported exactly as the backend produced it.
    pub confidence: f32,
    /// Full per-class distribution in fixed label order.
    pub distribution: Vec<LabelScore>,
}

/// How far a score vector's sum may drift from 1.0 before the backend
/// contract is considered violated (logged, not rejected).
const SUM_WARN_TOLERANCE: f32 = 1e-3;

/// Orchestrates preprocessing, lazy model acquisition, and prediction.
///
/// Stateless apart from the shared [`LazyModel`]; a single `Classifier`
/// serves unlimited concurrent requests.
pub struct Classifier {
    model: LazyModel,
    timeout: Option<Duration>,
}

impl Classifier {
    /// Creates a classifier over the given model handle with no inference
    /// timeout.
    pub fn new(model: LazyModel) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    /// Bounds each backend call by `timeout`; exceeding it yields
    /// [`ClassifyError::InferenceTimeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the shared model handle.
    pub fn model(&self) -> &LazyModel {
        &self.model
    }

    /// Forces the model to load now and validates its compatibility.
    ///
    /// Serving entry points call this before accepting traffic so that a
    /// misconfigured artifact fails the process at startup instead of
    /// failing every request.
    pub async fn warm_up(&self) -> Result<(), ClassifyError> {
        let backend = self.model.get().await?;
        validate_compatibility(backend.as_ref())
    }

    /// Classifies one image: preprocess → predict → label mapping.
    ///
    /// No stage is retried; the first failure is terminal for this
    /// request and is returned as the matching [`ClassifyError`] variant.
    pub async fn classify(&self, bytes: &[u8]) -> Result<PredictionResult, ClassifyError> {
        let tensor = preprocess::preprocess(bytes)?;
        let backend = self.model.get().await?;
        let scores = self.run_inference(backend, tensor).await?;

        if scores.len() != LABELS.len() {
            // The startup validator prevents this for served artifacts;
            // reaching it means a handle was injected unvalidated.
            return Err(ClassifyError::Configuration(format!(
                "backend returned {} scores for {} labels",
                scores.len(),
                LABELS.len(),
            )));
        }

        let sum: f32 = scores.iter().sum();
        if (sum - 1.0).abs() > SUM_WARN_TOLERANCE {
            // Contract says the backend output is already normalized; we
            // report it as-is rather than renormalizing.
            tracing::warn!("backend scores sum to {sum}, expected ~1.0");
        }

        let best = argmax(&scores).expect("label table is non-empty");
        let predicted_class = label_name(best).expect("argmax index within label table");

        let distribution = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| LabelScore {
                label: LABELS[i],
                score,
            })
            .collect();

        Ok(PredictionResult {
            predicted_class,
            confidence: scores[best],
            distribution,
        })
    }

    /// Runs the backend on a blocking worker, bounded by the configured
    /// timeout.
    async fn run_inference(
        &self,
        backend: std::sync::Arc<dyn model_artifact::Backend>,
        tensor: Tensor,
    ) -> Result<Vec<f32>, ClassifyError> {
        let task = tokio::task::spawn_blocking(move || backend.predict(&tensor));

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                ClassifyError::InferenceTimeout {
                    timeout_ms: limit.as_millis() as u64,
                }
            })?,
            None => task.await,
        };

        let scores = joined
            .map_err(|e| ClassifyError::TaskFailed(e.to_string()))?
            .map_err(ClassifyError::from)?;
        Ok(scores)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_artifact::{Backend, BackendError};
    use std::sync::Arc;
    use tensor_core::Shape;

    /// Backend double returning a fixed score vector, optionally slowly.
    struct FixedBackend {
        input_shape: Shape,
        scores: Vec<f32>,
        delay: Option<Duration>,
    }

    impl FixedBackend {
        fn new(scores: Vec<f32>) -> Self {
            Self {
                input_shape: Shape::image(1, 224, 224, 3),
                scores,
                delay: None,
            }
        }

        fn slow(scores: Vec<f32>, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(scores)
            }
        }
    }

    impl Backend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }
        fn input_shape(&self) -> &Shape {
            &self.input_shape
        }
        fn output_width(&self) -> usize {
            self.scores.len()
        }
        fn predict(&self, _input: &Tensor) -> Result<Vec<f32>, BackendError> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            Ok(self.scores.clone())
        }
    }

    fn classifier_with(scores: Vec<f32>) -> Classifier {
        Classifier::new(LazyModel::preloaded(Arc::new(FixedBackend::new(scores))))
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([120, 80, 40]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_top1_and_distribution() {
        let classifier = classifier_with(vec![0.7, 0.1, 0.1, 0.1]);
        let result = classifier.classify(&png_bytes()).await.unwrap();

        assert_eq!(result.predicted_class, "Cataract");
        assert!((result.confidence - 0.7).abs() < 1e-6);
        assert_eq!(result.distribution.len(), 4);
        assert_eq!(result.distribution[0].label, "Cataract");
        assert_eq!(result.distribution[3].label, "Normal");
        assert!((result.distribution[3].score - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_uniform_tie_picks_first_label() {
        let classifier = classifier_with(vec![0.25; 4]);
        let result = classifier.classify(&png_bytes()).await.unwrap();
        assert_eq!(result.predicted_class, "Cataract");
    }

    #[tokio::test]
    async fn test_undecodable_bytes_are_client_error() {
        let classifier = classifier_with(vec![0.25; 4]);
        let err = classifier.classify(b"not an image").await.unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[tokio::test]
    async fn test_decode_failure_never_touches_model() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let classifier = Classifier::new(LazyModel::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedBackend::new(vec![0.25; 4])) as Arc<dyn Backend>)
        }));

        let err = classifier.classify(&[]).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_inference_timeout() {
        let backend = FixedBackend::slow(vec![0.25; 4], Duration::from_millis(200));
        let classifier = Classifier::new(LazyModel::preloaded(Arc::new(backend)))
            .with_timeout(Duration::from_millis(10));

        let err = classifier.classify(&png_bytes()).await.unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InferenceTimeout { timeout_ms: 10 }
        ));
    }

    #[tokio::test]
    async fn test_wrong_score_count_is_configuration_error() {
        let classifier = classifier_with(vec![0.5, 0.5]);
        let err = classifier.classify(&png_bytes()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_warm_up_validates_geometry() {
        let classifier = classifier_with(vec![0.25; 4]);
        assert!(classifier.warm_up().await.is_ok());

        let wrong = Classifier::new(LazyModel::preloaded(Arc::new(FixedBackend {
            input_shape: Shape::image(1, 299, 299, 3),
            scores: vec![0.25; 4],
            delay: None,
        })));
        assert!(matches!(
            wrong.warm_up().await.unwrap_err(),
            ClassifyError::Configuration(_)
        ));
    }
}
