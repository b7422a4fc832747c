// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The lazy, exactly-once model handle.

use model_artifact::{load_backend, ArtifactError, Backend};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Loader closure: produces a ready backend or the load error.
type Loader = dyn Fn() -> Result<Arc<dyn Backend>, ArtifactError> + Send + Sync;

/// An explicit, injectable handle to the (lazily loaded) model backend.
///
/// The first `get()` runs the loader; concurrent callers arriving during
/// an in-flight load wait for it rather than starting a second one.
/// A successful load is cached for the process lifetime and subsequent
/// reads are lock-free. A *failed* load is not cached — the error
/// propagates to the caller that observed it and a later `get()` retries.
///
/// This replaces the module-global mutable singleton pattern with state
/// owned by whoever constructs the serving pipeline.
pub struct LazyModel {
    cell: OnceCell<Arc<dyn Backend>>,
    loader: Box<Loader>,
}

impl LazyModel {
    /// Creates a handle over an arbitrary loader. Used directly by tests
    /// (fakes with load counters) and by tooling with pre-built backends.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Backend>, ArtifactError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            loader: Box::new(loader),
        }
    }

    /// Creates a handle that loads the SafeTensors artifact at `path` on
    /// first use.
    pub fn from_path(path: PathBuf) -> Self {
        Self::new(move || {
            tracing::info!("loading model artifact from {}", path.display());
            load_backend(&path).map(|b| Arc::new(b) as Arc<dyn Backend>)
        })
    }

    /// Wraps an already-loaded backend. The loader never runs.
    pub fn preloaded(backend: Arc<dyn Backend>) -> Self {
        let cell = OnceCell::new();
        cell.set(backend).ok();
        Self {
            cell,
            loader: Box::new(|| unreachable!("preloaded handle never loads")),
        }
    }

    /// Returns the loaded backend, loading it first if necessary.
    ///
    /// Guarantees under concurrency: at most one load executes at a time,
    /// and every caller observes either "loading → wait" or "loaded →
    /// use", never a partially initialized handle.
    pub async fn get(&self) -> Result<Arc<dyn Backend>, ArtifactError> {
        let backend = self
            .cell
            .get_or_try_init(|| async { (self.loader)() })
            .await?;
        Ok(Arc::clone(backend))
    }

    /// `true` once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for LazyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyModel")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tensor_core::{Shape, Tensor};

    /// Backend double returning a fixed score vector.
    #[derive(Debug)]
    struct FixedBackend {
        input_shape: Shape,
        scores: Vec<f32>,
    }

    impl FixedBackend {
        fn new(scores: Vec<f32>) -> Self {
            Self {
                input_shape: Shape::image(1, 224, 224, 3),
                scores,
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
        fn predict(&self, _input: &Tensor) -> Result<Vec<f32>, model_artifact::BackendError> {
            Ok(self.scores.clone())
        }
    }

    #[tokio::test]
    async fn test_lazy_until_first_get() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let model = LazyModel::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedBackend::new(vec![0.25; 4])) as Arc<dyn Backend>)
        });

        assert!(!model.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        model.get().await.unwrap();
        assert!(model.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        // Second get reuses the cached backend.
        model.get().await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let model = LazyModel::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(ArtifactError::Invalid("flaky first load".into()))
            } else {
                Ok(Arc::new(FixedBackend::new(vec![0.25; 4])) as Arc<dyn Backend>)
            }
        });

        // First call fails and must not poison the cell.
        assert!(model.get().await.is_err());
        assert!(!model.is_loaded());

        // Retry succeeds.
        assert!(model.get().await.is_ok());
        assert!(model.is_loaded());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded() {
        let model =
            LazyModel::preloaded(Arc::new(FixedBackend::new(vec![0.7, 0.1, 0.1, 0.1])));
        assert!(model.is_loaded());
        let backend = model.get().await.unwrap();
        assert_eq!(backend.output_width(), 4);
    }
}
