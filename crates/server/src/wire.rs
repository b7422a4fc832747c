// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON wire types for the prediction endpoints.

use classifier::{LabelScore, PredictionResult};
use serde::ser::{SerializeMap, Serializer};

/// Body of `GET /health`.
#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Body of a successful `POST /predict`.
///
/// `all_probabilities` is a JSON object keyed by class name. Key order
/// follows the label table, so it is serialized by hand — derive would
/// go through a map type with its own ordering.
#[derive(Debug)]
pub struct PredictResponse {
    pub predicted_class: &'static str,
    pub confidence: f32,
    pub all_probabilities: Vec<LabelScore>,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_class: result.predicted_class,
            confidence: result.confidence,
            all_probabilities: result.distribution,
        }
    }
}

impl serde::Serialize for PredictResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("predicted_class", self.predicted_class)?;
        map.serialize_entry("confidence", &self.confidence)?;
        map.serialize_entry(
            "all_probabilities",
            &ProbabilityMap(&self.all_probabilities),
        )?;
        map.end()
    }
}

/// Serializes a score slice as `{"label": score, ...}` in slice order.
struct ProbabilityMap<'a>(&'a [LabelScore]);

impl serde::Serialize for ProbabilityMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(entry.label, &entry.score)?;
        }
        map.end()
    }
}
