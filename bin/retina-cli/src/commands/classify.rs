// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `retina classify` command: one-shot offline inference on an image file.

use classifier::{Classifier, LazyModel};
use std::path::PathBuf;

pub async fn execute(model: PathBuf, image: PathBuf, json: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(&image)
        .map_err(|e| anyhow::anyhow!("cannot read image '{}': {e}", image.display()))?;

    let classifier = Classifier::new(LazyModel::from_path(model));
    classifier.warm_up().await?;
    let result = classifier.classify(&bytes).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              retina · Image Classifier              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Image: {}", image.display());
    println!(
        "  Prediction: {} ({:.1}% confidence)",
        result.predicted_class,
        result.confidence * 100.0,
    );
    println!();

    println!("  {:<24} {:>10}", "Class", "Score");
    println!("  {}", "-".repeat(36));
    for entry in &result.distribution {
        println!("  {:<24} {:>9.4}", entry.label, entry.score);
    }
    println!();

    Ok(())
}
