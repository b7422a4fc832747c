// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `retina inspect` command: summarise an artifact without serving it.
//!
//! Runs the full load path, so an artifact that inspects cleanly will
//! also load for serving.

use std::path::PathBuf;

pub async fn execute(model: PathBuf, json: bool) -> anyhow::Result<()> {
    let info = model_artifact::inspect_artifact(&model).map_err(|e| {
        anyhow::anyhow!("failed to inspect artifact '{}': {e}", model.display())
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             retina · Artifact Inspector             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  File:        {}", model.display());
    println!("  Name:        {}", info.name);
    println!("  Input shape: {}", info.input_shape);
    println!("  Classes:     {}", info.output_width);
    println!("  Parameters:  {}", info.num_parameters);
    println!("  Elements:    {}", info.dtype);
    println!(
        "  File size:   {:.2} MB",
        info.file_size_bytes as f64 / (1024.0 * 1024.0),
    );

    // Serving verdict: would this artifact pass startup validation?
    let backend = model_artifact::load_backend(&model)?;
    match classifier::validate_compatibility(&backend) {
        Ok(()) => println!("  Serving:     compatible"),
        Err(e) => println!("  Serving:     INCOMPATIBLE ({e})"),
    }
    println!();

    Ok(())
}
