// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `retina convert` command: re-serialize an artifact at another precision.

use std::path::PathBuf;
use tensor_core::DType;

pub async fn execute(input: PathBuf, output: PathBuf, dtype: String) -> anyhow::Result<()> {
    let dtype = DType::parse(&dtype)
        .ok_or_else(|| anyhow::anyhow!("unknown dtype '{dtype}'; expected 'f32' or 'f16'"))?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             retina · Artifact Converter             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let name = model_artifact::convert_artifact(&input, &output, dtype)?;

    let src_len = std::fs::metadata(&input)?.len();
    let dst_len = std::fs::metadata(&output)?.len();

    println!("  Converted '{name}' to {dtype}");
    println!(
        "   {} ({:.2} MB)",
        input.display(),
        src_len as f64 / (1024.0 * 1024.0),
    );
    println!(
        "   -> {} ({:.2} MB)",
        output.display(),
        dst_len as f64 / (1024.0 * 1024.0),
    );
    println!();

    Ok(())
}
