// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `retina serve` command: run the HTTP prediction server.

use server::ServerConfig;
use std::path::PathBuf;

pub async fn execute(
    config_file: Option<PathBuf>,
    model: Option<PathBuf>,
    host: String,
    port: u16,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let config = match config_file {
        Some(path) => ServerConfig::from_file(&path)?,
        None => {
            let model_path = model.ok_or_else(|| {
                anyhow::anyhow!("either --model or --config must be supplied")
            })?;
            ServerConfig {
                host,
                port,
                model_path,
                inference_timeout_ms: timeout_ms,
            }
        }
    };

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             retina · Prediction Server              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Model:   {}", config.model_path.display());
    println!("  Address: {}", config.bind_addr());
    match config.inference_timeout() {
        Some(t) => println!("  Timeout: {} ms", t.as_millis()),
        None => println!("  Timeout: disabled"),
    }
    println!();

    server::serve(config).await?;
    Ok(())
}
