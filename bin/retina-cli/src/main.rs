// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # retina
//!
//! Command-line interface for the retina-serve classification pipeline.
//!
//! ## Usage
//! ```bash
//! # Serve predictions over HTTP
//! retina serve --model ./models/retina-dense.safetensors --port 8080
//!
//! # Classify a single image offline
//! retina classify --model ./models/retina-dense.safetensors --image fundus.png
//!
//! # Inspect an artifact
//! retina inspect --model ./models/retina-dense.safetensors
//!
//! # Produce a half-precision variant
//! retina convert --input model.safetensors --output model-f16.safetensors --dtype f16
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "retina",
    about = "Eye-disease image classification: serving, offline inference, and artifact tooling",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (overrides CLI arguments).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve /health and /predict over HTTP.
    Serve {
        /// Path to the SafeTensors model artifact.
        #[arg(short, long)]
        model: Option<std::path::PathBuf>,

        /// Interface to bind (loopback unless overridden).
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// TCP port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Per-request inference bound in milliseconds (0 disables).
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },

    /// Classify a single image file without starting a server.
    Classify {
        /// Path to the SafeTensors model artifact.
        #[arg(short, long)]
        model: std::path::PathBuf,

        /// Path to the image to classify.
        #[arg(short, long)]
        image: std::path::PathBuf,

        /// Emit the prediction as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Inspect an artifact: name, geometry, parameter count, file size.
    Inspect {
        /// Path to the SafeTensors model artifact.
        #[arg(short, long)]
        model: std::path::PathBuf,

        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Re-serialize an artifact at a different element precision.
    Convert {
        /// Source artifact.
        #[arg(short, long)]
        input: std::path::PathBuf,

        /// Destination path for the converted artifact.
        #[arg(short, long)]
        output: std::path::PathBuf,

        /// Target element type: f32 or f16.
        #[arg(short, long, default_value = "f16")]
        dtype: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            model,
            host,
            port,
            timeout_ms,
        } => commands::serve::execute(cli.config, model, host, port, timeout_ms).await,
        Commands::Classify { model, image, json } => {
            commands::classify::execute(model, image, json).await
        }
        Commands::Inspect { model, json } => commands::inspect::execute(model, json).await,
        Commands::Convert {
            input,
            output,
            dtype,
        } => commands::convert::execute(input, output, dtype).await,
    }
}
