// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Server configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! host = "127.0.0.1"
//! port = 8080
//! model_path = "./models/retina-dense.safetensors"
//! inference_timeout_ms = 10000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the HTTP serving process.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Loopback by default; exposing the service
    /// beyond the host is an explicit configuration choice.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the SafeTensors model artifact. Loaded lazily on the first
    /// prediction unless warm-up forces it at startup.
    pub model_path: PathBuf,
    /// Upper bound on a single inference, in milliseconds. `0` disables
    /// the bound.
    #[serde(default = "default_timeout_ms")]
    pub inference_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, super::ServerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            super::ServerError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, super::ServerError> {
        toml::from_str(toml_str)
            .map_err(|e| super::ServerError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, super::ServerError> {
        toml::to_string_pretty(self)
            .map_err(|e| super::ServerError::Config(format!("TOML serialise error: {e}")))
    }

    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The inference bound as a [`Duration`], or `None` when disabled.
    pub fn inference_timeout(&self) -> Option<Duration> {
        (self.inference_timeout_ms > 0).then(|| Duration::from_millis(self.inference_timeout_ms))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: PathBuf::from("./models/retina-dense.safetensors"),
            inference_timeout_ms: default_timeout_ms(),
        }
    }
}
