// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Runtime configuration
//!
//! Configuration is plain data with sensible defaults. Embedders either construct
//! it directly or load a JSON document; missing fields fall back to the defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Transaction verifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Verify independent transactions of a batch in parallel
    pub parallel_batch: bool,
    /// Worker threads for batch verification, 0 uses the global rayon pool
    pub worker_threads: usize,
    /// Emit a warning for every rejected transaction
    pub log_rejections: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            parallel_batch: true,
            worker_threads: 0,
            log_rejections: true,
        }
    }
}

/// Logging subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: false,
        }
    }
}

/// Top level configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub verifier: VerifierConfig,
    pub logging: LoggingConfig,
}

impl NodeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue("logging.filter".to_string(), "must not be empty".to_string()));
        }
        if !self.verifier.parallel_batch && self.verifier.worker_threads > 0 {
            return Err(ConfigError::InvalidValue(
                "verifier.worker_threads".to_string(),
                "worker threads require parallel_batch".to_string(),
            ));
        }
        Ok(())
    }
}
