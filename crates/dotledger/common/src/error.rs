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

//! Error types shared by the ledger crates

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Composite key has no children")]
    EmptyCompositeKey,

    #[error("Composite key child weight must be positive")]
    ZeroWeight,

    #[error("Composite key threshold {threshold} is outside 1..={total_weight}")]
    InvalidThreshold { threshold: u32, total_weight: u32 },

    #[error("Composite key contains duplicate child {0}")]
    DuplicateChild(String),
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Decoding failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Trailing bytes after decoding: consumed {consumed} of {total}")]
    TrailingBytes { consumed: usize, total: usize },

    #[error("Payload type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration value: {0} - {1}")]
    InvalidValue(String, String),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
