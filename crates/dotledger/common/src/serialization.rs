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

//! Canonical serialization
//!
//! Every value that contributes to a transaction id is encoded through these two
//! functions. The encoding is bincode's standard configuration over the serde data
//! model, so identical logical content always yields identical bytes as long as the
//! serialized types avoid unordered collections.

use crate::error::SerializationError;
use bincode::config;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encodes `value` into its canonical byte form
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, SerializationError> {
    Ok(bincode::serde::encode_to_vec(value, config::standard())?)
}

/// Decodes a value, rejecting input with unconsumed trailing bytes
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    let (value, consumed) = bincode::serde::decode_from_slice(bytes, config::standard())?;
    if consumed != bytes.len() {
        return Err(SerializationError::TrailingBytes { consumed, total: bytes.len() });
    }
    Ok(value)
}
