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

//! Signatures over transaction ids

use crate::crypto::hash::SecureHash;
use crate::crypto::keys::PublicKey;
use crate::error::CryptoError;
use serde::{Deserialize, Serialize};

/// A signature together with the key that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub by: PublicKey,
    pub bytes: Vec<u8>,
}

impl TransactionSignature {
    pub fn new(by: PublicKey, bytes: Vec<u8>) -> Self {
        Self { by, bytes }
    }

    /// Checks the signature against arbitrary content
    pub fn verify(&self, content: &[u8]) -> Result<(), CryptoError> {
        self.by.verify(content, &self.bytes)
    }

    /// Checks the signature against the byte form of a transaction id
    pub fn verify_transaction(&self, id: &SecureHash) -> Result<(), CryptoError> {
        self.verify(id.as_bytes())
    }
}
