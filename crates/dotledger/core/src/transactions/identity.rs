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

//! Transaction identity
//!
//! A wire transaction keeps the exact bytes it was encoded to (or decoded from).
//! Its id is the SHA-256 of those bytes, computed on first use and cached for the
//! lifetime of the value. Resolution copies the id; it never recomputes it.

use crate::transactions::StateRef;
use dotledger_common::{Party, SecureHash};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    General,
    NotaryChange,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::General => "general",
            TransactionType::NotaryChange => "notary change",
        }
    }
}

/// Canonical bytes of a transaction plus its memoized id
#[derive(Debug, Clone)]
pub struct SerializedForm {
    bytes: Arc<[u8]>,
    id: OnceLock<SecureHash>,
}

impl SerializedForm {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
            id: OnceLock::new(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn id(&self) -> SecureHash {
        *self.id.get_or_init(|| SecureHash::sha256(&self.bytes))
    }
}

impl PartialEq for SerializedForm {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for SerializedForm {}

/// Behaviour common to every unresolved transaction variant
pub trait BaseWireTransaction {
    fn inputs(&self) -> &[StateRef];

    fn notary(&self) -> Option<&Party>;

    fn tx_type(&self) -> TransactionType;

    fn serialized(&self) -> &SerializedForm;

    fn id(&self) -> SecureHash {
        self.serialized().id()
    }

    fn to_bytes(&self) -> &[u8] {
        self.serialized().bytes()
    }
}
