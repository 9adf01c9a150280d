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

//! Ledger states and references to them
//!
//! A `ContractState` is an opaque payload tagged with the contract that governs
//! it and the payload type. Contracts read payloads through the [`StateData`]
//! trait; the engine itself only looks at the tags and participants.

use dotledger_common::serialization;
use dotledger_common::{Party, SecureHash, SerializationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a contract implementation in the registry
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContractId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.0)
    }
}

/// Typed payload of a contract state
pub trait StateData: Serialize + DeserializeOwned {
    /// Contract that verifies transactions involving this state
    const CONTRACT: &'static str;
    /// Tag distinguishing this payload type from others under the same contract
    const STATE_TYPE: &'static str;

    /// Identities whose keys must sign transactions that consume this state
    fn participants(&self) -> Vec<Party>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    contract: ContractId,
    state_type: String,
    participants: Vec<Party>,
    data: Vec<u8>,
}

impl ContractState {
    /// Encodes a typed payload
    pub fn new<T: StateData>(state: &T) -> Result<Self, SerializationError> {
        Ok(Self {
            contract: ContractId::new(T::CONTRACT),
            state_type: T::STATE_TYPE.to_string(),
            participants: state.participants(),
            data: serialization::serialize(state)?,
        })
    }

    /// Wraps an already encoded payload
    pub fn from_parts(contract: ContractId, state_type: impl Into<String>, participants: Vec<Party>, data: Vec<u8>) -> Self {
        Self {
            contract,
            state_type: state_type.into(),
            participants,
            data,
        }
    }

    pub fn contract(&self) -> &ContractId {
        &self.contract
    }

    pub fn state_type(&self) -> &str {
        &self.state_type
    }

    pub fn participants(&self) -> &[Party] {
        &self.participants
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the payload carries the tags of `T`
    pub fn is<T: StateData>(&self) -> bool {
        self.contract.as_str() == T::CONTRACT && self.state_type == T::STATE_TYPE
    }

    pub fn decode<T: StateData>(&self) -> Result<T, SerializationError> {
        if !self.is::<T>() {
            return Err(SerializationError::TypeMismatch {
                expected: format!("{}/{}", T::CONTRACT, T::STATE_TYPE),
                found: format!("{}/{}", self.contract, self.state_type),
            });
        }
        serialization::deserialize(&self.data)
    }
}

/// A state together with its notary and optional encumbrance.
///
/// `encumbrance` is the index, within the same transaction's outputs, of another
/// output that must be consumed in the same transaction as this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionState {
    pub data: ContractState,
    pub notary: Party,
    pub encumbrance: Option<usize>,
}

impl TransactionState {
    pub fn new(data: ContractState, notary: Party) -> Self {
        Self { data, notary, encumbrance: None }
    }

    pub fn with_encumbrance(mut self, index: usize) -> Self {
        self.encumbrance = Some(index);
        self
    }
}

/// Points at one output of one transaction
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateRef {
    pub txhash: SecureHash,
    pub index: usize,
}

impl StateRef {
    pub fn new(txhash: SecureHash, index: usize) -> Self {
        Self { txhash, index }
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.txhash, self.index)
    }
}

impl fmt::Debug for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.txhash.prefix(), self.index)
    }
}

/// A loaded state and the reference it was loaded from. Only produced by
/// resolution or by asking a transaction for one of its own outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateAndRef {
    state: TransactionState,
    state_ref: StateRef,
}

impl StateAndRef {
    pub(crate) fn new(state: TransactionState, state_ref: StateRef) -> Self {
        Self { state, state_ref }
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn state_ref(&self) -> &StateRef {
        &self.state_ref
    }
}
