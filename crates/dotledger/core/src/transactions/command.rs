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

//! Commands and their authenticated form

use dotledger_common::serialization;
use dotledger_common::{Party, PublicKey, SerializationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Typed command payload
pub trait CommandType: Serialize + DeserializeOwned {
    const COMMAND_TYPE: &'static str;
}

/// Opaque command payload tagged with its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    command_type: String,
    data: Vec<u8>,
}

impl CommandData {
    pub fn new<C: CommandType>(command: &C) -> Result<Self, SerializationError> {
        Ok(Self {
            command_type: C::COMMAND_TYPE.to_string(),
            data: serialization::serialize(command)?,
        })
    }

    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is<C: CommandType>(&self) -> bool {
        self.command_type == C::COMMAND_TYPE
    }

    pub fn decode<C: CommandType>(&self) -> Result<C, SerializationError> {
        if !self.is::<C>() {
            return Err(SerializationError::TypeMismatch {
                expected: C::COMMAND_TYPE.to_string(),
                found: self.command_type.clone(),
            });
        }
        serialization::deserialize(&self.data)
    }
}

/// A command and the keys that must sign for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub value: CommandData,
    pub signers: Vec<PublicKey>,
}

impl Command {
    pub fn new(value: CommandData, signers: Vec<PublicKey>) -> Self {
        Self { value, signers }
    }
}

/// A value with the keys that signed for it and the parties those keys were
/// recognised as. Keys with no known identity have no entry in `signing_parties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedObject<T> {
    pub signers: Vec<PublicKey>,
    pub signing_parties: Vec<Party>,
    pub value: T,
}

impl AuthenticatedObject<CommandData> {
    /// Decodes the command payload, keeping the signer information
    pub fn decode<C: CommandType>(&self) -> Result<AuthenticatedObject<C>, SerializationError> {
        Ok(AuthenticatedObject {
            signers: self.signers.clone(),
            signing_parties: self.signing_parties.clone(),
            value: self.value.decode()?,
        })
    }
}

/// The only element of `commands`; zero or several is an error
pub(crate) fn require_single<C: CommandType>(mut commands: Vec<AuthenticatedObject<C>>) -> anyhow::Result<AuthenticatedObject<C>> {
    if commands.len() > 1 {
        anyhow::bail!("Expected one {} command, found {}", C::COMMAND_TYPE, commands.len());
    }
    commands.pop().ok_or_else(|| anyhow::anyhow!("Required command {} is missing", C::COMMAND_TYPE))
}
