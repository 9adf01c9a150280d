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

//! The read-only projection of a transaction handed to contract code

use crate::contracts::grouping::{self, InOutGroup};
use crate::transactions::command;
use crate::transactions::{Attachment, AuthenticatedObject, CommandData, CommandType, ContractState, StateData, TimeWindow};
use dotledger_common::{Party, SecureHash, SerializationError};
use std::hash::Hash;

/// Unwrapped state payloads, commands, attachments, the id, the single notary
/// the inputs are assigned to and the time window.
///
/// A view only exists for transactions whose inputs share at most one notary.
#[derive(Debug, Clone)]
pub struct ContractView<'a> {
    pub inputs: Vec<&'a ContractState>,
    pub outputs: Vec<&'a ContractState>,
    pub commands: &'a [AuthenticatedObject<CommandData>],
    pub attachments: &'a [Attachment],
    pub id: SecureHash,
    pub input_notary: Option<&'a Party>,
    pub time_window: Option<&'a TimeWindow>,
}

impl<'a> ContractView<'a> {
    /// Decoded inputs of type `T`, in input order
    pub fn inputs_of_type<T: StateData>(&self) -> Result<Vec<T>, SerializationError> {
        self.inputs.iter().filter(|state| state.is::<T>()).map(|state| state.decode()).collect()
    }

    /// Decoded outputs of type `T`, in output order
    pub fn outputs_of_type<T: StateData>(&self) -> Result<Vec<T>, SerializationError> {
        self.outputs.iter().filter(|state| state.is::<T>()).map(|state| state.decode()).collect()
    }

    pub fn commands_of_type<C: CommandType>(&self) -> Result<Vec<AuthenticatedObject<C>>, SerializationError> {
        self.commands.iter().filter(|command| command.value.is::<C>()).map(|command| command.decode()).collect()
    }

    /// The only command of type `C`; zero or several is an error
    pub fn require_single_command<C: CommandType>(&self) -> anyhow::Result<AuthenticatedObject<C>> {
        command::require_single(self.commands_of_type::<C>()?)
    }

    /// Groups inputs and outputs of type `T` by `selector`
    pub fn group_states<T, K, F>(&self, selector: F) -> Result<Vec<InOutGroup<T, K>>, SerializationError>
    where
        T: StateData,
        K: Eq + Hash + Clone,
        F: Fn(&T) -> K,
    {
        grouping::group_states(self.inputs.iter().copied(), self.outputs.iter().copied(), selector)
    }

    pub fn attachment(&self, id: &SecureHash) -> Option<&'a Attachment> {
        self.attachments.iter().find(|attachment| &attachment.id() == id)
    }
}
