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

//! The fully resolved form of an ordinary transaction
//!
//! A `LedgerTransaction` is built once by resolution and never mutated. All
//! verification runs against this snapshot.

use crate::contracts::grouping::{self, InOutGroup};
use crate::contracts::{ContractRegistry, ContractView, dispatcher};
use crate::error::{InvariantError, TransactionVerificationError};
use crate::transactions::command;
use crate::transactions::identity::TransactionType;
use crate::transactions::{Attachment, AuthenticatedObject, CommandData, CommandType, ContractState, StateAndRef, StateData, StateRef, TimeWindow, TransactionState};
use crate::verification::structure;
use dotledger_common::{Party, SecureHash, SerializationError};
use std::collections::BTreeSet;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransaction {
    inputs: Vec<StateAndRef>,
    outputs: Vec<TransactionState>,
    commands: Vec<AuthenticatedObject<CommandData>>,
    attachments: Vec<Attachment>,
    id: SecureHash,
    notary: Option<Party>,
    time_window: Option<TimeWindow>,
}

impl LedgerTransaction {
    pub fn new(
        inputs: Vec<StateAndRef>,
        outputs: Vec<TransactionState>,
        commands: Vec<AuthenticatedObject<CommandData>>,
        attachments: Vec<Attachment>,
        id: SecureHash,
        notary: Option<Party>,
        time_window: Option<TimeWindow>,
    ) -> Result<Self, InvariantError> {
        if time_window.is_some() && notary.is_none() {
            return Err(InvariantError::TimeWindowWithoutNotary);
        }
        Ok(Self {
            inputs,
            outputs,
            commands,
            attachments,
            id,
            notary,
            time_window,
        })
    }

    pub fn id(&self) -> SecureHash {
        self.id
    }

    pub fn tx_type(&self) -> TransactionType {
        TransactionType::General
    }

    pub fn inputs(&self) -> &[StateAndRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionState] {
        &self.outputs
    }

    pub fn commands(&self) -> &[AuthenticatedObject<CommandData>] {
        &self.commands
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn notary(&self) -> Option<&Party> {
        self.notary.as_ref()
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Payloads of the consumed states
    pub fn input_states(&self) -> impl Iterator<Item = &ContractState> {
        self.inputs.iter().map(|input| &input.state().data)
    }

    /// Payloads of the produced states
    pub fn output_states(&self) -> impl Iterator<Item = &ContractState> {
        self.outputs.iter().map(|output| &output.data)
    }

    /// Output `index` paired with the reference that will name it once recorded
    pub fn out_ref(&self, index: usize) -> Option<StateAndRef> {
        self.outputs.get(index).map(|state| StateAndRef::new(state.clone(), StateRef::new(self.id, index)))
    }

    pub fn attachment(&self, id: &SecureHash) -> Option<&Attachment> {
        self.attachments.iter().find(|attachment| &attachment.id() == id)
    }

    /// Input refs that occur more than once; empty when inputs are distinct
    pub fn duplicate_inputs(&self) -> BTreeSet<StateRef> {
        structure::duplicate_inputs(&self.inputs)
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
        grouping::group_states(self.input_states(), self.output_states(), selector)
    }

    /// Projection handed to contract code. Fails when the inputs are assigned to
    /// more than one notary.
    pub fn to_contract_view(&self) -> Result<ContractView<'_>, TransactionVerificationError> {
        let mut notaries: Vec<&Party> = Vec::new();
        for input in &self.inputs {
            if !notaries.contains(&&input.state().notary) {
                notaries.push(&input.state().notary);
            }
        }
        if notaries.len() > 1 {
            return Err(TransactionVerificationError::MultipleInputNotaries {
                id: self.id,
                notaries: notaries.into_iter().cloned().collect(),
            });
        }

        Ok(ContractView {
            inputs: self.input_states().collect(),
            outputs: self.output_states().collect(),
            commands: &self.commands,
            attachments: &self.attachments,
            id: self.id,
            input_notary: notaries.first().copied(),
            time_window: self.time_window.as_ref(),
        })
    }

    /// Structural checks followed by contract verification
    pub fn verify(&self, registry: &ContractRegistry) -> Result<(), TransactionVerificationError> {
        structure::verify_structure(self)?;
        dispatcher::verify_contracts(self, registry)
    }
}
