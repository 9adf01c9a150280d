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

//! Incremental assembly of ordinary transactions

use crate::error::TransactionError;
use crate::transactions::identity::BaseWireTransaction;
use crate::transactions::{Command, SignedTransaction, StateRef, TimeWindow, TransactionState, WireTransaction};
use dotledger_common::{KeyPair, Party, SecureHash};

/// Mutable collector for the components of a `WireTransaction`
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    notary: Option<Party>,
    inputs: Vec<StateRef>,
    attachments: Vec<SecureHash>,
    outputs: Vec<TransactionState>,
    commands: Vec<Command>,
    time_window: Option<TimeWindow>,
}

impl TransactionBuilder {
    pub fn new(notary: Option<Party>) -> Self {
        Self { notary, ..Self::default() }
    }

    pub fn set_notary(&mut self, notary: Party) -> &mut Self {
        self.notary = Some(notary);
        self
    }

    pub fn add_input_state(&mut self, state_ref: StateRef) -> &mut Self {
        self.inputs.push(state_ref);
        self
    }

    pub fn add_output_state(&mut self, state: TransactionState) -> &mut Self {
        self.outputs.push(state);
        self
    }

    pub fn add_command(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn add_attachment(&mut self, id: SecureHash) -> &mut Self {
        if !self.attachments.contains(&id) {
            self.attachments.push(id);
        }
        self
    }

    pub fn set_time_window(&mut self, window: TimeWindow) -> &mut Self {
        self.time_window = Some(window);
        self
    }

    pub fn to_wire_transaction(&self) -> Result<WireTransaction, TransactionError> {
        WireTransaction::new(
            self.inputs.clone(),
            self.attachments.clone(),
            self.outputs.clone(),
            self.commands.clone(),
            self.notary.clone(),
            self.time_window,
        )
    }

    /// Builds the wire transaction and signs its id with each key
    pub fn sign_with(&self, keys: &[&KeyPair]) -> Result<SignedTransaction, TransactionError> {
        let wtx = self.to_wire_transaction()?;
        let id = wtx.id();
        let sigs = keys.iter().map(|key| key.sign_transaction(&id)).collect();
        Ok(SignedTransaction::new(wtx, sigs))
    }
}
