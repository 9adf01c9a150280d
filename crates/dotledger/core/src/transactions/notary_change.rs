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

//! Notary change transactions
//!
//! A notary change consumes a set of states and re-issues each of them, unchanged
//! apart from the notary. Outputs are never stored: output `i` is derived from
//! input `i`. Because of that fixed 1:1 mapping an encumbered input at position
//! `p` of this transaction yields an output encumbered by output `p + 1`. The
//! shift belongs to this transaction type only and must not be applied to
//! ordinary transactions.

use crate::error::{InvariantError, TransactionError, TransactionVerificationError};
use crate::resolution;
use crate::services::StateLookup;
use crate::transactions::identity::{BaseWireTransaction, SerializedForm, TransactionType};
use crate::transactions::{StateAndRef, StateRef, TransactionState};
use crate::verification::TransactionWithSignatures;
use crate::verification::structure;
use dotledger_common::serialization;
use dotledger_common::{Party, PublicKey, SecureHash, TransactionSignature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NotaryChangeComponents {
    inputs: Vec<StateRef>,
    notary: Party,
    new_notary: Party,
}

impl NotaryChangeComponents {
    fn check_invariants(&self) -> Result<(), InvariantError> {
        check_notary_change(&self.inputs, &self.notary, &self.new_notary)
    }
}

fn check_notary_change<T>(inputs: &[T], notary: &Party, new_notary: &Party) -> Result<(), InvariantError> {
    if notary == new_notary {
        return Err(InvariantError::NotaryUnchanged(notary.clone()));
    }
    if inputs.is_empty() {
        return Err(InvariantError::NotaryChangeWithoutInputs);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryChangeWireTransaction {
    components: NotaryChangeComponents,
    serialized: SerializedForm,
}

impl NotaryChangeWireTransaction {
    pub fn new(inputs: Vec<StateRef>, notary: Party, new_notary: Party) -> Result<Self, TransactionError> {
        let components = NotaryChangeComponents { inputs, notary, new_notary };
        components.check_invariants()?;
        let bytes = serialization::serialize(&(TransactionType::NotaryChange, &components))?;
        Ok(Self {
            components,
            serialized: SerializedForm::new(bytes),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let (tx_type, components): (TransactionType, NotaryChangeComponents) = serialization::deserialize(bytes)?;
        if tx_type != TransactionType::NotaryChange {
            return Err(InvariantError::WrongTransactionType {
                expected: TransactionType::NotaryChange.as_str(),
            }
            .into());
        }
        components.check_invariants()?;
        Ok(Self {
            components,
            serialized: SerializedForm::new(bytes.to_vec()),
        })
    }

    /// The notary being replaced
    pub fn current_notary(&self) -> &Party {
        &self.components.notary
    }

    pub fn new_notary(&self) -> &Party {
        &self.components.new_notary
    }

    /// Loads every input; `sigs` travel with the resolved transaction
    pub fn resolve<S: StateLookup + ?Sized>(&self, services: &S, sigs: Vec<TransactionSignature>) -> Result<NotaryChangeLedgerTransaction, TransactionError> {
        resolution::resolve_notary_change(self, services, sigs)
    }
}

impl BaseWireTransaction for NotaryChangeWireTransaction {
    fn inputs(&self) -> &[StateRef] {
        &self.components.inputs
    }

    fn notary(&self) -> Option<&Party> {
        Some(&self.components.notary)
    }

    fn tx_type(&self) -> TransactionType {
        TransactionType::NotaryChange
    }

    fn serialized(&self) -> &SerializedForm {
        &self.serialized
    }
}

/// A resolved notary change together with the signatures collected for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryChangeLedgerTransaction {
    inputs: Vec<StateAndRef>,
    notary: Party,
    new_notary: Party,
    id: SecureHash,
    sigs: Vec<TransactionSignature>,
}

impl NotaryChangeLedgerTransaction {
    pub fn new(inputs: Vec<StateAndRef>, notary: Party, new_notary: Party, id: SecureHash, sigs: Vec<TransactionSignature>) -> Result<Self, InvariantError> {
        check_notary_change(&inputs, &notary, &new_notary)?;
        Ok(Self {
            inputs,
            notary,
            new_notary,
            id,
            sigs,
        })
    }

    pub fn inputs(&self) -> &[StateAndRef] {
        &self.inputs
    }

    pub fn notary(&self) -> &Party {
        &self.notary
    }

    pub fn new_notary(&self) -> &Party {
        &self.new_notary
    }

    pub fn tx_type(&self) -> TransactionType {
        TransactionType::NotaryChange
    }

    /// Derived outputs: each input re-assigned to the new notary. An encumbered
    /// input at position `p` is re-issued encumbered by the output at `p + 1`.
    pub fn outputs(&self) -> Vec<TransactionState> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(position, input)| {
                let state = input.state();
                TransactionState {
                    data: state.data.clone(),
                    notary: self.new_notary.clone(),
                    encumbrance: state.encumbrance.map(|_| position + 1),
                }
            })
            .collect()
    }

    pub fn out_ref(&self, index: usize) -> Option<StateAndRef> {
        self.outputs().into_iter().nth(index).map(|state| StateAndRef::new(state, StateRef::new(self.id, index)))
    }

    /// Duplicate-input and encumbrance checks on both sides, plus every input
    /// being assigned to the notary being replaced
    pub fn verify(&self) -> Result<(), TransactionVerificationError> {
        structure::check_no_duplicate_inputs(self.id, &self.inputs)?;
        if let Some(input) = self.inputs.iter().find(|input| input.state().notary != self.notary) {
            return Err(TransactionVerificationError::InputNotaryMismatch {
                id: self.id,
                expected: self.notary.clone(),
                found: input.state().notary.clone(),
            });
        }
        structure::check_input_encumbrances(self.id, &self.inputs)?;
        structure::check_output_encumbrances(self.id, &self.outputs())
    }
}

impl TransactionWithSignatures for NotaryChangeLedgerTransaction {
    fn id(&self) -> SecureHash {
        self.id
    }

    fn sigs(&self) -> &[TransactionSignature] {
        &self.sigs
    }

    /// Union of the participant keys of every input
    fn required_signing_keys(&self) -> BTreeSet<PublicKey> {
        self.inputs
            .iter()
            .flat_map(|input| input.state().data.participants().iter().map(|participant| participant.owning_key.clone()))
            .collect()
    }
}
