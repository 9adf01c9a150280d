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

//! Structural consistency checks
//!
//! Checks run in a fixed order and the first violation aborts the rest. Later
//! checks rely on earlier ones: encumbrance lookups assume inputs are distinct.

use crate::error::{Direction, TransactionVerificationError};
use crate::transactions::{LedgerTransaction, StateAndRef, StateRef, TransactionState};
use dotledger_common::{Party, SecureHash};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Runs every structural check against a resolved ordinary transaction
pub fn verify_structure(ltx: &LedgerTransaction) -> Result<(), TransactionVerificationError> {
    let id = ltx.id();
    check_no_duplicate_inputs(id, ltx.inputs())?;
    if let Some(notary) = ltx.notary() {
        if !ltx.inputs().is_empty() {
            check_notary_consistency(id, notary, ltx.outputs())?;
        }
    }
    check_input_encumbrances(id, ltx.inputs())?;
    check_output_encumbrances(id, ltx.outputs())?;
    trace!("Structure of transaction {} is consistent", id.prefix());
    Ok(())
}

/// Refs that appear more than once among `inputs`
pub fn duplicate_inputs(inputs: &[StateAndRef]) -> BTreeSet<StateRef> {
    let mut counts: BTreeMap<&StateRef, usize> = BTreeMap::new();
    for input in inputs {
        *counts.entry(input.state_ref()).or_default() += 1;
    }
    counts.into_iter().filter(|(_, count)| *count > 1).map(|(state_ref, _)| *state_ref).collect()
}

pub fn check_no_duplicate_inputs(id: SecureHash, inputs: &[StateAndRef]) -> Result<(), TransactionVerificationError> {
    let duplicates = duplicate_inputs(inputs);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(TransactionVerificationError::DuplicateInputStates { id, duplicates })
    }
}

/// Outputs must stay with the notary the inputs are assigned to. The first
/// mismatching output is reported.
pub fn check_notary_consistency(id: SecureHash, notary: &Party, outputs: &[TransactionState]) -> Result<(), TransactionVerificationError> {
    match outputs.iter().find(|output| &output.notary != notary) {
        Some(output) => Err(TransactionVerificationError::NotaryChangeInWrongTransactionType {
            id,
            tx_notary: notary.clone(),
            output_notary: output.notary.clone(),
        }),
        None => Ok(()),
    }
}

/// An encumbered input must be consumed together with the output it points
/// at, which has to come from the same origin transaction.
pub fn check_input_encumbrances(id: SecureHash, inputs: &[StateAndRef]) -> Result<(), TransactionVerificationError> {
    for (position, input) in inputs.iter().enumerate() {
        let Some(encumbrance) = input.state().encumbrance else {
            continue;
        };
        let origin = input.state_ref().txhash;
        let present = inputs
            .iter()
            .enumerate()
            .any(|(other, candidate)| other != position && candidate.state_ref().txhash == origin && candidate.state_ref().index == encumbrance);
        if !present {
            return Err(TransactionVerificationError::TransactionMissingEncumbrance {
                id,
                missing: encumbrance,
                direction: Direction::Input,
            });
        }
    }
    Ok(())
}

/// Output encumbrances must point at another output of the same transaction
pub fn check_output_encumbrances(id: SecureHash, outputs: &[TransactionState]) -> Result<(), TransactionVerificationError> {
    for (index, output) in outputs.iter().enumerate() {
        if let Some(encumbrance) = output.encumbrance {
            if encumbrance == index || encumbrance >= outputs.len() {
                return Err(TransactionVerificationError::TransactionMissingEncumbrance {
                    id,
                    missing: encumbrance,
                    direction: Direction::Output,
                });
            }
        }
    }
    Ok(())
}
