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

//! Invocation of contract code against a resolved transaction

use crate::contracts::ContractRegistry;
use crate::error::TransactionVerificationError;
use crate::transactions::{ContractId, LedgerTransaction};
use tracing::{debug, instrument};

/// Contracts referenced by any input or output, each once, in order of first
/// appearance (inputs before outputs)
pub fn distinct_contracts(ltx: &LedgerTransaction) -> Vec<ContractId> {
    let mut contracts: Vec<ContractId> = Vec::new();
    for state in ltx.input_states().chain(ltx.output_states()) {
        if !contracts.contains(state.contract()) {
            contracts.push(state.contract().clone());
        }
    }
    contracts
}

/// Runs every referenced contract exactly once against the same view. Every
/// contract must be registered before any of them runs.
#[instrument(skip_all, fields(tx_id = %ltx.id().prefix()))]
pub fn verify_contracts(ltx: &LedgerTransaction, registry: &ContractRegistry) -> Result<(), TransactionVerificationError> {
    let view = ltx.to_contract_view()?;

    let contracts = distinct_contracts(ltx)
        .into_iter()
        .map(|id| match registry.get(&id) {
            Some(contract) => Ok((id, contract)),
            None => Err(TransactionVerificationError::ContractNotFound { id: ltx.id(), contract: id }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (contract_id, contract) in contracts {
        contract.verify(&view).map_err(|cause| TransactionVerificationError::ContractRejection {
            id: ltx.id(),
            contract: contract_id.clone(),
            cause: cause.into(),
        })?;
        debug!("Contract {} accepted transaction {}", contract_id, ltx.id().prefix());
    }
    Ok(())
}
