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

//! Shared fixtures: a cash contract, parties and a ledger harness

#![allow(dead_code)]

use anyhow::ensure;
use dotledger_common::{KeyPair, Party};
use dotledger_core::{Command, CommandData, CommandType, Contract, ContractRegistry, ContractState, ContractView, InMemoryServices, StateData, StateRef, TransactionBuilder, TransactionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CASH_CONTRACT: &str = "dotledger.cash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashState {
    pub owner: Party,
    pub amount: u64,
    pub currency: String,
}

impl StateData for CashState {
    const CONTRACT: &'static str = CASH_CONTRACT;
    const STATE_TYPE: &'static str = "CashState";

    fn participants(&self) -> Vec<Party> {
        vec![self.owner.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashCommand {
    Issue,
    Move,
}

impl CommandType for CashCommand {
    const COMMAND_TYPE: &'static str = "dotledger.cash.CashCommand";
}

/// Balances each currency separately. Issuance creates value from nothing;
/// moves must conserve it and be signed by every input owner.
pub struct CashContract;

impl Contract for CashContract {
    fn verify(&self, tx: &ContractView<'_>) -> anyhow::Result<()> {
        let command = tx.require_single_command::<CashCommand>()?;
        for group in tx.group_states(|state: &CashState| state.currency.clone())? {
            let consumed: u64 = group.inputs.iter().map(|state| state.amount).sum();
            let produced: u64 = group.outputs.iter().map(|state| state.amount).sum();
            match command.value {
                CashCommand::Issue => {
                    ensure!(group.inputs.is_empty(), "Issuance of {} must not consume cash", group.grouping_key);
                    ensure!(produced > 0, "Issuance of {} must produce cash", group.grouping_key);
                }
                CashCommand::Move => {
                    ensure!(consumed == produced, "Amounts of {} do not balance: {} in, {} out", group.grouping_key, consumed, produced);
                    for input in &group.inputs {
                        ensure!(command.signers.contains(&input.owner.owning_key), "Owner {} did not sign the move", input.owner);
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct Actor {
    pub keys: KeyPair,
    pub party: Party,
}

impl Actor {
    pub fn new(name: &str, seed: u8) -> Self {
        let keys = KeyPair::from_seed([seed; 32]);
        let party = Party::new(name, keys.public());
        Self { keys, party }
    }
}

pub fn cash(owner: &Party, amount: u64, currency: &str) -> ContractState {
    ContractState::new(&CashState {
        owner: owner.clone(),
        amount,
        currency: currency.to_string(),
    })
    .unwrap()
}

pub fn cash_registry() -> ContractRegistry {
    let mut registry = ContractRegistry::new();
    registry.register(CASH_CONTRACT, Arc::new(CashContract));
    registry
}

pub fn command(value: CashCommand, signers: &[&Actor]) -> Command {
    Command::new(CommandData::new(&value).unwrap(), signers.iter().map(|actor| actor.keys.public()).collect())
}

/// Records an issuance of the given states straight into `services`
pub fn issue(services: &mut InMemoryServices, notary: &Actor, issuer: &Actor, states: Vec<TransactionState>) -> Vec<StateRef> {
    let mut builder = TransactionBuilder::new(Some(notary.party.clone()));
    for state in states {
        builder.add_output_state(state);
    }
    builder.add_command(command(CashCommand::Issue, &[issuer]));
    let wtx = builder.to_wire_transaction().unwrap();
    let count = wtx.outputs().len();
    services.record_transaction(&wtx);
    (0..count).filter_map(|index| wtx.out_ref(index)).collect()
}
