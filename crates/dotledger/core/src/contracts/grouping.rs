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

//! Partitioning of a transaction's states into independent groups
//!
//! A contract that governs several asset classes (currencies, issuers) checks
//! each class separately. `group_states` decodes every input and output of one
//! payload type, keys each by a selector and returns one group per key. A key
//! seen only on the output side yields a group with no inputs (issuance); one
//! seen only on the input side yields a group with no outputs (exit).

use crate::transactions::{ContractState, StateData};
use dotledger_common::SerializationError;
use std::collections::HashMap;
use std::hash::Hash;

/// The inputs and outputs of type `T` that share `grouping_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InOutGroup<T, K> {
    pub inputs: Vec<T>,
    pub outputs: Vec<T>,
    pub grouping_key: K,
}

/// Groups are ordered by first appearance of their key, scanning inputs before
/// outputs. States within a group keep their transaction order.
pub fn group_states<'s, T, K, F, I, O>(inputs: I, outputs: O, selector: F) -> Result<Vec<InOutGroup<T, K>>, SerializationError>
where
    T: StateData,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
    I: IntoIterator<Item = &'s ContractState>,
    O: IntoIterator<Item = &'s ContractState>,
{
    let mut groups: Vec<InOutGroup<T, K>> = Vec::new();
    let mut positions: HashMap<K, usize> = HashMap::new();

    let mut slot = |key: K, groups: &mut Vec<InOutGroup<T, K>>| -> usize {
        *positions.entry(key.clone()).or_insert_with(|| {
            groups.push(InOutGroup {
                inputs: Vec::new(),
                outputs: Vec::new(),
                grouping_key: key,
            });
            groups.len() - 1
        })
    };

    for state in inputs.into_iter().filter(|state| state.is::<T>()) {
        let state: T = state.decode()?;
        let index = slot(selector(&state), &mut groups);
        groups[index].inputs.push(state);
    }
    for state in outputs.into_iter().filter(|state| state.is::<T>()) {
        let state: T = state.decode()?;
        let index = slot(selector(&state), &mut groups);
        groups[index].outputs.push(state);
    }

    Ok(groups)
}
