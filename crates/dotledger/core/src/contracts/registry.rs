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

//! Registry of contract implementations keyed by contract id

use crate::contracts::ContractView;
use crate::transactions::ContractId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Verification logic for every state tagged with one contract id.
///
/// Implementations must be deterministic and free of side effects. Any error
/// returned rejects the whole transaction and is kept as the rejection cause.
pub trait Contract: Send + Sync {
    fn verify(&self, tx: &ContractView<'_>) -> anyhow::Result<()>;
}

impl<F> Contract for F
where
    F: for<'v, 'a> Fn(&'v ContractView<'a>) -> anyhow::Result<()> + Send + Sync,
{
    fn verify(&self, tx: &ContractView<'_>) -> anyhow::Result<()> {
        self(tx)
    }
}

#[derive(Clone, Default)]
pub struct ContractRegistry {
    contracts: HashMap<ContractId, Arc<dyn Contract>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `contract` under `id`, returning any implementation it replaces
    pub fn register(&mut self, id: impl Into<ContractId>, contract: Arc<dyn Contract>) -> Option<Arc<dyn Contract>> {
        let id = id.into();
        info!("Registering contract {}", id);
        self.contracts.insert(id, contract)
    }

    pub fn get(&self, id: &ContractId) -> Option<Arc<dyn Contract>> {
        self.contracts.get(id).cloned()
    }

    pub fn contains(&self, id: &ContractId) -> bool {
        self.contracts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<&ContractId> {
        let mut ids: Vec<&ContractId> = self.contracts.keys().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for ContractRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractRegistry").field("contracts", &self.ids()).finish()
    }
}
