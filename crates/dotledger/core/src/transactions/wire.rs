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

//! The unresolved, serialized form of an ordinary transaction

use crate::error::{InvariantError, TransactionError};
use crate::resolution;
use crate::services::ServiceHub;
use crate::transactions::identity::{BaseWireTransaction, SerializedForm, TransactionType};
use crate::transactions::{Command, LedgerTransaction, StateRef, TimeWindow, TransactionState};
use dotledger_common::serialization;
use dotledger_common::{Party, PublicKey, SecureHash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WireComponents {
    inputs: Vec<StateRef>,
    attachments: Vec<SecureHash>,
    outputs: Vec<TransactionState>,
    commands: Vec<Command>,
    notary: Option<Party>,
    time_window: Option<TimeWindow>,
}

impl WireComponents {
    fn check_invariants(&self) -> Result<(), InvariantError> {
        if let Some(window) = &self.time_window {
            if self.notary.is_none() {
                return Err(InvariantError::TimeWindowWithoutNotary);
            }
            window.validate()?;
        }
        Ok(())
    }
}

/// An ordinary transaction before resolution. Immutable once built; its id is
/// the hash of its serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTransaction {
    components: WireComponents,
    serialized: SerializedForm,
}

impl WireTransaction {
    pub fn new(
        inputs: Vec<StateRef>,
        attachments: Vec<SecureHash>,
        outputs: Vec<TransactionState>,
        commands: Vec<Command>,
        notary: Option<Party>,
        time_window: Option<TimeWindow>,
    ) -> Result<Self, TransactionError> {
        let components = WireComponents {
            inputs,
            attachments,
            outputs,
            commands,
            notary,
            time_window,
        };
        components.check_invariants()?;
        let bytes = serialization::serialize(&(TransactionType::General, &components))?;
        Ok(Self {
            components,
            serialized: SerializedForm::new(bytes),
        })
    }

    /// Decodes a transaction received in serialized form. The id is the hash of
    /// `bytes` exactly as given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let (tx_type, components): (TransactionType, WireComponents) = serialization::deserialize(bytes)?;
        if tx_type != TransactionType::General {
            return Err(InvariantError::WrongTransactionType {
                expected: TransactionType::General.as_str(),
            }
            .into());
        }
        components.check_invariants()?;
        Ok(Self {
            components,
            serialized: SerializedForm::new(bytes.to_vec()),
        })
    }

    pub fn attachments(&self) -> &[SecureHash] {
        &self.components.attachments
    }

    pub fn outputs(&self) -> &[TransactionState] {
        &self.components.outputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.components.commands
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.components.time_window.as_ref()
    }

    /// Reference to output `index` of this transaction, if it exists
    pub fn out_ref(&self, index: usize) -> Option<StateRef> {
        (index < self.components.outputs.len()).then(|| StateRef::new(self.id(), index))
    }

    /// Keys that must sign: every command signer, plus the notary when the
    /// transaction consumes inputs or carries a time window.
    pub fn required_signing_keys(&self) -> BTreeSet<PublicKey> {
        let mut keys: BTreeSet<PublicKey> = self.components.commands.iter().flat_map(|command| command.signers.iter().cloned()).collect();
        if let Some(notary) = &self.components.notary {
            if !self.components.inputs.is_empty() || self.components.time_window.is_some() {
                keys.insert(notary.owning_key.clone());
            }
        }
        keys
    }

    /// Explains why each missing key is required
    pub fn describe_missing_keys(&self, missing: &BTreeSet<PublicKey>) -> Vec<String> {
        let mut descriptions = Vec::new();
        for key in missing {
            for command in self.components.commands.iter().filter(|command| command.signers.contains(key)) {
                descriptions.push(format!("{} required by command {}", key, command.value.command_type()));
            }
            if let Some(notary) = self.components.notary.as_ref().filter(|notary| &notary.owning_key == key) {
                descriptions.push(format!("{} required as notary {}", key, notary.name));
            }
        }
        descriptions
    }

    /// Loads inputs and attachments and authenticates commands
    pub fn to_ledger_transaction<S: ServiceHub + ?Sized>(&self, services: &S) -> Result<LedgerTransaction, TransactionError> {
        resolution::resolve_transaction(self, services)
    }
}

impl BaseWireTransaction for WireTransaction {
    fn inputs(&self) -> &[StateRef] {
        &self.components.inputs
    }

    fn notary(&self) -> Option<&Party> {
        self.components.notary.as_ref()
    }

    fn tx_type(&self) -> TransactionType {
        TransactionType::General
    }

    fn serialized(&self) -> &SerializedForm {
        &self.serialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::CommandData;
    use crate::transactions::state::fixtures::{dummy, party};
    use serde::{Deserialize, Serialize};
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Debug, Serialize, Deserialize)]
    struct Touch;

    impl crate::transactions::CommandType for Touch {
        const COMMAND_TYPE: &'static str = "test.Touch";
    }

    fn window() -> TimeWindow {
        TimeWindow::between(UNIX_EPOCH + Duration::from_secs(1), UNIX_EPOCH + Duration::from_secs(2)).unwrap()
    }

    fn sample(notary: Option<Party>, inputs: Vec<StateRef>) -> WireTransaction {
        let alice = party("Alice", 1);
        let output = TransactionState::new(dummy(1, &alice), party("Notary", 9));
        let command = Command::new(CommandData::new(&Touch).unwrap(), vec![alice.owning_key.clone()]);
        WireTransaction::new(inputs, vec![], vec![output], vec![command], notary, None).unwrap()
    }

    #[test]
    fn test_id_is_deterministic() {
        let a = sample(Some(party("Notary", 9)), vec![]);
        let b = sample(Some(party("Notary", 9)), vec![]);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id(), a.id());
        assert_ne!(a.id(), sample(None, vec![]).id());
    }

    #[test]
    fn test_from_bytes_preserves_id() {
        let tx = sample(Some(party("Notary", 9)), vec![StateRef::new(SecureHash::sha256(b"prev"), 0)]);
        let decoded = WireTransaction::from_bytes(tx.to_bytes()).unwrap();
        assert_eq!(decoded.id(), tx.id());
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_time_window_requires_notary() {
        let result = WireTransaction::new(vec![], vec![], vec![], vec![], None, Some(window()));
        assert!(matches!(result, Err(TransactionError::Invariant(InvariantError::TimeWindowWithoutNotary))));
        assert!(WireTransaction::new(vec![], vec![], vec![], vec![], Some(party("Notary", 9)), Some(window())).is_ok());
    }

    #[test]
    fn test_required_signing_keys() {
        let notary = party("Notary", 9);
        let alice = party("Alice", 1);

        let issuance = sample(Some(notary.clone()), vec![]);
        assert_eq!(issuance.required_signing_keys(), [alice.owning_key.clone()].into_iter().collect());

        let spend = sample(Some(notary.clone()), vec![StateRef::new(SecureHash::sha256(b"prev"), 0)]);
        assert_eq!(spend.required_signing_keys(), [alice.owning_key.clone(), notary.owning_key.clone()].into_iter().collect());

        let descriptions = spend.describe_missing_keys(&[notary.owning_key.clone()].into_iter().collect());
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions[0].contains("notary"));
    }

    #[test]
    fn test_out_ref() {
        let tx = sample(None, vec![]);
        assert_eq!(tx.out_ref(0), Some(StateRef::new(tx.id(), 0)));
        assert_eq!(tx.out_ref(1), None);
    }
}
