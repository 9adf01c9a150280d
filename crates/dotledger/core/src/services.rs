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

//! Collaborator interfaces consumed by resolution
//!
//! The engine does not own storage. It loads states, attachments and identities
//! through these traits, which must be deterministic per key and free of side
//! effects from the engine's point of view. Lookup failures surface immediately;
//! nothing here retries.

use crate::error::ResolutionError;
use crate::transactions::identity::BaseWireTransaction;
use crate::transactions::{Attachment, NotaryChangeLedgerTransaction, StateRef, TransactionState, WireTransaction};
use crate::verification::TransactionWithSignatures;
use dotledger_common::{Party, PublicKey, SecureHash};
use std::collections::HashMap;
use tracing::debug;

/// Loads the output a `StateRef` points at
#[cfg_attr(test, mockall::automock)]
pub trait StateLookup {
    fn load_state(&self, state_ref: &StateRef) -> Result<TransactionState, ResolutionError>;
}

/// Loads attachments by content hash
#[cfg_attr(test, mockall::automock)]
pub trait AttachmentLookup {
    fn open_attachment(&self, id: &SecureHash) -> Result<Attachment, ResolutionError>;
}

/// Maps signing keys to well-known identities
#[cfg_attr(test, mockall::automock)]
pub trait IdentityLookup {
    fn party_from_key(&self, key: &PublicKey) -> Option<Party>;
}

/// Everything resolution of an ordinary transaction needs
pub trait ServiceHub: StateLookup + AttachmentLookup + IdentityLookup {}

impl<T: StateLookup + AttachmentLookup + IdentityLookup + ?Sized> ServiceHub for T {}

/// In-memory ledger services backed by hash maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryServices {
    transactions: HashMap<SecureHash, Vec<TransactionState>>,
    attachments: HashMap<SecureHash, Attachment>,
    identities: HashMap<PublicKey, Party>,
}

impl InMemoryServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the outputs of `wtx` available as inputs to later transactions
    pub fn record_transaction(&mut self, wtx: &WireTransaction) -> SecureHash {
        self.record_outputs(wtx.id(), wtx.outputs().to_vec())
    }

    /// Records the derived outputs of a notary change
    pub fn record_notary_change(&mut self, ntx: &NotaryChangeLedgerTransaction) -> SecureHash {
        self.record_outputs(ntx.id(), ntx.outputs())
    }

    pub fn record_outputs(&mut self, id: SecureHash, outputs: Vec<TransactionState>) -> SecureHash {
        debug!("Recording {} outputs of transaction {}", outputs.len(), id.prefix());
        self.transactions.insert(id, outputs);
        id
    }

    pub fn import_attachment(&mut self, data: impl Into<Vec<u8>>) -> SecureHash {
        let attachment = Attachment::new(data);
        let id = attachment.id();
        self.attachments.insert(id, attachment);
        id
    }

    pub fn register_identity(&mut self, party: Party) {
        self.identities.insert(party.owning_key.clone(), party);
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl StateLookup for InMemoryServices {
    fn load_state(&self, state_ref: &StateRef) -> Result<TransactionState, ResolutionError> {
        self.transactions
            .get(&state_ref.txhash)
            .and_then(|outputs| outputs.get(state_ref.index))
            .cloned()
            .ok_or(ResolutionError::TransactionResolution(state_ref.txhash))
    }
}

impl AttachmentLookup for InMemoryServices {
    fn open_attachment(&self, id: &SecureHash) -> Result<Attachment, ResolutionError> {
        self.attachments.get(id).cloned().ok_or(ResolutionError::AttachmentResolution(*id))
    }
}

impl IdentityLookup for InMemoryServices {
    fn party_from_key(&self, key: &PublicKey) -> Option<Party> {
        self.identities.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::state::fixtures::{dummy, party};

    #[test]
    fn test_load_recorded_state() {
        let notary = party("Notary", 9);
        let state = TransactionState::new(dummy(1, &party("Alice", 1)), notary.clone());
        let wtx = WireTransaction::new(vec![], vec![], vec![state.clone()], vec![], Some(notary), None).unwrap();

        let mut services = InMemoryServices::new();
        let id = services.record_transaction(&wtx);

        assert_eq!(services.load_state(&StateRef::new(id, 0)), Ok(state));
        assert_eq!(services.load_state(&StateRef::new(id, 1)), Err(ResolutionError::TransactionResolution(id)));
        let unknown = SecureHash::sha256(b"unknown");
        assert_eq!(services.load_state(&StateRef::new(unknown, 0)), Err(ResolutionError::TransactionResolution(unknown)));
    }

    #[test]
    fn test_attachments_and_identities() {
        let mut services = InMemoryServices::new();
        let id = services.import_attachment(b"jar".to_vec());
        assert_eq!(services.open_attachment(&id).unwrap().data(), b"jar");
        assert!(services.open_attachment(&SecureHash::ZERO).is_err());

        let alice = party("Alice", 1);
        services.register_identity(alice.clone());
        assert_eq!(services.party_from_key(&alice.owning_key), Some(alice));
        assert_eq!(services.party_from_key(&party("Bob", 2).owning_key), None);
    }
}
