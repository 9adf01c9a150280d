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

//! Resolution of wire transactions into ledger transactions
//!
//! Resolution only checks presence: every input must load, every attachment must
//! be found. All consistency checks run later against the resolved snapshot.

use crate::error::{ResolutionError, TransactionError};
use crate::services::{AttachmentLookup, IdentityLookup, ServiceHub, StateLookup};
use crate::transactions::identity::BaseWireTransaction;
use crate::transactions::{Attachment, AuthenticatedObject, Command, CommandData, LedgerTransaction, NotaryChangeLedgerTransaction, NotaryChangeWireTransaction, StateAndRef, StateRef, WireTransaction};
use dotledger_common::{SecureHash, TransactionSignature};
use tracing::{debug, instrument};

/// Loads each reference in order
pub fn resolve_inputs<S: StateLookup + ?Sized>(services: &S, refs: &[StateRef]) -> Result<Vec<StateAndRef>, ResolutionError> {
    refs.iter().map(|state_ref| Ok(StateAndRef::new(services.load_state(state_ref)?, *state_ref))).collect()
}

/// Loads each attachment, rejecting content that does not match its hash
pub fn resolve_attachments<S: AttachmentLookup + ?Sized>(services: &S, ids: &[SecureHash]) -> Result<Vec<Attachment>, ResolutionError> {
    ids.iter()
        .map(|id| {
            let attachment = services.open_attachment(id)?;
            if attachment.id() != *id {
                return Err(ResolutionError::AttachmentResolution(*id));
            }
            Ok(attachment)
        })
        .collect()
}

/// Pairs each command with the parties its signer keys belong to
pub fn authenticate_commands<S: IdentityLookup + ?Sized>(services: &S, commands: &[Command]) -> Vec<AuthenticatedObject<CommandData>> {
    commands
        .iter()
        .map(|command| AuthenticatedObject {
            signers: command.signers.clone(),
            signing_parties: command.signers.iter().filter_map(|key| services.party_from_key(key)).collect(),
            value: command.value.clone(),
        })
        .collect()
}

#[instrument(skip_all, fields(tx_id = %wtx.id().prefix()))]
pub fn resolve_transaction<S: ServiceHub + ?Sized>(wtx: &WireTransaction, services: &S) -> Result<LedgerTransaction, TransactionError> {
    let inputs = resolve_inputs(services, wtx.inputs())?;
    let attachments = resolve_attachments(services, wtx.attachments())?;
    let commands = authenticate_commands(services, wtx.commands());
    debug!("Resolved {} inputs and {} attachments", inputs.len(), attachments.len());

    Ok(LedgerTransaction::new(
        inputs,
        wtx.outputs().to_vec(),
        commands,
        attachments,
        wtx.id(),
        wtx.notary().cloned(),
        wtx.time_window().copied(),
    )?)
}

#[instrument(skip_all, fields(tx_id = %ntx.id().prefix()))]
pub fn resolve_notary_change<S: StateLookup + ?Sized>(ntx: &NotaryChangeWireTransaction, services: &S, sigs: Vec<TransactionSignature>) -> Result<NotaryChangeLedgerTransaction, TransactionError> {
    let inputs = resolve_inputs(services, ntx.inputs())?;
    debug!("Resolved {} inputs for notary change to {}", inputs.len(), ntx.new_notary());

    Ok(NotaryChangeLedgerTransaction::new(inputs, ntx.current_notary().clone(), ntx.new_notary().clone(), ntx.id(), sigs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockAttachmentLookup, MockIdentityLookup, MockStateLookup};
    use crate::transactions::TransactionState;
    use crate::transactions::state::fixtures::{dummy, party};
    use mockall::predicate::eq;

    #[test]
    fn test_resolve_inputs_preserves_order() {
        let notary = party("Notary", 9);
        let origin = SecureHash::sha256(b"origin");
        let mut lookup = MockStateLookup::new();
        lookup
            .expect_load_state()
            .returning(move |state_ref| Ok(TransactionState::new(dummy(state_ref.index as u32, &party("Alice", 1)), party("Notary", 9))));

        let refs = vec![StateRef::new(origin, 2), StateRef::new(origin, 0)];
        let resolved = resolve_inputs(&lookup, &refs).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].state_ref(), &refs[0]);
        assert_eq!(resolved[1].state_ref(), &refs[1]);
        assert_eq!(resolved[0].state().notary, notary);
    }

    #[test]
    fn test_missing_state_fails_with_origin_hash() {
        let origin = SecureHash::sha256(b"missing");
        let mut lookup = MockStateLookup::new();
        lookup.expect_load_state().with(eq(StateRef::new(origin, 0))).times(1).returning(|state_ref| Err(ResolutionError::TransactionResolution(state_ref.txhash)));

        let result = resolve_inputs(&lookup, &[StateRef::new(origin, 0), StateRef::new(origin, 1)]);
        assert_eq!(result, Err(ResolutionError::TransactionResolution(origin)));
    }

    #[test]
    fn test_attachment_hash_mismatch_rejected() {
        let requested = SecureHash::sha256(b"expected");
        let mut lookup = MockAttachmentLookup::new();
        lookup.expect_open_attachment().returning(|_| Ok(Attachment::new(b"something else".to_vec())));

        assert_eq!(resolve_attachments(&lookup, &[requested]), Err(ResolutionError::AttachmentResolution(requested)));
    }

    #[test]
    fn test_authenticate_commands_skips_unknown_keys() {
        let alice = party("Alice", 1);
        let unknown = party("Unknown", 2);
        let known_key = alice.owning_key.clone();
        let mut identities = MockIdentityLookup::new();
        identities.expect_party_from_key().returning(move |key| (key == &known_key).then(|| alice.clone()));

        #[derive(serde::Serialize, serde::Deserialize)]
        struct Noop;
        impl crate::transactions::CommandType for Noop {
            const COMMAND_TYPE: &'static str = "test.Noop";
        }

        let command = Command::new(CommandData::new(&Noop).unwrap(), vec![party("Alice", 1).owning_key, unknown.owning_key.clone()]);
        let authenticated = authenticate_commands(&identities, &[command]);
        assert_eq!(authenticated[0].signers.len(), 2);
        assert_eq!(authenticated[0].signing_parties, vec![party("Alice", 1)]);
    }
}
