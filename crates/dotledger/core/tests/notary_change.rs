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

mod common;

use common::{Actor, CashCommand, cash, cash_registry, command, issue};
use dotledger_common::VerifierConfig;
use dotledger_common::logging::init_test_logging;
use dotledger_core::{
    BaseWireTransaction, ErrorKind, InMemoryServices, InvariantError, NotaryChangeWireTransaction, ResolvedTransaction, SignedTransaction, StateLookup, StateRef, TransactionError, TransactionState,
    TransactionBuilder, TransactionVerificationError, TransactionVerifier, TransactionWithSignatures,
};

struct Setup {
    services: InMemoryServices,
    old_notary: Actor,
    new_notary: Actor,
    alice: Actor,
    issued: Vec<StateRef>,
}

/// Alice holds two cash states on the old notary; the first is encumbered by the second
fn setup() -> Setup {
    init_test_logging();
    let old_notary = Actor::new("OldNotary", 9);
    let new_notary = Actor::new("NewNotary", 10);
    let alice = Actor::new("Alice", 1);
    let mut services = InMemoryServices::new();
    let states = vec![
        TransactionState::new(cash(&alice.party, 10, "USD"), old_notary.party.clone()).with_encumbrance(1),
        TransactionState::new(cash(&alice.party, 20, "USD"), old_notary.party.clone()),
    ];
    let issued = issue(&mut services, &old_notary, &alice, states);
    Setup {
        services,
        old_notary,
        new_notary,
        alice,
        issued,
    }
}

#[test]
fn test_same_notary_rejected_at_construction() {
    let setup = setup();
    let result = NotaryChangeWireTransaction::new(setup.issued.clone(), setup.old_notary.party.clone(), setup.old_notary.party.clone());
    assert!(matches!(result, Err(TransactionError::Invariant(InvariantError::NotaryUnchanged(_)))));
}

#[test]
fn test_notary_change_moves_states_and_keeps_encumbrance_chain() {
    let mut setup = setup();
    let ntx = NotaryChangeWireTransaction::new(setup.issued.clone(), setup.old_notary.party.clone(), setup.new_notary.party.clone()).unwrap();
    let stx = SignedTransaction::new(ntx.clone(), vec![setup.alice.keys.sign_transaction(&ntx.id())]);

    let registry = cash_registry();
    let verifier = TransactionVerifier::new(&setup.services, &registry, VerifierConfig::default()).unwrap();
    let ResolvedTransaction::NotaryChange(ltx) = verifier.verify(&stx).unwrap() else {
        panic!("expected a notary change");
    };

    let outputs = ltx.outputs();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(|output| output.notary == setup.new_notary.party));
    assert_eq!(outputs[0].encumbrance, Some(1));
    assert_eq!(outputs[1].encumbrance, None);
    assert_eq!(outputs[1].data, ltx.inputs()[1].state().data);

    let id = setup.services.record_notary_change(&ltx);
    assert_eq!(id, ntx.id());
    assert_eq!(setup.services.load_state(&StateRef::new(id, 1)).unwrap().notary, setup.new_notary.party);
    assert_eq!(ltx.out_ref(0).map(|out| *out.state_ref()), Some(StateRef::new(id, 0)));
}

#[test]
fn test_reissued_encumbered_pair_can_be_spent() {
    let mut setup = setup();
    let ntx = NotaryChangeWireTransaction::new(setup.issued.clone(), setup.old_notary.party.clone(), setup.new_notary.party.clone()).unwrap();
    let stx = SignedTransaction::new(ntx.clone(), vec![setup.alice.keys.sign_transaction(&ntx.id())]);

    let registry = cash_registry();
    let ltx = {
        let verifier = TransactionVerifier::new(&setup.services, &registry, VerifierConfig::default()).unwrap();
        match verifier.verify(&stx).unwrap() {
            ResolvedTransaction::NotaryChange(ltx) => ltx,
            other => panic!("expected a notary change, got {:?}", other),
        }
    };
    let id = setup.services.record_notary_change(&ltx);

    let mut builder = TransactionBuilder::new(Some(setup.new_notary.party.clone()));
    builder
        .add_input_state(StateRef::new(id, 0))
        .add_input_state(StateRef::new(id, 1))
        .add_output_state(TransactionState::new(cash(&setup.alice.party, 30, "USD"), setup.new_notary.party.clone()))
        .add_command(command(CashCommand::Move, &[&setup.alice]));
    let spend = builder.sign_with(&[&setup.alice.keys, &setup.new_notary.keys]).unwrap();

    let verifier = TransactionVerifier::new(&setup.services, &registry, VerifierConfig::default()).unwrap();
    match verifier.verify(&spend).unwrap() {
        ResolvedTransaction::General(spent) => {
            assert_eq!(spent.inputs().len(), 2);
            assert_eq!(spent.inputs()[0].state().encumbrance, Some(1));
        }
        other => panic!("expected general transaction, got {:?}", other),
    }
}

#[test]
fn test_participants_must_sign() {
    let setup = setup();
    let ntx = NotaryChangeWireTransaction::new(setup.issued.clone(), setup.old_notary.party.clone(), setup.new_notary.party.clone()).unwrap();
    let id = ntx.id();
    let stx = SignedTransaction::new(ntx, vec![setup.old_notary.keys.sign_transaction(&id)]);

    let required = stx.required_signing_keys(&setup.services).unwrap();
    assert_eq!(required, [setup.alice.keys.public()].into_iter().collect());

    let err = stx.verify_required_signatures(&setup.services).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignersMissing);
    assert!(stx.verify_signatures_except(&setup.services, &required).is_ok(), "alice's signature may be collected later");

    let resolved = match stx.resolve(&setup.services).unwrap() {
        ResolvedTransaction::NotaryChange(ltx) => ltx,
        other => panic!("expected a notary change, got {:?}", other),
    };
    assert_eq!(resolved.missing_signers(), required);
}

#[test]
fn test_input_on_other_notary_rejected() {
    let setup = setup();
    let impostor = Actor::new("Impostor", 11);
    let ntx = NotaryChangeWireTransaction::new(setup.issued.clone(), impostor.party.clone(), setup.new_notary.party.clone()).unwrap();
    let stx = SignedTransaction::new(ntx.clone(), vec![setup.alice.keys.sign_transaction(&ntx.id())]);

    let registry = cash_registry();
    let verifier = TransactionVerifier::new(&setup.services, &registry, VerifierConfig::default()).unwrap();
    match verifier.verify(&stx) {
        Err(TransactionError::Verification(TransactionVerificationError::InputNotaryMismatch { expected, found, .. })) => {
            assert_eq!(expected, impostor.party);
            assert_eq!(found, setup.old_notary.party);
        }
        other => panic!("expected input notary mismatch, got {:?}", other),
    }
}

#[test]
fn test_encumbrance_left_behind_rejected() {
    let setup = setup();
    let ntx = NotaryChangeWireTransaction::new(vec![setup.issued[0]], setup.old_notary.party.clone(), setup.new_notary.party.clone()).unwrap();
    let ltx = ntx.resolve(&setup.services, vec![]).unwrap();
    assert!(matches!(ltx.verify(), Err(TransactionVerificationError::TransactionMissingEncumbrance { missing: 1, .. })));
}

#[test]
fn test_unknown_input_fails_resolution() {
    let setup = setup();
    let unknown = StateRef::new(dotledger_common::SecureHash::sha256(b"unknown"), 0);
    let ntx = NotaryChangeWireTransaction::new(vec![unknown], setup.old_notary.party.clone(), setup.new_notary.party.clone()).unwrap();
    let err = ntx.resolve(&setup.services, vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResolutionFailure);
}
