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

//! Dotledger transaction verification engine
//!
//! Turns signed, serialized transactions into resolved state transitions and
//! decides whether they may be accepted into the ledger:
//!
//! - `transactions`: wire and resolved transaction forms, states, commands
//! - `resolution`: loading of input states, attachments and signer identities
//! - `verification`: structural checks, signatures and the end-to-end verifier
//! - `contracts`: contract registry, contract view, grouping and dispatch
//! - `services`: lookup collaborators and an in-memory implementation

pub mod contracts;
pub mod error;
pub mod resolution;
pub mod services;
pub mod transactions;
pub mod verification;

pub use contracts::{Contract, ContractRegistry, ContractView, InOutGroup};
pub use error::{Direction, ErrorKind, InvariantError, ResolutionError, SignatureError, TransactionError, TransactionVerificationError};
pub use services::{AttachmentLookup, IdentityLookup, InMemoryServices, ServiceHub, StateLookup};
pub use transactions::{
    Attachment, AuthenticatedObject, BaseWireTransaction, Command, CommandData, CommandType, ContractId, ContractState, CoreTransaction, LedgerTransaction, NotaryChangeLedgerTransaction,
    NotaryChangeWireTransaction, ResolvedTransaction, SignedTransaction, StateAndRef, StateData, StateRef, TimeWindow, TransactionBuilder, TransactionState, TransactionType, WireTransaction,
};
pub use verification::{TransactionVerifier, TransactionWithSignatures};
