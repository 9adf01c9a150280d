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

//! Transaction data model
//!
//! Wire-level transactions (`WireTransaction`, `NotaryChangeWireTransaction`)
//! carry state references and raw components and are named by the hash of their
//! serialized form. Resolution turns them into `LedgerTransaction` and
//! `NotaryChangeLedgerTransaction` snapshots with every reference loaded.

pub mod attachment;
pub mod builder;
pub mod command;
pub mod identity;
pub mod ledger;
pub mod notary_change;
pub mod signed;
pub mod state;
pub mod time_window;
pub mod wire;

pub use attachment::Attachment;
pub use builder::TransactionBuilder;
pub use command::{AuthenticatedObject, Command, CommandData, CommandType};
pub use identity::{BaseWireTransaction, SerializedForm, TransactionType};
pub use ledger::LedgerTransaction;
pub use notary_change::{NotaryChangeLedgerTransaction, NotaryChangeWireTransaction};
pub use signed::{CoreTransaction, ResolvedTransaction, SignedTransaction};
pub use state::{ContractId, ContractState, StateAndRef, StateData, StateRef, TransactionState};
pub use time_window::TimeWindow;
pub use wire::WireTransaction;
