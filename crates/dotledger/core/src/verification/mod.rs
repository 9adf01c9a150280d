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

//! Verification of resolved transactions
//!
//! - `structure`: duplicate-input, notary-consistency and encumbrance checks
//! - `signatures`: signature validity and required-signer completeness
//! - `verifier`: the end-to-end pipeline over signed transactions

pub mod signatures;
pub mod structure;
pub mod verifier;

pub use signatures::TransactionWithSignatures;
pub use verifier::TransactionVerifier;
