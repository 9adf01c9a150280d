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

//! Contract verification
//!
//! Contracts are registered by id and invoked once per distinct contract
//! referenced by a transaction, each receiving the same [`ContractView`].
//! Per-asset reasoning inside a contract goes through [`grouping`].

pub mod dispatcher;
pub mod grouping;
pub mod registry;
pub mod view;

pub use grouping::InOutGroup;
pub use registry::{Contract, ContractRegistry};
pub use view::ContractView;
