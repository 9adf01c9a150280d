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

//! Shared primitives for the Dotledger transaction engine
//!
//! Hashing, keys and signatures, party identities, the canonical serialization
//! boundary, configuration and logging setup.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod logging;
pub mod serialization;

pub use config::{LoggingConfig, NodeConfig, VerifierConfig};
pub use crypto::{CompositeKey, CompositeKeyBuilder, KeyPair, PublicKey, SecureHash, TransactionSignature};
pub use error::{ConfigError, CryptoError, SerializationError};
pub use identity::Party;
