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

//! Error types for transaction resolution and verification
//!
//! Every failure carries the id of the offending transaction and enough detail
//! (duplicate refs, missing keys, offending contract) to render a diagnostic
//! without re-deriving it. Callers match on [`TransactionError::kind`].

use crate::transactions::{ContractId, StateRef};
use dotledger_common::{Party, PublicKey, SecureHash, SerializationError};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// A referenced transaction or attachment could not be loaded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Transaction resolution failure: transaction {0} is unknown")]
    TransactionResolution(SecureHash),

    #[error("Attachment resolution failure: attachment {0} is unknown")]
    AttachmentResolution(SecureHash),
}

impl ResolutionError {
    pub fn hash(&self) -> SecureHash {
        match self {
            ResolutionError::TransactionResolution(hash) | ResolutionError::AttachmentResolution(hash) => *hash,
        }
    }
}

/// Side of a transaction an encumbrance violation was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "INPUT"),
            Direction::Output => write!(f, "OUTPUT"),
        }
    }
}

/// Structural or contract-level rejection of a resolved transaction
#[derive(Debug, Error)]
pub enum TransactionVerificationError {
    #[error("Transaction {id} has duplicate inputs: {duplicates:?}")]
    DuplicateInputStates { id: SecureHash, duplicates: BTreeSet<StateRef> },

    #[error("Transaction {id} changes notary from {tx_notary} to {output_notary}; use a notary change transaction")]
    NotaryChangeInWrongTransactionType { id: SecureHash, tx_notary: Party, output_notary: Party },

    #[error("Transaction {id} is missing encumbrance {missing} on the {direction} side")]
    TransactionMissingEncumbrance { id: SecureHash, missing: usize, direction: Direction },

    #[error("Inputs of transaction {id} are assigned to more than one notary: {notaries:?}")]
    MultipleInputNotaries { id: SecureHash, notaries: Vec<Party> },

    #[error("Input of transaction {id} is assigned to {found}, expected {expected}")]
    InputNotaryMismatch { id: SecureHash, expected: Party, found: Party },

    #[error("No contract registered for {contract} referenced by transaction {id}")]
    ContractNotFound { id: SecureHash, contract: ContractId },

    #[error("Contract {contract} rejected transaction {id}: {cause}")]
    ContractRejection {
        id: SecureHash,
        contract: ContractId,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TransactionVerificationError {
    pub fn id(&self) -> SecureHash {
        match self {
            TransactionVerificationError::DuplicateInputStates { id, .. }
            | TransactionVerificationError::NotaryChangeInWrongTransactionType { id, .. }
            | TransactionVerificationError::TransactionMissingEncumbrance { id, .. }
            | TransactionVerificationError::MultipleInputNotaries { id, .. }
            | TransactionVerificationError::InputNotaryMismatch { id, .. }
            | TransactionVerificationError::ContractNotFound { id, .. }
            | TransactionVerificationError::ContractRejection { id, .. } => *id,
        }
    }
}

/// Signature validity and completeness failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid signature by {key} on transaction {id}: {reason}")]
    Invalid { id: SecureHash, key: PublicKey, reason: String },

    #[error("Transaction {id} is missing signatures from {missing:?}: {descriptions:?}")]
    Missing {
        id: SecureHash,
        missing: BTreeSet<PublicKey>,
        descriptions: Vec<String>,
    },
}

impl SignatureError {
    pub fn id(&self) -> SecureHash {
        match self {
            SignatureError::Invalid { id, .. } | SignatureError::Missing { id, .. } => *id,
        }
    }
}

/// Violations detected while constructing a transaction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("Transactions with time windows must be notarised")]
    TimeWindowWithoutNotary,

    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(String),

    #[error("New notary must differ from the current notary {0}")]
    NotaryUnchanged(Party),

    #[error("A notary change transaction must have inputs")]
    NotaryChangeWithoutInputs,

    #[error("Expected a {expected} transaction")]
    WrongTransactionType { expected: &'static str },
}

/// Coarse classification of a failure, for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ResolutionFailure,
    StructuralViolation,
    ContractRejection,
    SignatureInvalid,
    SignersMissing,
    InvalidConstruction,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ResolutionFailure => "resolution_failure",
            ErrorKind::StructuralViolation => "structural_violation",
            ErrorKind::ContractRejection => "contract_rejection",
            ErrorKind::SignatureInvalid => "signature_invalid",
            ErrorKind::SignersMissing => "signers_missing",
            ErrorKind::InvalidConstruction => "invalid_construction",
            ErrorKind::Serialization => "serialization",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Verification(#[from] TransactionVerificationError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactionError::Resolution(_) => ErrorKind::ResolutionFailure,
            TransactionError::Verification(TransactionVerificationError::ContractRejection { .. } | TransactionVerificationError::ContractNotFound { .. }) => ErrorKind::ContractRejection,
            TransactionError::Verification(_) => ErrorKind::StructuralViolation,
            TransactionError::Signature(SignatureError::Invalid { .. }) => ErrorKind::SignatureInvalid,
            TransactionError::Signature(SignatureError::Missing { .. }) => ErrorKind::SignersMissing,
            TransactionError::Invariant(_) => ErrorKind::InvalidConstruction,
            TransactionError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Id of the rejected transaction, when the failure is tied to one
    pub fn transaction_id(&self) -> Option<SecureHash> {
        match self {
            TransactionError::Verification(e) => Some(e.id()),
            TransactionError::Signature(e) => Some(e.id()),
            TransactionError::Resolution(_) | TransactionError::Invariant(_) | TransactionError::Serialization(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let id = SecureHash::sha256(b"tx");
        let missing: TransactionError = SignatureError::Missing {
            id,
            missing: BTreeSet::new(),
            descriptions: vec![],
        }
        .into();
        assert_eq!(missing.kind(), ErrorKind::SignersMissing);
        assert_eq!(missing.transaction_id(), Some(id));

        let resolution: TransactionError = ResolutionError::TransactionResolution(id).into();
        assert_eq!(resolution.kind(), ErrorKind::ResolutionFailure);
        assert_eq!(resolution.transaction_id(), None);

        let structural: TransactionError = TransactionVerificationError::TransactionMissingEncumbrance {
            id,
            missing: 2,
            direction: Direction::Output,
        }
        .into();
        assert_eq!(structural.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn test_contract_rejection_preserves_cause() {
        use std::error::Error;

        let cause = anyhow::anyhow!("amounts do not balance");
        let err = TransactionVerificationError::ContractRejection {
            id: SecureHash::ZERO,
            contract: ContractId::new("cash"),
            cause: cause.into(),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("amounts do not balance".to_string()));
        assert_eq!(TransactionError::from(err).kind(), ErrorKind::ContractRejection);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Input.to_string(), "INPUT");
        assert_eq!(Direction::Output.to_string(), "OUTPUT");
    }
}
