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

//! Transactions with their collected signatures

use crate::error::{SignatureError, TransactionError};
use crate::services::{ServiceHub, StateLookup};
use crate::transactions::identity::{BaseWireTransaction, TransactionType};
use crate::transactions::{LedgerTransaction, NotaryChangeLedgerTransaction, NotaryChangeWireTransaction, StateRef, WireTransaction};
use crate::verification::TransactionWithSignatures;
use crate::verification::signatures;
use dotledger_common::{Party, PublicKey, SecureHash, TransactionSignature};
use std::collections::BTreeSet;

/// Either kind of unresolved transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreTransaction {
    General(WireTransaction),
    NotaryChange(NotaryChangeWireTransaction),
}

impl CoreTransaction {
    fn base(&self) -> &dyn BaseWireTransaction {
        match self {
            CoreTransaction::General(wtx) => wtx,
            CoreTransaction::NotaryChange(ntx) => ntx,
        }
    }

    pub fn id(&self) -> SecureHash {
        self.base().id()
    }

    pub fn inputs(&self) -> &[StateRef] {
        self.base().inputs()
    }

    pub fn notary(&self) -> Option<&Party> {
        self.base().notary()
    }

    pub fn tx_type(&self) -> TransactionType {
        self.base().tx_type()
    }
}

impl From<WireTransaction> for CoreTransaction {
    fn from(wtx: WireTransaction) -> Self {
        CoreTransaction::General(wtx)
    }
}

impl From<NotaryChangeWireTransaction> for CoreTransaction {
    fn from(ntx: NotaryChangeWireTransaction) -> Self {
        CoreTransaction::NotaryChange(ntx)
    }
}

/// Result of resolving a signed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTransaction {
    General(LedgerTransaction),
    NotaryChange(NotaryChangeLedgerTransaction),
}

impl ResolvedTransaction {
    pub fn id(&self) -> SecureHash {
        match self {
            ResolvedTransaction::General(ltx) => ltx.id(),
            ResolvedTransaction::NotaryChange(ntx) => ntx.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    core: CoreTransaction,
    sigs: Vec<TransactionSignature>,
}

impl SignedTransaction {
    pub fn new(core: impl Into<CoreTransaction>, sigs: Vec<TransactionSignature>) -> Self {
        Self { core: core.into(), sigs }
    }

    pub fn id(&self) -> SecureHash {
        self.core.id()
    }

    pub fn core(&self) -> &CoreTransaction {
        &self.core
    }

    pub fn sigs(&self) -> &[TransactionSignature] {
        &self.sigs
    }

    pub fn with_additional_signature(mut self, sig: TransactionSignature) -> Self {
        self.sigs.push(sig);
        self
    }

    pub fn with_additional_signatures(mut self, sigs: impl IntoIterator<Item = TransactionSignature>) -> Self {
        self.sigs.extend(sigs);
        self
    }

    /// Cryptographic validity of every attached signature, independent of
    /// whether the signer set is complete
    pub fn check_signatures_are_valid(&self) -> Result<(), SignatureError> {
        signatures::check_signatures_are_valid(&self.id(), &self.sigs)
    }

    /// Notary change transactions derive their signers from the resolved inputs,
    /// so `services` is only consulted for them.
    pub fn required_signing_keys<S: StateLookup + ?Sized>(&self, services: &S) -> Result<BTreeSet<PublicKey>, TransactionError> {
        match &self.core {
            CoreTransaction::General(wtx) => Ok(wtx.required_signing_keys()),
            CoreTransaction::NotaryChange(ntx) => Ok(ntx.resolve(services, self.sigs.clone())?.required_signing_keys()),
        }
    }

    pub fn missing_signers<S: StateLookup + ?Sized>(&self, services: &S) -> Result<BTreeSet<PublicKey>, TransactionError> {
        Ok(signatures::missing_signers(&self.required_signing_keys(services)?, &self.sigs))
    }

    pub fn verify_required_signatures<S: StateLookup + ?Sized>(&self, services: &S) -> Result<(), TransactionError> {
        self.verify_signatures_except(services, &BTreeSet::new())
    }

    /// Validity of every signature, then completeness except for `allowed_missing`
    pub fn verify_signatures_except<S: StateLookup + ?Sized>(&self, services: &S, allowed_missing: &BTreeSet<PublicKey>) -> Result<(), TransactionError> {
        match &self.core {
            CoreTransaction::General(wtx) => {
                signatures::verify_signatures_except(&wtx.id(), &self.sigs, &wtx.required_signing_keys(), allowed_missing, |missing| wtx.describe_missing_keys(missing))?;
            }
            CoreTransaction::NotaryChange(ntx) => {
                self.check_signatures_are_valid()?;
                let ltx = ntx.resolve(services, self.sigs.clone())?;
                signatures::check_signers_complete(&ltx.id(), ltx.sigs(), &ltx.required_signing_keys(), allowed_missing, |missing| ltx.missing_key_descriptions(missing))?;
            }
        }
        Ok(())
    }

    pub fn resolve<S: ServiceHub + ?Sized>(&self, services: &S) -> Result<ResolvedTransaction, TransactionError> {
        match &self.core {
            CoreTransaction::General(wtx) => Ok(ResolvedTransaction::General(wtx.to_ledger_transaction(services)?)),
            CoreTransaction::NotaryChange(ntx) => Ok(ResolvedTransaction::NotaryChange(ntx.resolve(services, self.sigs.clone())?)),
        }
    }
}
