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

//! Signature validity and signer completeness
//!
//! Validity is always checked before completeness, so a tampered signature is
//! rejected even when the remaining signatures would satisfy every required key.

use crate::error::SignatureError;
use dotledger_common::{PublicKey, SecureHash, TransactionSignature};
use std::collections::BTreeSet;
use tracing::debug;

/// Fails on the first signature that does not verify against `id`
pub fn check_signatures_are_valid(id: &SecureHash, sigs: &[TransactionSignature]) -> Result<(), SignatureError> {
    for sig in sigs {
        sig.verify_transaction(id).map_err(|e| SignatureError::Invalid {
            id: *id,
            key: sig.by.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Required keys not fulfilled by the keys that produced `sigs`. A composite
/// key counts as fulfilled once enough of its leaves have signed.
pub fn missing_signers(required: &BTreeSet<PublicKey>, sigs: &[TransactionSignature]) -> BTreeSet<PublicKey> {
    let signed: BTreeSet<PublicKey> = sigs.iter().map(|sig| sig.by.clone()).collect();
    required.iter().filter(|key| !key.is_fulfilled_by(&signed)).cloned().collect()
}

/// Validity of every signature, then completeness. Keys in `allowed_missing`
/// may be absent; anything else missing fails with the full missing set.
pub fn verify_signatures_except<F>(
    id: &SecureHash,
    sigs: &[TransactionSignature],
    required: &BTreeSet<PublicKey>,
    allowed_missing: &BTreeSet<PublicKey>,
    describe: F,
) -> Result<(), SignatureError>
where
    F: Fn(&BTreeSet<PublicKey>) -> Vec<String>,
{
    check_signatures_are_valid(id, sigs)?;
    check_signers_complete(id, sigs, required, allowed_missing, describe)
}

/// Completeness only; assumes validity has already been checked
pub fn check_signers_complete<F>(
    id: &SecureHash,
    sigs: &[TransactionSignature],
    required: &BTreeSet<PublicKey>,
    allowed_missing: &BTreeSet<PublicKey>,
    describe: F,
) -> Result<(), SignatureError>
where
    F: Fn(&BTreeSet<PublicKey>) -> Vec<String>,
{
    let missing = missing_signers(required, sigs);
    let needed: BTreeSet<&PublicKey> = missing.difference(allowed_missing).collect();
    if needed.is_empty() {
        if !missing.is_empty() {
            debug!("Transaction {} tolerates {} missing signers", id.prefix(), missing.len());
        }
        return Ok(());
    }

    Err(SignatureError::Missing {
        id: *id,
        descriptions: describe(&missing),
        missing,
    })
}

/// A resolved transaction that carries its own signatures and can compute
/// who must have signed it
pub trait TransactionWithSignatures {
    fn id(&self) -> SecureHash;

    fn sigs(&self) -> &[TransactionSignature];

    fn required_signing_keys(&self) -> BTreeSet<PublicKey>;

    /// Human readable reasons each key in `missing` is required
    fn missing_key_descriptions(&self, missing: &BTreeSet<PublicKey>) -> Vec<String> {
        missing.iter().map(|key| format!("{} required as a participant", key)).collect()
    }

    fn check_signatures_are_valid(&self) -> Result<(), SignatureError> {
        check_signatures_are_valid(&self.id(), self.sigs())
    }

    fn missing_signers(&self) -> BTreeSet<PublicKey> {
        missing_signers(&self.required_signing_keys(), self.sigs())
    }

    fn verify_required_signatures(&self) -> Result<(), SignatureError> {
        self.verify_signatures_except(&BTreeSet::new())
    }

    fn verify_signatures_except(&self, allowed_missing: &BTreeSet<PublicKey>) -> Result<(), SignatureError> {
        verify_signatures_except(&self.id(), self.sigs(), &self.required_signing_keys(), allowed_missing, |missing| {
            self.missing_key_descriptions(missing)
        })
    }
}
