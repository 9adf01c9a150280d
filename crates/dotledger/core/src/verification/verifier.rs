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

//! End-to-end verification of signed transactions
//!
//! The pipeline for a single transaction runs in a fixed order and stops at the
//! first failure: signature validity, resolution, signer completeness, then
//! structural checks and contract dispatch. Independent transactions of a batch
//! share nothing mutable and are verified in parallel.

use crate::contracts::ContractRegistry;
use crate::error::TransactionError;
use crate::services::ServiceHub;
use crate::transactions::identity::BaseWireTransaction;
use crate::transactions::{CoreTransaction, ResolvedTransaction, SignedTransaction};
use crate::verification::TransactionWithSignatures;
use crate::verification::signatures;
use dotledger_common::{ConfigError, PublicKey, VerifierConfig};
use metrics::{counter, histogram};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub struct TransactionVerifier<'a, S: ServiceHub + ?Sized> {
    services: &'a S,
    registry: &'a ContractRegistry,
    config: VerifierConfig,
    pool: Option<ThreadPool>,
}

impl<'a, S: ServiceHub + ?Sized> TransactionVerifier<'a, S> {
    /// Builds a verifier. A dedicated rayon pool is created when
    /// `worker_threads` is non-zero; otherwise batches use the global pool.
    pub fn new(services: &'a S, registry: &'a ContractRegistry, config: VerifierConfig) -> Result<Self, ConfigError> {
        let pool = if config.parallel_batch && config.worker_threads > 0 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|index| format!("dotledger-verify-{}", index))
                .build()
                .map_err(|e| ConfigError::InvalidValue("verifier.worker_threads".to_string(), e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        info!("Transaction verifier ready with {} registered contracts", registry.len());
        Ok(Self { services, registry, config, pool })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies `stx` with every required signature present
    pub fn verify(&self, stx: &SignedTransaction) -> Result<ResolvedTransaction, TransactionError> {
        self.verify_except(stx, &BTreeSet::new())
    }

    /// Verifies `stx`, tolerating missing signatures from `allowed_missing`
    #[instrument(skip_all, fields(tx_id = %stx.id().prefix()))]
    pub fn verify_except(&self, stx: &SignedTransaction, allowed_missing: &BTreeSet<PublicKey>) -> Result<ResolvedTransaction, TransactionError> {
        let started = Instant::now();
        let result = self.run_pipeline(stx, allowed_missing);
        histogram!("dotledger_verification_duration_seconds", started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => {
                counter!("dotledger_transactions_verified_total", 1);
                debug!("Transaction {} verified", stx.id().prefix());
            }
            Err(e) => {
                counter!("dotledger_transactions_rejected_total", 1, "kind" => e.kind().as_str());
                if self.config.log_rejections {
                    warn!("Rejected transaction {} ({}): {}", stx.id().prefix(), e.kind().as_str(), e);
                }
            }
        }
        result
    }

    fn run_pipeline(&self, stx: &SignedTransaction, allowed_missing: &BTreeSet<PublicKey>) -> Result<ResolvedTransaction, TransactionError> {
        stx.check_signatures_are_valid()?;

        match stx.core() {
            CoreTransaction::General(wtx) => {
                let ltx = wtx.to_ledger_transaction(self.services)?;
                signatures::check_signers_complete(&wtx.id(), stx.sigs(), &wtx.required_signing_keys(), allowed_missing, |missing| {
                    wtx.describe_missing_keys(missing)
                })?;
                ltx.verify(self.registry)?;
                Ok(ResolvedTransaction::General(ltx))
            }
            CoreTransaction::NotaryChange(ntx) => {
                let ltx = ntx.resolve(self.services, stx.sigs().to_vec())?;
                signatures::check_signers_complete(&ltx.id(), ltx.sigs(), &ltx.required_signing_keys(), allowed_missing, |missing| {
                    ltx.missing_key_descriptions(missing)
                })?;
                ltx.verify()?;
                Ok(ResolvedTransaction::NotaryChange(ltx))
            }
        }
    }
}

impl<'a, S: ServiceHub + Sync + ?Sized> TransactionVerifier<'a, S> {
    /// Verifies each transaction independently. Results are returned in input
    /// order; one rejection never affects the others.
    pub fn verify_batch(&self, batch: &[SignedTransaction]) -> Vec<Result<ResolvedTransaction, TransactionError>> {
        info!("Verifying batch of {} transactions", batch.len());
        if !self.config.parallel_batch {
            return batch.iter().map(|stx| self.verify(stx)).collect();
        }

        let run = || -> Vec<Result<ResolvedTransaction, TransactionError>> { batch.par_iter().map(|stx| self.verify(stx)).collect() };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}
