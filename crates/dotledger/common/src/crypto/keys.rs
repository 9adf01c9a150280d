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

//! Public keys, composite threshold keys and signing key pairs
//!
//! A `PublicKey` is either a single Ed25519 key or a `CompositeKey`: a weighted
//! tree of keys that is satisfied once the weights of its satisfied children
//! reach the threshold. Composite keys cannot sign; they are fulfilled by a set of
//! leaf keys that did.

use crate::crypto::hash::SecureHash;
use crate::crypto::signature::TransactionSignature;
use crate::error::CryptoError;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PublicKey {
    Ed25519([u8; 32]),
    Composite(CompositeKey),
}

impl PublicKey {
    /// Validates and wraps a raw Ed25519 public key
    pub fn ed25519(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|e| CryptoError::InvalidKey(format!("Invalid Ed25519 public key: {}", e)))?;
        Ok(PublicKey::Ed25519(bytes))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, PublicKey::Composite(_))
    }

    /// Whether this key is satisfied by signatures from `keys`.
    ///
    /// A leaf key is fulfilled when it is itself present. A composite key is
    /// fulfilled when the weights of its fulfilled children reach its threshold.
    pub fn is_fulfilled_by(&self, keys: &BTreeSet<PublicKey>) -> bool {
        match self {
            PublicKey::Ed25519(_) => keys.contains(self),
            PublicKey::Composite(composite) => composite.is_fulfilled_by(keys),
        }
    }

    /// All leaf keys reachable from this key
    pub fn leaf_keys(&self) -> BTreeSet<PublicKey> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut BTreeSet<PublicKey>) {
        match self {
            PublicKey::Ed25519(_) => {
                leaves.insert(self.clone());
            }
            PublicKey::Composite(composite) => {
                for child in &composite.children {
                    child.node.collect_leaves(leaves);
                }
            }
        }
    }

    /// Checks an Ed25519 signature over `content`
    pub fn verify(&self, content: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let bytes = match self {
            PublicKey::Ed25519(bytes) => bytes,
            PublicKey::Composite(_) => return Err(CryptoError::InvalidKey("Composite keys cannot produce signatures".to_string())),
        };

        let verifying_key = VerifyingKey::from_bytes(bytes).map_err(|e| CryptoError::InvalidKey(format!("Invalid Ed25519 public key: {}", e)))?;
        let signature = Signature::from_slice(signature).map_err(|e| CryptoError::InvalidSignature(format!("Malformed Ed25519 signature: {}", e)))?;

        verifying_key
            .verify(content, &signature)
            .map_err(|_| CryptoError::InvalidSignature(format!("Signature by {} does not match content", self)))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::Ed25519(bytes) => write!(f, "ed25519:{}", hex::encode(&bytes[..8])),
            PublicKey::Composite(composite) => write!(f, "composite({}/{} children)", composite.threshold, composite.children.len()),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A child of a composite key together with its weight
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeAndWeight {
    pub node: PublicKey,
    pub weight: u32,
}

/// Weighted threshold key. Only constructed through `CompositeKeyBuilder`, which
/// keeps children sorted so that equal trees compare and hash equally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    threshold: u32,
    children: Vec<NodeAndWeight>,
}

impl CompositeKey {
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn children(&self) -> &[NodeAndWeight] {
        &self.children
    }

    pub fn is_fulfilled_by(&self, keys: &BTreeSet<PublicKey>) -> bool {
        let satisfied: u64 = self.children.iter().filter(|child| child.node.is_fulfilled_by(keys)).map(|child| u64::from(child.weight)).sum();
        satisfied >= u64::from(self.threshold)
    }
}

/// Builds a validated composite key
#[derive(Debug, Default)]
pub struct CompositeKeyBuilder {
    children: Vec<NodeAndWeight>,
}

impl CompositeKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key(mut self, key: PublicKey, weight: u32) -> Self {
        self.children.push(NodeAndWeight { node: key, weight });
        self
    }

    /// Adds each key with weight 1
    pub fn add_keys(mut self, keys: impl IntoIterator<Item = PublicKey>) -> Self {
        self.children.extend(keys.into_iter().map(|node| NodeAndWeight { node, weight: 1 }));
        self
    }

    /// Finishes the key. `threshold` defaults to the total weight (all children
    /// required). A single child with a matching threshold collapses to the child.
    pub fn build(mut self, threshold: Option<u32>) -> Result<PublicKey, CryptoError> {
        if self.children.is_empty() {
            return Err(CryptoError::EmptyCompositeKey);
        }
        if self.children.iter().any(|child| child.weight == 0) {
            return Err(CryptoError::ZeroWeight);
        }

        let total_weight = self.children.iter().try_fold(0u32, |acc, child| acc.checked_add(child.weight)).ok_or(CryptoError::InvalidThreshold {
            threshold: threshold.unwrap_or(u32::MAX),
            total_weight: u32::MAX,
        })?;
        let threshold = threshold.unwrap_or(total_weight);
        if threshold == 0 || threshold > total_weight {
            return Err(CryptoError::InvalidThreshold { threshold, total_weight });
        }

        if self.children.len() == 1 && threshold == self.children[0].weight {
            return Ok(self.children.remove(0).node);
        }

        self.children.sort();
        for pair in self.children.windows(2) {
            if pair[0].node == pair[1].node {
                return Err(CryptoError::DuplicateChild(pair[0].node.to_string()));
            }
        }

        Ok(PublicKey::Composite(CompositeKey {
            threshold,
            children: self.children,
        }))
    }
}

/// An Ed25519 signing key pair
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key pair, mainly for tests and fixtures
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public(&self) -> PublicKey {
        PublicKey::Ed25519(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, content: &[u8]) -> Vec<u8> {
        self.signing_key.sign(content).to_bytes().to_vec()
    }

    /// Signs the byte form of a transaction id
    pub fn sign_transaction(&self, id: &SecureHash) -> TransactionSignature {
        TransactionSignature::new(self.public(), self.sign(id.as_bytes()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("public", &self.public()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(seed: u8) -> PublicKey {
        KeyPair::from_seed([seed; 32]).public()
    }

    #[test]
    fn test_sign_and_verify() {
        let pair = KeyPair::from_seed([7; 32]);
        let signature = pair.sign(b"payload");
        assert!(pair.public().verify(b"payload", &signature).is_ok());
        assert!(pair.public().verify(b"tampered", &signature).is_err());
    }

    #[test]
    fn test_leaf_fulfilment() {
        let a = key(1);
        let b = key(2);
        let signed: BTreeSet<_> = [a.clone()].into_iter().collect();
        assert!(a.is_fulfilled_by(&signed));
        assert!(!b.is_fulfilled_by(&signed));
    }

    #[test]
    fn test_two_of_three_composite() {
        let (a, b, c) = (key(1), key(2), key(3));
        let composite = CompositeKeyBuilder::new().add_keys([a.clone(), b.clone(), c.clone()]).build(Some(2)).unwrap();

        let one: BTreeSet<_> = [a.clone()].into_iter().collect();
        let two: BTreeSet<_> = [a.clone(), c.clone()].into_iter().collect();
        assert!(!composite.is_fulfilled_by(&one));
        assert!(composite.is_fulfilled_by(&two));
        assert_eq!(composite.leaf_keys(), [a, b, c].into_iter().collect());
    }

    #[test]
    fn test_weighted_composite() {
        let (a, b) = (key(1), key(2));
        let composite = CompositeKeyBuilder::new().add_key(a.clone(), 3).add_key(b.clone(), 1).build(Some(3)).unwrap();
        assert!(composite.is_fulfilled_by(&[a].into_iter().collect()));
        assert!(!composite.is_fulfilled_by(&[b].into_iter().collect()));
    }

    #[test]
    fn test_nested_composite() {
        let inner = CompositeKeyBuilder::new().add_keys([key(1), key(2)]).build(Some(1)).unwrap();
        let outer = CompositeKeyBuilder::new().add_keys([inner, key(3)]).build(None).unwrap();
        assert!(outer.is_fulfilled_by(&[key(2), key(3)].into_iter().collect()));
        assert!(!outer.is_fulfilled_by(&[key(1), key(2)].into_iter().collect()));
    }

    #[test]
    fn test_builder_order_independent() {
        let x = CompositeKeyBuilder::new().add_keys([key(1), key(2)]).build(Some(1)).unwrap();
        let y = CompositeKeyBuilder::new().add_keys([key(2), key(1)]).build(Some(1)).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        assert_eq!(CompositeKeyBuilder::new().build(None), Err(CryptoError::EmptyCompositeKey));
        assert_eq!(CompositeKeyBuilder::new().add_key(key(1), 0).build(None), Err(CryptoError::ZeroWeight));
        assert!(matches!(
            CompositeKeyBuilder::new().add_keys([key(1), key(2)]).build(Some(3)),
            Err(CryptoError::InvalidThreshold { threshold: 3, total_weight: 2 })
        ));
        assert!(matches!(CompositeKeyBuilder::new().add_keys([key(1), key(1)]).build(Some(1)), Err(CryptoError::DuplicateChild(_))));
    }

    #[test]
    fn test_single_child_collapses() {
        let single = CompositeKeyBuilder::new().add_key(key(4), 1).build(None).unwrap();
        assert_eq!(single, key(4));
    }

    #[test]
    fn test_composite_cannot_verify() {
        let composite = CompositeKeyBuilder::new().add_keys([key(1), key(2)]).build(None).unwrap();
        assert!(composite.verify(b"data", &[0u8; 64]).is_err());
    }

    proptest! {
        #[test]
        fn prop_weighted_threshold_fulfilment(
            weights in prop::collection::vec(1u32..5, 2..6),
            signed in prop::collection::vec(any::<bool>(), 6),
            rotation in 0usize..6,
            threshold in 1u32..20,
        ) {
            let children: Vec<(PublicKey, u32)> = weights.iter().enumerate().map(|(index, weight)| (key(index as u8 + 1), *weight)).collect();
            let total: u32 = weights.iter().sum();
            let threshold = threshold.min(total);

            let mut rotated = children.clone();
            rotated.rotate_left(rotation % children.len());
            let build = |children: &[(PublicKey, u32)]| {
                children.iter().fold(CompositeKeyBuilder::new(), |builder, (node, weight)| builder.add_key(node.clone(), *weight)).build(Some(threshold))
            };
            let composite = build(&children).unwrap();
            prop_assert_eq!(&composite, &build(&rotated).unwrap());

            let signers: BTreeSet<PublicKey> = children.iter().zip(&signed).filter(|(_, signed)| **signed).map(|((node, _), _)| node.clone()).collect();
            let signed_weight: u32 = children.iter().zip(&signed).filter(|(_, signed)| **signed).map(|((_, weight), _)| *weight).sum();
            prop_assert_eq!(composite.is_fulfilled_by(&signers), signed_weight >= threshold);
        }
    }
}
