// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! secp256k1 key pairs and the key chain used to sign transactions.
//!
//! Keys are exchanged in the Avalanche `PrivateKey-<cb58>` form. Generating
//! and storing keys is the wallet's job; this module only loads and signs.

use std::collections::BTreeMap;
use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::encoding::{cb58, ShortId, SignatureBytes};
use crate::error::{Result, UtxoError};

/// Prefix of the textual private key format.
pub const PRIVATE_KEY_PREFIX: &str = "PrivateKey-";

/// Derives the 20-byte address of a compressed public key.
///
/// address = RIPEMD-160(SHA-256(pubkey))
pub fn address_from_public_key(compressed: &[u8]) -> ShortId {
    let sha = Sha256::digest(compressed);
    let ripe = Ripemd160::digest(sha);
    ShortId::new(ripe.into())
}

/// Recovers the signer's address from a 65-byte `r ++ s ++ v` signature.
pub fn recover_address(digest: &[u8; 32], signature: &SignatureBytes) -> Result<ShortId> {
    let raw = signature.as_bytes();
    let sig = Signature::from_slice(&raw[..64]).map_err(|e| UtxoError::Signing(e.to_string()))?;
    let recid = RecoveryId::from_byte(raw[64])
        .ok_or_else(|| UtxoError::Signing(format!("invalid recovery id {}", raw[64])))?;
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recid)
        .map_err(|e| UtxoError::Signing(e.to_string()))?;
    Ok(address_from_public_key(key.to_encoded_point(true).as_bytes()))
}

/// A secp256k1 signing key and its derived address.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    address: ShortId,
}

impl KeyPair {
    /// Load a key pair from raw 32-byte secret key material.
    ///
    /// # Arguments
    /// * `secret` - Big-endian secret scalar
    ///
    /// # Returns
    /// * `Ok(KeyPair)` - Key pair with its derived address
    /// * `Err(UtxoError::Signing)` - If the scalar is zero or out of range
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| UtxoError::Signing(format!("invalid private key: {}", e)))?;
        let address = address_from_public_key(&compressed_public_key(&signing_key));
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Parse a key in the `PrivateKey-<cb58>` form.
    pub fn from_private_key_string(encoded: &str) -> Result<Self> {
        let body = encoded.strip_prefix(PRIVATE_KEY_PREFIX).unwrap_or(encoded);
        Self::from_secret_bytes(&cb58::decode(body)?)
    }

    pub fn to_private_key_string(&self) -> String {
        format!(
            "{}{}",
            PRIVATE_KEY_PREFIX,
            cb58::encode(&self.signing_key.to_bytes())
        )
    }

    pub fn address(&self) -> ShortId {
        self.address
    }

    /// 33-byte SEC1 compressed public key.
    pub fn public_key(&self) -> Vec<u8> {
        compressed_public_key(&self.signing_key)
    }

    /// Sign a 32-byte digest, producing a recoverable `r ++ s ++ v`
    /// signature (RFC 6979 nonce, low-s).
    pub fn sign(&self, digest: &[u8; 32]) -> Result<SignatureBytes> {
        let (signature, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| UtxoError::Signing(e.to_string()))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recid.to_byte();
        Ok(SignatureBytes::new(out))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

fn compressed_public_key(signing_key: &SigningKey) -> Vec<u8> {
    signing_key
        .verifying_key()
        .to_encoded_point(true)
        .as_bytes()
        .to_vec()
}

/// Key pairs indexed by address.
#[derive(Debug, Clone, Default)]
pub struct KeyChain {
    keys: BTreeMap<ShortId, KeyPair>,
}

impl KeyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key pair, returning its address.
    pub fn add(&mut self, key: KeyPair) -> ShortId {
        let address = key.address();
        self.keys.insert(address, key);
        address
    }

    /// Imports a `PrivateKey-<cb58>` string.
    pub fn import_key(&mut self, encoded: &str) -> Result<ShortId> {
        Ok(self.add(KeyPair::from_private_key_string(encoded)?))
    }

    pub fn has_key(&self, address: &ShortId) -> bool {
        self.keys.contains_key(address)
    }

    pub fn get(&self, address: &ShortId) -> Option<&KeyPair> {
        self.keys.get(address)
    }

    /// Addresses in ascending order.
    pub fn addresses(&self) -> Vec<ShortId> {
        self.keys.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Signs `digest` with the key owning `address`.
    pub fn sign(&self, address: &ShortId, digest: &[u8; 32]) -> Result<SignatureBytes> {
        self.keys
            .get(address)
            .ok_or_else(|| UtxoError::MissingKey(address.to_string()))?
            .sign(digest)
    }
}
