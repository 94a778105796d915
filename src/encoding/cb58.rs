// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! cb58: base-58 with a 4-byte SHA-256 checksum.
//!
//! The checksum is the last 4 bytes of `SHA-256(payload)`, appended to the
//! payload before base-58 encoding. This is the human-readable form of
//! Avalanche IDs, UTXO IDs, private keys and serialized transactions.

use sha2::{Digest, Sha256};

use crate::error::{Result, UtxoError};

/// Length of the appended checksum.
pub const CHECKSUM_LEN: usize = 4;

/// Last [`CHECKSUM_LEN`] bytes of the SHA-256 digest of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

/// Appends the checksum to `payload`.
pub fn add_checksum(payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&checksum(payload));
    bytes
}

/// Splits off and verifies the trailing checksum, returning the payload.
pub fn strip_checksum(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < CHECKSUM_LEN {
        return Err(UtxoError::InvalidLength {
            what: "checksummed payload",
            expected: CHECKSUM_LEN,
            actual: bytes.len(),
        });
    }
    let (payload, sum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if checksum(payload) != sum {
        return Err(UtxoError::InvalidChecksum);
    }
    Ok(payload.to_vec())
}

pub fn encode(payload: &[u8]) -> String {
    bs58::encode(add_checksum(payload)).into_string()
}

pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let raw = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|e| UtxoError::InvalidBase58(e.to_string()))?;
    strip_checksum(&raw)
}
