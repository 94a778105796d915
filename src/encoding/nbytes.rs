// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-length binary blobs.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{cb58, Packable, Packer, Unpacker};
use crate::error::{Result, UtxoError};

/// A blob of exactly `N` bytes, rendered as cb58.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NBytes<const N: usize>([u8; N]);

/// 32-byte identifier (transaction, asset and blockchain IDs).
pub type Id = NBytes<32>;

/// 20-byte identifier, used for addresses.
pub type ShortId = NBytes<20>;

/// 65-byte recoverable secp256k1 signature.
pub type SignatureBytes = NBytes<65>;

impl<const N: usize> NBytes<N> {
    pub const LEN: usize = N;

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Copies a slice that must be exactly `N` bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; N] = bytes.try_into().map_err(|_| UtxoError::InvalidLength {
            what: "fixed-size blob",
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// True when every byte is zero.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        let digits = encoded.strip_prefix("0x").unwrap_or(encoded);
        let raw = hex::decode(digits).map_err(|e| UtxoError::InvalidHex(e.to_string()))?;
        Self::from_slice(&raw)
    }

    pub fn to_cb58(&self) -> String {
        cb58::encode(&self.0)
    }
}

impl<const N: usize> Default for NBytes<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for NBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for NBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for NBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cb58())
    }
}

impl<const N: usize> FromStr for NBytes<N> {
    type Err = UtxoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(&cb58::decode(s)?)
    }
}

impl<const N: usize> Packable for NBytes<N> {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_fixed(&self.0);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self(unpacker.unpack_fixed()?))
    }
}

impl<const N: usize> Serialize for NBytes<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const N: usize> Deserialize<'de> for NBytes<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(de::Error::custom)
    }
}
