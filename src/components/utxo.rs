// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! A single unspent transaction output and its identifier.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::output::Output;
use crate::encoding::{cb58, hex_checksum, Id, Packable, Packer, Unpacker};
use crate::error::{Result, UtxoError};

/// Identity of a UTXO: the transaction that created it and the output's
/// position in that transaction.
///
/// Ordering follows the bytes of `tx_id ++ output_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtxoId {
    pub tx_id: Id,
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        Self {
            tx_id,
            output_index,
        }
    }

    pub fn to_bytes(&self) -> [u8; 36] {
        let mut out = [0u8; 36];
        out[..32].copy_from_slice(self.tx_id.as_bytes());
        out[32..].copy_from_slice(&self.output_index.to_be_bytes());
        out
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cb58::encode(&self.to_bytes()))
    }
}

impl FromStr for UtxoId {
    type Err = UtxoError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = cb58::decode(s)?;
        if raw.len() != 36 {
            return Err(UtxoError::InvalidLength {
                what: "UTXO ID",
                expected: 36,
                actual: raw.len(),
            });
        }
        let mut index = [0u8; 4];
        index.copy_from_slice(&raw[32..]);
        Ok(Self::new(Id::from_slice(&raw[..32])?, u32::from_be_bytes(index)))
    }
}

impl Serialize for UtxoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UtxoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(de::Error::custom)
    }
}

/// An unspent output: codec version, origin and the locked output itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub codec_id: u16,
    pub tx_id: Id,
    pub output_index: u32,
    pub asset_id: Id,
    pub output: Output,
}

impl Utxo {
    pub fn new(codec_id: u16, tx_id: Id, output_index: u32, asset_id: Id, output: Output) -> Self {
        Self {
            codec_id,
            tx_id,
            output_index,
            asset_id,
            output,
        }
    }

    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::new(self.tx_id, self.output_index)
    }

    /// cb58 form of the serialized UTXO, as stored and exchanged by wallets.
    pub fn to_cb58(&self) -> String {
        cb58::encode(&self.to_bytes())
    }

    /// `0x`-prefixed hex with checksum, as returned by the `getUTXOs` API.
    pub fn to_hex_checksum(&self) -> String {
        hex_checksum::encode(&self.to_bytes())
    }

    pub fn from_hex_checksum(encoded: &str) -> Result<Self> {
        Self::from_bytes(&hex_checksum::decode(encoded)?)
    }
}

impl Packable for Utxo {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u16(self.codec_id);
        self.tx_id.pack(packer);
        packer.pack_u32(self.output_index);
        self.asset_id.pack(packer);
        self.output.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            codec_id: unpacker.unpack_u16()?,
            tx_id: Id::unpack(unpacker)?,
            output_index: unpacker.unpack_u32()?,
            asset_id: Id::unpack(unpacker)?,
            output: Output::unpack(unpacker)?,
        })
    }
}

impl FromStr for Utxo {
    type Err = UtxoError;

    /// Parses the cb58 form produced by [`Utxo::to_cb58`].
    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&cb58::decode(s)?)
    }
}
