// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `0x`-prefixed hex with the cb58 checksum appended.
//!
//! This is the `"hex"` encoding returned by the Avalanche `getUTXOs` API.

use crate::error::{Result, UtxoError};

use super::cb58;

pub fn encode(payload: &[u8]) -> String {
    format!("0x{}", hex::encode(cb58::add_checksum(payload)))
}

pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let trimmed = encoded.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let raw = hex::decode(digits).map_err(|e| UtxoError::InvalidHex(e.to_string()))?;
    cb58::strip_checksum(&raw)
}
