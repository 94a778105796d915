// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error type shared by every module of the engine.
//!
//! Invariant violations (spending a finished asset amount, a bad merge rule,
//! corrupt encodings) fail the current operation immediately. Expected
//! absence, such as looking up an unknown UTXO, is reported with `Option` or
//! `bool` by the caller-facing methods instead of an error.

use std::io;

/// Errors that can occur while decoding, accounting for or building
/// transactions.
#[derive(Debug, thiserror::Error)]
pub enum UtxoError {
    #[error("asset amount for {asset_id} is already finished; no further spends allowed")]
    AlreadyFinished { asset_id: String },

    #[error("unknown merge rule: {0}")]
    UnknownMergeRule(String),

    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("corrupt or invalid UTXO/address data: invalid checksum")]
    InvalidChecksum,

    #[error("corrupt or invalid UTXO/address data: invalid base58: {0}")]
    InvalidBase58(String),

    #[error("corrupt or invalid UTXO/address data: invalid hex: {0}")]
    InvalidHex(String),

    #[error("corrupt or invalid UTXO/address data: unexpected end of input (needed {needed} bytes, {remaining} remaining)")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("corrupt or invalid UTXO/address data: {0} trailing bytes after decode")]
    TrailingBytes(usize),

    #[error("corrupt or invalid UTXO/address data: unknown {family} type id {type_id}")]
    UnknownTypeId { family: &'static str, type_id: u32 },

    #[error("threshold {threshold} exceeds the number of addresses ({addresses})")]
    InvalidThreshold { threshold: u32, addresses: usize },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("amount overflow")]
    AmountOverflow,

    #[error("insufficient balance for asset {asset_id}: required {required}, available {available}")]
    InsufficientFunds {
        asset_id: String,
        required: u64,
        available: u64,
    },

    #[error("no atomic UTXOs to import")]
    NoAtomicUtxos,

    #[error("no key in the key chain for address {0}")]
    MissingKey(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid configuration for {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UtxoError>;
