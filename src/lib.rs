// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational UTXO - Avalanche UTXO Accounting Engine
//!
//! Tracks a local set of unspent outputs, selects which of them cover a
//! payment and serializes the resulting X-Chain and P-Chain transactions
//! byte-for-byte as the Avalanche nodes expect them.
//!
//! ## Modules
//!
//! - `components` - UTXOs, the UTXO set, asset accounting, inputs/outputs and
//!   the transaction envelope shared by both chains
//! - `avm` - X-Chain transaction builders
//! - `platformvm` - P-Chain transaction builders and stakeable spending
//! - `encoding` - binary codec, cb58 and checksummed hex
//! - `config` - environment-driven chain parameters
//! - `telemetry` - tracing subscriber setup

pub mod avm;
pub mod components;
pub mod config;
pub mod encoding;
pub mod error;
pub mod platformvm;
pub mod telemetry;

pub use components::{
    AssetAmount, AssetAmountDestination, KeyChain, MergeRule, SpendOptions, Tx, UnsignedTx, Utxo, UtxoId, UtxoSet,
};
pub use config::{ChainContext, EngineConfig};
pub use encoding::{Id, ShortId};
pub use error::{Result, UtxoError};
