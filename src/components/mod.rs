// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain-agnostic UTXO engine shared by the X-Chain and P-Chain.
//!
//! ## Modules
//!
//! - `output` / `input` / `credential` - wire variants and their type registries
//! - `utxo` / `utxo_set` - unspent outputs and the local working set
//! - `asset_amount` - per-asset spend accounting
//! - `tx` - transaction bodies and the unsigned/signed envelope
//! - `keychain` - secp256k1 keys and signing
//! - `spend` - UTXO selection against requested amounts
//! - `snapshot` - JSON snapshots of a UTXO set

pub mod asset_amount;
pub mod credential;
pub mod input;
pub mod keychain;
pub mod output;
pub mod snapshot;
pub mod spend;
pub mod tx;
pub mod utxo;
pub mod utxo_set;

pub use asset_amount::{AssetAmount, AssetAmountDestination};
pub use credential::Credential;
pub use input::{Input, SigIdx, StakeableLockIn, TransferInput, TransferableInput};
pub use keychain::{KeyChain, KeyPair};
pub use output::{MintOutput, Output, OutputOwners, StakeableLockOut, TransferOutput, TransferableOutput};
pub use spend::{ImportPlan, ImportRequest, SpendOptions, TransferRequest};
pub use tx::{BaseTx, ExportTx, ImportTx, Tx, TxBody, UnsignedTx};
pub use utxo::{Utxo, UtxoId};
pub use utxo_set::{MergeRule, UtxoSet};

/// Wire type IDs shared by the AVM and PlatformVM codecs.
pub mod type_ids {
    pub const SECP_TRANSFER_INPUT: u32 = 5;
    pub const SECP_MINT_OUTPUT: u32 = 6;
    pub const SECP_TRANSFER_OUTPUT: u32 = 7;
    pub const SECP_CREDENTIAL: u32 = 9;
    pub const STAKEABLE_LOCK_IN: u32 = 21;
    pub const STAKEABLE_LOCK_OUT: u32 = 22;
}

/// Current Unix time in seconds. Clocks before 1970 read as zero.
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
