// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! when building transactions. Configuration is loaded from the environment
//! by the embedding application.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AVAX_NETWORK_ID` | Network ID written into every transaction | `1` (mainnet) |
//! | `AVAX_BLOCKCHAIN_ID` | cb58 ID of the X-Chain | mainnet X-Chain |
//! | `AVAX_ASSET_ID` | cb58 ID of the fee asset | mainnet AVAX |
//! | `AVAX_TX_FEE` | Fee burned per transaction, in nAVAX | `1000000` |
//! | `AVAX_CODEC_VERSION` | Codec version prefix of serialized transactions | `0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::str::FromStr;

use crate::encoding::Id;
use crate::error::{Result, UtxoError};

/// Environment variable name for the network ID.
pub const NETWORK_ID_ENV: &str = "AVAX_NETWORK_ID";

/// Environment variable name for the X-Chain blockchain ID (cb58).
pub const BLOCKCHAIN_ID_ENV: &str = "AVAX_BLOCKCHAIN_ID";

/// Environment variable name for the fee asset ID (cb58).
pub const ASSET_ID_ENV: &str = "AVAX_ASSET_ID";

/// Environment variable name for the transaction fee in nAVAX.
pub const TX_FEE_ENV: &str = "AVAX_TX_FEE";

/// Environment variable name for the codec version.
pub const CODEC_VERSION_ENV: &str = "AVAX_CODEC_VERSION";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_NETWORK_ID: u32 = 1;

/// Mainnet X-Chain ID.
pub const DEFAULT_BLOCKCHAIN_ID: &str = "2oYMBNV4eNHyqk2fjjV5nVQLDbtmNJzq5s3qs3Lo6ftnC6FByM";

/// Mainnet AVAX asset ID.
pub const DEFAULT_ASSET_ID: &str = "FvwEAhmxKfeiG8SnEvq42hc6whRyY3EFYAvebMqDNDGCgxN5Z";

/// 0.001 AVAX.
pub const DEFAULT_TX_FEE: u64 = 1_000_000;

pub const DEFAULT_CODEC_VERSION: u16 = 0;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = UtxoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(UtxoError::InvalidConfig {
                var: LOG_FORMAT_ENV,
                reason: format!("expected `json` or `pretty`, got `{}`", other),
            }),
        }
    }
}

/// Chain parameters a transaction builder writes into every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext {
    pub network_id: u32,
    pub blockchain_id: Id,
    /// Asset in which fees are burned.
    pub fee_asset_id: Id,
    pub tx_fee: u64,
    pub codec_id: u16,
}

/// Engine configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub asset_id: Id,
    pub tx_fee: u64,
    pub codec_version: u16,
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key → value lookup. Unset or empty
    /// variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Self {
            network_id: parse_or(get(NETWORK_ID_ENV), NETWORK_ID_ENV, DEFAULT_NETWORK_ID)?,
            blockchain_id: parse_id(get(BLOCKCHAIN_ID_ENV), BLOCKCHAIN_ID_ENV, DEFAULT_BLOCKCHAIN_ID)?,
            asset_id: parse_id(get(ASSET_ID_ENV), ASSET_ID_ENV, DEFAULT_ASSET_ID)?,
            tx_fee: parse_or(get(TX_FEE_ENV), TX_FEE_ENV, DEFAULT_TX_FEE)?,
            codec_version: parse_or(get(CODEC_VERSION_ENV), CODEC_VERSION_ENV, DEFAULT_CODEC_VERSION)?,
            log_format: match get(LOG_FORMAT_ENV) {
                Some(value) => value.parse()?,
                None => LogFormat::default(),
            },
        };

        tracing::debug!(
            network_id = config.network_id,
            blockchain_id = %config.blockchain_id,
            asset_id = %config.asset_id,
            tx_fee = config.tx_fee,
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Context for X-Chain transactions.
    pub fn avm_context(&self) -> ChainContext {
        ChainContext {
            network_id: self.network_id,
            blockchain_id: self.blockchain_id,
            fee_asset_id: self.asset_id,
            tx_fee: self.tx_fee,
            codec_id: self.codec_version,
        }
    }

    /// Context for P-Chain transactions. The P-Chain ID is all zeros.
    pub fn platform_context(&self) -> ChainContext {
        ChainContext {
            blockchain_id: Id::default(),
            ..self.avm_context()
        }
    }
}

fn parse_or<T>(value: Option<String>, var: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| UtxoError::InvalidConfig {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_id(value: Option<String>, var: &'static str, default: &str) -> Result<Id> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.trim().parse().map_err(|e: UtxoError| UtxoError::InvalidConfig {
        var,
        reason: e.to_string(),
    })
}
