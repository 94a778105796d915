// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! X-Chain (AVM) transactions.
//!
//! ## Builders
//!
//! - [`build_base_tx`] - transfer one asset between local addresses
//! - [`build_export_tx`] - move value into another chain's shared memory
//! - [`build_import_tx`] - claim value exported to the X-Chain
//!
//! Every builder burns the configured fee and returns an unsigned
//! transaction; sign it with [`UnsignedTx::sign`].

use crate::components::spend::{spend_import, spend_transfer, ImportRequest, TransferRequest};
use crate::components::{BaseTx, ExportTx, ImportTx, TransferableInput, TxBody, UnsignedTx, UtxoSet};
use crate::config::ChainContext;
use crate::encoding::{Id, Packable, Packer, Unpacker};
use crate::error::{Result, UtxoError};

/// AVM transaction type IDs.
pub mod type_ids {
    pub const BASE_TX: u32 = 0;
    pub const IMPORT_TX: u32 = 3;
    pub const EXPORT_TX: u32 = 4;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvmTx {
    Base(BaseTx),
    Import(ImportTx),
    Export(ExportTx),
}

impl TxBody for AvmTx {
    fn type_id(&self) -> u32 {
        match self {
            AvmTx::Base(_) => type_ids::BASE_TX,
            AvmTx::Import(_) => type_ids::IMPORT_TX,
            AvmTx::Export(_) => type_ids::EXPORT_TX,
        }
    }

    fn pack_body(&self, packer: &mut Packer) {
        match self {
            AvmTx::Base(tx) => tx.pack(packer),
            AvmTx::Import(tx) => tx.pack(packer),
            AvmTx::Export(tx) => tx.pack(packer),
        }
    }

    fn unpack_body(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self> {
        match type_id {
            type_ids::BASE_TX => Ok(AvmTx::Base(BaseTx::unpack(unpacker)?)),
            type_ids::IMPORT_TX => Ok(AvmTx::Import(ImportTx::unpack(unpacker)?)),
            type_ids::EXPORT_TX => Ok(AvmTx::Export(ExportTx::unpack(unpacker)?)),
            other => Err(UtxoError::UnknownTypeId {
                family: "avm transaction",
                type_id: other,
            }),
        }
    }

    fn canonicalize(&mut self) {
        match self {
            AvmTx::Base(tx) => tx.canonicalize(),
            AvmTx::Import(tx) => tx.canonicalize(),
            AvmTx::Export(tx) => tx.canonicalize(),
        }
    }

    fn signable_inputs(&self) -> Vec<&TransferableInput> {
        match self {
            AvmTx::Base(tx) => tx.inputs.iter().collect(),
            AvmTx::Import(tx) => tx.base.inputs.iter().chain(&tx.imported_inputs).collect(),
            AvmTx::Export(tx) => tx.base.inputs.iter().collect(),
        }
    }

    fn base(&self) -> &BaseTx {
        match self {
            AvmTx::Base(tx) => tx,
            AvmTx::Import(tx) => &tx.base,
            AvmTx::Export(tx) => &tx.base,
        }
    }
}

/// Build a transfer of `request.amount` of `request.asset_id`.
///
/// # Returns
/// * `Ok(UnsignedTx)` - Canonically ordered transaction
/// * `Err(UtxoError::InsufficientFunds)` - If the senders can not cover
///   the amount plus fee
pub fn build_base_tx(ctx: &ChainContext, set: &UtxoSet, request: &TransferRequest) -> Result<UnsignedTx<AvmTx>> {
    let aad = spend_transfer(set, request, ctx.fee_asset_id, ctx.tx_fee)?;
    let outputs = aad.all_outputs();
    let (inputs, _, _) = aad.into_parts();

    let mut base = BaseTx::new(ctx.network_id, ctx.blockchain_id, outputs, inputs, request.memo.clone());
    base.canonicalize();

    tracing::info!(
        asset_id = %request.asset_id,
        amount = request.amount,
        inputs = base.inputs.len(),
        outputs = base.outputs.len(),
        "Built X-Chain base transaction"
    );
    Ok(UnsignedTx::new(ctx.codec_id, AvmTx::Base(base)))
}

/// Build an export of `request.amount` to `destination_chain`.
///
/// Destination outputs become the exported outputs; only change stays on
/// the X-Chain.
pub fn build_export_tx(
    ctx: &ChainContext,
    set: &UtxoSet,
    destination_chain: Id,
    request: &TransferRequest,
) -> Result<UnsignedTx<AvmTx>> {
    let aad = spend_transfer(set, request, ctx.fee_asset_id, ctx.tx_fee)?;
    let (inputs, exported_outputs, change) = aad.into_parts();

    let mut tx = ExportTx {
        base: BaseTx::new(ctx.network_id, ctx.blockchain_id, change, inputs, request.memo.clone()),
        destination_chain,
        exported_outputs,
    };
    tx.canonicalize();

    tracing::info!(
        asset_id = %request.asset_id,
        amount = request.amount,
        destination_chain = %destination_chain,
        "Built X-Chain export transaction"
    );
    Ok(UnsignedTx::new(ctx.codec_id, AvmTx::Export(tx)))
}

/// Build an import of every spendable UTXO in `atomics` from `source_chain`.
pub fn build_import_tx(
    ctx: &ChainContext,
    set: &UtxoSet,
    atomics: &UtxoSet,
    source_chain: Id,
    request: &ImportRequest,
) -> Result<UnsignedTx<AvmTx>> {
    let plan = spend_import(set, atomics, request, ctx.fee_asset_id, ctx.tx_fee)?;

    let mut tx = ImportTx {
        base: BaseTx::new(
            ctx.network_id,
            ctx.blockchain_id,
            plan.outputs,
            plan.inputs,
            request.memo.clone(),
        ),
        source_chain,
        imported_inputs: plan.imported_inputs,
    };
    tx.canonicalize();

    tracing::info!(
        source_chain = %source_chain,
        imported = tx.imported_inputs.len(),
        "Built X-Chain import transaction"
    );
    Ok(UnsignedTx::new(ctx.codec_id, AvmTx::Import(tx)))
}
