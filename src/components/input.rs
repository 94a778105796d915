// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input family: references to prior outputs being consumed.

use serde::{Deserialize, Serialize};

use super::type_ids;
use super::utxo::UtxoId;
use crate::encoding::{Id, Packable, Packer, ShortId, Unpacker};
use crate::error::{Result, UtxoError};

/// Signature index into the consumed output's owner list.
///
/// `source` records which address the signature must come from. Only
/// `index` is on the wire; decoded inputs carry an empty source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigIdx {
    pub index: u32,
    pub source: ShortId,
}

impl SigIdx {
    pub fn new(index: u32, source: ShortId) -> Self {
        Self { index, source }
    }
}

impl Packable for SigIdx {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u32(self.index);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            index: unpacker.unpack_u32()?,
            source: ShortId::default(),
        })
    }
}

/// Spends the full amount of a secp256k1fx transfer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub amount: u64,
    pub sig_idxs: Vec<SigIdx>,
}

impl Packable for TransferInput {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u64(self.amount);
        packer.pack_all(&self.sig_idxs);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            amount: unpacker.unpack_u64()?,
            sig_idxs: unpacker.unpack_all()?,
        })
    }
}

/// P-Chain input consuming a [`StakeableLockOut`](super::output::StakeableLockOut).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeableLockIn {
    pub stakeable_locktime: u64,
    pub input: TransferInput,
}

impl Packable for StakeableLockIn {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u64(self.stakeable_locktime);
        packer.pack_u32(type_ids::SECP_TRANSFER_INPUT);
        self.input.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let stakeable_locktime = unpacker.unpack_u64()?;
        let type_id = unpacker.unpack_u32()?;
        if type_id != type_ids::SECP_TRANSFER_INPUT {
            return Err(UtxoError::UnknownTypeId {
                family: "stakeable input",
                type_id,
            });
        }
        Ok(Self {
            stakeable_locktime,
            input: TransferInput::unpack(unpacker)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Input {
    SecpTransfer(TransferInput),
    StakeableLock(StakeableLockIn),
}

impl Input {
    pub fn type_id(&self) -> u32 {
        match self {
            Input::SecpTransfer(_) => type_ids::SECP_TRANSFER_INPUT,
            Input::StakeableLock(_) => type_ids::STAKEABLE_LOCK_IN,
        }
    }

    /// Decodes the payload of the variant registered under `type_id`.
    pub fn select(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self> {
        match type_id {
            type_ids::SECP_TRANSFER_INPUT => Ok(Input::SecpTransfer(TransferInput::unpack(unpacker)?)),
            type_ids::STAKEABLE_LOCK_IN => Ok(Input::StakeableLock(StakeableLockIn::unpack(unpacker)?)),
            other => Err(UtxoError::UnknownTypeId {
                family: "input",
                type_id: other,
            }),
        }
    }

    fn transfer(&self) -> &TransferInput {
        match self {
            Input::SecpTransfer(input) => input,
            Input::StakeableLock(input) => &input.input,
        }
    }

    pub fn amount(&self) -> u64 {
        self.transfer().amount
    }

    pub fn sig_idxs(&self) -> &[SigIdx] {
        &self.transfer().sig_idxs
    }
}

impl Packable for Input {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u32(self.type_id());
        match self {
            Input::SecpTransfer(input) => input.pack(packer),
            Input::StakeableLock(input) => input.pack(packer),
        }
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let type_id = unpacker.unpack_u32()?;
        Self::select(type_id, unpacker)
    }
}

/// An input together with the identity of the UTXO it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableInput {
    pub tx_id: Id,
    pub output_index: u32,
    pub asset_id: Id,
    pub input: Input,
}

impl TransferableInput {
    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::new(self.tx_id, self.output_index)
    }

    /// Sorts inputs by `tx_id ++ output_index`, the chain's canonical order.
    ///
    /// Big-endian index bytes compare the same way as the integers, so the
    /// tuple order matches the byte order.
    pub fn sort_canonical(inputs: &mut [TransferableInput]) {
        inputs.sort_by_key(|input| (input.tx_id, input.output_index));
    }
}

impl Packable for TransferableInput {
    fn pack(&self, packer: &mut Packer) {
        self.tx_id.pack(packer);
        packer.pack_u32(self.output_index);
        self.asset_id.pack(packer);
        self.input.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            tx_id: Id::unpack(unpacker)?,
            output_index: unpacker.unpack_u32()?,
            asset_id: Id::unpack(unpacker)?,
            input: Input::unpack(unpacker)?,
        })
    }
}
