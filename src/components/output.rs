// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Output family: value or authority locked to a set of owners.
//!
//! Each variant is written as a 4-byte type ID followed by its payload.
//! [`Output::select`] is the decoder registry for the family.

use serde::{Deserialize, Serialize};

use super::type_ids;
use crate::encoding::{Id, Packable, Packer, ShortId, Unpacker};
use crate::error::{Result, UtxoError};

/// Locktime, threshold and owning addresses shared by every output kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOwners {
    /// Unix timestamp (seconds) before which the output can not be spent.
    pub locktime: u64,
    /// Minimum number of owner signatures required to spend.
    pub threshold: u32,
    /// Owning addresses.
    pub addresses: Vec<ShortId>,
}

impl OutputOwners {
    /// Creates owners in canonical form: addresses sorted and deduplicated.
    pub fn try_new(locktime: u64, threshold: u32, mut addresses: Vec<ShortId>) -> Result<Self> {
        addresses.sort();
        addresses.dedup();
        let owners = Self {
            locktime,
            threshold,
            addresses,
        };
        owners.validate()?;
        Ok(owners)
    }

    fn validate(&self) -> Result<()> {
        if self.threshold as usize > self.addresses.len() {
            return Err(UtxoError::InvalidThreshold {
                threshold: self.threshold,
                addresses: self.addresses.len(),
            });
        }
        Ok(())
    }

    pub fn is_unlocked(&self, as_of: u64) -> bool {
        self.locktime <= as_of
    }

    /// Owners among `addresses` that would sign a spend, in owner order,
    /// capped at the threshold. Empty while the output is still locked.
    pub fn get_spenders(&self, addresses: &[ShortId], as_of: u64) -> Vec<ShortId> {
        if !self.is_unlocked(as_of) {
            return Vec::new();
        }
        self.addresses
            .iter()
            .filter(|owner| addresses.contains(owner))
            .take(self.threshold as usize)
            .copied()
            .collect()
    }

    /// True when the output is unlocked as of `as_of` and `addresses`
    /// contains at least `threshold` owners.
    pub fn meets_threshold(&self, addresses: &[ShortId], as_of: u64) -> bool {
        self.is_unlocked(as_of) && self.get_spenders(addresses, as_of).len() >= self.threshold as usize
    }

    /// Position of `address` in the owner list, used for signature indices.
    pub fn address_index(&self, address: &ShortId) -> Option<u32> {
        self.addresses
            .iter()
            .position(|owner| owner == address)
            .map(|idx| idx as u32)
    }
}

impl Packable for OutputOwners {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u64(self.locktime);
        packer.pack_u32(self.threshold);
        packer.pack_all(&self.addresses);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let owners = Self {
            locktime: unpacker.unpack_u64()?,
            threshold: unpacker.unpack_u32()?,
            addresses: unpacker.unpack_all()?,
        };
        owners.validate()?;
        Ok(owners)
    }
}

/// Spendable amount of an asset (secp256k1fx transfer output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub amount: u64,
    pub owners: OutputOwners,
}

impl TransferOutput {
    pub fn try_new(amount: u64, owners: OutputOwners) -> Result<Self> {
        if amount == 0 {
            return Err(UtxoError::ZeroAmount);
        }
        Ok(Self { amount, owners })
    }
}

impl Packable for TransferOutput {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u64(self.amount);
        self.owners.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let amount = unpacker.unpack_u64()?;
        let owners = OutputOwners::unpack(unpacker)?;
        Self::try_new(amount, owners)
    }
}

/// Authority to mint more of a variable-cap asset. Carries no amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintOutput {
    pub owners: OutputOwners,
}

impl Packable for MintOutput {
    fn pack(&self, packer: &mut Packer) {
        self.owners.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            owners: OutputOwners::unpack(unpacker)?,
        })
    }
}

/// P-Chain output that may only be used for staking until
/// `stakeable_locktime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeableLockOut {
    pub stakeable_locktime: u64,
    pub output: TransferOutput,
}

impl StakeableLockOut {
    pub fn is_stake_locked(&self, as_of: u64) -> bool {
        self.stakeable_locktime > as_of
    }
}

impl Packable for StakeableLockOut {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u64(self.stakeable_locktime);
        packer.pack_u32(type_ids::SECP_TRANSFER_OUTPUT);
        self.output.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let stakeable_locktime = unpacker.unpack_u64()?;
        let type_id = unpacker.unpack_u32()?;
        if type_id != type_ids::SECP_TRANSFER_OUTPUT {
            return Err(UtxoError::UnknownTypeId {
                family: "stakeable output",
                type_id,
            });
        }
        Ok(Self {
            stakeable_locktime,
            output: TransferOutput::unpack(unpacker)?,
        })
    }
}

/// Output variants, keyed by their wire type ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Output {
    SecpTransfer(TransferOutput),
    SecpMint(MintOutput),
    StakeableLock(StakeableLockOut),
}

impl Output {
    pub fn type_id(&self) -> u32 {
        match self {
            Output::SecpTransfer(_) => type_ids::SECP_TRANSFER_OUTPUT,
            Output::SecpMint(_) => type_ids::SECP_MINT_OUTPUT,
            Output::StakeableLock(_) => type_ids::STAKEABLE_LOCK_OUT,
        }
    }

    /// Decodes the payload of the variant registered under `type_id`.
    pub fn select(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self> {
        match type_id {
            type_ids::SECP_TRANSFER_OUTPUT => Ok(Output::SecpTransfer(TransferOutput::unpack(unpacker)?)),
            type_ids::SECP_MINT_OUTPUT => Ok(Output::SecpMint(MintOutput::unpack(unpacker)?)),
            type_ids::STAKEABLE_LOCK_OUT => Ok(Output::StakeableLock(StakeableLockOut::unpack(unpacker)?)),
            other => Err(UtxoError::UnknownTypeId {
                family: "output",
                type_id: other,
            }),
        }
    }

    pub fn owners(&self) -> &OutputOwners {
        match self {
            Output::SecpTransfer(out) => &out.owners,
            Output::SecpMint(out) => &out.owners,
            Output::StakeableLock(out) => &out.output.owners,
        }
    }

    /// Amount carried by the output, if it is an amount output.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Output::SecpTransfer(out) => Some(out.amount),
            Output::SecpMint(_) => None,
            Output::StakeableLock(out) => Some(out.output.amount),
        }
    }

    pub fn locktime(&self) -> u64 {
        self.owners().locktime
    }

    pub fn meets_threshold(&self, addresses: &[ShortId], as_of: u64) -> bool {
        self.owners().meets_threshold(addresses, as_of)
    }

    pub fn get_spenders(&self, addresses: &[ShortId], as_of: u64) -> Vec<ShortId> {
        self.owners().get_spenders(addresses, as_of)
    }
}

impl Packable for Output {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u32(self.type_id());
        match self {
            Output::SecpTransfer(out) => out.pack(packer),
            Output::SecpMint(out) => out.pack(packer),
            Output::StakeableLock(out) => out.pack(packer),
        }
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let type_id = unpacker.unpack_u32()?;
        Self::select(type_id, unpacker)
    }
}

/// An output tagged with the asset it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableOutput {
    pub asset_id: Id,
    pub output: Output,
}

impl TransferableOutput {
    pub fn new(asset_id: Id, output: Output) -> Self {
        Self { asset_id, output }
    }

    /// Sorts outputs by their serialized bytes, the chain's canonical order.
    pub fn sort_canonical(outputs: &mut [TransferableOutput]) {
        outputs.sort_by_cached_key(|out| out.to_bytes());
    }
}

impl Packable for TransferableOutput {
    fn pack(&self, packer: &mut Packer) {
        self.asset_id.pack(packer);
        self.output.pack(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            asset_id: Id::unpack(unpacker)?,
            output: Output::unpack(unpacker)?,
        })
    }
}
