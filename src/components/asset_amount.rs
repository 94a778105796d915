// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-asset bookkeeping of requested value against consumed inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::input::TransferableInput;
use super::output::TransferableOutput;
use crate::encoding::{Id, ShortId};
use crate::error::{Result, UtxoError};

/// Tracks whether enough of one asset has been gathered to cover
/// `amount + burn`, and the change left over once it has.
///
/// Spends only accumulate. Once `finished` is set every further spend fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    asset_id: Id,
    amount: u64,
    burn: u64,
    target: u64,
    spent: u64,
    stakeable_lock_spent: u64,
    change: u64,
    stakeable_lock_change: bool,
    finished: bool,
}

impl AssetAmount {
    pub fn new(asset_id: Id, amount: u64, burn: u64) -> Result<Self> {
        let target = amount.checked_add(burn).ok_or(UtxoError::AmountOverflow)?;
        Ok(Self {
            asset_id,
            amount,
            burn,
            target,
            spent: 0,
            stakeable_lock_spent: 0,
            change: 0,
            stakeable_lock_change: false,
            finished: false,
        })
    }

    /// Raises the requirement by `amount` and `burn`, keeping what has
    /// already been spent. A finished requirement can not be raised.
    fn extend(&mut self, amount: u64, burn: u64) -> Result<()> {
        if self.finished {
            return Err(UtxoError::AlreadyFinished {
                asset_id: self.asset_id.to_string(),
            });
        }
        let amount = self.amount.checked_add(amount).ok_or(UtxoError::AmountOverflow)?;
        let burn = self.burn.checked_add(burn).ok_or(UtxoError::AmountOverflow)?;
        self.target = amount.checked_add(burn).ok_or(UtxoError::AmountOverflow)?;
        self.amount = amount;
        self.burn = burn;
        Ok(())
    }

    /// Applies the value of one consumed output.
    ///
    /// Returns whether the requirement is now met. `stakeable_locked` marks
    /// value that is still locked for staking; if the spend that completes
    /// the requirement is locked, the change is locked too.
    pub fn spend_amount(&mut self, amt: u64, stakeable_locked: bool) -> Result<bool> {
        if self.finished {
            return Err(UtxoError::AlreadyFinished {
                asset_id: self.asset_id.to_string(),
            });
        }
        self.spent = self.spent.checked_add(amt).ok_or(UtxoError::AmountOverflow)?;
        if stakeable_locked {
            self.stakeable_lock_spent += amt;
        }
        if self.spent >= self.target {
            self.change = self.spent - self.target;
            self.stakeable_lock_change = stakeable_locked;
            self.finished = true;
        }
        Ok(self.finished)
    }

    pub fn asset_id(&self) -> Id {
        self.asset_id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn burn(&self) -> u64 {
        self.burn
    }

    /// `amount + burn`.
    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn stakeable_lock_spent(&self) -> u64 {
        self.stakeable_lock_spent
    }

    pub fn change(&self) -> u64 {
        self.change
    }

    pub fn stakeable_lock_change(&self) -> bool {
        self.stakeable_lock_change
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// The asset requirements of one transaction together with the inputs and
/// outputs assembled to satisfy them.
#[derive(Debug, Clone, Default)]
pub struct AssetAmountDestination {
    /// Recipients of the requested amounts.
    pub destinations: Vec<ShortId>,
    /// Addresses whose UTXOs may be consumed.
    pub senders: Vec<ShortId>,
    /// Owners of any change output.
    pub change_addresses: Vec<ShortId>,
    amounts: Vec<AssetAmount>,
    positions: BTreeMap<Id, usize>,
    inputs: Vec<TransferableInput>,
    outputs: Vec<TransferableOutput>,
    change: Vec<TransferableOutput>,
}

impl AssetAmountDestination {
    pub fn new(destinations: Vec<ShortId>, senders: Vec<ShortId>, change_addresses: Vec<ShortId>) -> Self {
        Self {
            destinations,
            senders,
            change_addresses,
            ..Self::default()
        }
    }

    /// Requests `amount` of an asset for the destinations plus `burn`.
    ///
    /// A second request for the same asset is folded into the first and
    /// keeps the value already spent against it. Folding into an asset that
    /// is already covered fails with [`UtxoError::AlreadyFinished`].
    pub fn add_asset_amount(&mut self, asset_id: Id, amount: u64, burn: u64) -> Result<()> {
        match self.positions.get(&asset_id) {
            Some(&pos) => self.amounts[pos].extend(amount, burn)?,
            None => {
                self.positions.insert(asset_id, self.amounts.len());
                self.amounts.push(AssetAmount::new(asset_id, amount, burn)?);
            }
        }
        Ok(())
    }

    pub fn asset_exists(&self, asset_id: &Id) -> bool {
        self.positions.contains_key(asset_id)
    }

    pub fn get_asset_amount(&self, asset_id: &Id) -> Option<&AssetAmount> {
        self.positions.get(asset_id).map(|&pos| &self.amounts[pos])
    }

    pub fn get_asset_amount_mut(&mut self, asset_id: &Id) -> Option<&mut AssetAmount> {
        match self.positions.get(asset_id) {
            Some(&pos) => self.amounts.get_mut(pos),
            None => None,
        }
    }

    /// Requested amounts, in request order.
    pub fn amounts(&self) -> &[AssetAmount] {
        &self.amounts
    }

    /// True when every requested asset is covered.
    pub fn can_complete(&self) -> bool {
        self.amounts.iter().all(AssetAmount::is_finished)
    }

    /// First requested asset that is not yet covered.
    pub fn first_unfinished(&self) -> Option<&AssetAmount> {
        self.amounts.iter().find(|amount| !amount.is_finished())
    }

    pub fn add_input(&mut self, input: TransferableInput) {
        self.inputs.push(input);
    }

    pub fn add_output(&mut self, output: TransferableOutput) {
        self.outputs.push(output);
    }

    pub fn add_change(&mut self, output: TransferableOutput) {
        self.change.push(output);
    }

    pub fn inputs(&self) -> &[TransferableInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransferableOutput] {
        &self.outputs
    }

    pub fn change_outputs(&self) -> &[TransferableOutput] {
        &self.change
    }

    /// Destination outputs followed by change outputs.
    pub fn all_outputs(&self) -> Vec<TransferableOutput> {
        self.outputs.iter().chain(&self.change).cloned().collect()
    }

    /// Consumes the destination, yielding `(inputs, outputs, change)`.
    pub fn into_parts(
        self,
    ) -> (
        Vec<TransferableInput>,
        Vec<TransferableOutput>,
        Vec<TransferableOutput>,
    ) {
        (self.inputs, self.outputs, self.change)
    }
}
