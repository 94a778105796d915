// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Selects UTXOs against the requested amounts of an
//! [`AssetAmountDestination`] and emits the matching inputs and outputs.
//!
//! UTXOs are visited in UTXO ID order. In stakeable mode, outputs still
//! locked for staking are visited first and the value they carry stays
//! locked in the outputs they fund. Outside stakeable mode they are
//! skipped.

use std::collections::BTreeMap;

use super::asset_amount::AssetAmountDestination;
use super::input::{Input, SigIdx, StakeableLockIn, TransferInput, TransferableInput};
use super::output::{Output, OutputOwners, StakeableLockOut, TransferOutput, TransferableOutput};
use super::unix_now;
use super::utxo::Utxo;
use super::utxo_set::UtxoSet;
use crate::encoding::{Id, ShortId};
use crate::error::{Result, UtxoError};

/// Clock and destination policy for one spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendOptions {
    /// Time against which locktimes are evaluated.
    pub as_of: u64,
    /// Locktime of the destination outputs.
    pub locktime: u64,
    /// Threshold of the destination outputs.
    pub threshold: u32,
    /// Consume outputs that are still locked for staking.
    pub stakeable: bool,
}

impl Default for SpendOptions {
    fn default() -> Self {
        Self {
            as_of: unix_now(),
            locktime: 0,
            threshold: 1,
            stakeable: false,
        }
    }
}

/// A consumed UTXO that was still locked for staking.
struct LockedSpend {
    stakeable_locktime: u64,
    amount: u64,
}

/// Builds the input that consumes `utxo` with signatures from `senders`.
pub(crate) fn input_for_utxo(utxo: &Utxo, amount: u64, senders: &[ShortId], as_of: u64) -> TransferableInput {
    let owners = utxo.output.owners();
    let sig_idxs = owners
        .get_spenders(senders, as_of)
        .into_iter()
        .filter_map(|address| owners.address_index(&address).map(|idx| SigIdx::new(idx, address)))
        .collect();
    let transfer = TransferInput { amount, sig_idxs };
    let input = match &utxo.output {
        Output::StakeableLock(out) => Input::StakeableLock(StakeableLockIn {
            stakeable_locktime: out.stakeable_locktime,
            input: transfer,
        }),
        _ => Input::SecpTransfer(transfer),
    };
    TransferableInput {
        tx_id: utxo.tx_id,
        output_index: utxo.output_index,
        asset_id: utxo.asset_id,
        input,
    }
}

/// A transfer output of `amount` owned by `addresses`.
pub(crate) fn transfer_output(
    asset_id: Id,
    amount: u64,
    addresses: &[ShortId],
    locktime: u64,
    threshold: u32,
) -> Result<TransferableOutput> {
    let owners = OutputOwners::try_new(locktime, threshold, addresses.to_vec())?;
    Ok(TransferableOutput::new(
        asset_id,
        Output::SecpTransfer(TransferOutput::try_new(amount, owners)?),
    ))
}

fn stakeable_output(
    asset_id: Id,
    amount: u64,
    addresses: &[ShortId],
    locktime: u64,
    threshold: u32,
    stakeable_locktime: u64,
) -> Result<TransferableOutput> {
    let owners = OutputOwners::try_new(locktime, threshold, addresses.to_vec())?;
    Ok(TransferableOutput::new(
        asset_id,
        Output::StakeableLock(StakeableLockOut {
            stakeable_locktime,
            output: TransferOutput::try_new(amount, owners)?,
        }),
    ))
}

fn is_stake_locked(output: &Output, as_of: u64) -> bool {
    match output {
        Output::StakeableLock(out) => out.is_stake_locked(as_of),
        _ => false,
    }
}

/// Consumes the fewest UTXOs, in ID order, that cover every requested
/// asset of `aad`, then adds destination and change outputs.
///
/// Per asset, `amount` goes to the destinations and `burn` is left unpaid;
/// any excess returns to the change addresses. Fails with
/// [`UtxoError::InsufficientFunds`] naming the first asset that could not be
/// covered.
pub fn get_minimum_spendable(set: &UtxoSet, aad: &mut AssetAmountDestination, options: &SpendOptions) -> Result<()> {
    let as_of = options.as_of;
    let senders = aad.senders.clone();
    let ids = set.get_utxo_ids_as_of(Some(&senders), true, as_of);

    let mut candidates: Vec<(&Utxo, u64, bool)> = Vec::new();
    for utxo in set.get_all_utxos(Some(&ids)) {
        if !aad.asset_exists(&utxo.asset_id) {
            continue;
        }
        let Some(amount) = utxo.output.amount() else {
            continue;
        };
        let locked = is_stake_locked(&utxo.output, as_of);
        if locked && !options.stakeable {
            continue;
        }
        if !utxo.output.meets_threshold(&senders, as_of) {
            continue;
        }
        candidates.push((utxo, amount, locked));
    }
    if options.stakeable {
        candidates.sort_by_key(|(_, _, locked)| !locked);
    }

    let mut locked_spends: BTreeMap<Id, Vec<LockedSpend>> = BTreeMap::new();
    for (utxo, amount, locked) in candidates {
        let Some(asset_amount) = aad.get_asset_amount_mut(&utxo.asset_id) else {
            continue;
        };
        if asset_amount.is_finished() {
            continue;
        }
        asset_amount.spend_amount(amount, locked)?;
        aad.add_input(input_for_utxo(utxo, amount, &senders, as_of));
        if let Output::StakeableLock(out) = &utxo.output {
            if locked {
                locked_spends.entry(utxo.asset_id).or_default().push(LockedSpend {
                    stakeable_locktime: out.stakeable_locktime,
                    amount,
                });
            }
        }
    }

    if let Some(short) = aad.first_unfinished() {
        let err = UtxoError::InsufficientFunds {
            asset_id: short.asset_id().to_string(),
            required: short.target(),
            available: short.spent(),
        };
        tracing::warn!(error = %err, "UTXO selection could not cover request");
        return Err(err);
    }

    let destinations = aad.destinations.clone();
    let change_addresses = aad.change_addresses.clone();
    for asset_amount in aad.amounts().to_vec() {
        let asset_id = asset_amount.asset_id();
        let change = asset_amount.change();
        let (locked_change, unlocked_change) = if asset_amount.stakeable_lock_change() {
            (change, 0)
        } else {
            (0, change)
        };

        // Locked value funds the destination first; whatever of it is
        // neither paid out nor returned as locked change is burned.
        let locked_available = asset_amount.stakeable_lock_spent() - locked_change;
        let locked_paid = asset_amount.amount().min(locked_available);
        let unlocked_paid = asset_amount.amount() - locked_paid;

        let spends = locked_spends.remove(&asset_id).unwrap_or_default();
        let mut remaining = locked_paid;
        for spend in &spends {
            let take = spend.amount.min(remaining);
            if take == 0 {
                break;
            }
            aad.add_output(stakeable_output(
                asset_id,
                take,
                &destinations,
                options.locktime,
                options.threshold,
                spend.stakeable_locktime,
            )?);
            remaining -= take;
        }
        if locked_change > 0 {
            let stakeable_locktime = spends.last().map_or(0, |spend| spend.stakeable_locktime);
            aad.add_change(stakeable_output(
                asset_id,
                locked_change,
                &change_addresses,
                0,
                1,
                stakeable_locktime,
            )?);
        }

        if unlocked_paid > 0 {
            aad.add_output(transfer_output(
                asset_id,
                unlocked_paid,
                &destinations,
                options.locktime,
                options.threshold,
            )?);
        }
        if unlocked_change > 0 {
            aad.add_change(transfer_output(asset_id, unlocked_change, &change_addresses, 0, 1)?);
        }
    }

    tracing::debug!(
        inputs = aad.inputs().len(),
        outputs = aad.outputs().len(),
        change = aad.change_outputs().len(),
        "Selected UTXOs for spend"
    );
    Ok(())
}

/// A request to move `amount` of one asset to `to`.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub asset_id: Id,
    pub amount: u64,
    pub to: Vec<ShortId>,
    /// Addresses whose UTXOs may be spent.
    pub from: Vec<ShortId>,
    pub change: Vec<ShortId>,
    pub memo: Vec<u8>,
    pub options: SpendOptions,
}

impl TransferRequest {
    pub fn new(asset_id: Id, amount: u64, to: Vec<ShortId>, from: Vec<ShortId>, change: Vec<ShortId>) -> Self {
        Self {
            asset_id,
            amount,
            to,
            from,
            change,
            memo: Vec::new(),
            options: SpendOptions::default(),
        }
    }
}

/// Covers a transfer plus `fee` of `fee_asset_id`, paid as burn.
///
/// When the transferred asset is the fee asset the fee joins the same
/// requirement; otherwise the fee asset gets its own zero-amount
/// requirement. Destination outputs end up in
/// [`outputs`](AssetAmountDestination::outputs), change in
/// [`change_outputs`](AssetAmountDestination::change_outputs).
pub fn spend_transfer(
    set: &UtxoSet,
    request: &TransferRequest,
    fee_asset_id: Id,
    fee: u64,
) -> Result<AssetAmountDestination> {
    if request.amount == 0 {
        return Err(UtxoError::ZeroAmount);
    }
    if request.options.threshold as usize > request.to.len() {
        return Err(UtxoError::InvalidThreshold {
            threshold: request.options.threshold,
            addresses: request.to.len(),
        });
    }

    let mut aad = AssetAmountDestination::new(request.to.clone(), request.from.clone(), request.change.clone());
    if request.asset_id == fee_asset_id {
        aad.add_asset_amount(request.asset_id, request.amount, fee)?;
    } else {
        aad.add_asset_amount(request.asset_id, request.amount, 0)?;
        if fee > 0 {
            aad.add_asset_amount(fee_asset_id, 0, fee)?;
        }
    }
    get_minimum_spendable(set, &mut aad, &request.options)?;
    Ok(aad)
}

/// A request to claim every spendable UTXO exported to this chain.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub to: Vec<ShortId>,
    /// Owners of the atomic UTXOs, also used to pay any fee shortfall.
    pub from: Vec<ShortId>,
    pub change: Vec<ShortId>,
    pub memo: Vec<u8>,
    pub options: SpendOptions,
}

impl ImportRequest {
    pub fn new(to: Vec<ShortId>, from: Vec<ShortId>, change: Vec<ShortId>) -> Self {
        Self {
            to,
            from,
            change,
            memo: Vec::new(),
            options: SpendOptions::default(),
        }
    }
}

/// Inputs and outputs of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Local inputs paying the part of the fee the imported value could not.
    pub inputs: Vec<TransferableInput>,
    pub outputs: Vec<TransferableOutput>,
    pub imported_inputs: Vec<TransferableInput>,
}

/// Claims the spendable UTXOs of `atomics` for `request.to`.
///
/// The fee is taken from imported value of the fee asset first; any
/// shortfall is spent from the local `set`. Fails with
/// [`UtxoError::NoAtomicUtxos`] when nothing can be imported.
pub fn spend_import(
    set: &UtxoSet,
    atomics: &UtxoSet,
    request: &ImportRequest,
    fee_asset_id: Id,
    fee: u64,
) -> Result<ImportPlan> {
    let options = &request.options;
    if options.threshold as usize > request.to.len() {
        return Err(UtxoError::InvalidThreshold {
            threshold: options.threshold,
            addresses: request.to.len(),
        });
    }

    let ids = atomics.get_utxo_ids_as_of(Some(&request.from), true, options.as_of);
    let mut plan = ImportPlan::default();
    let mut imported: BTreeMap<Id, u64> = BTreeMap::new();
    let mut fee_remaining = fee;

    for utxo in atomics.get_all_utxos(Some(&ids)) {
        let Some(amount) = utxo.output.amount() else {
            continue;
        };
        if is_stake_locked(&utxo.output, options.as_of) || !utxo.output.meets_threshold(&request.from, options.as_of) {
            continue;
        }
        plan.imported_inputs
            .push(input_for_utxo(utxo, amount, &request.from, options.as_of));

        let mut value = amount;
        if utxo.asset_id == fee_asset_id {
            let paid = value.min(fee_remaining);
            fee_remaining -= paid;
            value -= paid;
        }
        let total = imported.entry(utxo.asset_id).or_insert(0);
        *total = total.checked_add(value).ok_or(UtxoError::AmountOverflow)?;
    }

    if plan.imported_inputs.is_empty() {
        return Err(UtxoError::NoAtomicUtxos);
    }

    for (asset_id, total) in imported {
        if total > 0 {
            plan.outputs.push(transfer_output(
                asset_id,
                total,
                &request.to,
                options.locktime,
                options.threshold,
            )?);
        }
    }

    if fee_remaining > 0 {
        let mut aad = AssetAmountDestination::new(request.to.clone(), request.from.clone(), request.change.clone());
        aad.add_asset_amount(fee_asset_id, 0, fee_remaining)?;
        get_minimum_spendable(set, &mut aad, options)?;
        let (inputs, outputs, change) = aad.into_parts();
        plan.inputs = inputs;
        plan.outputs.extend(outputs);
        plan.outputs.extend(change);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Id = Id::new([0x11; 32]);
    const FEE: Id = Id::new([0x22; 32]);

    fn addr(byte: u8) -> ShortId {
        ShortId::new([byte; 20])
    }

    fn plain(tx: u8, asset: Id, amount: u64, owners: &[u8], threshold: u32) -> Utxo {
        let owners = OutputOwners::try_new(0, threshold, owners.iter().map(|b| addr(*b)).collect()).unwrap();
        Utxo::new(
            0,
            Id::new([tx; 32]),
            0,
            asset,
            Output::SecpTransfer(TransferOutput::try_new(amount, owners).unwrap()),
        )
    }

    fn locked(tx: u8, asset: Id, amount: u64, until: u64) -> Utxo {
        let owners = OutputOwners::try_new(0, 1, vec![addr(1)]).unwrap();
        Utxo::new(
            0,
            Id::new([tx; 32]),
            0,
            asset,
            Output::StakeableLock(StakeableLockOut {
                stakeable_locktime: until,
                output: TransferOutput::try_new(amount, owners).unwrap(),
            }),
        )
    }

    fn options(stakeable: bool) -> SpendOptions {
        SpendOptions {
            as_of: 1_000,
            locktime: 0,
            threshold: 1,
            stakeable,
        }
    }

    fn burned(aad: &AssetAmountDestination, asset: &Id) -> u64 {
        let consumed: u64 = aad
            .inputs()
            .iter()
            .filter(|i| i.asset_id == *asset)
            .map(|i| i.input.amount())
            .sum();
        let produced: u64 = aad
            .all_outputs()
            .iter()
            .filter(|o| o.asset_id == *asset)
            .filter_map(|o| o.output.amount())
            .sum();
        consumed - produced
    }

    #[test]
    fn simple_transfer_emits_destination_and_change() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 40, 0).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();

        assert_eq!(aad.inputs().len(), 1);
        assert_eq!(aad.inputs()[0].input.amount(), 100);
        assert_eq!(aad.outputs().len(), 1);
        assert_eq!(aad.outputs()[0].output.amount(), Some(40));
        assert_eq!(aad.outputs()[0].output.owners().addresses, vec![addr(2)]);
        assert_eq!(aad.change_outputs().len(), 1);
        assert_eq!(aad.change_outputs()[0].output.amount(), Some(60));
        assert_eq!(aad.change_outputs()[0].output.owners().addresses, vec![addr(1)]);

        let aa = aad.get_asset_amount(&X).unwrap();
        assert!(aa.is_finished());
        assert_eq!(aa.change(), 60);
    }

    #[test]
    fn exact_amount_leaves_no_change_output() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 40, &[1], 1), plain(2, X, 500, &[1], 1)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 40, 0).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();
        assert_eq!(aad.inputs().len(), 1);
        assert!(aad.change_outputs().is_empty());
    }

    #[test]
    fn insufficient_funds_names_asset_and_shortfall() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 10, &[1], 1)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 40, 0).unwrap();

        let err = get_minimum_spendable(&set, &mut aad, &options(false)).unwrap_err();
        match err {
            UtxoError::InsufficientFunds {
                asset_id,
                required,
                available,
            } => {
                assert_eq!(asset_id, X.to_string());
                assert_eq!((required, available), (40, 10));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!aad.get_asset_amount(&X).unwrap().is_finished());
    }

    #[test]
    fn separate_fee_asset_is_burned() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1), plain(2, FEE, 10, &[1], 1)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(3)]);
        aad.add_asset_amount(X, 100, 0).unwrap();
        aad.add_asset_amount(FEE, 0, 3).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();
        assert_eq!(aad.inputs().len(), 2);
        assert_eq!(aad.outputs().len(), 1);
        assert_eq!(burned(&aad, &X), 0);
        assert_eq!(burned(&aad, &FEE), 3);
        assert_eq!(aad.change_outputs()[0].output.owners().addresses, vec![addr(3)]);
    }

    #[test]
    fn skips_foreign_unmet_and_locked_outputs() {
        let time_locked = {
            let owners = OutputOwners::try_new(5_000, 1, vec![addr(1)]).unwrap();
            Utxo::new(
                0,
                Id::new([4; 32]),
                0,
                X,
                Output::SecpTransfer(TransferOutput::try_new(1_000, owners).unwrap()),
            )
        };
        let set = UtxoSet::from_utxos(vec![
            plain(1, X, 1_000, &[9], 1),
            plain(2, X, 1_000, &[1, 9], 2),
            plain(3, X, 7, &[1], 1),
            time_locked,
        ]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 5, 0).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();
        assert_eq!(aad.inputs().len(), 1);
        assert_eq!(aad.inputs()[0].tx_id, Id::new([3; 32]));
    }

    #[test]
    fn multisig_inputs_carry_owner_indices() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 50, &[1, 2, 3], 2)]);
        let mut aad = AssetAmountDestination::new(vec![addr(4)], vec![addr(3), addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 50, 0).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();
        let sig_idxs = aad.inputs()[0].input.sig_idxs();
        assert_eq!(sig_idxs, &[SigIdx::new(0, addr(1)), SigIdx::new(2, addr(3))]);
    }

    #[test]
    fn destination_policy_applies_to_destination_outputs() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2), addr(3)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 10, 0).unwrap();
        let opts = SpendOptions {
            locktime: 9_999,
            threshold: 2,
            ..options(false)
        };

        get_minimum_spendable(&set, &mut aad, &opts).unwrap();
        let owners = aad.outputs()[0].output.owners();
        assert_eq!((owners.locktime, owners.threshold), (9_999, 2));
        let change_owners = aad.change_outputs()[0].output.owners();
        assert_eq!((change_owners.locktime, change_owners.threshold), (0, 1));
    }

    #[test]
    fn stake_locked_outputs_are_skipped_unless_stakeable() {
        let set = UtxoSet::from_utxos(vec![locked(1, X, 100, 5_000), plain(2, X, 100, &[1], 1)]);

        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 30, 0).unwrap();
        get_minimum_spendable(&set, &mut aad, &options(false)).unwrap();
        assert_eq!(aad.inputs()[0].tx_id, Id::new([2; 32]));
        assert!(matches!(aad.inputs()[0].input, Input::SecpTransfer(_)));
    }

    #[test]
    fn stakeable_spend_consumes_locked_value_first_and_keeps_it_locked() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1), locked(2, X, 30, 5_000)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 50, 1).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(true)).unwrap();

        assert_eq!(aad.inputs().len(), 2);
        assert!(matches!(aad.inputs()[0].input, Input::StakeableLock(_)));
        let outputs = aad.outputs();
        assert_eq!(outputs.len(), 2);
        match &outputs[0].output {
            Output::StakeableLock(out) => {
                assert_eq!(out.stakeable_locktime, 5_000);
                assert_eq!(out.output.amount, 30);
            }
            other => panic!("expected locked output, got {other:?}"),
        }
        assert_eq!(outputs[1].output.amount(), Some(20));
        assert_eq!(aad.change_outputs()[0].output.amount(), Some(79));
        assert_eq!(burned(&aad, &X), 1);
    }

    #[test]
    fn locked_change_stays_locked() {
        let set = UtxoSet::from_utxos(vec![locked(1, X, 100, 5_000)]);
        let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
        aad.add_asset_amount(X, 60, 0).unwrap();

        get_minimum_spendable(&set, &mut aad, &options(true)).unwrap();
        assert_eq!(aad.outputs().len(), 1);
        match &aad.change_outputs()[0].output {
            Output::StakeableLock(out) => {
                assert_eq!(out.output.amount, 40);
                assert_eq!(out.stakeable_locktime, 5_000);
            }
            other => panic!("expected locked change, got {other:?}"),
        }
        assert_eq!(burned(&aad, &X), 0);
    }

    fn transfer(asset: Id, amount: u64) -> TransferRequest {
        TransferRequest {
            options: options(false),
            ..TransferRequest::new(asset, amount, vec![addr(2)], vec![addr(1)], vec![addr(1)])
        }
    }

    #[test]
    fn transfer_of_fee_asset_adds_fee_to_same_requirement() {
        let set = UtxoSet::from_utxos(vec![plain(1, FEE, 100, &[1], 1)]);
        let aad = spend_transfer(&set, &transfer(FEE, 40), FEE, 3).unwrap();
        assert_eq!(aad.amounts().len(), 1);
        assert_eq!(aad.outputs()[0].output.amount(), Some(40));
        assert_eq!(aad.change_outputs()[0].output.amount(), Some(57));
        assert_eq!(burned(&aad, &FEE), 3);
    }

    #[test]
    fn transfer_of_other_asset_requests_fee_separately() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1), plain(2, FEE, 5, &[1], 1)]);
        let aad = spend_transfer(&set, &transfer(X, 100), FEE, 3).unwrap();
        assert_eq!(aad.amounts().len(), 2);
        assert_eq!(burned(&aad, &FEE), 3);

        let zero_fee = spend_transfer(&set, &transfer(X, 100), FEE, 0).unwrap();
        assert_eq!(zero_fee.amounts().len(), 1);
        assert_eq!(zero_fee.inputs().len(), 1);
    }

    #[test]
    fn transfer_rejects_zero_amount_and_bad_threshold() {
        let set = UtxoSet::from_utxos(vec![plain(1, X, 100, &[1], 1)]);
        assert!(matches!(
            spend_transfer(&set, &transfer(X, 0), FEE, 0),
            Err(UtxoError::ZeroAmount)
        ));
        let mut request = transfer(X, 10);
        request.options.threshold = 2;
        assert!(matches!(
            spend_transfer(&set, &request, FEE, 0),
            Err(UtxoError::InvalidThreshold {
                threshold: 2,
                addresses: 1
            })
        ));
    }

    fn import_request() -> ImportRequest {
        ImportRequest {
            options: options(false),
            ..ImportRequest::new(vec![addr(2)], vec![addr(1)], vec![addr(1)])
        }
    }

    #[test]
    fn import_pays_fee_from_imported_value() {
        let atomics = UtxoSet::from_utxos(vec![plain(1, FEE, 10, &[1], 1), plain(2, X, 7, &[1], 1)]);
        let plan = spend_import(&UtxoSet::new(), &atomics, &import_request(), FEE, 4).unwrap();

        assert_eq!(plan.imported_inputs.len(), 2);
        assert!(plan.inputs.is_empty());
        let mut paid: Vec<(Id, u64)> = plan
            .outputs
            .iter()
            .map(|o| (o.asset_id, o.output.amount().unwrap()))
            .collect();
        paid.sort();
        assert_eq!(paid, vec![(X, 7), (FEE, 6)]);
    }

    #[test]
    fn import_spends_local_utxos_for_fee_shortfall() {
        let atomics = UtxoSet::from_utxos(vec![plain(1, FEE, 3, &[1], 1)]);
        let local = UtxoSet::from_utxos(vec![plain(5, FEE, 50, &[1], 1)]);
        let plan = spend_import(&local, &atomics, &import_request(), FEE, 4).unwrap();

        assert_eq!(plan.imported_inputs.len(), 1);
        assert_eq!(plan.inputs.len(), 1);
        let amounts: Vec<u64> = plan.outputs.iter().filter_map(|o| o.output.amount()).collect();
        assert_eq!(amounts, vec![49]);
    }

    #[test]
    fn import_without_atomics_fails() {
        let atomics = UtxoSet::from_utxos(vec![plain(1, FEE, 3, &[9], 1)]);
        assert!(matches!(
            spend_import(&UtxoSet::new(), &atomics, &import_request(), FEE, 1),
            Err(UtxoError::NoAtomicUtxos)
        ));
    }

    #[test]
    fn burn_is_exact_for_every_requested_amount() {
        let set = UtxoSet::from_utxos(vec![
            plain(1, X, 30, &[1], 1),
            locked(2, X, 25, 5_000),
            plain(3, X, 45, &[1], 1),
        ]);
        for amount in [1u64, 24, 25, 26, 54, 70, 98] {
            for stakeable in [false, true] {
                let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
                aad.add_asset_amount(X, amount, 2).unwrap();
                if get_minimum_spendable(&set, &mut aad, &options(stakeable)).is_ok() {
                    assert_eq!(burned(&aad, &X), 2, "amount {amount} stakeable {stakeable}");
                    let paid: u64 = aad.outputs().iter().filter_map(|o| o.output.amount()).sum();
                    assert_eq!(paid, amount);
                }
            }
        }
    }
}
