// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local working set of unspent outputs.
//!
//! The set owns its UTXOs in a single map keyed by [`UtxoId`]. The address
//! index (address → {UTXO ID → locktime}) is derived from the stored UTXOs:
//! single-entry changes go through one helper that computes the entries
//! from the UTXO itself, and every bulk construction rebuilds the index from
//! scratch. Iteration is in UTXO ID order, so anything built from a set is
//! deterministic.
//!
//! Set algebra works on UTXO IDs only. When both operands hold the same ID,
//! the left operand's UTXO is kept.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::unix_now;
use super::utxo::{Utxo, UtxoId};
use crate::encoding::{Id, ShortId};
use crate::error::{Result, UtxoError};

/// How [`UtxoSet::merge_by_rule`] combines two sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    Intersection,
    /// self − other
    DifferenceSelf,
    /// other − self
    DifferenceNew,
    SymDifference,
    Union,
    /// (self ∪ other) − other
    UnionMinusNew,
    /// (self ∪ other) − self
    UnionMinusSelf,
}

impl MergeRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeRule::Intersection => "intersection",
            MergeRule::DifferenceSelf => "differenceSelf",
            MergeRule::DifferenceNew => "differenceNew",
            MergeRule::SymDifference => "symDifference",
            MergeRule::Union => "union",
            MergeRule::UnionMinusNew => "unionMinusNew",
            MergeRule::UnionMinusSelf => "unionMinusSelf",
        }
    }
}

impl fmt::Display for MergeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeRule {
    type Err = UtxoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "intersection" => Ok(MergeRule::Intersection),
            "differenceSelf" => Ok(MergeRule::DifferenceSelf),
            "differenceNew" => Ok(MergeRule::DifferenceNew),
            "symDifference" => Ok(MergeRule::SymDifference),
            "union" => Ok(MergeRule::Union),
            "unionMinusNew" => Ok(MergeRule::UnionMinusNew),
            "unionMinusSelf" => Ok(MergeRule::UnionMinusSelf),
            other => Err(UtxoError::UnknownMergeRule(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    utxos: BTreeMap<UtxoId, Utxo>,
    address_index: BTreeMap<ShortId, BTreeMap<UtxoId, u64>>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from UTXOs. Later duplicates of an ID are ignored.
    pub fn from_utxos(utxos: impl IntoIterator<Item = Utxo>) -> Self {
        let mut map = BTreeMap::new();
        for utxo in utxos {
            map.entry(utxo.utxo_id()).or_insert(utxo);
        }
        let mut set = Self {
            utxos: map,
            address_index: BTreeMap::new(),
        };
        set.rebuild_index();
        set
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Stores a UTXO unless its ID is already present and `overwrite` is
    /// false. Returns the stored UTXO, or `None` when skipped.
    pub fn add(&mut self, utxo: Utxo, overwrite: bool) -> Option<&Utxo> {
        let id = utxo.utxo_id();
        if self.utxos.contains_key(&id) && !overwrite {
            return None;
        }
        let previous = self.utxos.insert(id, utxo);
        if let Some(previous) = previous {
            self.unindex(id, &previous);
        }
        let stored = self.utxos.get(&id)?;
        for (address, locktime) in index_entries(stored) {
            self.address_index
                .entry(address)
                .or_default()
                .insert(id, locktime);
        }
        Some(stored)
    }

    /// Parses a UTXO in cb58 or `0x` hex form and adds it.
    pub fn add_encoded(&mut self, encoded: &str, overwrite: bool) -> Result<Option<&Utxo>> {
        let utxo = parse_encoded(encoded)?;
        Ok(self.add(utxo, overwrite))
    }

    /// Adds every UTXO, returning the IDs that were stored.
    pub fn add_array(&mut self, utxos: impl IntoIterator<Item = Utxo>, overwrite: bool) -> Vec<UtxoId> {
        let mut added = Vec::new();
        for utxo in utxos {
            let id = utxo.utxo_id();
            if self.add(utxo, overwrite).is_some() {
                added.push(id);
            }
        }
        tracing::debug!(added = added.len(), total = self.len(), "Added UTXOs to set");
        added
    }

    /// Parses and adds encoded UTXOs. Fails on the first malformed entry,
    /// leaving earlier entries added.
    pub fn add_encoded_array<S: AsRef<str>>(&mut self, encoded: &[S], overwrite: bool) -> Result<Vec<UtxoId>> {
        let utxos = encoded
            .iter()
            .map(|item| parse_encoded(item.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.add_array(utxos, overwrite))
    }

    /// Removes a UTXO and every index entry pointing at it.
    pub fn remove(&mut self, id: &UtxoId) -> Option<Utxo> {
        let removed = self.utxos.remove(id)?;
        self.unindex(*id, &removed);
        Some(removed)
    }

    pub fn remove_array(&mut self, ids: &[UtxoId]) -> Vec<Utxo> {
        let removed: Vec<Utxo> = ids.iter().filter_map(|id| self.remove(id)).collect();
        tracing::debug!(removed = removed.len(), total = self.len(), "Removed UTXOs from set");
        removed
    }

    pub fn get_utxo(&self, id: &UtxoId) -> Option<&Utxo> {
        self.utxos.get(id)
    }

    pub fn includes(&self, id: &UtxoId) -> bool {
        self.utxos.contains_key(id)
    }

    /// UTXO IDs, sorted and deduplicated.
    ///
    /// With `addresses`, only UTXOs indexed under one of them are returned,
    /// and `spendable` further restricts the result to locktimes that have
    /// passed. Without addresses every ID in the set is returned.
    pub fn get_utxo_ids(&self, addresses: Option<&[ShortId]>, spendable: bool) -> Vec<UtxoId> {
        self.get_utxo_ids_as_of(addresses, spendable, unix_now())
    }

    /// [`get_utxo_ids`](Self::get_utxo_ids) with an explicit clock.
    pub fn get_utxo_ids_as_of(&self, addresses: Option<&[ShortId]>, spendable: bool, as_of: u64) -> Vec<UtxoId> {
        let Some(addresses) = addresses else {
            return self.utxos.keys().copied().collect();
        };
        let mut ids = BTreeSet::new();
        for address in addresses {
            if let Some(entries) = self.address_index.get(address) {
                for (id, locktime) in entries {
                    if !spendable || *locktime <= as_of {
                        ids.insert(*id);
                    }
                }
            }
        }
        ids.into_iter().collect()
    }

    /// UTXOs in ID order, optionally restricted to `ids`. Unknown IDs are
    /// skipped.
    pub fn get_all_utxos(&self, ids: Option<&[UtxoId]>) -> Vec<&Utxo> {
        match ids {
            Some(ids) => ids.iter().filter_map(|id| self.utxos.get(id)).collect(),
            None => self.utxos.values().collect(),
        }
    }

    /// cb58 forms of [`get_all_utxos`](Self::get_all_utxos).
    pub fn get_all_utxo_strings(&self, ids: Option<&[UtxoId]>) -> Vec<String> {
        self.get_all_utxos(ids).into_iter().map(Utxo::to_cb58).collect()
    }

    /// Every address that owns at least one UTXO in the set.
    pub fn get_addresses(&self) -> Vec<ShortId> {
        self.address_index.keys().copied().collect()
    }

    /// Address index entries (UTXO ID → locktime) for one address.
    pub fn get_address_entries(&self, address: &ShortId) -> Option<&BTreeMap<UtxoId, u64>> {
        self.address_index.get(address)
    }

    /// Sum of amounts of `asset_id` spendable by `addresses` as of `as_of`
    /// (default: now). Saturates at `u64::MAX`.
    pub fn get_balance(&self, addresses: &[ShortId], asset_id: &Id, as_of: Option<u64>) -> u64 {
        let as_of = as_of.unwrap_or_else(unix_now);
        self.get_utxo_ids_as_of(Some(addresses), true, as_of)
            .iter()
            .filter_map(|id| self.utxos.get(id))
            .filter(|utxo| utxo.asset_id == *asset_id)
            .filter(|utxo| utxo.output.meets_threshold(addresses, as_of))
            .filter_map(|utxo| utxo.output.amount())
            .fold(0u64, u64::saturating_add)
    }

    /// New set with the UTXOs matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&Utxo) -> bool) -> UtxoSet {
        Self::from_utxos(self.utxos.values().filter(|utxo| predicate(utxo)).cloned())
    }

    /// New set with this set's UTXOs followed by `other`'s, restricted to
    /// `ids` when given.
    pub fn merge(&self, other: &UtxoSet, ids: Option<&[UtxoId]>) -> UtxoSet {
        let wanted: Option<BTreeSet<&UtxoId>> = ids.map(|ids| ids.iter().collect());
        let keep = |utxo: &&Utxo| match &wanted {
            Some(wanted) => wanted.contains(&utxo.utxo_id()),
            None => true,
        };
        Self::from_utxos(
            self.utxos
                .values()
                .chain(other.utxos.values())
                .filter(keep)
                .cloned(),
        )
    }

    pub fn union(&self, other: &UtxoSet) -> UtxoSet {
        self.merge(other, None)
    }

    pub fn intersection(&self, other: &UtxoSet) -> UtxoSet {
        let ids: Vec<UtxoId> = self
            .utxos
            .keys()
            .filter(|id| other.includes(id))
            .copied()
            .collect();
        self.merge(other, Some(&ids))
    }

    /// self − other
    pub fn difference(&self, other: &UtxoSet) -> UtxoSet {
        let ids: Vec<UtxoId> = self
            .utxos
            .keys()
            .filter(|id| !other.includes(id))
            .copied()
            .collect();
        self.merge(other, Some(&ids))
    }

    pub fn sym_difference(&self, other: &UtxoSet) -> UtxoSet {
        let ids: Vec<UtxoId> = self
            .utxos
            .keys()
            .filter(|id| !other.includes(id))
            .chain(other.utxos.keys().filter(|id| !self.includes(id)))
            .copied()
            .collect();
        self.merge(other, Some(&ids))
    }

    /// Combines two sets by a named rule. Unknown names fail with
    /// [`UtxoError::UnknownMergeRule`].
    pub fn merge_by_rule(&self, other: &UtxoSet, rule: &str) -> Result<UtxoSet> {
        let rule: MergeRule = rule.parse()?;
        Ok(self.merge_with(other, rule))
    }

    pub fn merge_with(&self, other: &UtxoSet, rule: MergeRule) -> UtxoSet {
        let merged = match rule {
            MergeRule::Intersection => self.intersection(other),
            MergeRule::DifferenceSelf => self.difference(other),
            MergeRule::DifferenceNew => other.difference(self),
            MergeRule::SymDifference => self.sym_difference(other),
            MergeRule::Union => self.union(other),
            MergeRule::UnionMinusNew => self.union(other).difference(other),
            MergeRule::UnionMinusSelf => self.union(other).difference(self),
        };
        tracing::debug!(
            rule = %rule,
            left = self.len(),
            right = other.len(),
            result = merged.len(),
            "Merged UTXO sets"
        );
        merged
    }

    /// Recomputes the address index from the stored UTXOs.
    fn rebuild_index(&mut self) {
        let mut index: BTreeMap<ShortId, BTreeMap<UtxoId, u64>> = BTreeMap::new();
        for (id, utxo) in &self.utxos {
            for (address, locktime) in index_entries(utxo) {
                index.entry(address).or_default().insert(*id, locktime);
            }
        }
        self.address_index = index;
    }

    fn unindex(&mut self, id: UtxoId, utxo: &Utxo) {
        for (address, _) in index_entries(utxo) {
            if let Some(entries) = self.address_index.get_mut(&address) {
                entries.remove(&id);
                if entries.is_empty() {
                    self.address_index.remove(&address);
                }
            }
        }
    }

    #[cfg(test)]
    fn index_matches_utxos(&self) -> bool {
        let mut rebuilt = self.clone();
        rebuilt.rebuild_index();
        rebuilt.address_index == self.address_index
    }
}

/// Address index entries contributed by one UTXO.
fn index_entries(utxo: &Utxo) -> impl Iterator<Item = (ShortId, u64)> + '_ {
    let owners = utxo.output.owners();
    owners
        .addresses
        .iter()
        .map(move |address| (*address, owners.locktime))
}

fn parse_encoded(encoded: &str) -> Result<Utxo> {
    let trimmed = encoded.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        Utxo::from_hex_checksum(trimmed)
    } else {
        trimmed.parse()
    }
}
