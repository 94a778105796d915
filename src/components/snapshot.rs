// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON snapshots of a [`UtxoSet`].
//!
//! UTXOs are stored in their cb58 wire form. The address index is written
//! for inspection only; loading always rebuilds it from the UTXOs. This is a
//! convenience format, not a stable persistence contract.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::utxo::{Utxo, UtxoId};
use super::utxo_set::UtxoSet;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoSetSnapshot {
    /// UTXO ID → cb58 UTXO bytes.
    pub utxos: BTreeMap<UtxoId, String>,
    /// Hex address → {UTXO ID → locktime as a decimal string}.
    pub address_index: BTreeMap<String, BTreeMap<UtxoId, String>>,
}

impl UtxoSetSnapshot {
    pub fn from_set(set: &UtxoSet) -> Self {
        let utxos = set
            .get_all_utxos(None)
            .into_iter()
            .map(|utxo| (utxo.utxo_id(), utxo.to_cb58()))
            .collect();
        let address_index = set
            .get_addresses()
            .into_iter()
            .filter_map(|address| {
                set.get_address_entries(&address).map(|entries| {
                    let entries = entries
                        .iter()
                        .map(|(id, locktime)| (*id, locktime.to_string()))
                        .collect();
                    (address.to_hex(), entries)
                })
            })
            .collect();
        Self {
            utxos,
            address_index,
        }
    }

    /// Decodes every UTXO into a fresh set. An entry whose key disagrees
    /// with its UTXO is stored under the UTXO's own ID.
    pub fn into_set(self) -> Result<UtxoSet> {
        let mut utxos = Vec::with_capacity(self.utxos.len());
        for (key, encoded) in &self.utxos {
            let utxo: Utxo = encoded.parse()?;
            if utxo.utxo_id() != *key {
                tracing::warn!(
                    key = %key,
                    utxo_id = %utxo.utxo_id(),
                    "Snapshot key does not match UTXO, using UTXO ID"
                );
            }
            utxos.push(utxo);
        }
        Ok(UtxoSet::from_utxos(utxos))
    }
}

/// Write a snapshot of `set` as pretty JSON (atomic write via rename).
pub fn write_snapshot(path: impl AsRef<Path>, set: &UtxoSet) -> Result<()> {
    let path = path.as_ref();
    write_json_atomic(path, &UtxoSetSnapshot::from_set(set))?;
    tracing::debug!(path = %path.display(), utxos = set.len(), "Wrote UTXO set snapshot");
    Ok(())
}

/// Writes `value` to a temp file next to `path`, then renames it into
/// place. The temp file is removed if any step fails.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let written = write_json(&temp_path, value).and_then(|()| Ok(fs::rename(&temp_path, path)?));
    if let Err(err) = &written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp snapshot");
            }
        }
        tracing::warn!(path = %path.display(), error = %err, "Snapshot write failed");
    }
    written
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<UtxoSet> {
    let file = File::open(path.as_ref())?;
    let snapshot: UtxoSetSnapshot = serde_json::from_reader(BufReader::new(file))?;
    snapshot.into_set()
}
