// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction bodies and the unsigned/signed envelope.
//!
//! Input and output lists are always written in canonical order, so the
//! bytes (and therefore the transaction ID) do not depend on the order in
//! which a builder assembled them:
//!
//! - outputs by their serialized bytes
//! - inputs by `tx_id ++ output_index`
//!
//! Chain-specific payloads plug into [`UnsignedTx`] and [`Tx`] through the
//! [`TxBody`] trait.

use sha2::{Digest, Sha256};

use super::credential::Credential;
use super::input::TransferableInput;
use super::keychain::KeyChain;
use super::output::TransferableOutput;
use crate::encoding::{cb58, Id, Packable, Packer, Unpacker};
use crate::error::{Result, UtxoError};

fn pack_outputs(packer: &mut Packer, outputs: &[TransferableOutput]) {
    let mut encoded: Vec<Vec<u8>> = outputs.iter().map(Packable::to_bytes).collect();
    encoded.sort();
    packer.pack_len(encoded.len());
    for bytes in &encoded {
        packer.pack_fixed(bytes);
    }
}

fn pack_inputs(packer: &mut Packer, inputs: &[TransferableInput]) {
    let mut sorted: Vec<&TransferableInput> = inputs.iter().collect();
    sorted.sort_by_key(|input| (input.tx_id, input.output_index));
    packer.pack_len(sorted.len());
    for input in sorted {
        input.pack(packer);
    }
}

fn sum_amounts(mut amounts: impl Iterator<Item = u64>) -> Result<u64> {
    amounts.try_fold(0u64, |acc, amt| acc.checked_add(amt).ok_or(UtxoError::AmountOverflow))
}

/// Fields common to every transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTx {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub outputs: Vec<TransferableOutput>,
    pub inputs: Vec<TransferableInput>,
    pub memo: Vec<u8>,
}

impl BaseTx {
    pub fn new(
        network_id: u32,
        blockchain_id: Id,
        outputs: Vec<TransferableOutput>,
        inputs: Vec<TransferableInput>,
        memo: Vec<u8>,
    ) -> Self {
        Self {
            network_id,
            blockchain_id,
            outputs,
            inputs,
            memo,
        }
    }

    /// Sorts inputs and outputs in place into canonical order.
    pub fn canonicalize(&mut self) {
        TransferableOutput::sort_canonical(&mut self.outputs);
        TransferableInput::sort_canonical(&mut self.inputs);
    }

    /// Total of `asset_id` consumed by the inputs.
    pub fn input_total(&self, asset_id: &Id) -> Result<u64> {
        sum_amounts(
            self.inputs
                .iter()
                .filter(|input| input.asset_id == *asset_id)
                .map(|input| input.input.amount()),
        )
    }

    /// Total of `asset_id` paid to the outputs.
    pub fn output_total(&self, asset_id: &Id) -> Result<u64> {
        sum_amounts(
            self.outputs
                .iter()
                .filter(|output| output.asset_id == *asset_id)
                .filter_map(|output| output.output.amount()),
        )
    }
}

impl Packable for BaseTx {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u32(self.network_id);
        self.blockchain_id.pack(packer);
        pack_outputs(packer, &self.outputs);
        pack_inputs(packer, &self.inputs);
        packer.pack_len_prefixed(&self.memo);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            network_id: unpacker.unpack_u32()?,
            blockchain_id: Id::unpack(unpacker)?,
            outputs: unpacker.unpack_all()?,
            inputs: unpacker.unpack_all()?,
            memo: unpacker.unpack_len_prefixed()?,
        })
    }
}

/// Consumes UTXOs exported to this chain from `source_chain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTx {
    pub base: BaseTx,
    pub source_chain: Id,
    pub imported_inputs: Vec<TransferableInput>,
}

impl ImportTx {
    pub fn canonicalize(&mut self) {
        self.base.canonicalize();
        TransferableInput::sort_canonical(&mut self.imported_inputs);
    }
}

impl Packable for ImportTx {
    fn pack(&self, packer: &mut Packer) {
        self.base.pack(packer);
        self.source_chain.pack(packer);
        pack_inputs(packer, &self.imported_inputs);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            base: BaseTx::unpack(unpacker)?,
            source_chain: Id::unpack(unpacker)?,
            imported_inputs: unpacker.unpack_all()?,
        })
    }
}

/// Moves value into the shared memory of `destination_chain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTx {
    pub base: BaseTx,
    pub destination_chain: Id,
    pub exported_outputs: Vec<TransferableOutput>,
}

impl ExportTx {
    pub fn canonicalize(&mut self) {
        self.base.canonicalize();
        TransferableOutput::sort_canonical(&mut self.exported_outputs);
    }
}

impl Packable for ExportTx {
    fn pack(&self, packer: &mut Packer) {
        self.base.pack(packer);
        self.destination_chain.pack(packer);
        pack_outputs(packer, &self.exported_outputs);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            base: BaseTx::unpack(unpacker)?,
            destination_chain: Id::unpack(unpacker)?,
            exported_outputs: unpacker.unpack_all()?,
        })
    }
}

/// A chain-specific transaction payload.
pub trait TxBody: Sized {
    /// Wire type ID written before the body.
    fn type_id(&self) -> u32;

    fn pack_body(&self, packer: &mut Packer);

    /// Decodes the body registered under `type_id`.
    fn unpack_body(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self>;

    /// Sorts every input and output list in place.
    fn canonicalize(&mut self);

    /// Inputs needing a credential, in credential order.
    fn signable_inputs(&self) -> Vec<&TransferableInput>;

    fn base(&self) -> &BaseTx;
}

/// `codec_id ++ type_id ++ body`: the bytes that are signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx<T> {
    pub codec_id: u16,
    pub body: T,
}

impl<T: TxBody> UnsignedTx<T> {
    pub fn new(codec_id: u16, body: T) -> Self {
        Self { codec_id, body }
    }

    /// SHA-256 of the unsigned bytes; the digest every signature covers.
    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.to_bytes()).into()
    }

    /// Signs every signable input with the key chain.
    ///
    /// The body is put in canonical order first so credentials line up with
    /// the serialized inputs. Each input gets one credential with one
    /// signature per signature index, in index order.
    pub fn sign(mut self, keychain: &KeyChain) -> Result<Tx<T>> {
        self.body.canonicalize();
        let digest = self.hash();

        let mut credentials = Vec::new();
        for input in self.body.signable_inputs() {
            let mut signatures = Vec::new();
            for sig_idx in input.input.sig_idxs() {
                if !keychain.has_key(&sig_idx.source) {
                    tracing::warn!(
                        utxo_id = %input.utxo_id(),
                        address = %sig_idx.source,
                        "No key for input signer"
                    );
                }
                signatures.push(keychain.sign(&sig_idx.source, &digest)?);
            }
            credentials.push(Credential::new(signatures));
        }

        Ok(Tx {
            unsigned: self,
            credentials,
        })
    }
}

impl<T: TxBody> Packable for UnsignedTx<T> {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u16(self.codec_id);
        packer.pack_u32(self.body.type_id());
        self.body.pack_body(packer);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let codec_id = unpacker.unpack_u16()?;
        let type_id = unpacker.unpack_u32()?;
        Ok(Self {
            codec_id,
            body: T::unpack_body(type_id, unpacker)?,
        })
    }
}

/// A signed transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx<T> {
    pub unsigned: UnsignedTx<T>,
    pub credentials: Vec<Credential>,
}

impl<T: TxBody> Tx<T> {
    /// Transaction ID: SHA-256 of the signed bytes.
    pub fn id(&self) -> Id {
        Id::new(Sha256::digest(self.to_bytes()).into())
    }

    /// cb58 form of the signed bytes, accepted by `issueTx`.
    pub fn to_cb58(&self) -> String {
        cb58::encode(&self.to_bytes())
    }

    pub fn from_cb58(encoded: &str) -> Result<Self> {
        Self::from_bytes(&cb58::decode(encoded)?)
    }
}

impl<T: TxBody> Packable for Tx<T> {
    fn pack(&self, packer: &mut Packer) {
        self.unsigned.pack(packer);
        packer.pack_all(&self.credentials);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            unsigned: UnsignedTx::unpack(unpacker)?,
            credentials: unpacker.unpack_all()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::{Input, SigIdx, TransferInput};
    use crate::components::output::{Output, OutputOwners, TransferOutput};
    use crate::encoding::ShortId;

    fn output(asset: u8, amount: u64) -> TransferableOutput {
        let owners = OutputOwners::try_new(0, 1, vec![ShortId::new([1; 20])]).unwrap();
        TransferableOutput::new(
            Id::new([asset; 32]),
            Output::SecpTransfer(TransferOutput::try_new(amount, owners).unwrap()),
        )
    }

    fn input(tx: u8, index: u32, amount: u64) -> TransferableInput {
        TransferableInput {
            tx_id: Id::new([tx; 32]),
            output_index: index,
            asset_id: Id::new([1; 32]),
            input: Input::SecpTransfer(TransferInput {
                amount,
                sig_idxs: vec![SigIdx::new(0, ShortId::new([1; 20]))],
            }),
        }
    }

    #[test]
    fn base_tx_bytes_ignore_insertion_order() {
        let forward = BaseTx::new(
            5,
            Id::new([9; 32]),
            vec![output(1, 10), output(1, 5), output(0, 99)],
            vec![input(2, 0, 3), input(1, 7, 4), input(1, 2, 5)],
            b"memo".to_vec(),
        );
        let mut reversed = forward.clone();
        reversed.outputs.reverse();
        reversed.inputs.reverse();
        assert_eq!(forward.to_bytes(), reversed.to_bytes());

        let mut sorted = reversed.clone();
        sorted.canonicalize();
        assert_eq!(sorted.to_bytes(), forward.to_bytes());

        let decoded = BaseTx::from_bytes(&forward.to_bytes()).unwrap();
        assert_eq!(decoded.to_bytes(), forward.to_bytes());
        assert_eq!(decoded.outputs, sorted.outputs);
        assert_eq!(decoded.memo, b"memo".to_vec());

        let order: Vec<(u8, u32)> = sorted
            .inputs
            .iter()
            .map(|i| (i.tx_id.as_bytes()[0], i.output_index))
            .collect();
        assert_eq!(order, vec![(1, 2), (1, 7), (2, 0)]);
        assert_eq!(sorted.outputs[0].asset_id, Id::new([0; 32]));
    }

    #[test]
    fn totals_sum_per_asset() {
        let tx = BaseTx::new(
            1,
            Id::default(),
            vec![output(1, 10), output(2, 50)],
            vec![input(1, 0, 30), input(2, 0, 4)],
            Vec::new(),
        );
        assert_eq!(tx.input_total(&Id::new([1; 32])).unwrap(), 34);
        assert_eq!(tx.output_total(&Id::new([1; 32])).unwrap(), 10);
        assert_eq!(tx.output_total(&Id::new([3; 32])).unwrap(), 0);
    }

    #[test]
    fn import_and_export_bodies_round_trip() {
        let base = BaseTx::new(1, Id::new([4; 32]), vec![output(1, 1)], vec![], vec![]);
        let import = ImportTx {
            base: base.clone(),
            source_chain: Id::new([7; 32]),
            imported_inputs: vec![input(3, 1, 8)],
        };
        let decoded = ImportTx::from_bytes(&import.to_bytes()).unwrap();
        assert_eq!(decoded.to_bytes(), import.to_bytes());
        assert_eq!(decoded.source_chain, import.source_chain);
        assert_eq!(decoded.imported_inputs[0].utxo_id(), import.imported_inputs[0].utxo_id());

        let export = ExportTx {
            base,
            destination_chain: Id::new([8; 32]),
            exported_outputs: vec![output(1, 2), output(1, 1)],
        };
        let decoded = ExportTx::from_bytes(&export.to_bytes()).unwrap();
        assert_eq!(decoded.to_bytes(), export.to_bytes());
        assert_eq!(decoded.exported_outputs[0].output.amount(), Some(1));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let base = BaseTx::new(1, Id::default(), vec![output(1, 1)], vec![], b"x".to_vec());
        let bytes = base.to_bytes();
        assert!(matches!(
            BaseTx::from_bytes(&bytes[..bytes.len() - 1]),
            Err(UtxoError::UnexpectedEnd { .. })
        ));
    }
}
