// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! P-Chain (PlatformVM) transactions.
//!
//! The P-Chain shares the X-Chain input/output components but adds
//! stakeable-locked outputs. [`spend_stakeable`] consumes those first, for
//! callers that assemble staking transactions; the import and export
//! builders only move unlocked value.

use crate::components::spend::{spend_import, spend_transfer, ImportRequest, TransferRequest};
use crate::components::{
    AssetAmountDestination, BaseTx, ExportTx, ImportTx, TransferableInput, TxBody, UnsignedTx, UtxoSet,
};
use crate::config::ChainContext;
use crate::encoding::{Id, Packable, Packer, Unpacker};
use crate::error::{Result, UtxoError};

/// PlatformVM transaction type IDs.
pub mod type_ids {
    pub const IMPORT_TX: u32 = 0x11;
    pub const EXPORT_TX: u32 = 0x12;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformTx {
    Import(ImportTx),
    Export(ExportTx),
}

impl TxBody for PlatformTx {
    fn type_id(&self) -> u32 {
        match self {
            PlatformTx::Import(_) => type_ids::IMPORT_TX,
            PlatformTx::Export(_) => type_ids::EXPORT_TX,
        }
    }

    fn pack_body(&self, packer: &mut Packer) {
        match self {
            PlatformTx::Import(tx) => tx.pack(packer),
            PlatformTx::Export(tx) => tx.pack(packer),
        }
    }

    fn unpack_body(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self> {
        match type_id {
            type_ids::IMPORT_TX => Ok(PlatformTx::Import(ImportTx::unpack(unpacker)?)),
            type_ids::EXPORT_TX => Ok(PlatformTx::Export(ExportTx::unpack(unpacker)?)),
            other => Err(UtxoError::UnknownTypeId {
                family: "platformvm transaction",
                type_id: other,
            }),
        }
    }

    fn canonicalize(&mut self) {
        match self {
            PlatformTx::Import(tx) => tx.canonicalize(),
            PlatformTx::Export(tx) => tx.canonicalize(),
        }
    }

    fn signable_inputs(&self) -> Vec<&TransferableInput> {
        match self {
            PlatformTx::Import(tx) => tx.base.inputs.iter().chain(&tx.imported_inputs).collect(),
            PlatformTx::Export(tx) => tx.base.inputs.iter().collect(),
        }
    }

    fn base(&self) -> &BaseTx {
        match self {
            PlatformTx::Import(tx) => &tx.base,
            PlatformTx::Export(tx) => &tx.base,
        }
    }
}

/// Covers a transfer with stakeable-locked value first.
///
/// Locked UTXOs of the requested asset are consumed before unlocked ones.
/// The locked part of the amount reaches the destinations as
/// `StakeableLockOut` outputs and locked change stays locked.
pub fn spend_stakeable(
    set: &UtxoSet,
    request: &TransferRequest,
    fee_asset_id: Id,
    fee: u64,
) -> Result<AssetAmountDestination> {
    let mut request = request.clone();
    request.options.stakeable = true;
    let aad = spend_transfer(set, &request, fee_asset_id, fee)?;

    tracing::debug!(
        asset_id = %request.asset_id,
        amount = request.amount,
        inputs = aad.inputs().len(),
        "Covered stakeable spend"
    );
    Ok(aad)
}

/// Build an export of `request.amount` from the P-Chain to
/// `destination_chain`.
///
/// Stake-locked value is never exported, whatever `request.options` says.
pub fn build_export_tx(
    ctx: &ChainContext,
    set: &UtxoSet,
    destination_chain: Id,
    request: &TransferRequest,
) -> Result<UnsignedTx<PlatformTx>> {
    let mut request = request.clone();
    request.options.stakeable = false;
    let aad = spend_transfer(set, &request, ctx.fee_asset_id, ctx.tx_fee)?;
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
        "Built P-Chain export transaction"
    );
    Ok(UnsignedTx::new(ctx.codec_id, PlatformTx::Export(tx)))
}

/// Build an import of every spendable UTXO in `atomics` from `source_chain`.
pub fn build_import_tx(
    ctx: &ChainContext,
    set: &UtxoSet,
    atomics: &UtxoSet,
    source_chain: Id,
    request: &ImportRequest,
) -> Result<UnsignedTx<PlatformTx>> {
    let mut request = request.clone();
    request.options.stakeable = false;
    let plan = spend_import(set, atomics, &request, ctx.fee_asset_id, ctx.tx_fee)?;

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
        "Built P-Chain import transaction"
    );
    Ok(UnsignedTx::new(ctx.codec_id, PlatformTx::Import(tx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spend::SpendOptions;
    use crate::components::{
        Input, KeyChain, Output, OutputOwners, SigIdx, StakeableLockOut, TransferInput, TransferOutput,
        TransferableOutput, Tx, Utxo,
    };
    use crate::encoding::{ShortId, SignatureBytes};

    const TEST_KEY: &str = "PrivateKey-24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5";
    const AVAX: Id = Id::new([0x41; 32]);

    fn asset_yeet() -> Id {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&[0x79, 0x65, 0x65, 0x74]);
        Id::new(bytes)
    }

    fn ctx(fee: u64) -> ChainContext {
        ChainContext {
            network_id: 10,
            blockchain_id: Id::default(),
            fee_asset_id: AVAX,
            tx_fee: fee,
            codec_id: 0,
        }
    }

    fn addr(byte: u8) -> ShortId {
        ShortId::new([byte; 20])
    }

    fn plain(tx: u8, amount: u64, owner: ShortId) -> Utxo {
        let owners = OutputOwners::try_new(0, 1, vec![owner]).unwrap();
        Utxo::new(
            0,
            Id::new([tx; 32]),
            0,
            AVAX,
            Output::SecpTransfer(TransferOutput::try_new(amount, owners).unwrap()),
        )
    }

    fn locked(tx: u8, amount: u64, owner: ShortId, until: u64) -> Utxo {
        let owners = OutputOwners::try_new(0, 1, vec![owner]).unwrap();
        Utxo::new(
            0,
            Id::new([tx; 32]),
            0,
            AVAX,
            Output::StakeableLock(StakeableLockOut {
                stakeable_locktime: until,
                output: TransferOutput::try_new(amount, owners).unwrap(),
            }),
        )
    }

    fn request(amount: u64, to: ShortId, from: ShortId) -> TransferRequest {
        TransferRequest {
            options: SpendOptions {
                as_of: 1_000,
                ..SpendOptions::default()
            },
            ..TransferRequest::new(AVAX, amount, vec![to], vec![from], vec![from])
        }
    }

    /// Export of 499999900 nAVAX to the C-Chain, spending one 5 AVAX input.
    fn fixture_export(signer: ShortId) -> UnsignedTx<PlatformTx> {
        let asset = asset_yeet();
        let destination =
            Id::from_hex("2c34ce1df23b838c5abf2a7f6437cca3d3067ed509ff25f11df6b11b582b51eb").unwrap();
        let recipient = ShortId::from_hex("3d0ad12b8ee8928edf248ca91ca55600fb383f07").unwrap();

        let tx = ExportTx {
            base: BaseTx::new(
                10,
                Id::default(),
                Vec::new(),
                vec![TransferableInput {
                    tx_id: Id::default(),
                    output_index: 0,
                    asset_id: asset,
                    input: Input::SecpTransfer(TransferInput {
                        amount: 500_000_000,
                        sig_idxs: vec![SigIdx::new(0, signer)],
                    }),
                }],
                Vec::new(),
            ),
            destination_chain: destination,
            exported_outputs: vec![TransferableOutput::new(
                asset,
                Output::SecpTransfer(
                    TransferOutput::try_new(499_999_900, OutputOwners::try_new(0, 1, vec![recipient]).unwrap())
                        .unwrap(),
                ),
            )],
        };
        UnsignedTx::new(0, PlatformTx::Export(tx))
    }

    #[test]
    fn export_fixture_without_signers() {
        let unsigned = fixture_export(ShortId::default());
        let bytes = unsigned.to_bytes();
        assert_eq!(&bytes[..10], &[0x00, 0x00, 0x00, 0x00, 0x00, 0x12, 0x00, 0x00, 0x00, 0x0a]);
        assert_eq!(bytes.len(), 2 + 4 + 4 + 32 + 4 + 4 + 32 + 4 + 32 + 4 + 8 + 4 + 4 + 4 + 32 + 4 + 32 + 4 + 8 + 8 + 4 + 4 + 20);

        let tx = Tx {
            unsigned,
            credentials: Vec::new(),
        };
        assert_eq!(tx.id().to_string(), "HjudJSkC39woaVLD6mKyLJeWfXZkiQQ64pUceHcfRRa6m4dRK");
    }

    #[test]
    fn export_fixture_signed_by_test_key() {
        let mut keychain = KeyChain::new();
        let signer = keychain.import_key(TEST_KEY).unwrap();

        let signed = fixture_export(signer).sign(&keychain).unwrap();
        assert_eq!(signed.credentials.len(), 1);
        let expected = SignatureBytes::from_hex(
            "e2615afb7adec6f0a6ba4e6e235181ea3d8211d9c8890d031ff241e74cb1cdda\
             25a187d89a8fc838cf8255e7b3429097aadd2e5f1afa6723e5ab373c7d94cab801",
        )
        .unwrap();
        assert_eq!(signed.credentials[0].signatures, vec![expected]);
        assert_eq!(signed.id().to_string(), "xjRjs4pcDFBwJR4kAKMtVHNLQEdhswojNPqXKVgwsjCDsn4rE");

        let decoded = Tx::<PlatformTx>::from_bytes(&signed.to_bytes()).unwrap();
        assert_eq!(decoded.id(), signed.id());
    }

    #[test]
    fn built_export_uses_platform_type_id() {
        let (p, q) = (addr(0x50), addr(0x51));
        let set = UtxoSet::from_utxos(vec![plain(1, 100, p)]);
        let x_chain = Id::new([0x58; 32]);

        let unsigned = build_export_tx(&ctx(1), &set, x_chain, &request(40, q, p)).unwrap();
        let bytes = unsigned.to_bytes();
        assert_eq!(&bytes[2..6], &[0, 0, 0, 0x12]);

        let PlatformTx::Export(export) = &unsigned.body else {
            panic!("expected an export transaction");
        };
        assert_eq!(export.exported_outputs[0].output.amount(), Some(40));
        assert_eq!(export.base.outputs[0].output.amount(), Some(59));
        assert!(export.base.blockchain_id.is_empty());
    }

    #[test]
    fn export_never_spends_stake_locked_value() {
        let (p, q) = (addr(0x50), addr(0x51));
        let set = UtxoSet::from_utxos(vec![locked(1, 500, p, 5_000), plain(2, 10, p)]);
        let mut req = request(40, q, p);
        req.options.stakeable = true;

        let err = build_export_tx(&ctx(0), &set, Id::default(), &req).unwrap_err();
        assert!(matches!(err, UtxoError::InsufficientFunds { available: 10, .. }));
    }

    #[test]
    fn stakeable_spend_prefers_locked_value() {
        let (p, q) = (addr(0x50), addr(0x51));
        let set = UtxoSet::from_utxos(vec![plain(1, 100, p), locked(2, 30, p, 5_000)]);

        let aad = spend_stakeable(&set, &request(50, q, p), AVAX, 1).unwrap();
        assert!(matches!(aad.inputs()[0].input, Input::StakeableLock(_)));
        let locked_out: u64 = aad
            .outputs()
            .iter()
            .filter_map(|o| match &o.output {
                Output::StakeableLock(out) => Some(out.output.amount),
                _ => None,
            })
            .sum();
        assert_eq!(locked_out, 30);
    }

    #[test]
    fn import_to_the_platform_chain() {
        let mut keychain = KeyChain::new();
        let owner = keychain.import_key(TEST_KEY).unwrap();
        let atomics = UtxoSet::from_utxos(vec![plain(7, 30, owner)]);
        let request = ImportRequest {
            options: SpendOptions {
                as_of: 1_000,
                ..SpendOptions::default()
            },
            ..ImportRequest::new(vec![owner], vec![owner], vec![owner])
        };

        let unsigned =
            build_import_tx(&ctx(1), &UtxoSet::new(), &atomics, Id::new([0x58; 32]), &request).unwrap();
        assert_eq!(unsigned.body.type_id(), type_ids::IMPORT_TX);
        assert_eq!(unsigned.body.base().outputs[0].output.amount(), Some(29));

        let signed = unsigned.sign(&keychain).unwrap();
        assert_eq!(signed.credentials.len(), 1);
        let decoded = Tx::<PlatformTx>::from_cb58(&signed.to_cb58()).unwrap();
        assert_eq!(decoded.to_bytes(), signed.to_bytes());
    }

    #[test]
    fn unknown_transaction_type_is_rejected() {
        let bytes = [0, 0, 0, 0, 0, 4];
        assert!(matches!(
            UnsignedTx::<PlatformTx>::from_bytes(&bytes),
            Err(UtxoError::UnknownTypeId {
                family: "platformvm transaction",
                type_id: 4
            })
        ));
    }
}
