// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature bundles attached to signed transactions, one per input.

use serde::{Deserialize, Serialize};

use super::type_ids;
use crate::encoding::{Packable, Packer, SignatureBytes, Unpacker};
use crate::error::{Result, UtxoError};

/// secp256k1fx credential: the signatures authorizing one input, in the
/// order of that input's signature indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub signatures: Vec<SignatureBytes>,
}

impl Credential {
    pub fn new(signatures: Vec<SignatureBytes>) -> Self {
        Self { signatures }
    }

    pub fn type_id(&self) -> u32 {
        type_ids::SECP_CREDENTIAL
    }

    pub fn select(type_id: u32, unpacker: &mut Unpacker<'_>) -> Result<Self> {
        match type_id {
            type_ids::SECP_CREDENTIAL => Ok(Self {
                signatures: unpacker.unpack_all()?,
            }),
            other => Err(UtxoError::UnknownTypeId {
                family: "credential",
                type_id: other,
            }),
        }
    }
}

impl Packable for Credential {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_u32(self.type_id());
        packer.pack_all(&self.signatures);
    }

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        let type_id = unpacker.unpack_u32()?;
        Self::select(type_id, unpacker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_layout() {
        let cred = Credential::new(vec![SignatureBytes::new([0xab; 65])]);
        let bytes = cred.to_bytes();
        assert_eq!(bytes.len(), 4 + 4 + 65);
        assert_eq!(&bytes[..8], &[0, 0, 0, 9, 0, 0, 0, 1]);
        assert_eq!(Credential::from_bytes(&bytes).unwrap(), cred);
    }

    #[test]
    fn unknown_credential_type_is_rejected() {
        assert!(matches!(
            Credential::from_bytes(&[0, 0, 0, 10, 0, 0, 0, 0]),
            Err(UtxoError::UnknownTypeId {
                family: "credential",
                ..
            })
        ));
    }
}
