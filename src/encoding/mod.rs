// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Binary codec for the Avalanche wire format.
//!
//! ## Conventions
//!
//! - All multi-byte integers are big-endian
//! - Variable-length collections carry a 4-byte unsigned count prefix
//! - Polymorphic values carry a 4-byte type ID before their payload
//!
//! The codec is stateless: a [`Packer`] owns the bytes being written and an
//! [`Unpacker`] borrows the bytes being read. Nothing here is global.

pub mod cb58;
pub mod hex_checksum;
pub mod nbytes;

use std::io::{Cursor, Read};

use crate::error::{Result, UtxoError};

pub use nbytes::{Id, NBytes, ShortId, SignatureBytes};

/// Append-only big-endian writer.
#[derive(Debug, Default)]
pub struct Packer {
    bytes: Vec<u8>,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pack_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn pack_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn pack_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes raw bytes without a length prefix.
    pub fn pack_fixed(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a collection length as a 4-byte count.
    ///
    /// # Panics
    /// If `len` exceeds `u32::MAX`; the wire format has no encoding for it.
    pub fn pack_len(&mut self, len: usize) {
        match u32::try_from(len) {
            Ok(count) => self.pack_u32(count),
            Err(_) => panic!("collection of {len} items exceeds the u32 length prefix"),
        }
    }

    /// Writes a 4-byte length followed by the bytes.
    pub fn pack_len_prefixed(&mut self, bytes: &[u8]) {
        self.pack_len(bytes.len());
        self.pack_fixed(bytes);
    }

    /// Writes every item of a slice after its count.
    pub fn pack_all<T: Packable>(&mut self, items: &[T]) {
        self.pack_len(items.len());
        for item in items {
            item.pack(self);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Cursor-based big-endian reader.
pub struct Unpacker<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Unpacker<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len();
        total.saturating_sub(self.cursor.position() as usize)
    }

    pub fn unpack_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(UtxoError::UnexpectedEnd {
                needed: N,
                remaining,
            });
        }
        let mut buf = [0u8; N];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn unpack_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.unpack_fixed()?))
    }

    pub fn unpack_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.unpack_fixed()?))
    }

    pub fn unpack_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.unpack_fixed()?))
    }

    /// Reads a 4-byte collection count.
    pub fn unpack_len(&mut self) -> Result<usize> {
        Ok(self.unpack_u32()? as usize)
    }

    /// Reads a 4-byte length followed by that many bytes.
    pub fn unpack_len_prefixed(&mut self) -> Result<Vec<u8>> {
        let len = self.unpack_len()?;
        let remaining = self.remaining();
        if remaining < len {
            return Err(UtxoError::UnexpectedEnd {
                needed: len,
                remaining,
            });
        }
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a counted collection of packable items.
    pub fn unpack_all<T: Packable>(&mut self) -> Result<Vec<T>> {
        let len = self.unpack_len()?;
        // Every element is at least one byte, so the count can not exceed
        // what is left of the input.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::unpack(self)?);
        }
        Ok(items)
    }

    /// Fails unless all input has been consumed.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(UtxoError::TrailingBytes(n)),
        }
    }
}

/// A value with a fixed position-independent wire encoding.
pub trait Packable: Sized {
    fn pack(&self, packer: &mut Packer);

    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut packer = Packer::new();
        self.pack(&mut packer);
        packer.into_bytes()
    }

    /// Decodes a complete buffer, rejecting trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut unpacker = Unpacker::new(bytes);
        let value = Self::unpack(&mut unpacker)?;
        unpacker.finish()?;
        Ok(value)
    }
}
