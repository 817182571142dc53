//! Internal Key Format Module
//!
//! Packs every write into a single immutable buffer that the memtable
//! orders with the internal key comparator.
//!
//! ## Responsibilities
//! - Encode (sequence, value type, user key, value) into one record
//! - O(1) field access by offset arithmetic
//! - Build lookup probes for point reads
//!
//! ## Record Format
//! ```text
//! ┌──────────────┬──────────┬─────────────┬──────────────┬─────────┐
//! │ KeyBlock (4) │ User Key │ Tag (8)     │ ValueLen (4) │ Value   │
//! └──────────────┴──────────┴─────────────┴──────────────┴─────────┘
//!   KeyBlock = len(user key) + 8
//!   Tag      = sequence << 8 | value type
//! ```
//!
//! ## Lookup Key Format
//! ```text
//! ┌──────────────┬──────────┬───────────────────────┐
//! │ KeyBlock (4) │ User Key │ 0xFF.. (8)            │
//! └──────────────┴──────────┴───────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod lookup;
mod record;

pub use lookup::LookupKey;
pub use record::{InternalKey, KeyEncoder, ParsedInternalKey};

use crate::error::{KeyFormatError, Result};

/// Sequence numbers occupy the upper 56 bits of the tag
pub type SequenceNumber = u64;

/// Largest sequence number that fits in the tag
pub const MAX_SEQUENCE: SequenceNumber = (1 << 56) - 1;

/// Size of the key block length prefix
pub const KEY_BLOCK_LEN_SIZE: usize = 4;

/// Size of the packed sequence/value type tag
pub const TAG_SIZE: usize = 8;

/// Size of the value length field
pub const VALUE_LEN_SIZE: usize = 4;

/// Smallest possible record: empty key, empty value
pub const MIN_RECORD_SIZE: usize = KEY_BLOCK_LEN_SIZE + TAG_SIZE + VALUE_LEN_SIZE;

/// Largest user key whose key block still fits in a u32
pub const MAX_KEY_SIZE: usize = u32::MAX as usize - TAG_SIZE;

/// Largest value whose length fits in a u32
pub const MAX_VALUE_SIZE: usize = u32::MAX as usize;

/// Tag byte used by lookup probes so they sort ahead of real records
pub const PROBE_TAG_BYTE: u8 = 0xFF;

/// Kind of write a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    /// A tombstone (deleted key)
    Deletion = 0x00,

    /// A live value
    Value = 0x01,
}

impl TryFrom<u8> for ValueType {
    type Error = KeyFormatError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(ValueType::Deletion),
            0x01 => Ok(ValueType::Value),
            other => Err(KeyFormatError::InvalidValueType(other)),
        }
    }
}

/// Pack a sequence number and tag byte into the 64-bit tag word
#[inline]
pub fn pack_tag(sequence: SequenceNumber, tag_byte: u8) -> u64 {
    (sequence << 8) | tag_byte as u64
}

/// Split a tag word into its sequence number and tag byte
#[inline]
pub fn unpack_tag(tag: u64) -> (SequenceNumber, u8) {
    (tag >> 8, (tag & 0xff) as u8)
}

/// Reject sequence numbers that would lose bits when shifted into the tag
pub(crate) fn check_sequence(sequence: SequenceNumber) -> Result<()> {
    if sequence > MAX_SEQUENCE {
        return Err(KeyFormatError::SequenceOverflow(sequence));
    }
    Ok(())
}

/// Reject user keys whose key block would overflow the u32 prefix
pub(crate) fn check_key_size(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(KeyFormatError::KeyTooLarge { size: len, max });
    }
    Ok(())
}

#[inline]
pub(crate) fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[inline]
pub(crate) fn read_u64_le(buf: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// Read-only view shared by every key shape the comparator accepts
///
/// Implemented by [`InternalKey`], [`LookupKey`] and
/// [`TableKey`](crate::TableKey). The set is closed to this crate, so the
/// comparator never has to guess what it was handed.
pub trait KeyView: sealed::Sealed {
    /// Raw user key bytes
    fn user_key(&self) -> &[u8];

    /// Packed `sequence << 8 | tag byte` word
    fn packed_tag(&self) -> u64;
}

pub(crate) mod sealed {
    pub trait Sealed {}
}
