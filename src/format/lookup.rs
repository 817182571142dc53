//! Lookup keys
//!
//! Probe records used to seek the memtable. A probe has no value fields,
//! so there is no `user_value` to call on it.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    check_key_size, check_sequence, pack_tag, read_u32_le, read_u64_le, sealed, unpack_tag,
    KeyView, SequenceNumber, KEY_BLOCK_LEN_SIZE, MAX_KEY_SIZE, MAX_SEQUENCE, PROBE_TAG_BYTE,
    TAG_SIZE,
};
use crate::error::Result;

/// A search-only key that sorts just ahead of the versions it can see
#[derive(Clone, PartialEq, Eq)]
pub struct LookupKey {
    data: Bytes,
}

impl LookupKey {
    /// Build a probe for the newest version of `user_key`
    ///
    /// The tag is all ones, which sorts before every real record with the
    /// same user key.
    pub fn new(user_key: &[u8]) -> Result<Self> {
        Self::at_snapshot(user_key, MAX_SEQUENCE)
    }

    /// Build a probe that only sees versions with sequence `<= sequence`
    pub fn at_snapshot(user_key: &[u8], sequence: SequenceNumber) -> Result<Self> {
        check_sequence(sequence)?;
        check_key_size(user_key.len(), MAX_KEY_SIZE)?;

        let key_block_size = user_key.len() + TAG_SIZE;
        let mut buf = BytesMut::with_capacity(KEY_BLOCK_LEN_SIZE + key_block_size);
        buf.put_u32_le(key_block_size as u32);
        buf.put_slice(user_key);
        buf.put_u64_le(pack_tag(sequence, PROBE_TAG_BYTE));

        Ok(Self { data: buf.freeze() })
    }

    #[inline]
    fn key_block_size(&self) -> usize {
        read_u32_le(&self.data, 0) as usize
    }

    #[inline]
    pub fn user_key(&self) -> &[u8] {
        let key_block_size = self.key_block_size();
        &self.data[KEY_BLOCK_LEN_SIZE..KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE]
    }

    #[inline]
    pub fn packed_tag(&self) -> u64 {
        let key_block_size = self.key_block_size();
        read_u64_le(&self.data, KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE)
    }

    /// Highest sequence number this probe can see
    #[inline]
    pub fn sequence(&self) -> SequenceNumber {
        unpack_tag(self.packed_tag()).0
    }

    /// User key followed by the tag, without the length prefix
    pub fn internal_key(&self) -> &[u8] {
        &self.data[KEY_BLOCK_LEN_SIZE..]
    }

    pub fn encoded(&self) -> &Bytes {
        &self.data
    }
}

impl sealed::Sealed for LookupKey {}

impl KeyView for LookupKey {
    fn user_key(&self) -> &[u8] {
        LookupKey::user_key(self)
    }

    fn packed_tag(&self) -> u64 {
        LookupKey::packed_tag(self)
    }
}

impl fmt::Debug for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupKey")
            .field("user_key", &Bytes::copy_from_slice(self.user_key()))
            .field("sequence", &self.sequence())
            .finish()
    }
}
