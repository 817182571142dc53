//! Internal key records
//!
//! A record is the encoded form of one versioned write. Every accessor
//! reads the key block length once and derives the other offsets from it.

use std::cmp::Ordering;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use super::{
    check_key_size, check_sequence, pack_tag, read_u32_le, read_u64_le, sealed, unpack_tag,
    KeyView, SequenceNumber, ValueType, KEY_BLOCK_LEN_SIZE, MIN_RECORD_SIZE, TAG_SIZE,
    VALUE_LEN_SIZE,
};
use crate::comparator::compare_internal_keys;
use crate::config::Config;
use crate::error::{KeyFormatError, Result};

/// Encodes records under configurable size limits
#[derive(Debug, Clone)]
pub struct KeyEncoder {
    max_key_size: usize,
    max_value_size: usize,
}

impl KeyEncoder {
    /// Create an encoder using the limits from `config`
    pub fn new(config: &Config) -> Self {
        Self {
            max_key_size: config.max_key_size,
            max_value_size: config.max_value_size,
        }
    }

    /// Encode one write into a record
    ///
    /// Format: key_block (4) + user_key + tag (8) + value_len (4) + value
    pub fn encode(
        &self,
        sequence: SequenceNumber,
        value_type: ValueType,
        user_key: &[u8],
        value: &[u8],
    ) -> Result<InternalKey> {
        check_sequence(sequence)?;

        if let Err(e) = check_key_size(user_key.len(), self.max_key_size) {
            debug!(key_len = user_key.len(), max = self.max_key_size, "rejecting oversized key");
            return Err(e);
        }

        if value.len() > self.max_value_size {
            debug!(value_len = value.len(), max = self.max_value_size, "rejecting oversized value");
            return Err(KeyFormatError::ValueTooLarge {
                size: value.len(),
                max: self.max_value_size,
            });
        }

        let key_block_size = user_key.len() + TAG_SIZE;
        let mut buf = BytesMut::with_capacity(
            KEY_BLOCK_LEN_SIZE + key_block_size + VALUE_LEN_SIZE + value.len(),
        );
        buf.put_u32_le(key_block_size as u32);
        buf.put_slice(user_key);
        buf.put_u64_le(pack_tag(sequence, value_type as u8));
        buf.put_u32_le(value.len() as u32);
        buf.put_slice(value);

        Ok(InternalKey { data: buf.freeze() })
    }
}

impl Default for KeyEncoder {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// An encoded write: user key, sequence number, value type and value
///
/// Equality and ordering follow the internal key comparator, so two
/// records with the same user key and tag are equal regardless of value.
#[derive(Clone)]
pub struct InternalKey {
    data: Bytes,
}

impl InternalKey {
    /// Encode a record with the default (field capacity) limits
    pub fn encode(
        sequence: SequenceNumber,
        value_type: ValueType,
        user_key: &[u8],
        value: &[u8],
    ) -> Result<Self> {
        KeyEncoder::default().encode(sequence, value_type, user_key, value)
    }

    /// Wrap a buffer that did not come from the encoder
    ///
    /// Validates the length fields and value type byte. Use this for
    /// buffers read back from outside the process; records built with
    /// [`InternalKey::encode`] never need it.
    pub fn from_encoded(data: Bytes) -> Result<Self> {
        if data.len() < MIN_RECORD_SIZE {
            warn!(len = data.len(), "internal key shorter than minimum record");
            return Err(KeyFormatError::Corruption(format!(
                "record too short: expected at least {} bytes, got {}",
                MIN_RECORD_SIZE,
                data.len()
            )));
        }

        let key_block_size = read_u32_le(&data, 0) as usize;
        if key_block_size < TAG_SIZE {
            return Err(KeyFormatError::Corruption(format!(
                "key block size {} smaller than tag",
                key_block_size
            )));
        }

        let value_len_offset = KEY_BLOCK_LEN_SIZE + key_block_size;
        if value_len_offset + VALUE_LEN_SIZE > data.len() {
            warn!(key_block_size, len = data.len(), "key block overruns record");
            return Err(KeyFormatError::Corruption(format!(
                "key block size {} overruns record of {} bytes",
                key_block_size,
                data.len()
            )));
        }

        let value_size = read_u32_le(&data, value_len_offset) as usize;
        let actual = data.len() - value_len_offset - VALUE_LEN_SIZE;
        if value_size != actual {
            warn!(value_size, actual, "value size mismatch");
            return Err(KeyFormatError::Corruption(format!(
                "value size {} does not match remaining {} bytes",
                value_size, actual
            )));
        }

        let (_, tag_byte) = unpack_tag(read_u64_le(&data, value_len_offset - TAG_SIZE));
        ValueType::try_from(tag_byte)?;

        Ok(Self { data })
    }

    #[inline]
    fn key_block_size(&self) -> usize {
        read_u32_le(&self.data, 0) as usize
    }

    /// Raw user key bytes
    #[inline]
    pub fn user_key(&self) -> &[u8] {
        let key_block_size = self.key_block_size();
        &self.data[KEY_BLOCK_LEN_SIZE..KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE]
    }

    /// Value bytes (empty for deletions)
    #[inline]
    pub fn user_value(&self) -> &[u8] {
        let key_block_size = self.key_block_size();
        &self.data[KEY_BLOCK_LEN_SIZE + key_block_size + VALUE_LEN_SIZE..]
    }

    /// Packed `sequence << 8 | value type` word
    #[inline]
    pub fn packed_tag(&self) -> u64 {
        let key_block_size = self.key_block_size();
        read_u64_le(&self.data, KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE)
    }

    /// Whether this record is a value or a tombstone
    #[inline]
    pub fn value_type(&self) -> ValueType {
        // The encoder only ever writes 0 or 1 here.
        match unpack_tag(self.packed_tag()).1 {
            0x00 => ValueType::Deletion,
            _ => ValueType::Value,
        }
    }

    #[inline]
    pub fn sequence(&self) -> SequenceNumber {
        unpack_tag(self.packed_tag()).0
    }

    /// Length of the value as recorded in the value size field
    #[inline]
    pub fn value_size(&self) -> usize {
        read_u32_le(&self.data, KEY_BLOCK_LEN_SIZE + self.key_block_size()) as usize
    }

    /// User key followed by the tag, without the length prefix
    #[inline]
    pub fn internal_key(&self) -> &[u8] {
        let key_block_size = self.key_block_size();
        &self.data[KEY_BLOCK_LEN_SIZE..KEY_BLOCK_LEN_SIZE + key_block_size]
    }

    pub fn is_deletion(&self) -> bool {
        self.value_type() == ValueType::Deletion
    }

    /// The whole encoded buffer
    pub fn encoded(&self) -> &Bytes {
        &self.data
    }

    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Split the record into separate fields
    ///
    /// The returned key and value share the record's allocation.
    pub fn parse(&self) -> ParsedInternalKey {
        let key_block_size = self.key_block_size();
        let tag = read_u64_le(&self.data, KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE);
        let (sequence, _) = unpack_tag(tag);

        ParsedInternalKey {
            user_key: self
                .data
                .slice(KEY_BLOCK_LEN_SIZE..KEY_BLOCK_LEN_SIZE + key_block_size - TAG_SIZE),
            sequence,
            value_type: self.value_type(),
            value: self
                .data
                .slice(KEY_BLOCK_LEN_SIZE + key_block_size + VALUE_LEN_SIZE..),
        }
    }
}

impl sealed::Sealed for InternalKey {}

impl KeyView for InternalKey {
    fn user_key(&self) -> &[u8] {
        InternalKey::user_key(self)
    }

    fn packed_tag(&self) -> u64 {
        InternalKey::packed_tag(self)
    }
}

impl AsRef<[u8]> for InternalKey {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq for InternalKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for InternalKey {}

impl PartialOrd for InternalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_internal_keys(self, other)
    }
}

impl fmt::Debug for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parsed = self.parse();
        f.debug_struct("InternalKey")
            .field("user_key", &parsed.user_key)
            .field("sequence", &parsed.sequence)
            .field("value_type", &parsed.value_type)
            .field("value", &parsed.value)
            .finish()
    }
}

/// A record split into its logical fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInternalKey {
    pub user_key: Bytes,
    pub sequence: SequenceNumber,
    pub value_type: ValueType,
    pub value: Bytes,
}

impl ParsedInternalKey {
    /// Re-encode the fields into a record
    pub fn encode(&self) -> Result<InternalKey> {
        InternalKey::encode(self.sequence, self.value_type, &self.user_key, &self.value)
    }
}
