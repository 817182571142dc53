//! Tests for internal key record encoding and decoding
//!
//! These tests verify:
//! - Field accessors return exactly what was encoded
//! - Byte layout and record sizes
//! - Boundary sequences, empty keys and values
//! - Size limit rejection at the encode boundary
//! - Checked decoding of foreign buffers

use atlaskv_format::format::{MAX_KEY_SIZE, MAX_VALUE_SIZE, MIN_RECORD_SIZE};
use atlaskv_format::{Config, InternalKey, KeyEncoder, KeyFormatError, ValueType, MAX_SEQUENCE};
use bytes::Bytes;

// =============================================================================
// Accessor Tests
// =============================================================================

#[test]
fn test_encode_value_accessors() {
    let record = InternalKey::encode(3, ValueType::Value, b"x", b"hello").unwrap();

    assert_eq!(record.user_key(), b"x");
    assert_eq!(record.user_value(), b"hello");
    assert_eq!(record.sequence(), 3);
    assert_eq!(record.value_type(), ValueType::Value);
    assert!(!record.is_deletion());
}

#[test]
fn test_encode_deletion_accessors() {
    let record = InternalKey::encode(5, ValueType::Deletion, b"x", b"").unwrap();

    assert_eq!(record.user_key(), b"x");
    assert!(record.user_value().is_empty());
    assert_eq!(record.sequence(), 5);
    assert_eq!(record.value_type(), ValueType::Deletion);
    assert!(record.is_deletion());
}

#[test]
fn test_parse_matches_accessors() {
    let record = InternalKey::encode(77, ValueType::Value, b"user", b"payload").unwrap();
    let parsed = record.parse();

    assert_eq!(parsed.user_key.as_ref(), record.user_key());
    assert_eq!(parsed.value.as_ref(), record.user_value());
    assert_eq!(parsed.sequence, record.sequence());
    assert_eq!(parsed.value_type, record.value_type());
}

#[test]
fn test_binary_key_and_value() {
    let key = [0x00, 0xFF, 0x10, 0x00];
    let value = [0xFF; 32];
    let record = InternalKey::encode(1, ValueType::Value, &key, &value).unwrap();

    assert_eq!(record.user_key(), &key);
    assert_eq!(record.user_value(), &value);
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encoded_length() {
    let record = InternalKey::encode(1, ValueType::Value, b"abc", b"defgh").unwrap();
    assert_eq!(record.encoded_len(), 4 + 3 + 8 + 4 + 5);
}

#[test]
fn test_header_fields_little_endian() {
    let record = InternalKey::encode(0x0102_0304, ValueType::Value, b"ab", b"v").unwrap();
    let bytes = record.encoded();

    // key block = len("ab") + 8
    assert_eq!(&bytes[0..4], &[10, 0, 0, 0]);
    assert_eq!(&bytes[4..6], b"ab");
    // tag = seq << 8 | 1
    assert_eq!(&bytes[6..14], &[0x01, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00]);
    assert_eq!(&bytes[14..18], &[1, 0, 0, 0]);
    assert_eq!(&bytes[18..], b"v");
}

#[test]
fn test_minimum_record_size() {
    let record = InternalKey::encode(0, ValueType::Deletion, b"", b"").unwrap();

    assert_eq!(record.encoded_len(), MIN_RECORD_SIZE);
    assert_eq!(record.encoded_len(), 16);
    assert!(record.user_key().is_empty());
    assert!(record.user_value().is_empty());
    assert_eq!(record.sequence(), 0);
}

#[test]
fn test_empty_key_with_value() {
    let record = InternalKey::encode(12, ValueType::Value, b"", b"value").unwrap();

    assert!(record.user_key().is_empty());
    assert_eq!(record.user_value(), b"value");
    assert_eq!(record.sequence(), 12);
}

// =============================================================================
// Sequence Boundary Tests
// =============================================================================

#[test]
fn test_sequence_boundaries() {
    for seq in [0, 1, 255, 256, 1 << 32, MAX_SEQUENCE] {
        let record = InternalKey::encode(seq, ValueType::Value, b"k", b"v").unwrap();
        assert_eq!(record.sequence(), seq);
        assert_eq!(record.value_type(), ValueType::Value);
    }
}

#[test]
fn test_max_sequence_does_not_bleed_into_type() {
    let record = InternalKey::encode(MAX_SEQUENCE, ValueType::Deletion, b"k", b"").unwrap();

    assert_eq!(record.sequence(), MAX_SEQUENCE);
    assert_eq!(record.value_type(), ValueType::Deletion);
    assert_eq!(record.packed_tag(), u64::MAX - 0xFF);
}

#[test]
fn test_sequence_overflow_rejected() {
    let result = InternalKey::encode(MAX_SEQUENCE + 1, ValueType::Value, b"k", b"v");
    assert_eq!(result.unwrap_err(), KeyFormatError::SequenceOverflow(MAX_SEQUENCE + 1));
}

// =============================================================================
// Size Limit Tests
// =============================================================================

#[test]
fn test_field_capacity_constants() {
    assert_eq!(MAX_KEY_SIZE, u32::MAX as usize - 8);
    assert_eq!(MAX_VALUE_SIZE, u32::MAX as usize);
}

#[test]
fn test_key_too_large_rejected() {
    let config = Config::builder().max_key_size(16).build().unwrap();
    let encoder = KeyEncoder::new(&config);

    let result = encoder.encode(1, ValueType::Value, &[b'k'; 17], b"v");
    assert!(matches!(
        result,
        Err(KeyFormatError::KeyTooLarge { size: 17, max: 16 })
    ));
}

#[test]
fn test_value_too_large_rejected() {
    let config = Config::builder().max_value_size(64).build().unwrap();
    let encoder = KeyEncoder::new(&config);

    assert!(encoder.encode(1, ValueType::Value, b"k", &[0u8; 64]).is_ok());
    let result = encoder.encode(1, ValueType::Value, b"k", &[0u8; 65]);
    assert!(matches!(
        result,
        Err(KeyFormatError::ValueTooLarge { size: 65, max: 64 })
    ));
}

#[test]
fn test_large_value() {
    let large_value = vec![0xAB; 1024 * 1024]; // 1 MB value
    let record = InternalKey::encode(999, ValueType::Value, b"big_key", &large_value).unwrap();

    assert_eq!(record.user_key(), b"big_key");
    assert_eq!(record.user_value(), large_value.as_slice());
    assert_eq!(record.value_size(), large_value.len());
}

// =============================================================================
// Checked Decode Tests
// =============================================================================

#[test]
fn test_from_encoded_accepts_encoder_output() {
    let record = InternalKey::encode(42, ValueType::Value, b"key", b"value").unwrap();
    let decoded = InternalKey::from_encoded(record.encoded().clone()).unwrap();

    assert_eq!(decoded.user_key(), b"key");
    assert_eq!(decoded.user_value(), b"value");
    assert_eq!(decoded.sequence(), 42);
}

#[test]
fn test_from_encoded_rejects_short_buffer() {
    let result = InternalKey::from_encoded(Bytes::from_static(&[0u8; 10]));
    assert!(matches!(result, Err(KeyFormatError::Corruption(_))));
}

#[test]
fn test_from_encoded_rejects_truncated_value() {
    let record = InternalKey::encode(1, ValueType::Value, b"key", b"value").unwrap();
    let truncated = record.encoded().slice(..record.encoded_len() - 2);

    let result = InternalKey::from_encoded(truncated);
    assert!(matches!(result, Err(KeyFormatError::Corruption(_))));
}

#[test]
fn test_from_encoded_rejects_oversized_key_block() {
    let record = InternalKey::encode(1, ValueType::Value, b"key", b"").unwrap();
    let mut bytes = record.encoded().to_vec();
    bytes[0..4].copy_from_slice(&1000u32.to_le_bytes());

    let result = InternalKey::from_encoded(Bytes::from(bytes));
    assert!(matches!(result, Err(KeyFormatError::Corruption(_))));
}

#[test]
fn test_from_encoded_rejects_undersized_key_block() {
    let mut bytes = vec![0u8; 16];
    bytes[0..4].copy_from_slice(&4u32.to_le_bytes());

    let result = InternalKey::from_encoded(Bytes::from(bytes));
    assert!(matches!(result, Err(KeyFormatError::Corruption(_))));
}

#[test]
fn test_from_encoded_rejects_probe_tag_byte() {
    let record = InternalKey::encode(1, ValueType::Value, b"k", b"").unwrap();
    let mut bytes = record.encoded().to_vec();
    // tag starts right after the 1-byte key
    bytes[5] = 0xFF;

    let result = InternalKey::from_encoded(Bytes::from(bytes));
    assert_eq!(result.unwrap_err(), KeyFormatError::InvalidValueType(0xFF));
}
