//! MemTable implementation
//!
//! BTreeSet of internal keys with RwLock for concurrency.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::MemTableEntry;
use crate::comparator::TableKey;
use crate::config::Config;
use crate::error::Result;
use crate::format::{
    InternalKey, KeyEncoder, LookupKey, SequenceNumber, ValueType, MAX_SEQUENCE,
};

/// In-memory table for recent writes
pub struct MemTable {
    /// Records ordered by the internal key comparator
    data: RwLock<BTreeSet<TableKey>>,

    /// Encoder carrying the configured size limits
    encoder: KeyEncoder,

    /// Flush threshold in bytes
    size_limit: usize,

    /// Approximate size in bytes (sum of encoded record lengths)
    size: AtomicUsize,

    /// Number of records, counting every version
    entry_count: AtomicUsize,
}

impl MemTable {
    /// Create a new empty MemTable with default limits
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create a new empty MemTable using `config`
    pub fn with_config(config: &Config) -> Self {
        Self {
            data: RwLock::new(BTreeSet::new()),
            encoder: KeyEncoder::new(config),
            size_limit: config.memtable_size_limit,
            size: AtomicUsize::new(0),
            entry_count: AtomicUsize::new(0),
        }
    }

    /// Encode and insert one write (write lock)
    ///
    /// Returns the new approximate size. Writing the same user key, sequence
    /// and value type twice replaces the earlier record.
    pub fn add(
        &self,
        sequence: SequenceNumber,
        value_type: ValueType,
        key: &[u8],
        value: &[u8],
    ) -> Result<usize> {
        let record = self.encoder.encode(sequence, value_type, key, value)?;
        let record_len = record.encoded_len();

        trace!(sequence, ?value_type, key_len = key.len(), value_len = value.len(), "memtable add");

        let mut data = self.data.write();
        match data.replace(TableKey::Record(record)) {
            Some(TableKey::Record(old)) => {
                self.size.fetch_sub(old.encoded_len(), Ordering::Relaxed);
            }
            Some(TableKey::Probe(_)) | None => {
                self.entry_count.fetch_add(1, Ordering::Relaxed);
            }
        }
        let new_size = self.size.fetch_add(record_len, Ordering::Relaxed) + record_len;

        Ok(new_size)
    }

    /// Put a key-value pair at `sequence`
    pub fn put(&self, sequence: SequenceNumber, key: &[u8], value: &[u8]) -> Result<usize> {
        self.add(sequence, ValueType::Value, key, value)
    }

    /// Delete a key at `sequence` (inserts tombstone)
    pub fn delete(&self, sequence: SequenceNumber, key: &[u8]) -> Result<usize> {
        self.add(sequence, ValueType::Deletion, key, &[])
    }

    /// Get the newest version of a key (read lock)
    pub fn get(&self, key: &[u8]) -> Option<MemTableEntry> {
        self.get_at(key, MAX_SEQUENCE)
    }

    /// Get the newest version of a key with sequence `<= snapshot`
    pub fn get_at(&self, key: &[u8], snapshot: SequenceNumber) -> Option<MemTableEntry> {
        // Keys past the size limit can't be stored, so a failed probe is a miss.
        let probe = TableKey::Probe(LookupKey::at_snapshot(key, snapshot.min(MAX_SEQUENCE)).ok()?);

        let data = self.data.read();
        let record = data.range::<TableKey, _>(&probe..).next()?.as_record()?;
        if record.user_key() != key {
            return None;
        }

        Some(match record.value_type() {
            ValueType::Value => MemTableEntry::Value(record.parse().value),
            ValueType::Deletion => MemTableEntry::Tombstone,
        })
    }

    /// Get approximate size in bytes
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Get entry count (every version counts)
    pub fn entry_count(&self) -> usize {
        self.entry_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Check if the size has reached the configured limit
    pub fn should_flush(&self) -> bool {
        self.size() >= self.size_limit
    }

    /// Get an iterator over all records
    ///
    /// Returns records in internal key order: user key ascending, newest
    /// version first. The iterator works on a snapshot taken under the read
    /// lock, so later writes are not visible through it.
    pub fn iter(&self) -> MemTableIterator {
        let records: Vec<InternalKey> = self
            .data
            .read()
            .iter()
            .filter_map(|key| key.as_record().cloned())
            .collect();

        MemTableIterator {
            inner: records.into_iter(),
        }
    }

    /// Clear all entries (after successful flush)
    pub fn clear(&self) {
        let mut data = self.data.write();
        debug!(entries = data.len(), size = self.size(), "clearing memtable");
        data.clear();
        self.size.store(0, Ordering::Relaxed);
        self.entry_count.store(0, Ordering::Relaxed);
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over MemTable records
pub struct MemTableIterator {
    inner: std::vec::IntoIter<InternalKey>,
}

impl Iterator for MemTableIterator {
    type Item = InternalKey;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MemTableIterator {}
