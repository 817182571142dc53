//! MemTable Module
//!
//! In-memory ordered set of internal key records.
//!
//! ## Responsibilities
//! - Keep every version of every key, ordered by the internal key comparator
//! - Point reads at the latest version or at a snapshot sequence
//! - Single-writer/multi-reader access pattern
//! - Track size for flush triggers
//!
//! ## Data Structure Choice
//! `BTreeSet<TableKey>` wrapped in a parking_lot RwLock:
//! - The comparator gives newest-first order within a user key, so a
//!   lookup is one range seek from a probe key
//! - Records are `Bytes`, so iteration hands out cheap clones

mod table;

pub use table::{MemTable, MemTableIterator};

use bytes::Bytes;

/// Result of a point lookup in the MemTable
#[derive(Debug, Clone, PartialEq)]
pub enum MemTableEntry {
    /// A live value
    Value(Bytes),

    /// A tombstone (deleted key)
    Tombstone,
}
