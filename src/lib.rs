//! # AtlasKV internal key format
//!
//! Encoding and ordering of memtable entries:
//! - One immutable buffer per write (user key, sequence, value type, value)
//! - O(1) field access by offset arithmetic
//! - Lookup probes for "newest visible version" point reads
//! - Internal key comparator: user key ascending, sequence descending
//!
//! ## Architecture Overview
//!
//! ```text
//!        write path                          read path
//!            │                                   │
//! ┌──────────▼──────────┐             ┌──────────▼──────────┐
//! │    Record Codec     │             │ Lookup Key Builder  │
//! │   (InternalKey)     │             │    (LookupKey)      │
//! └──────────┬──────────┘             └──────────┬──────────┘
//!            │ insert                            │ seek
//!            ▼                                   ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                       MemTable                          │
//! │            (BTreeSet<TableKey> + RwLock)                │
//! └────────────────────────────┬────────────────────────────┘
//!                              │ ordered by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   Internal Key Comparator  →  User Key Comparator       │
//! └─────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod comparator;
pub mod memtable;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KeyFormatError, Result};
pub use config::Config;
pub use format::{
    InternalKey, KeyEncoder, KeyView, LookupKey, ParsedInternalKey, SequenceNumber, ValueType,
    MAX_SEQUENCE,
};
pub use comparator::{
    compare_internal_keys, compare_user_keys, BytewiseComparator, Comparator,
    InternalKeyComparator, TableKey,
};
pub use memtable::{MemTable, MemTableEntry};

// =============================================================================
// Version Info
// =============================================================================

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
