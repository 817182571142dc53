//! Comparators
//!
//! Ordering used by the memtable.
//!
//! ## Internal Key Order
//! 1. User key ascending (user comparator, bytewise by default)
//! 2. Packed tag descending: newer sequence first, then higher value type
//!
//! A lookup probe carries tag byte `0xFF`, so it lands right before the
//! first record of its user key that it is allowed to see.

use std::cmp::Ordering;

use crate::format::{sealed, InternalKey, KeyView, LookupKey};

/// Total order over raw user keys
pub trait Comparator: Send + Sync {
    /// Stable name, used to detect comparator mismatches
    fn name(&self) -> &'static str;

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

/// Unsigned lexicographic byte order
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn name(&self) -> &'static str {
        "atlaskv.BytewiseComparator"
    }

    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// Orders internal keys on top of a user key comparator
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalKeyComparator<C = BytewiseComparator> {
    user_comparator: C,
}

impl<C: Comparator> InternalKeyComparator<C> {
    pub fn new(user_comparator: C) -> Self {
        Self { user_comparator }
    }

    pub fn user_comparator(&self) -> &C {
        &self.user_comparator
    }

    /// Compare two keys of any supported shape
    ///
    /// Returns `Equal` only when user key, sequence and value type all match.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: KeyView + ?Sized,
        B: KeyView + ?Sized,
    {
        self.user_comparator
            .compare(a.user_key(), b.user_key())
            .then_with(|| b.packed_tag().cmp(&a.packed_tag()))
    }
}

/// Bytewise comparison of two user keys
#[inline]
pub fn compare_user_keys(a: &[u8], b: &[u8]) -> Ordering {
    BytewiseComparator.compare(a, b)
}

/// Internal key comparison with the bytewise user comparator
#[inline]
pub fn compare_internal_keys<A, B>(a: &A, b: &B) -> Ordering
where
    A: KeyView + ?Sized,
    B: KeyView + ?Sized,
{
    InternalKeyComparator::new(BytewiseComparator).compare(a, b)
}

/// Map an ordering to `-1`, `0` or `1`
pub fn sign(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Key stored in ordered containers
///
/// Containers only ever hold `Record`s; `Probe` exists so a lookup key can
/// be used as a range bound against them.
#[derive(Debug, Clone)]
pub enum TableKey {
    Record(InternalKey),
    Probe(LookupKey),
}

impl TableKey {
    /// The record, if this is not a probe
    pub fn as_record(&self) -> Option<&InternalKey> {
        match self {
            TableKey::Record(record) => Some(record),
            TableKey::Probe(_) => None,
        }
    }
}

impl From<InternalKey> for TableKey {
    fn from(record: InternalKey) -> Self {
        TableKey::Record(record)
    }
}

impl From<LookupKey> for TableKey {
    fn from(probe: LookupKey) -> Self {
        TableKey::Probe(probe)
    }
}

impl sealed::Sealed for TableKey {}

impl KeyView for TableKey {
    fn user_key(&self) -> &[u8] {
        match self {
            TableKey::Record(record) => record.user_key(),
            TableKey::Probe(probe) => probe.user_key(),
        }
    }

    fn packed_tag(&self) -> u64 {
        match self {
            TableKey::Record(record) => record.packed_tag(),
            TableKey::Probe(probe) => probe.packed_tag(),
        }
    }
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TableKey {}

impl PartialOrd for TableKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TableKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_internal_keys(self, other)
    }
}
