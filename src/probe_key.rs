//! ProbeKey: open-addressed key contract with reserved bucket markers.
//!
//! Open-addressed tables in the quadratic-probing family mark vacant and
//! deleted buckets in-line by reserving two key values, instead of spending
//! a discriminant per bucket. This module defines that contract and
//! implements it for [`SlotRef`], encoding both markers as slot-key bit
//! patterns the backing storage can never mint.

use core::hash::BuildHasher;
use slotmap::KeyData;

use crate::intern_table::{InternTable, SlotKey};
use crate::slot_ref::SlotRef;

// Reserved slot-key bit patterns (slot indices u32::MAX and u32::MAX - 1).
// SlotMap caps its element count below 2^32 - 2, so a live key's index is
// always smaller than both and neither marker can collide with a ref minted
// by `lookup`.
const EMPTY_BITS: u64 = u64::MAX;
const TOMBSTONE_BITS: u64 = u64::MAX - 1;

fn reserved(bits: u64) -> SlotRef {
    SlotRef::new(SlotKey::from(KeyData::from_ffi(bits)))
}

impl SlotRef {
    /// True for the two reserved bucket markers. Only the probing contract
    /// below and [`same_entry`](SlotRef::same_entry) consult this.
    pub(crate) fn is_reserved(&self) -> bool {
        self.is_same_ref(reserved(EMPTY_BITS)) || self.is_same_ref(reserved(TOMBSTONE_BITS))
    }
}

/// Key contract for open-addressed containers that reserve two marker
/// values for vacant and deleted buckets.
///
/// Hashing and equality take the context `Cx` the keys were minted from:
/// for [`SlotRef`] the key value alone cannot answer entry identity, only
/// its owning [`InternTable`] can. Markers exist purely for the container's
/// bookkeeping and are the only key values constructible without a table.
pub trait ProbeKey<Cx: ?Sized>: Copy {
    /// Marker stored in never-used buckets.
    fn empty_key() -> Self;

    /// Marker stored in buckets whose key was deleted.
    fn tombstone_key() -> Self;

    /// True iff `self` is one of the two reserved markers. Probing uses
    /// this so a marker is never mistaken for a genuine key or vice versa.
    fn is_reserved_key(&self) -> bool;

    /// Hash of a genuine key. Must not be called on a reserved marker.
    fn hash_key(&self, cx: &Cx) -> u64;

    /// Equality used during probing. Total: genuine keys compare by their
    /// semantics, markers equal only their own kind.
    fn eq_key(&self, other: &Self, cx: &Cx) -> bool;
}

impl<E, S: BuildHasher> ProbeKey<InternTable<E, S>> for SlotRef {
    fn empty_key() -> Self {
        reserved(EMPTY_BITS)
    }

    fn tombstone_key() -> Self {
        reserved(TOMBSTONE_BITS)
    }

    fn is_reserved_key(&self) -> bool {
        self.is_reserved()
    }

    fn hash_key(&self, cx: &InternTable<E, S>) -> u64 {
        debug_assert!(!self.is_reserved(), "hash_key on a reserved marker");
        self.entry_hash(cx)
    }

    fn eq_key(&self, other: &Self, cx: &InternTable<E, S>) -> bool {
        // Fast paths (both empty, both tombstone, same slot) and the
        // marker checks are folded into same_entry.
        self.same_entry(*other, cx)
    }
}
