//! SlotRef: copyable, pointer-sized ref to one lookup slot.

use core::hash::BuildHasher;
use core::mem::size_of;
use std::io::ErrorKind;

use crate::intern_table::{EntryId, InternTable, SlotKey};

/// Non-owning ref to one lookup slot in an [`InternTable`].
///
/// Minted by [`InternTable::lookup`] and valid for the table's whole life
/// (slots are never removed); every accessor takes the owning table, so a
/// ref can never outlive what it points at. A ref carries no "no value"
/// state of its own — absence is `Option<SlotRef>`, which costs nothing
/// extra (see the const assertions below).
///
/// Two refs relate in two distinct ways:
/// - [`is_same_ref`]: both came from lookups of the textually identical
///   name (slot identity). The stronger relation.
/// - [`same_entry`]: both resolve to the same canonical entry, possibly
///   via different access names that alias one resource (entry identity).
///
/// `SlotRef` deliberately implements neither `Eq` nor `Hash`: the required
/// container semantics are entry identity, which only the owning table can
/// answer. Open-addressed containers go through
/// [`ProbeKey`](crate::ProbeKey) instead.
///
/// Using a ref with a table other than the one that minted it is a logic
/// error; it may panic or address an unrelated slot, but is memory-safe.
///
/// [`is_same_ref`]: SlotRef::is_same_ref
/// [`same_entry`]: SlotRef::same_entry
#[derive(Copy, Clone, Debug)]
pub struct SlotRef(SlotKey);

// Optional refs must be free of overhead: the slot key's version niche
// gives `Option<SlotRef>` the exact layout of `SlotRef`, and both stay
// trivially copyable.
const _: () = assert!(size_of::<Option<SlotRef>>() == size_of::<SlotRef>());
const _: () = assert!(size_of::<SlotRef>() == size_of::<u64>());

#[allow(dead_code)]
const fn require_copy<T: Copy>() {}
const _: () = require_copy::<SlotRef>();
const _: () = require_copy::<Option<SlotRef>>();

impl SlotRef {
    pub(crate) fn new(k: SlotKey) -> Self {
        SlotRef(k)
    }

    pub(crate) fn raw_key(&self) -> SlotKey {
        self.0
    }

    /// The name this ref was looked up under (the slot's key). Refs that
    /// are [`same_entry`](SlotRef::same_entry)-equal may still differ here.
    pub fn name<'a, E, S>(&self, table: &'a InternTable<E, S>) -> &'a str {
        &table.slot(*self).name
    }

    /// The slot's resolution: `None` until resolved, then either the
    /// canonical entry's identity or the cached failure reason.
    pub fn resolution<E, S>(&self, table: &InternTable<E, S>) -> Option<Result<EntryId, ErrorKind>> {
        table.slot(*self).value
    }

    pub fn is_resolved<E, S>(&self, table: &InternTable<E, S>) -> bool {
        self.resolution(table).is_some()
    }

    /// Identity of the resolved entry, or the cached failure.
    ///
    /// Panics if the slot has not been resolved yet; callers that race
    /// lookup against resolution check [`is_resolved`](SlotRef::is_resolved)
    /// first.
    pub fn entry_id<E, S>(&self, table: &InternTable<E, S>) -> Result<EntryId, ErrorKind> {
        self.resolution(table)
            .expect("entry_id: slot has not been resolved")
    }

    /// Borrow the resolved canonical entry, or report the cached failure.
    ///
    /// Panics if the slot has not been resolved yet.
    pub fn entry<'a, E, S>(&self, table: &'a InternTable<E, S>) -> Result<&'a E, ErrorKind> {
        let id = self.entry_id(table)?;
        Ok(table
            .entry(id)
            .expect("entry: resolved EntryId missing from its table"))
    }

    /// True iff `other` referenced the slot in exactly the same way (same
    /// access name). Strictly stronger than [`same_entry`](SlotRef::same_entry).
    pub fn is_same_ref(&self, other: SlotRef) -> bool {
        self.0 == other.0
    }

    /// Entry-identity equality: the same ref, or two refs whose slots both
    /// resolved to the same canonical entry. Unresolved and failed slots
    /// equal only themselves; reserved probe markers equal only their own
    /// kind.
    pub fn same_entry<E, S>(&self, other: SlotRef, table: &InternTable<E, S>) -> bool {
        // Catch the easy cases: same slot, or the same reserved marker.
        if self.is_same_ref(other) {
            return true;
        }
        if self.is_reserved() || other.is_reserved() {
            return false;
        }
        match (self.resolution(table), other.resolution(table)) {
            (Some(Ok(a)), Some(Ok(b))) => a == b,
            _ => false,
        }
    }

    /// Hash over the resolution (the entry's identity), not the access
    /// name, so that refs reaching one resource through different names
    /// hash together. Consistent with [`same_entry`](SlotRef::same_entry).
    pub fn entry_hash<E, S: BuildHasher>(&self, table: &InternTable<E, S>) -> u64 {
        table.make_hash_of(&self.resolution(table))
    }
}
