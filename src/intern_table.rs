//! InternTable: resolve-once lookup slots over hash-indexed, stable-key storage.

use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{new_key_type, SlotMap};
use std::collections::hash_map::RandomState;
use std::io::ErrorKind;

use crate::slot_ref::SlotRef;

new_key_type! {
    /// Stable key of one lookup slot. Crate-internal; the public face of a
    /// slot is [`SlotRef`].
    pub struct SlotKey;

    /// Identity of one canonical entry. Every access name that resolves to
    /// the same resource resolves to the same `EntryId`.
    pub struct EntryId;
}

/// One lookup slot: the access name it is keyed by, its cached name hash,
/// and its write-once resolution. `None` means the external resolver has
/// not run for this name yet.
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) name: Box<str>,
    hash: u64,
    pub(crate) value: Option<Result<EntryId, ErrorKind>>,
}

/// Successful resolver outcome: either a brand-new canonical entry, or an
/// alias of an entry interned earlier (two names for one resource).
#[derive(Debug)]
pub enum Resolved<E> {
    New(E),
    Existing(EntryId),
}

/// Owns canonical entries and the lookup slots that cache how names
/// resolved to them.
///
/// One slot per distinct name string, created on first [`lookup`] and never
/// removed; each slot's resolution is written at most once and may be a
/// cached failure (negative cache). Canonical entries live in their own
/// storage and are shared by every slot that resolves to them.
///
/// Single-threaded by contract; callers needing concurrent access wrap the
/// table in their own lock.
///
/// [`lookup`]: InternTable::lookup
pub struct InternTable<E, S = RandomState> {
    hasher: S,
    index: HashTable<SlotKey>,
    slots: SlotMap<SlotKey, Slot>, // storage using generational keys
    entries: SlotMap<EntryId, E>,
}

impl<E> InternTable<E> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<E> Default for InternTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over lookup slots, yielding each ref with its access name.
pub struct Iter<'a> {
    it: slotmap::basic::Iter<'a, SlotKey, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SlotRef, &'a str);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, s)| (SlotRef::new(k), &*s.name))
    }
}

impl<E, S> InternTable<E, S> {
    /// Intern a canonical entry and return its identity.
    ///
    /// The table guarantees one entry per call; keeping this one-per-real-
    /// resource is the resolver's job (it reports an alias by resolving the
    /// second name to an `Existing` id instead of calling this again).
    pub fn intern_entry(&mut self, payload: E) -> EntryId {
        self.entries.insert(payload)
    }

    /// Set a slot's resolution. Write-once: resolving a slot twice is a
    /// caching bug upstream and panics rather than being papered over.
    pub fn resolve(&mut self, slot: SlotRef, value: Result<EntryId, ErrorKind>) {
        if let Ok(id) = value {
            assert!(
                self.entries.contains_key(id),
                "resolve: EntryId {:?} was not interned by this table",
                id
            );
        }
        let s = self
            .slots
            .get_mut(slot.raw_key())
            .expect("resolve: ref does not belong to this table");
        assert!(s.value.is_none(), "resolve: slot {:?} resolved twice", &*s.name);
        s.value = Some(value);
    }

    /// Borrow a canonical entry by identity.
    pub fn entry(&self, id: EntryId) -> Option<&E> {
        self.entries.get(id)
    }

    /// Mutably borrow a canonical entry by identity.
    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut E> {
        self.entries.get_mut(id)
    }

    /// Number of lookup slots (distinct names ever looked up).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of canonical entries (distinct resolved resources).
    pub fn entry_len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { it: self.slots.iter() }
    }

    pub(crate) fn slot(&self, r: SlotRef) -> &Slot {
        self.slots
            .get(r.raw_key())
            .expect("ref does not belong to this table")
    }
}

impl<E, S> InternTable<E, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            entries: SlotMap::with_key(),
        }
    }

    fn make_hash(&self, name: &str) -> u64 {
        self.hasher.hash_one(name)
    }

    pub(crate) fn make_hash_of<T: Hash>(&self, value: &T) -> u64 {
        self.hasher.hash_one(value)
    }

    /// Return the slot for `name`, creating an unresolved one if this is
    /// the first lookup of that exact string. Idempotent; never invalidates
    /// previously issued refs.
    pub fn lookup(&mut self, name: &str) -> SlotRef {
        let hash = self.make_hash(name);
        match self.index.entry(
            hash,
            |&k| self.slots.get(k).map(|s| &*s.name == name).unwrap_or(false),
            |&k| self.slots.get(k).map(|s| s.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => SlotRef::new(*o.get()),
            hashbrown::hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(Slot {
                    name: name.into(),
                    hash,
                    value: None,
                });
                let _ = v.insert(k);
                SlotRef::new(k)
            }
        }
    }

    /// Non-inserting probe: the slot for `name` if one already exists.
    pub fn get(&self, name: &str) -> Option<SlotRef> {
        let hash = self.make_hash(name);
        self.index
            .find(hash, |&k| {
                self.slots.get(k).map(|s| &*s.name == name).unwrap_or(false)
            })
            .map(|&k| SlotRef::new(k))
    }

    /// Look `name` up and, only if its slot is still unresolved, run
    /// `resolver` exactly once and store the outcome — a new entry, an
    /// alias of an existing one, or a negatively cached failure.
    ///
    /// Resolved slots (including cached failures) short-circuit without
    /// invoking `resolver`. If `resolver` panics, the slot is left
    /// unresolved and a later call may retry.
    pub fn lookup_with<F>(&mut self, name: &str, resolver: F) -> SlotRef
    where
        F: FnOnce(&str) -> Result<Resolved<E>, ErrorKind>,
    {
        let r = self.lookup(name);
        if self.slot(r).value.is_some() {
            return r;
        }
        let value = match resolver(name) {
            Ok(Resolved::New(payload)) => Ok(self.entries.insert(payload)),
            Ok(Resolved::Existing(id)) => {
                assert!(
                    self.entries.contains_key(id),
                    "lookup_with: EntryId {:?} was not interned by this table",
                    id
                );
                Ok(id)
            }
            Err(kind) => Err(kind),
        };
        self.slots[r.raw_key()].value = Some(value);
        r
    }
}
