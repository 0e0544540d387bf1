//! intern-table: resolve-once name interning with identity-hashed entry refs.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let a file-manager-style client resolve each name at most once
//!   and pass around cheap, copyable refs to the result, in safe,
//!   verifiable layers.
//! - Layers:
//!   - InternTable<E, S>: owns lookup slots (one per distinct name, found
//!     through a hash index with cached hashes) and canonical entries (one
//!     per resolved resource); slots are write-once and may cache a
//!     failure.
//!   - SlotRef: pointer-sized `Copy` ref to one slot; every accessor takes
//!     the owning table, so validity is a borrow, not a runtime check.
//!   - ProbeKey: the key contract open-addressed containers need (empty
//!     and tombstone markers, context-aware hash/equality), implemented
//!     for SlotRef with entry-identity semantics.
//!
//! Constraints
//! - Single-threaded: no internal synchronization; callers lock around the
//!   table if they share it.
//! - No deletion: slots and entries live as long as the table
//!   (session-scoped caching), so refs never dangle.
//! - Stable refs: inserting new slots never invalidates issued refs; the
//!   storage hands out stable keys rather than addresses into a
//!   reallocating array.
//! - Zero-overhead optionals: `Option<SlotRef>` is the size of `SlotRef`
//!   (const-asserted), via the key's version niche.
//!
//! Identity vs. equality
//! - `is_same_ref` is slot identity: two refs from lookups of the same
//!   exact string. `same_entry` (and the ProbeKey impl) is entry identity:
//!   different access names that resolved to one canonical entry compare
//!   equal and hash together. Containers keyed by refs need entry
//!   identity, which is why SlotRef implements neither `Eq` nor `Hash`
//!   directly.
//!
//! Error model
//! - A failed resolution is data: the slot caches the `io::ErrorKind` and
//!   every later lookup of that name sees it without re-running the
//!   resolver (negative cache).
//! - Resolving a slot twice, or dereferencing an unresolved ref, is a
//!   contract violation and panics.
//!
//! Notes and non-goals
//! - How a name resolves (directory scanning, path normalization, VFS
//!   overlays) is the caller's business; it is injected as a closure into
//!   `lookup_with`.
//! - No hash-table algorithm ships here; `ProbeKey` is only the key-side
//!   contract such a container consumes.
//! - Canonical entries carry payload only, never the access name; the
//!   name belongs to the slot, since multiple names may alias one entry.

mod intern_table;
mod intern_table_proptest;
mod probe_key;
mod slot_ref;

// Public surface
pub use intern_table::{EntryId, InternTable, Iter, Resolved};
pub use probe_key::ProbeKey;
pub use slot_ref::SlotRef;
