// Ref identity and sentinel-encoding suite.
//
// Exercised here:
// - The two identity relations: is_same_ref (slot identity) versus
//   same_entry/entry_hash (entry identity), including the alias case
//   where two spellings of one directory resolve to one entry.
// - Option<SlotRef> structural guarantees (no size overhead, Copy).
// - The reserved probe markers: distinct from each other, never equal to
//   a ref minted by lookup, and handled correctly by the ProbeKey
//   equality contract.
use intern_table::{InternTable, ProbeKey, Resolved, SlotRef};
use std::io::ErrorKind;
use std::mem::size_of;

type Table = InternTable<&'static str>;

fn empty_key() -> SlotRef {
    <SlotRef as ProbeKey<Table>>::empty_key()
}

fn tombstone_key() -> SlotRef {
    <SlotRef as ProbeKey<Table>>::tombstone_key()
}

// Test: two spellings of one directory.
// Assumes: the external resolver normalizes "/a/../a" to the same
// directory as "/a" and reports it as an alias.
// Verifies: the two refs differ by is_same_ref yet are equal (and hash
// equal) by entry identity, each remembering its own access name.
#[test]
fn aliased_names_one_entry() {
    let mut t = Table::new();
    let h1 = t.lookup_with("/a", |_| Ok(Resolved::New("dir-a")));
    let e = h1.entry_id(&t).unwrap();
    let h2 = t.lookup_with("/a/../a", |_| Ok(Resolved::Existing(e)));

    assert!(!h1.is_same_ref(h2));
    assert!(h1.same_entry(h2, &t));
    assert!(h2.same_entry(h1, &t));
    assert_eq!(h1.entry_hash(&t), h2.entry_hash(&t));

    assert_eq!(h1.name(&t), "/a");
    assert_eq!(h2.name(&t), "/a/../a");
    assert_eq!(h1.entry(&t), Ok(&"dir-a"));
    assert_eq!(h2.entry(&t), Ok(&"dir-a"));
    assert_eq!(t.entry_len(), 1);
}

// Test: same-ref implies entry equality and hash equality.
// Assumes: is_same_ref is the strictly stronger relation.
// Verifies: the implication holds; the converse fails for aliases.
#[test]
fn same_ref_implies_same_entry() {
    let mut t = Table::new();
    let h1 = t.lookup_with("/b", |_| Ok(Resolved::New("dir-b")));
    let h1b = t.lookup("/b");

    assert!(h1.is_same_ref(h1b));
    assert!(h1.same_entry(h1b, &t));
    assert_eq!(h1.entry_hash(&t), h1b.entry_hash(&t));
}

// Test: distinct entries never compare equal.
// Assumes: entry identity, not name similarity, drives equality.
// Verifies: refs resolved to different entries are unequal both ways.
#[test]
fn distinct_entries_are_unequal() {
    let mut t = Table::new();
    let a = t.lookup_with("/a", |_| Ok(Resolved::New("dir-a")));
    let b = t.lookup_with("/b", |_| Ok(Resolved::New("dir-b")));

    assert!(!a.is_same_ref(b));
    assert!(!a.same_entry(b, &t));
    assert!(!b.same_entry(a, &t));
}

// Test: structural zero-overhead guarantee.
// Assumes: the const assertions in the crate already gate compilation.
// Verifies: restated at runtime so the property shows up in test output.
#[test]
fn option_ref_is_pointer_sized() {
    assert_eq!(size_of::<Option<SlotRef>>(), size_of::<SlotRef>());
    assert_eq!(size_of::<SlotRef>(), 8);
}

// Test: reserved markers never alias real refs.
// Assumes: slot storage can never mint the reserved key patterns.
// Verifies: across many slots in various states, neither marker is ever
// the-same-reference as a looked-up ref, and the markers stay distinct.
#[test]
fn markers_never_collide_with_lookups() {
    let mut t = Table::new();
    let mut refs = Vec::new();
    for i in 0..2_000 {
        refs.push(t.lookup(&format!("/p{i}")));
    }
    let ok = t.lookup_with("/ok", |_| Ok(Resolved::New("dir")));
    let bad = t.lookup_with("/bad", |_| Err(ErrorKind::NotFound));
    refs.push(ok);
    refs.push(bad);

    assert!(!empty_key().is_same_ref(tombstone_key()));
    for r in refs {
        assert!(!r.is_same_ref(empty_key()));
        assert!(!r.is_same_ref(tombstone_key()));
    }
}

// Test: ProbeKey equality over the whole key space.
// Assumes: a probing loop compares candidate buckets against markers and
// genuine keys interchangeably.
// Verifies: marker-vs-marker, marker-vs-key, and key-vs-key outcomes all
// follow the contract, with hashes agreeing on equal keys.
#[test]
fn probe_equality_contract() {
    let mut t = Table::new();
    let a = t.lookup_with("/a", |_| Ok(Resolved::New("dir-a")));
    let e = a.entry_id(&t).unwrap();
    let alias = t.lookup_with("/./a", |_| Ok(Resolved::Existing(e)));
    let b = t.lookup_with("/b", |_| Ok(Resolved::New("dir-b")));

    assert!(empty_key().eq_key(&empty_key(), &t));
    assert!(tombstone_key().eq_key(&tombstone_key(), &t));
    assert!(!empty_key().eq_key(&tombstone_key(), &t));

    assert!(!empty_key().eq_key(&a, &t));
    assert!(!a.eq_key(&empty_key(), &t));
    assert!(!tombstone_key().eq_key(&b, &t));

    assert!(a.eq_key(&alias, &t));
    assert_eq!(a.hash_key(&t), alias.hash_key(&t));
    assert!(!a.eq_key(&b, &t));
}

// Test: unresolved and failed refs inside the equality relation.
// Assumes: only successful resolutions carry entry identity.
// Verifies: such refs equal themselves (fast path) and nothing else, so
// a container holding them stays coherent.
#[test]
fn non_success_refs_in_probe_equality() {
    let mut t = Table::new();
    let u = t.lookup("/unresolved");
    let f1 = t.lookup_with("/f1", |_| Err(ErrorKind::NotFound));
    let f2 = t.lookup_with("/f2", |_| Err(ErrorKind::NotFound));
    let ok = t.lookup_with("/ok", |_| Ok(Resolved::New("dir")));

    assert!(u.eq_key(&u, &t));
    assert!(f1.eq_key(&f1, &t));
    assert!(!f1.eq_key(&f2, &t));
    assert!(!u.eq_key(&f1, &t));
    assert!(!u.eq_key(&ok, &t));
    assert!(!f1.eq_key(&ok, &t));
    assert!(!u.eq_key(&empty_key(), &t));
}
