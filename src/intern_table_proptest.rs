#![cfg(test)]

// Model-based property tests for InternTable. Kept inside the crate, like
// the unit suites, so they can exercise the whole public surface without
// feature gates.
//
// The model is a plain map from access name to resolution state, where
// canonical entries are numbered in interning order. Checked throughout:
// - one slot per name, refs stable across arbitrary later operations;
// - write-once resolution, resolver invoked at most once per name;
// - negative caching;
// - entry-identity equality/hash across aliases.

use crate::{EntryId, InternTable, Resolved, SlotRef};
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::ErrorKind;

type Model = HashMap<String, Option<Result<usize, ErrorKind>>>;

#[derive(Clone, Debug)]
enum Op {
    Lookup(String),
    ResolveNew(String),
    ResolveAlias(String, usize),
    Fail(String),
    Get(String),
}

prop_compose! {
    // Tiny alphabet so runs revisit names and produce aliases often.
    fn arb_name()(s in "[a-c]{0,3}") -> String { format!("/{s}") }
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            arb_name().prop_map(Op::Lookup),
            arb_name().prop_map(Op::ResolveNew),
            (arb_name(), any::<usize>()).prop_map(|(n, i)| Op::ResolveAlias(n, i)),
            arb_name().prop_map(Op::Fail),
            arb_name().prop_map(Op::Get),
        ],
        1..80,
    )
}

// Every ref for a given name must be the-same-reference forever.
fn note_ref(refs: &mut HashMap<String, SlotRef>, name: &str, r: SlotRef) {
    match refs.entry(name.to_string()) {
        Entry::Occupied(o) => assert!(
            r.is_same_ref(*o.get()),
            "refs for {name:?} diverged"
        ),
        Entry::Vacant(v) => {
            v.insert(r);
        }
    }
}

fn check_against_model(
    t: &InternTable<usize>,
    model: &Model,
    ids: &[EntryId],
    name: &str,
    r: SlotRef,
) {
    assert_eq!(r.name(t), name);
    let expected = *model.get(name).expect("name must be in the model");
    match (r.resolution(t), expected) {
        (None, None) => {}
        (Some(Err(a)), Some(Err(b))) => assert_eq!(a, b),
        (Some(Ok(id)), Some(Ok(num))) => {
            assert_eq!(ids[num], id);
            assert_eq!(t.entry(id), Some(&num));
        }
        (actual, expected) => {
            panic!("resolution mismatch for {name:?}: actual {actual:?}, model {expected:?}")
        }
    }
}

proptest! {
    #[test]
    fn table_matches_model(ops in arb_ops()) {
        let mut t: InternTable<usize> = InternTable::new();
        let mut model: Model = HashMap::new();
        let mut ids: Vec<EntryId> = Vec::new();
        let mut refs: HashMap<String, SlotRef> = HashMap::new();

        for op in ops {
            match op {
                Op::Lookup(n) => {
                    let r = t.lookup(&n);
                    model.entry(n.clone()).or_insert(None);
                    note_ref(&mut refs, &n, r);
                    check_against_model(&t, &model, &ids, &n, r);
                }
                Op::ResolveNew(n) => {
                    let called = Cell::new(false);
                    let next = ids.len();
                    let r = t.lookup_with(&n, |_| {
                        called.set(true);
                        Ok(Resolved::New(next))
                    });
                    let m = model.entry(n.clone()).or_insert(None);
                    if m.is_some() {
                        assert!(!called.get(), "resolver reran for resolved {n:?}");
                    } else {
                        assert!(called.get());
                        *m = Some(Ok(next));
                        ids.push(r.entry_id(&t).unwrap());
                    }
                    note_ref(&mut refs, &n, r);
                    check_against_model(&t, &model, &ids, &n, r);
                }
                Op::ResolveAlias(n, i) => {
                    if ids.is_empty() {
                        continue;
                    }
                    let num = i % ids.len();
                    let target = ids[num];
                    let called = Cell::new(false);
                    let r = t.lookup_with(&n, |_| {
                        called.set(true);
                        Ok(Resolved::Existing(target))
                    });
                    let m = model.entry(n.clone()).or_insert(None);
                    if m.is_some() {
                        assert!(!called.get(), "resolver reran for resolved {n:?}");
                    } else {
                        assert!(called.get());
                        *m = Some(Ok(num));
                    }
                    note_ref(&mut refs, &n, r);
                    check_against_model(&t, &model, &ids, &n, r);
                }
                Op::Fail(n) => {
                    let called = Cell::new(false);
                    let r = t.lookup_with(&n, |_| {
                        called.set(true);
                        Err(ErrorKind::NotFound)
                    });
                    let m = model.entry(n.clone()).or_insert(None);
                    if m.is_some() {
                        assert!(!called.get(), "resolver reran for resolved {n:?}");
                    } else {
                        assert!(called.get());
                        *m = Some(Err(ErrorKind::NotFound));
                    }
                    note_ref(&mut refs, &n, r);
                    check_against_model(&t, &model, &ids, &n, r);
                }
                Op::Get(n) => match t.get(&n) {
                    Some(r) => {
                        assert!(model.contains_key(&n), "get found unknown {n:?}");
                        note_ref(&mut refs, &n, r);
                        check_against_model(&t, &model, &ids, &n, r);
                    }
                    None => assert!(!model.contains_key(&n)),
                },
            }
        }

        // Final sweep: sizes, per-name state, and entry-identity semantics
        // over every resolved pair (aliases equal, distinct entries not).
        prop_assert_eq!(t.len(), model.len());
        prop_assert_eq!(t.entry_len(), ids.len());

        let mut resolved: Vec<(SlotRef, usize)> = Vec::new();
        for (name, state) in &model {
            let r = t.get(name).expect("model name must have a slot");
            note_ref(&mut refs, name, r);
            check_against_model(&t, &model, &ids, name, r);
            if let Some(Ok(num)) = state {
                resolved.push((r, *num));
            }
        }
        for &(r1, n1) in &resolved {
            for &(r2, n2) in &resolved {
                prop_assert_eq!(r1.same_entry(r2, &t), n1 == n2);
                if n1 == n2 {
                    prop_assert_eq!(r1.entry_hash(&t), r2.entry_hash(&t));
                }
            }
        }
    }
}
