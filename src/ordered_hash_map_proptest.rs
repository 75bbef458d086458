#![cfg(test)]

// Property tests for OrderedHashMap kept inside the crate so they do not
// require feature gates to access internal modules.

use crate::OrderedHashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length. Small pools
// make duplicate inserts and absent removals common.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Reference model: the mapping in a std HashMap plus an insertion-order key
// list kept in lockstep. First-insert-wins means a key enters the order at
// most once and leaves it only on removal.
#[derive(Default)]
struct Model {
    map: HashMap<Key, i32>,
    order: Vec<Key>,
}

impl Model {
    fn insert(&mut self, k: Key, v: i32) -> bool {
        if self.map.contains_key(&k) {
            return false;
        }
        self.order.push(k.clone());
        self.map.insert(k, v);
        true
    }

    fn remove(&mut self, k: &Key) -> Option<i32> {
        let v = self.map.remove(k)?;
        self.order.retain(|o| o != k);
        Some(v)
    }

    fn pairs(&self) -> Vec<(Key, i32)> {
        self.order.iter().map(|k| (k.clone(), self.map[k])).collect()
    }
}

// State-machine equivalence against the model. Invariants exercised across
// random operation sequences:
// - `insert` returns true exactly when the key was absent; a duplicate
//   keeps the first value and the entry's place in the order.
// - `get_or_insert_with` runs its closure exactly on misses and resolves
//   to the first-inserted value on hits.
// - `remove` returns the model's value and erases only that key.
// - `iter` yields every live entry exactly once, in first-insertion order.
// - `len`/`is_empty` parity with the model after each op.
fn run_scenario<S: BuildHasher>(
    mut sut: OrderedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    let default_calls = Rc::new(Cell::new(0));

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let inserted = sut.insert(k.clone(), v);
                prop_assert_eq!(inserted, model.insert(k.clone(), v));
                prop_assert_eq!(sut.get(&k), model.map.get(&k));
            }
            OpI::GetOrInsert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.map.contains_key(&k);
                let counter = default_calls.clone();
                let before = counter.get();
                let got = *sut.get_or_insert_with(k.clone(), move || {
                    counter.set(counter.get() + 1);
                    v
                });
                if already {
                    prop_assert_eq!(default_calls.get(), before, "closure must not run on a hit");
                    prop_assert_eq!(got, model.map[&k], "hit must resolve to the first value");
                } else {
                    prop_assert_eq!(default_calls.get(), before + 1, "closure runs once on a miss");
                    prop_assert_eq!(got, v);
                    model.insert(k, v);
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(sut.get(&k).is_none());
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.map.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.map.contains_key(&k));
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.map.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(&k), model.map.get_mut(&k)) {
                    (Some(v), Some(mv)) => {
                        *v = v.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "presence must match the model"),
                }
            }
            OpI::Iterate => {
                let got: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(got, model.pairs());
            }
        }

        // Post-conditions after each op: size parity with the model.
        prop_assert_eq!(sut.len(), model.map.len());
        prop_assert_eq!(sut.is_empty(), model.map.is_empty());
    }

    // Final order check, plus round-trip: rebuilding from iteration must
    // preserve size, mapping, and order.
    let pairs: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(&pairs, &model.pairs());
    let rebuilt: OrderedHashMap<Key, i32> = pairs.iter().cloned().collect();
    prop_assert_eq!(rebuilt.len(), sut.len());
    prop_assert!(rebuilt.iter().map(|(k, v)| (k.clone(), *v)).eq(pairs));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(OrderedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key chains into one
// bucket, stressing equality probing and in-bucket removal order.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(OrderedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}
