//! OrderedHashMap: the public map combining hasher, bucket index, and
//! ordered store.

use crate::bucket_index::BucketIndex;
use crate::ordered_store::{self, OrderedStore, Pos};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;
use slotmap::Key;
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
struct Record<K, V> {
    key: K,
    value: V,
    // Computed once at insert; indexing and growth only ever use this
    // stored copy, so `K: Hash` never runs after insertion.
    hash: u64,
}

/// A hash map that iterates in first-insertion order.
///
/// Lookups are average O(1) through a chained bucket table of positions
/// into an insertion-ordered record store. Inserting an already-present
/// key is a no-op: the first value wins and the entry keeps its place in
/// the order. Removing a key unlinks just that record; every other entry,
/// and the order of every other entry, is untouched — including across
/// the bucket-table growth that inserts can trigger.
#[derive(Clone)]
pub struct OrderedHashMap<K, V, S = RandomState> {
    hasher: S,
    index: BucketIndex,
    store: OrderedStore<Record<K, V>>,
}

impl<K, V> OrderedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V, S> Default for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: BucketIndex::new(),
            store: OrderedStore::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_pos<Q>(&self, hash: u64, q: &Q) -> Option<Pos>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index.find(hash, |pos| {
            self.store
                .get(pos)
                .map(|r| r.hash == hash && r.key.borrow() == q)
                .unwrap_or(false)
        })
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let pos = self.find_pos(hash, q)?;
        self.store.get(pos).map(|r| &r.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let pos = self.find_pos(hash, q)?;
        self.store.get_mut(pos).map(|r| &mut r.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let pos = self.find_pos(hash, q)?;
        self.store.get(pos).map(|r| (&r.key, &r.value))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.find_pos(hash, q).is_some()
    }

    /// Inserts `(key, value)` at the back of the order. Returns `true` if
    /// the key was absent; if it was already present this is a no-op
    /// returning `false` — the stored value and the entry's place in the
    /// order are both kept (first insert wins, not last).
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        if self.find_pos(hash, &key).is_some() {
            return false;
        }
        let pos = self.store.push_back(Record { key, value, hash });
        self.index
            .insert(hash, pos, |p| self.store.get(p).map(|r| r.hash).unwrap_or(0));
        debug_assert_eq!(self.store.len(), self.index.len());
        true
    }

    /// Returns a mutable borrow of the value for `key`, inserting
    /// `default()` at the back of the order first if the key is absent.
    /// The closure runs only on that miss path.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let pos = match self.find_pos(hash, &key) {
            Some(pos) => pos,
            None => {
                let value = default();
                let pos = self.store.push_back(Record { key, value, hash });
                self.index
                    .insert(hash, pos, |p| self.store.get(p).map(|r| r.hash).unwrap_or(0));
                debug_assert_eq!(self.store.len(), self.index.len());
                pos
            }
        };
        &mut self.store.get_mut(pos).unwrap().value
    }

    /// `get_or_insert_with` with `V::default()` — insert-if-absent then
    /// mutable access, in one call.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Removes the entry for `q` and returns the owned pair; `None` (and
    /// no state change) if absent. The bucket table never shrinks.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let pos = self.find_pos(hash, q)?;
        let removed = self.index.remove(hash, pos);
        debug_assert!(removed);
        let record = self.store.remove(pos).unwrap();
        debug_assert_eq!(self.store.len(), self.index.len());
        Some((record.key, record.value))
    }
}

impl<K, V, S> OrderedHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The configured hash builder.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Empties the map and resets the bucket table to zero buckets, the
    /// same state a freshly-constructed map starts in.
    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
    }

    /// The oldest surviving entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.store.first().map(|r| (&r.key, &r.value))
    }

    /// The most recently inserted entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.store.last().map(|r| (&r.key, &r.value))
    }

    /// Keeps only the entries for which `f` returns `true`, visiting them
    /// in order. Survivors keep their relative order. Uses the stored
    /// hashes, so no key is re-hashed and the bucket table never grows.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cur = self.store.first_pos();
        while !cur.is_null() {
            let next = self.store.next_pos(cur);
            let record = self.store.get_mut(cur).unwrap();
            if !f(&record.key, &mut record.value) {
                let hash = record.hash;
                let removed = self.index.remove(hash, cur);
                debug_assert!(removed);
                self.store.remove(cur);
            }
            cur = next;
        }
        debug_assert_eq!(self.store.len(), self.index.len());
    }

    /// Takes every entry out in order. The map is left as after `clear`:
    /// empty, zero buckets.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.index.clear();
        Drain {
            inner: IntoIter {
                inner: mem::take(&mut self.store).into_iter(),
            },
            _marker: PhantomData,
        }
    }

    /// Borrowing iterator over `(&K, &V)` in insertion order. Cheap to
    /// re-create at any time.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.iter(),
        }
    }

    /// Like `iter`, with mutable access to the values. Keys stay shared:
    /// mutating a key in place would desynchronize the bucket index.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.store.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<K, V, S> fmt::Debug for OrderedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Mapping equality: same length and same key→value associations. Order
/// is deliberately not part of equality; compare `iter()` sequences where
/// order matters.
impl<K, V, S> PartialEq for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| *v == *ov))
    }
}

impl<K, V, S> Eq for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Read-only indexed access; panics if the key is absent. The map is
    /// never mutated through `Index` — insert-if-absent access is
    /// `get_or_insert_with`/`get_or_insert_default`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

/// Extends in iteration order with first-insert-wins collisions: a key
/// already in the map (or seen earlier in the same stream) keeps its
/// existing value. Note this differs from the `std` maps, which overwrite.
impl<K, V, S> Extend<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

/// Iterator over `(&K, &V)` in insertion order.
pub struct Iter<'a, K, V> {
    inner: ordered_store::Iter<'a, Record<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| (&r.key, &r.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|r| (&r.key, &r.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

/// Iterator over `(&K, &mut V)` in insertion order.
pub struct IterMut<'a, K, V> {
    inner: ordered_store::IterMut<'a, Record<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| (&r.key, &mut r.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|r| (&r.key, &mut r.value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Iterator over `&K` in insertion order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

/// Iterator over `&V` in insertion order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

/// Iterator over `&mut V` in insertion order.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a mut V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Owning iterator over `(K, V)` in insertion order.
pub struct IntoIter<K, V> {
    inner: ordered_store::IntoIter<Record<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next().map(|r| (r.key, r.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back().map(|r| (r.key, r.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Draining iterator over `(K, V)` in insertion order; entries not pulled
/// are dropped with it.
pub struct Drain<'a, K, V> {
    inner: IntoIter<K, V>,
    _marker: PhantomData<&'a mut (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Drain<'_, K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
impl<K, V> FusedIterator for Drain<'_, K, V> {}

impl<K, V, S> IntoIterator for OrderedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.store.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hasher;
    use std::cell::Cell;

    /// Invariant: inserting a present key is a silent no-op; the first
    /// value and the entry's place in the order are kept.
    #[test]
    fn duplicate_insert_keeps_first_value() {
        let mut m: OrderedHashMap<String, i32> = OrderedHashMap::new();
        assert!(m.insert("dup".to_string(), 1));
        assert!(!m.insert("dup".to_string(), 2));
        assert_eq!(m.get("dup"), Some(&1));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: `get(k).is_some() == contains_key(k)` for present and
    /// absent keys.
    #[test]
    fn get_contains_parity() {
        let mut m: OrderedHashMap<String, i32> = OrderedHashMap::new();
        let present = ["a", "b", "c"];
        for (i, k) in present.iter().enumerate() {
            m.insert((*k).to_string(), i as i32);
        }

        for k in present {
            assert!(m.get(k).is_some());
            assert!(m.contains_key(k));
        }
        for k in ["x", "y", "z"] {
            assert!(m.get(k).is_none());
            assert!(!m.contains_key(k));
        }
    }

    /// Invariant: borrowed lookup works (store `String`, query `&str`),
    /// for reads, mutation, and removal.
    #[test]
    fn borrowed_lookup_with_str() {
        let mut m: OrderedHashMap<String, i32> = OrderedHashMap::new();
        m.insert("hello".to_string(), 1);
        assert!(m.contains_key("hello"));
        assert!(!m.contains_key("world"));

        *m.get_mut("hello").unwrap() += 10;
        assert_eq!(m["hello"], 11);
        assert_eq!(m.remove("hello"), Some(11));
        assert!(m.is_empty());
    }

    /// Invariant: iteration yields entries in first-insertion order, and
    /// the order survives the growth that distinct inserts trigger.
    #[test]
    fn order_preserved_across_growth() {
        let mut m: OrderedHashMap<u32, u32> = OrderedHashMap::new();
        // Well past several doublings of the bucket table.
        for i in 0..100 {
            m.insert(i * 7, i);
        }
        assert_eq!(m.len(), 100);
        let keys: Vec<u32> = m.keys().copied().collect();
        let expected: Vec<u32> = (0..100).map(|i| i * 7).collect();
        assert_eq!(keys, expected);
        for i in 0..100 {
            assert_eq!(m.get(&(i * 7)), Some(&i));
        }
        assert_eq!(m.first(), Some((&0, &0)));
        assert_eq!(m.last(), Some((&(99 * 7), &99)));
    }

    /// Invariant: `get_or_insert_with` runs its closure only when the key
    /// is absent, and always returns the first-inserted value.
    #[test]
    fn get_or_insert_with_is_lazy() {
        let mut m: OrderedHashMap<String, String> = OrderedHashMap::new();
        let calls = Cell::new(0);

        let v = m.get_or_insert_with("k".to_string(), || {
            calls.set(calls.get() + 1);
            "v".to_string()
        });
        assert_eq!(v, "v");
        assert_eq!(calls.get(), 1);

        let v = m.get_or_insert_with("k".to_string(), || {
            calls.set(calls.get() + 1);
            "v2".to_string()
        });
        assert_eq!(v, "v", "present key must keep its value");
        assert_eq!(calls.get(), 1, "closure must not run on a hit");

        // The returned borrow is mutable in place.
        v.push('!');
        assert_eq!(m.get("k"), Some(&"v!".to_string()));
    }

    /// Invariant: `get_or_insert_default` inserts the default at the back
    /// of the order on a miss and resolves to the existing value on a hit.
    #[test]
    fn get_or_insert_default_orders_and_resolves() {
        let mut m: OrderedHashMap<&str, i32> = OrderedHashMap::new();
        m.insert("a", 5);
        *m.get_or_insert_default("b") += 2;
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(*m.get_or_insert_default("a"), 5);
        let pairs: Vec<(&str, i32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [("a", 5), ("b", 2)]);
    }

    /// Invariant: removing and reinserting a key makes it a fresh entry at
    /// the back of the order with the new value.
    #[test]
    fn remove_then_reinsert_moves_to_back() {
        let mut m: OrderedHashMap<&str, i32> = OrderedHashMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        assert_eq!(m.remove_entry("a"), Some(("a", 1)));
        assert!(m.insert("a", 10));
        let pairs: Vec<(&str, i32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [("b", 2), ("c", 3), ("a", 10)]);
    }

    /// Invariant: all semantics hold under worst-case collisions (constant
    /// hasher forces every key into one bucket chain).
    #[test]
    fn collision_handling_with_const_hasher() {
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
            } // force all keys into the same bucket
        }

        let mut m: OrderedHashMap<String, i32, ConstBuildHasher> =
            OrderedHashMap::with_hasher(ConstBuildHasher);
        for i in 0..10 {
            m.insert(format!("k{i}"), i);
        }
        assert_eq!(m.len(), 10);
        for i in 0..10 {
            assert_eq!(m.get(&format!("k{i}")), Some(&i));
        }
        assert!(!m.insert("k3".to_string(), 99));
        assert_eq!(m.remove(&"k4".to_string()), Some(4));
        assert_eq!(m.get(&"k4".to_string()), None);
        let keys: Vec<String> = m.keys().cloned().collect();
        let expected: Vec<String> = (0..10).filter(|&i| i != 4).map(|i| format!("k{i}")).collect();
        assert_eq!(keys, expected);
    }

    /// Invariant: `len`/`is_empty` track live entries only; duplicate
    /// inserts and absent removals change nothing.
    #[test]
    fn len_and_is_empty_behaviors() {
        let mut m: OrderedHashMap<String, i32> = OrderedHashMap::new();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());

        m.insert("a".to_string(), 1);
        assert_eq!(m.len(), 1);
        assert!(!m.is_empty());

        m.insert("a".to_string(), 2);
        assert_eq!(m.len(), 1);

        assert_eq!(m.remove("missing"), None);
        assert_eq!(m.len(), 1);

        m.insert("b".to_string(), 2);
        assert_eq!(m.len(), 2);

        m.remove("a");
        m.remove("b");
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
    }

    /// Invariant: growth never clones or recreates records — a map of
    /// non-Clone keys and values works across many doublings.
    #[test]
    fn non_clone_types_survive_growth() {
        #[derive(PartialEq, Eq, Hash, Debug)]
        struct NoCloneKey(u32);
        #[derive(PartialEq, Eq, Debug)]
        struct NoCloneVal(u32);

        let mut m: OrderedHashMap<NoCloneKey, NoCloneVal> = OrderedHashMap::new();
        for i in 0..40 {
            m.insert(NoCloneKey(i), NoCloneVal(i * 2));
        }
        for i in 0..40 {
            assert_eq!(m.get(&NoCloneKey(i)), Some(&NoCloneVal(i * 2)));
        }
        let (k, v) = m.first().unwrap();
        assert_eq!((k, v), (&NoCloneKey(0), &NoCloneVal(0)));
    }

    /// Invariant: `retain` visits in order, keeps survivor order, and can
    /// mutate kept values.
    #[test]
    fn retain_keeps_order() {
        let mut m: OrderedHashMap<u32, u32> = OrderedHashMap::new();
        for i in 0..10 {
            m.insert(i, i);
        }
        let mut visited = Vec::new();
        m.retain(|&k, v| {
            visited.push(k);
            *v += 100;
            k % 2 == 0
        });
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
        let pairs: Vec<(u32, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [(0, 100), (2, 102), (4, 104), (6, 106), (8, 108)]);
        assert_eq!(m.get(&1), None);
    }

    /// Invariant: `drain` yields everything in order and leaves the map in
    /// the cleared state, ready for fresh inserts.
    #[test]
    fn drain_empties_in_order() {
        let mut m: OrderedHashMap<&str, i32> = OrderedHashMap::new();
        m.insert("x", 1);
        m.insert("y", 2);
        m.insert("z", 3);
        let drained: Vec<(&str, i32)> = m.drain().collect();
        assert_eq!(drained, [("x", 1), ("y", 2), ("z", 3)]);
        assert!(m.is_empty());
        assert_eq!(m.get("x"), None);

        m.insert("y", 9);
        assert_eq!(m.iter().next(), Some((&"y", &9)));
    }

    /// Invariant: dropping a partially-consumed `drain` discards the rest.
    #[test]
    fn drain_drop_discards_rest() {
        let mut m: OrderedHashMap<u32, u32> = OrderedHashMap::new();
        for i in 0..5 {
            m.insert(i, i);
        }
        {
            let mut d = m.drain();
            assert_eq!(d.next(), Some((0, 0)));
        }
        assert!(m.is_empty());
    }

    /// Invariant: `iter_mut`/`values_mut` visit in insertion order and
    /// writes land in the map.
    #[test]
    fn iter_mut_updates_in_order() {
        let mut m: OrderedHashMap<&str, i32> = OrderedHashMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        for (i, (_k, v)) in m.iter_mut().enumerate() {
            *v += (i as i32 + 1) * 10;
        }
        let vals: Vec<i32> = m.values().copied().collect();
        assert_eq!(vals, [11, 22, 33]);

        for v in m.values_mut() {
            *v = -*v;
        }
        assert_eq!(m.values().copied().collect::<Vec<_>>(), [-11, -22, -33]);
    }
}
