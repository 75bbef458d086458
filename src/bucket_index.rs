//! BucketIndex: derived chained-hash index over store positions.
//!
//! An array of buckets, each a list of `Pos` values whose record's stored
//! hash lands in that bucket. The index owns no records and can always be
//! rebuilt from positions plus a hash lookup, which is exactly what growth
//! does. Callers supply closures to resolve a `Pos` to its key equality or
//! stored hash, so no user `Hash` impl ever runs during a rebuild.

use crate::ordered_store::Pos;

/// Growth multiplier: the table is rebuilt at `GROWTH_FACTOR` times the
/// bucket count whenever `len >= GROWTH_FACTOR * bucket_count`.
pub const GROWTH_FACTOR: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct BucketIndex {
    buckets: Vec<Vec<Pos>>,
    len: usize,
}

impl BucketIndex {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            len: 0,
        }
    }

    /// Number of positions held. In lockstep with the store's record count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Scans the target bucket for a position satisfying `eq`. With no
    /// buckets (nothing ever inserted, or cleared) this is a constant-time
    /// miss.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(Pos) -> bool) -> Option<Pos> {
        if self.buckets.is_empty() {
            return None;
        }
        let bucket = &self.buckets[self.bucket_of(hash)];
        bucket.iter().copied().find(|&pos| eq(pos))
    }

    /// Records `pos` under `hash`. The caller has already established the
    /// key is absent. Creates the initial single bucket lazily, and grows
    /// the table once the load threshold is crossed, redistributing by the
    /// stored hashes that `hash_of` reports.
    pub fn insert(&mut self, hash: u64, pos: Pos, hash_of: impl FnMut(Pos) -> u64) {
        if self.buckets.is_empty() {
            self.buckets.push(Vec::new());
        }
        let b = self.bucket_of(hash);
        self.buckets[b].push(pos);
        self.len += 1;
        if self.len >= GROWTH_FACTOR * self.buckets.len() {
            self.grow(hash_of);
        }
    }

    /// Drops `pos` from the bucket for `hash`; in-bucket order of the
    /// remaining positions is preserved. Returns whether it was present.
    /// Never shrinks the table.
    pub fn remove(&mut self, hash: u64, pos: Pos) -> bool {
        if self.buckets.is_empty() {
            return false;
        }
        let b = self.bucket_of(hash);
        let bucket = &mut self.buckets[b];
        match bucket.iter().position(|&p| p == pos) {
            Some(i) => {
                bucket.remove(i);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Resets to the never-inserted state: zero buckets.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Full rebuild at double the bucket count. Collection is bucket-major
    /// in the current bucket order, which keeps the rebuild deterministic;
    /// the positions themselves are untouched.
    fn grow(&mut self, mut hash_of: impl FnMut(Pos) -> u64) {
        let all: Vec<Pos> = self.buckets.iter().flatten().copied().collect();
        let new_count = GROWTH_FACTOR * self.buckets.len();
        self.buckets.clear();
        self.buckets.resize_with(new_count, Vec::new);
        for pos in all {
            let b = (hash_of(pos) % new_count as u64) as usize;
            self.buckets[b].push(pos);
        }
    }
}
