//! ordered-hashmap: a single-threaded hash map that iterates in
//! first-insertion order and keeps every untouched entry stable across
//! inserts, removals, and bucket-table growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: combine O(1) average lookup with stable insertion-ordered
//!   traversal by keeping the records and the hash index in separate
//!   structures, so the index can be rebuilt without touching a record.
//! - Layers:
//!   - OrderedStore<T>: insertion-ordered record arena; a doubly-linked
//!     list threaded through a SlotMap. Owns the records and mints
//!     stable generational positions (`Pos`).
//!   - BucketIndex: derived chained-hash table of positions; lazily
//!     created at the first insert, grown by full rebuild once
//!     `len >= 2 * bucket_count`, never shrunk.
//!   - OrderedHashMap<K, V, S>: public API composing hasher, index, and
//!     store; all lookups, mutation, and iteration.
//!
//! Constraints
//! - Single-threaded semantics; exclusive mutation through `&mut self`.
//! - Unique keys with first-insert-wins: inserting a present key is a
//!   silent no-op, never an overwrite and never an error.
//! - Keys are immutable post-insert; there is no `key_mut` and
//!   iteration yields `&K` only.
//! - O(1) average lookups; iteration is O(len) in insertion order.
//!
//! Why this split?
//! - Localize invariants: the store guarantees order and position
//!   stability, the index guarantees at most one position per live key
//!   in the bucket its stored hash selects, and the map keeps the two
//!   in lockstep.
//! - The index holds no data: it can always be reconstructed from the
//!   store plus the stored hashes, which is exactly what growth does.
//! - Minimize unsafe: the only unsafe code is the mutable link-order
//!   iterator in `ordered_store`; everything else is safe Rust.
//!
//! Hasher and rehashing invariants
//! - Each record stores a precomputed `u64` hash and indexing always
//!   uses the stored hash; `K: Hash` is never invoked after insertion.
//!   Growth redistributes positions by stored hash and runs no user
//!   code at all.
//!
//! Notes and non-goals
//! - No shrinking: removals never reduce the bucket count; only
//!   `clear` resets it (to zero buckets, the freshly-built state).
//! - No `entry()` API: insert-if-absent access is the closure-taking
//!   `get_or_insert_with`/`get_or_insert_default`.
//! - No serialization, no internal synchronization, no custom
//!   allocators.
//! - Public API surface is `OrderedHashMap` and its iterators; lower
//!   layers are implementation details (the store is exposed only to
//!   the internal bench behind the `bench_internal` feature).

mod bucket_index;
mod ordered_hash_map;
mod ordered_hash_map_proptest;
#[cfg(feature = "bench_internal")]
pub mod ordered_store;
#[cfg(not(feature = "bench_internal"))]
mod ordered_store;

// Public surface
pub use ordered_hash_map::{
    Drain, IntoIter, Iter, IterMut, Keys, OrderedHashMap, Values, ValuesMut,
};
