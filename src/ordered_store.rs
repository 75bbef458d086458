//! OrderedStore: insertion-ordered record storage with stable positions.
//!
//! A doubly-linked list threaded through a `SlotMap`: slots give O(1)
//! access through generational `Pos` keys, the links give traversal in
//! first-insertion order. Unlinking a record invalidates only its own
//! `Pos`; every other position stays valid, which is what lets the bucket
//! index above this layer be rebuilt without touching the records.

use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;
use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Stable locator for a record. Generational: once its record is
    /// removed, a `Pos` resolves to `None` forever, even if the slot is
    /// reused.
    pub struct Pos;
}

#[derive(Clone, Debug)]
struct Node<T> {
    record: T,
    prev: Pos, // null at the front
    next: Pos, // null at the back
}

/// Insertion-ordered arena of records.
#[derive(Clone, Debug)]
pub struct OrderedStore<T> {
    slots: SlotMap<Pos, Node<T>>,
    head: Pos,
    tail: Pos,
}

impl<T> OrderedStore<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            head: Pos::null(),
            tail: Pos::null(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends a record at the back of the order and returns its position.
    pub fn push_back(&mut self, record: T) -> Pos {
        let pos = self.slots.insert(Node {
            record,
            prev: self.tail,
            next: Pos::null(),
        });
        if self.tail.is_null() {
            self.head = pos;
        } else {
            self.slots[self.tail].next = pos;
        }
        self.tail = pos;
        pos
    }

    /// Unlinks and returns the record at `pos`. Returns `None` if `pos` is
    /// stale or null; no other position is affected.
    pub fn remove(&mut self, pos: Pos) -> Option<T> {
        let node = self.slots.remove(pos)?;
        if node.prev.is_null() {
            self.head = node.next;
        } else {
            self.slots[node.prev].next = node.next;
        }
        if node.next.is_null() {
            self.tail = node.prev;
        } else {
            self.slots[node.next].prev = node.prev;
        }
        Some(node.record)
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.slots.get(pos).map(|n| &n.record)
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.slots.get_mut(pos).map(|n| &mut n.record)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.slots.contains_key(pos)
    }

    pub fn first(&self) -> Option<&T> {
        self.get(self.head)
    }

    pub fn last(&self) -> Option<&T> {
        self.get(self.tail)
    }

    /// Position of the front record; null when empty.
    pub fn first_pos(&self) -> Pos {
        self.head
    }

    /// Position of the back record; null when empty.
    pub fn last_pos(&self) -> Pos {
        self.tail
    }

    /// Position following `pos` in the order; null at the back or if `pos`
    /// is stale.
    pub fn next_pos(&self, pos: Pos) -> Pos {
        self.slots.get(pos).map(|n| n.next).unwrap_or_else(Pos::null)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = Pos::null();
        self.tail = Pos::null();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
            slots: NonNull::from(&mut self.slots),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for OrderedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Link-order iterator over records.
pub struct Iter<'a, T> {
    slots: &'a SlotMap<Pos, Node<T>>,
    front: Pos,
    back: Pos,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.slots[self.front];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.slots[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.record)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Link-order iterator over mutable records.
///
/// This is the one unsafe corner of the crate: the cursors walk the links
/// while handing out `&mut` records with the iterator's lifetime, which a
/// plain `&mut SlotMap` cannot express.
pub struct IterMut<'a, T> {
    front: Pos,
    back: Pos,
    remaining: usize,
    slots: NonNull<SlotMap<Pos, Node<T>>>,
    _marker: PhantomData<&'a mut SlotMap<Pos, Node<T>>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: constructed from `&'a mut OrderedStore`, so the arena is
        // exclusively borrowed for 'a. The links form an acyclic chain over
        // distinct slots and `remaining` stops the two cursors before they
        // overlap, so each slot is yielded at most once and the returned
        // `&mut T`s never alias.
        let slots = unsafe { self.slots.as_mut() };
        let node = &mut slots[self.front];
        self.front = node.next;
        self.remaining -= 1;
        Some(&mut node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: same argument as `next`.
        let slots = unsafe { self.slots.as_mut() };
        let node = &mut slots[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&mut node.record)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning link-order iterator; frees each slot as it goes.
pub struct IntoIter<T> {
    store: OrderedStore<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let pos = self.store.first_pos();
        self.store.remove(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.store.len();
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let pos = self.store.last_pos();
        self.store.remove(pos)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for OrderedStore<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { store: self }
    }
}

impl<'a, T> IntoIterator for &'a OrderedStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut OrderedStore<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
