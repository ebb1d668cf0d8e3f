//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::HashMap;
use std::hash::Hash;

/// Null link in the slot arena.
const NIL: usize = usize::MAX;

/// One slot of the arena. Free slots hold no key and chain through `next`.
#[derive(Debug)]
struct Node<K> {
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are kept in a doubly-linked list threaded through a `Vec` of slots
/// addressed by index, where:
/// - Head = Least recently used
/// - Tail = Most recently used
///
/// A key-to-slot index makes touch, remove and evict O(1). Keys touched in the
/// same instant keep the order in which they were touched.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Slot arena holding the list nodes
    slots: Vec<Node<K>>,
    /// Slot of every tracked key
    index: HashMap<K, usize>,
    /// Least recently used slot
    head: usize,
    /// Most recently used slot
    tail: usize,
    /// First free slot available for reuse
    free: usize,
}

impl<K: Hash + Eq + Clone> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
        }
    }

    // == Touch ==
    /// Marks a key as most recently used (moves it to the tail).
    ///
    /// If key exists, relinks its slot at the tail.
    /// If key is new, allocates a slot at the tail.
    pub fn touch(&mut self, key: &K) {
        if let Some(&idx) = self.index.get(key) {
            if idx != self.tail {
                self.unlink(idx);
                self.push_back(idx);
            }
            return;
        }

        let idx = self.alloc(key.clone());
        self.push_back(idx);
        self.index.insert(key.clone(), idx);
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns true if it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(idx) => {
                self.unlink(idx);
                self.release(idx);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        if self.head == NIL {
            return None;
        }
        let idx = self.head;
        self.unlink(idx);
        let key = self.release(idx)?;
        self.index.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.slots.get(self.head).and_then(|node| node.key.as_ref())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    /// Forgets every key and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
    }

    // == Iter ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            slots: &self.slots,
            current: self.head,
            remaining: self.index.len(),
        }
    }

    // == Arena Internals ==

    /// Takes a slot from the free list, or grows the arena.
    fn alloc(&mut self, key: K) -> usize {
        let node = Node {
            key: Some(key),
            prev: NIL,
            next: NIL,
        };
        if self.free != NIL {
            let idx = self.free;
            self.free = self.slots[idx].next;
            self.slots[idx] = node;
            idx
        } else {
            self.slots.push(node);
            self.slots.len() - 1
        }
    }

    /// Returns an unlinked slot to the free list, handing back its key.
    fn release(&mut self, idx: usize) -> Option<K> {
        let node = &mut self.slots[idx];
        let key = node.key.take();
        node.prev = NIL;
        node.next = self.free;
        self.free = idx;
        key
    }

    /// Detaches a slot from the list without freeing it.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    /// Links a detached slot at the tail.
    fn push_back(&mut self, idx: usize) {
        self.slots[idx].prev = self.tail;
        self.slots[idx].next = NIL;

        if self.tail != NIL {
            self.slots[self.tail].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }
}

// == Iterator ==
/// Iterator over tracked keys, least recently used first.
pub struct Iter<'a, K> {
    slots: &'a [Node<K>],
    current: usize,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.current == NIL {
            return None;
        }
        let node = &self.slots[self.current];
        self.current = node.next;
        self.remaining -= 1;
        node.key.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
