//! Recency List Module
//!
//! Tracks key access order for least-recently-used eviction.
//!
//! Keys live in an intrusive doubly-linked list backed by a slab of
//! nodes, with a side index mapping each key to its node. Promotion,
//! removal and tail eviction are all O(1) relinks rather than scans.

use std::collections::HashMap;
use std::hash::Hash;

/// Sentinel index meaning "no node".
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K> {
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Access-order list where the head is the most recently used key and
/// the tail is the next eviction candidate.
#[derive(Debug)]
pub struct RecencyList<K> {
    nodes: Vec<Node<K>>,
    index: HashMap<K, usize>,
    head: usize,
    tail: usize,
    /// Recycled node slots
    free: Vec<usize>,
}

impl<K> Default for RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
            free: Vec::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An already-tracked key is relinked to the head; a new key is
    /// allocated a node and linked at the head.
    pub fn touch(&mut self, key: &K) {
        if let Some(&idx) = self.index.get(key) {
            if self.head != idx {
                self.unlink(idx);
                self.link_front(idx);
            }
            return;
        }

        let idx = self.alloc(key.clone());
        self.index.insert(key.clone(), idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Removes a key from the list. Returns true if it was tracked.
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

    // == Pop Tail ==
    /// Removes and returns the least recently used key.
    pub fn pop_tail(&mut self) -> Option<K> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        let key = self.release(idx)?;
        self.index.remove(&key);
        Some(key)
    }

    // == Peek Tail ==
    /// Returns the least recently used key without removing it.
    pub fn peek_tail(&self) -> Option<&K> {
        if self.tail == NIL {
            None
        } else {
            self.nodes[self.tail].key.as_ref()
        }
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Internal Linking ==
    fn alloc(&mut self, key: K) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].key = Some(key);
                idx
            }
            None => {
                self.nodes.push(Node {
                    key: Some(key),
                    prev: NIL,
                    next: NIL,
                });
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<K> {
        let key = self.nodes[idx].key.take();
        self.free.push(idx);
        key
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }
}
