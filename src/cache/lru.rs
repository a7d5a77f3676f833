//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! Nodes live in a `Vec` arena and link to each other by index, so every
//! entry in the store can hold a stable [`NodeId`] instead of a reference.
//! Freed slots are recycled through an intrusive free list.

/// Marks the absence of a link.
const NIL: usize = usize::MAX;

// == Node Id ==
/// Stable handle to a key's position in the [`LruTracker`].
///
/// A handle stays valid until the node it names is removed; using it after
/// that is a logic error and will panic or touch an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    /// `None` while the slot sits on the free list
    key: Option<String>,
    prev: usize,
    next: usize,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a doubly-linked list where:
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct LruTracker {
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
    free: usize,
    len: usize,
}

impl Default for LruTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tracker with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    // == Insert Front ==
    /// Adds a new key as the most recently used and returns its handle.
    ///
    /// The tracker does not check for duplicates; the caller owns key uniqueness.
    pub fn insert_front(&mut self, key: String) -> NodeId {
        let idx = self.alloc(key);
        self.link_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    pub fn touch(&mut self, id: NodeId) {
        if self.head == id.0 {
            return;
        }
        self.unlink(id.0);
        self.link_front(id.0);
    }

    // == Remove ==
    /// Removes a node from the tracker and returns its key.
    ///
    /// The handle is invalid afterwards.
    pub fn remove(&mut self, id: NodeId) -> String {
        self.unlink(id.0);
        self.release(id.0)
    }

    // == Peek Back ==
    /// Returns the least recently used key without removing it.
    pub fn peek_back(&self) -> Option<&str> {
        self.nodes.get(self.tail).and_then(|n| n.key.as_deref())
    }

    // == Pop Back ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_back(&mut self) -> Option<String> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        Some(self.release(idx))
    }

    /// Returns the key stored under a handle.
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).and_then(|n| n.key.as_deref())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates keys with their handles from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tracker: self,
            current: self.head,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, key: String) -> usize {
        if self.free != NIL {
            let idx = self.free;
            self.free = self.nodes[idx].next;
            self.nodes[idx] = Node {
                key: Some(key),
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            self.nodes.push(Node {
                key: Some(key),
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> String {
        let node = &mut self.nodes[idx];
        let key = node.key.take().unwrap_or_default();
        node.next = self.free;
        self.free = idx;
        self.len -= 1;
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

// == Iterator ==
/// Iterator over `(handle, key)` pairs, most recently used first.
pub struct Iter<'a> {
    tracker: &'a LruTracker,
    current: usize,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        // `remaining` bounds the walk even if the links were ever corrupted
        if self.current == NIL || self.remaining == 0 {
            return None;
        }
        let idx = self.current;
        let node = &self.tracker.nodes[idx];
        self.current = node.next;
        self.remaining -= 1;
        node.key.as_deref().map(|k| (NodeId(idx), k))
    }
}
