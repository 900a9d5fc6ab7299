//! LRU List Module
//!
//! Recency-ordered entry list backing the eviction engine.

use crate::cache::ByteView;

/// Position of an entry inside an [`LruList`]. Stable until the entry is removed.
pub type Slot = usize;

// == Entry ==
/// A cached key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: ByteView,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: ByteView) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Bytes this entry is charged against the memory budget.
    pub fn size(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

#[derive(Debug)]
struct Node {
    entry: Entry,
    prev: Option<Slot>,
    next: Option<Slot>,
}

// == LRU List ==
/// Doubly linked list of entries stored in a slab.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
///
/// Every operation is O(1). Freed slots are reused by later inserts.
#[derive(Debug, Default)]
pub struct LruList {
    nodes: Vec<Option<Node>>,
    free: Vec<Slot>,
    head: Option<Slot>,
    tail: Option<Slot>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Inserts an entry as most recently used and returns its slot.
    pub fn push_front(&mut self, entry: Entry) -> Slot {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        if let Some(old_head) = self.head {
            self.node_mut(old_head).prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the entry at `slot` as most recently used.
    pub fn move_to_front(&mut self, slot: Slot) {
        if self.head == Some(slot) || self.get(slot).is_none() {
            return;
        }
        self.unlink(slot);

        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.node_mut(old_head).prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    // == Remove ==
    /// Removes the entry at `slot`, returning it.
    pub fn remove(&mut self, slot: Slot) -> Option<Entry> {
        self.get(slot)?;
        self.unlink(slot);

        let node = self.nodes[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<Entry> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<&Entry> {
        self.tail.and_then(|slot| self.get(slot))
    }

    pub fn get(&self, slot: Slot) -> Option<&Entry> {
        self.nodes
            .get(slot)
            .and_then(|node| node.as_ref())
            .map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Entry> {
        self.nodes
            .get_mut(slot)
            .and_then(|node| node.as_mut())
            .map(|node| &mut node.entry)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Detaches `slot` from its neighbours, fixing head and tail.
    fn unlink(&mut self, slot: Slot) {
        let (prev, next) = {
            let node = self.node_mut(slot);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    // Only called with slots reachable from head/tail or the links, which are always occupied.
    fn node_mut(&mut self, slot: Slot) -> &mut Node {
        match self.nodes[slot].as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", slot),
        }
    }
}

/// Iterator over an [`LruList`], most recently used first.
pub struct Iter<'a> {
    list: &'a LruList,
    cursor: Option<Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.nodes.get(slot)?.as_ref()?;
        self.cursor = node.next;
        Some(&node.entry)
    }
}
