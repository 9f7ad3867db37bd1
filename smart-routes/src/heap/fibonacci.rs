//! Fibonacci heap with handle-based key updates.
//!
//! Entries live in a slot arena. Tree links (parent, children) are slot
//! indices, and a [`Handle`] is a slot index tagged with the owning heap and
//! the slot's generation, so a handle to a removed entry can be detected and
//! ignored instead of touching whatever entry reused the slot.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

/// Error returned by [`FibonacciHeap::delete_min`] on an empty heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("delete-min called on an empty heap")]
pub struct EmptyHeapError;

/// Opaque reference to one heap entry, returned by [`FibonacciHeap::insert`].
///
/// A handle stops referring to anything once its entry is removed by
/// [`FibonacciHeap::delete_min`]. Handles from another heap are never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    heap: u64,
    slot: usize,
    generation: u64,
}

#[derive(Debug)]
struct Entry<T, K> {
    element: T,
    key: K,
    parent: Option<usize>,
    children: Vec<usize>,
    marked: bool,
}

#[derive(Debug)]
struct Slot<T, K> {
    generation: u64,
    entry: Option<Entry<T, K>>,
}

/// A min-priority queue with amortised O(1) insert and decrease-key.
///
/// Keys may also be increased; children that would violate heap order under
/// the new key are cut and promoted to roots.
///
/// # Examples
///
/// ```
/// use smart_routes::heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert("walk", 12);
/// let bus = heap.insert("bus", 30);
/// heap.update_key(&bus, 5);
///
/// assert_eq!(heap.delete_min(), Ok("bus"));
/// assert_eq!(heap.delete_min(), Ok("walk"));
/// assert!(heap.delete_min().is_err());
/// ```
pub struct FibonacciHeap<T, K> {
    id: u64,
    slots: Vec<Slot<T, K>>,
    free: Vec<usize>,
    roots: Vec<usize>,
    min: Option<usize>,
    /// Scratch table for consolidation: index i holds the root of rank i.
    rank_table: Vec<Option<usize>>,
    len: usize,
}

impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            id: NEXT_HEAP_ID.fetch_add(1, AtomicOrdering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            min: None,
            rank_table: Vec::new(),
            len: 0,
        }
    }

    /// Number of entries in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an element with the given key.
    pub fn insert(&mut self, element: T, key: K) -> Handle {
        let entry = Entry {
            element,
            key,
            parent: None,
            children: Vec::new(),
            marked: false,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot].entry = Some(entry);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                self.slots.len() - 1
            }
        };

        self.len += 1;
        self.roots.push(slot);
        self.consolidate();

        Handle {
            heap: self.id,
            slot,
            generation: self.slots[slot].generation,
        }
    }

    /// The minimum element and its key, without removing it.
    pub fn peek_min(&self) -> Option<(&T, &K)> {
        self.min.map(|min| {
            let entry = self.entry(min);
            (&entry.element, &entry.key)
        })
    }

    /// Remove and return the element with the smallest key.
    ///
    /// Fails with [`EmptyHeapError`] if the heap is empty; check
    /// [`is_empty`](Self::is_empty) first.
    pub fn delete_min(&mut self) -> Result<T, EmptyHeapError> {
        self.pop_min()
            .map(|(element, _)| element)
            .ok_or(EmptyHeapError)
    }

    /// Remove and return the element with the smallest key, with its key.
    pub fn pop_min(&mut self) -> Option<(T, K)> {
        let min = self.min?;

        self.roots.retain(|&root| root != min);
        let children = std::mem::take(&mut self.entry_mut(min).children);
        for child in children {
            let entry = self.entry_mut(child);
            entry.parent = None;
            entry.marked = false;
            self.roots.push(child);
        }

        let slot = &mut self.slots[min];
        slot.generation += 1;
        let Some(entry) = slot.entry.take() else {
            unreachable!("minimum points at a vacant slot");
        };
        self.free.push(min);
        self.len -= 1;
        self.min = None;

        self.consolidate();
        Some((entry.element, entry.key))
    }

    /// Change the key of the entry behind `handle`.
    ///
    /// Dispatches to decrease-key or increase-key. A stale handle, or one
    /// issued by a different heap, is ignored.
    pub fn update_key(&mut self, handle: &Handle, key: K) {
        let Some(slot) = self.resolve(handle) else {
            return;
        };

        match key.cmp(&self.entry(slot).key) {
            Ordering::Less => self.decrease_key(slot, key),
            Ordering::Greater => self.increase_key(slot, key),
            Ordering::Equal => {}
        }
    }

    /// Returns true if `handle` still refers to an entry of this heap.
    pub fn contains(&self, handle: &Handle) -> bool {
        self.resolve(handle).is_some()
    }

    /// The current key of the entry behind `handle`.
    pub fn key(&self, handle: &Handle) -> Option<&K> {
        self.resolve(handle).map(|slot| &self.entry(slot).key)
    }

    /// The element behind `handle`.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        self.resolve(handle).map(|slot| &self.entry(slot).element)
    }

    /// Move every entry of `other` into this heap.
    ///
    /// Handles issued by `other` do not carry over.
    pub fn merge(&mut self, other: Self) {
        let offset = self.slots.len();
        let FibonacciHeap {
            slots,
            free,
            roots,
            len,
            ..
        } = other;

        for slot in slots {
            let entry = slot.entry.map(|mut entry| {
                entry.parent = entry.parent.map(|parent| parent + offset);
                entry.children.iter_mut().for_each(|child| *child += offset);
                entry
            });
            self.slots.push(Slot {
                generation: slot.generation,
                entry,
            });
        }
        self.free.extend(free.into_iter().map(|slot| slot + offset));
        self.roots.extend(roots.into_iter().map(|root| root + offset));
        self.len += len;

        self.consolidate();
    }

    fn resolve(&self, handle: &Handle) -> Option<usize> {
        if handle.heap != self.id {
            return None;
        }
        let slot = self.slots.get(handle.slot)?;
        (slot.generation == handle.generation && slot.entry.is_some()).then_some(handle.slot)
    }

    fn entry(&self, slot: usize) -> &Entry<T, K> {
        match &self.slots[slot].entry {
            Some(entry) => entry,
            None => unreachable!("heap structure references vacant slot {slot}"),
        }
    }

    fn entry_mut(&mut self, slot: usize) -> &mut Entry<T, K> {
        match &mut self.slots[slot].entry {
            Some(entry) => entry,
            None => unreachable!("heap structure references vacant slot {slot}"),
        }
    }

    fn decrease_key(&mut self, slot: usize, key: K) {
        self.entry_mut(slot).key = key;

        if let Some(parent) = self.entry(slot).parent {
            if self.entry(slot).key < self.entry(parent).key {
                self.cut(slot);
                self.cascading_cut(parent);
            }
        }

        if self.entry(slot).parent.is_none() {
            let below_min = match self.min {
                Some(min) => self.entry(slot).key < self.entry(min).key,
                None => true,
            };
            if below_min {
                self.min = Some(slot);
            }
        }
    }

    fn increase_key(&mut self, slot: usize, key: K) {
        self.entry_mut(slot).key = key;

        let violators: Vec<usize> = self
            .entry(slot)
            .children
            .iter()
            .copied()
            .filter(|&child| self.entry(child).key < self.entry(slot).key)
            .collect();

        if !violators.is_empty() {
            for child in violators {
                self.cut(child);
            }
            if self.entry(slot).parent.is_some() {
                self.cascading_cut(slot);
            }
        }

        // The entry may have been the minimum.
        self.consolidate();
    }

    /// Detach `slot` from its parent and make it a root.
    fn cut(&mut self, slot: usize) {
        if let Some(parent) = self.entry_mut(slot).parent.take() {
            self.entry_mut(parent).children.retain(|&child| child != slot);
        }
        self.entry_mut(slot).marked = false;
        self.roots.push(slot);
    }

    /// Mark `slot` after it lost a child; cut it too if it was already marked.
    fn cascading_cut(&mut self, mut slot: usize) {
        while let Some(parent) = self.entry(slot).parent {
            if !self.entry(slot).marked {
                self.entry_mut(slot).marked = true;
                return;
            }
            self.cut(slot);
            slot = parent;
        }
    }

    /// Make `child` a child of `parent`. The smaller key wins the parent role.
    fn link(&mut self, a: usize, b: usize) -> usize {
        let (parent, child) = if self.entry(b).key < self.entry(a).key {
            (b, a)
        } else {
            (a, b)
        };

        let entry = self.entry_mut(child);
        entry.parent = Some(parent);
        entry.marked = false;
        self.entry_mut(parent).children.push(child);
        parent
    }

    /// Link roots of equal rank until every rank has at most one root.
    fn consolidate(&mut self) {
        let mut table = std::mem::take(&mut self.rank_table);
        table.clear();

        for root in std::mem::take(&mut self.roots) {
            let mut tree = root;
            loop {
                let rank = self.entry(tree).children.len();
                if table.len() <= rank {
                    table.resize(rank + 1, None);
                }
                match table[rank].take() {
                    None => {
                        table[rank] = Some(tree);
                        break;
                    }
                    Some(other) => tree = self.link(other, tree),
                }
            }
        }

        self.roots = table.iter().flatten().copied().collect();
        self.rank_table = table;
        self.min = self
            .roots
            .iter()
            .copied()
            .reduce(|best, root| {
                if self.entry(root).key < self.entry(best).key {
                    root
                } else {
                    best
                }
            });
    }
}

impl<T, K: Ord> Default for FibonacciHeap<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> fmt::Debug for FibonacciHeap<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("roots", &self.roots.len())
            .finish()
    }
}

#[cfg(test)]
impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Check parent/child consistency, heap order and the cached minimum.
    fn assert_well_formed(&self) {
        let mut live = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(entry) = &slot.entry else { continue };
            live += 1;
            for &child in &entry.children {
                let child_entry = self.entry(child);
                assert_eq!(child_entry.parent, Some(index), "child/parent link mismatch");
                assert!(child_entry.key >= entry.key, "heap order violated");
            }
            if entry.parent.is_none() {
                assert!(self.roots.contains(&index), "orphan entry is not a root");
            }
        }
        assert_eq!(live, self.len);
        for &root in &self.roots {
            assert!(self.entry(root).parent.is_none());
        }
        match self.min {
            Some(min) => {
                for &root in &self.roots {
                    assert!(self.entry(min).key <= self.entry(root).key);
                }
            }
            None => assert!(self.roots.is_empty()),
        }
    }
}
