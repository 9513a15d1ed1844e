//! Binary min-heap keyed by an `f64` distance.
//!
//! Drives the branch-and-bound nearest-neighbor search: the item with the
//! smallest key is always popped first. Keys are expected to be non-NaN
//! distances; a NaN key compares as "not smaller" and therefore sinks.

/// A single queued item with its ordering key.
#[derive(Debug, Clone)]
struct QueueSlot<T> {
    key: f64,
    item: T,
}

/// Array-backed binary min-heap.
///
/// The heap grows on demand, so `with_capacity` is only a sizing hint.
///
/// # Examples
///
/// ```rust
/// use rtree2d::MinQueue;
///
/// let mut queue = MinQueue::new();
/// queue.push(3.0, "far");
/// queue.push(0.5, "near");
/// queue.push(1.0, "middle");
///
/// assert_eq!(queue.pop(), Some((0.5, "near")));
/// assert_eq!(queue.pop(), Some((1.0, "middle")));
/// assert_eq!(queue.pop(), Some((3.0, "far")));
/// assert_eq!(queue.pop(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MinQueue<T> {
    slots: Vec<QueueSlot<T>>,
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Creates an empty queue with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Smallest key currently queued.
    pub fn peek_key(&self) -> Option<f64> {
        self.slots.first().map(|slot| slot.key)
    }

    /// Drops every queued item.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Queues `item` with ordering key `key`.
    pub fn push(&mut self, key: f64, item: T) {
        self.slots.push(QueueSlot { key, item });
        self.sift_up(self.slots.len() - 1);
    }

    /// Removes and returns the item with the smallest key.
    ///
    /// Returns `None` on an empty queue.
    pub fn pop(&mut self) -> Option<(f64, T)> {
        if self.slots.is_empty() {
            return None;
        }

        // Move the last slot into the root, then restore the heap order
        let top = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some((top.key, top.item))
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[index].key < self.slots[parent].key {
                self.slots.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.slots[left].key < self.slots[smallest].key {
                smallest = left;
            }
            if right < len && self.slots[right].key < self.slots[smallest].key {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.slots.swap(index, smallest);
            index = smallest;
        }
    }
}
