//! Priority-ordered item queue.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    priority: i32,
}

/// A queue consumed in descending priority order, FIFO within a priority.
///
/// The queue remembers the lowest and highest priority it has seen, so
/// [`push`](Self::push) and [`shift`](Self::shift) can place an item below
/// or above everything added so far.
#[derive(Debug, Clone)]
pub struct ItemQueue<T> {
    entries: VecDeque<Entry<T>>,
    lower: i32,
    upper: i32,
}

impl<T> Default for ItemQueue<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            lower: 0,
            upper: 0,
        }
    }
}

impl<T> ItemQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item with the given priority.
    pub fn add(&mut self, item: T, priority: i32) -> &mut Self {
        self.upper = self.upper.max(priority);
        self.lower = self.lower.min(priority);

        let index = self.entries.partition_point(|e| e.priority >= priority);
        self.entries.insert(index, Entry { item, priority });
        self
    }

    /// Insert an item below everything added so far.
    pub fn push(&mut self, item: T) -> &mut Self {
        let priority = self.lower.saturating_sub(1);
        self.add(item, priority)
    }

    /// Insert an item above everything added so far.
    pub fn shift(&mut self, item: T) -> &mut Self {
        let priority = self.upper.saturating_add(1);
        self.add(item, priority)
    }

    /// Remove and return the highest priority item.
    pub fn consume(&mut self) -> Option<T> {
        self.entries.pop_front().map(|e| e.item)
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Priorities of the queued items, in consumption order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|e| e.priority)
    }
}
