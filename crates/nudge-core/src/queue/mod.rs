//! Pending notification candidates in dispatch order.
//!
//! Backed by a binary heap. Expired items stay in the heap until a pop
//! reaches them or [`PriorityQueue::sweep_expired`] runs; pops never return
//! them.

mod item;
mod stats;

pub use item::PriorityQueueItem;
pub use stats::QueueStatistics;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use chrono::{DateTime, Utc};

use crate::priority::{NotificationPriority, PriorityLevel};

struct Entry {
    item: PriorityQueueItem,
    /// Insertion counter; earlier inserts win exact ties.
    seq: u64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item
            .dispatch_cmp(&other.item)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

#[derive(Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PriorityQueueItem) {
        tracing::debug!(
            id = %item.id,
            category = %item.category,
            level = %item.priority.level(),
            "queued notification"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { item, seq });
    }

    /// Items physically held, expired ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Highest-priority item still valid at `now`, dropping expired items
    /// found on the way.
    pub fn pop(&mut self, now: DateTime<Utc>) -> Option<PriorityQueueItem> {
        while let Some(entry) = self.heap.pop() {
            if entry.item.is_valid_at(now) {
                return Some(entry.item);
            }
            log_expired(&entry.item);
        }
        None
    }

    /// Like [`pop`](Self::pop), but only items whose scheduled time has
    /// come. Items not yet due stay queued.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<PriorityQueueItem> {
        let mut not_due = Vec::new();
        let mut found = None;
        while let Some(entry) = self.heap.pop() {
            if !entry.item.is_valid_at(now) {
                log_expired(&entry.item);
                continue;
            }
            if entry.item.is_due(now) {
                found = Some(entry.item);
                break;
            }
            not_due.push(entry);
        }
        self.heap.extend(not_due);
        found
    }

    /// Highest-priority valid item without removing it.
    pub fn peek(&mut self, now: DateTime<Utc>) -> Option<&PriorityQueueItem> {
        while self.heap.peek().is_some_and(|e| !e.item.is_valid_at(now)) {
            if let Some(entry) = self.heap.pop() {
                log_expired(&entry.item);
            }
        }
        self.heap.peek().map(|e| &e.item)
    }

    /// Earliest scheduled time among valid items.
    pub fn next_due_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.heap
            .iter()
            .filter(|e| e.item.is_valid_at(now))
            .map(|e| e.item.scheduled_time)
            .min()
    }

    /// Drop every expired item. Returns how many were removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.heap.len();
        self.heap.retain(|e| e.item.is_valid_at(now));
        let removed = before - self.heap.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired notifications");
        }
        removed
    }

    /// Drop every item of `category`. Returns how many were removed.
    pub fn remove_category(&mut self, category: &str) -> usize {
        let before = self.heap.len();
        self.heap.retain(|e| e.item.category != category);
        before - self.heap.len()
    }

    /// Give every queued item of `category` a new priority, keeping its
    /// schedule. Returns how many items changed.
    pub fn reprioritize(&mut self, category: &str, priority: &NotificationPriority) -> usize {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let mut changed = 0;
        for entry in entries.iter_mut().filter(|e| e.item.category == category) {
            entry.item.priority = priority.clone();
            changed += 1;
        }
        self.heap = BinaryHeap::from(entries);
        changed
    }

    /// All items in dispatch order, expired ones included.
    pub fn items_sorted(&self) -> Vec<&PriorityQueueItem> {
        let mut entries: Vec<&Entry> = self.heap.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|e| &e.item).collect()
    }

    pub fn level_distribution(&self) -> BTreeMap<PriorityLevel, usize> {
        let mut out = BTreeMap::new();
        for entry in self.heap.iter() {
            *out.entry(entry.item.priority.level()).or_insert(0) += 1;
        }
        out
    }

    pub fn category_distribution(&self) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for entry in self.heap.iter() {
            *out.entry(entry.item.category.clone()).or_insert(0) += 1;
        }
        out
    }
}

fn log_expired(item: &PriorityQueueItem) {
    tracing::debug!(id = %item.id, category = %item.category, "dropped expired notification");
}
