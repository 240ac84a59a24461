//! Deduplicating record store.
//!
//! A virtualized list re-surfaces the same items on every scroll pass, so the
//! harvesting loop extracts everything visible each cycle and relies on this
//! store to keep exactly one copy per identity triple.

use std::collections::HashSet;

use crate::models::{RecordKey, ScheduleItem};

/// Insertion-ordered collection of schedule records, unique by
/// (date, time, code). The first extraction of a key wins; later duplicates
/// never replace its fields.
#[derive(Debug, Default)]
pub struct RecordStore {
    seen: HashSet<RecordKey>,
    items: Vec<ScheduleItem>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` unless its key is already present.
    /// Returns whether the item was newly added.
    pub fn insert(&mut self, item: ScheduleItem) -> bool {
        if !self.seen.insert(item.key()) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Consumes the store, yielding records in first-seen order.
    pub fn into_items(self) -> Vec<ScheduleItem> {
        self.items
    }
}
