//! Caller-owned interpolation cache
//!
//! The engine itself keeps no process-wide state; callers that re-query the
//! same family (browsers paging through QL ranges, the equipability
//! resolver's binary search) may own one of these instead. Purely an
//! optimization: correctness never depends on it.

use indexmap::IndexMap;
use tinkerql_model::InterpolatedItem;

/// Bounded memo of `(item name, target QL) -> InterpolatedItem`.
///
/// Eviction is oldest-insertion-first (FIFO) once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct InterpolationCache {
    capacity: usize,
    entries: IndexMap<(String, i32), InterpolatedItem>,
}

impl InterpolationCache {
    /// A zero capacity disables the cache.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str, target_ql: i32) -> Option<&InterpolatedItem> {
        self.entries.get(&(name.to_string(), target_ql))
    }

    pub fn insert(&mut self, item: InterpolatedItem) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        let key = (item.variant.name.clone(), item.variant.quality_level);
        self.entries.insert(key, item);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
