//! Fixed-capacity, newest-first history buffer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Default number of entries kept by a [`BoundedHistory`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Newest-first ring buffer with explicit eviction of the oldest entry.
///
/// Serializes as a plain JSON array. Deserializing keeps the first
/// [`DEFAULT_HISTORY_CAPACITY`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(serialize = "T: Clone + Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history with the given capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert `item` as the newest entry, returning the evicted oldest entry if the
    /// buffer was full.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        self.entries.push_front(item);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Remove every entry matching `pred`; returns how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(e));
        before - self.entries.len()
    }

    /// Find the newest entry matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.entries.iter().find(|e| pred(e))
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for BoundedHistory<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> From<Vec<T>> for BoundedHistory<T> {
    fn from(items: Vec<T>) -> Self {
        let mut entries: VecDeque<T> = items.into();
        entries.truncate(DEFAULT_HISTORY_CAPACITY);
        Self {
            entries,
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl<T> From<BoundedHistory<T>> for Vec<T> {
    fn from(history: BoundedHistory<T>) -> Self {
        history.entries.into()
    }
}

/// The persisted saved-search blob: `{ "searches": [...] }`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearches {
    /// Stored analysis records.
    #[serde(default)]
    pub searches: BoundedHistory<AnalysisResult>,
}
