//! Preferred-size memoization.

use crate::element::ElementId;
use arrange_core::Size;
use std::collections::HashMap;

/// Cache key combining element identity and the proposed constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Element being measured
    pub element: ElementId,
    /// Constraint after zero-to-unbounded conversion and max clamping
    pub proposed: Size,
}

/// Memoized preferred sizes.
///
/// Entries are grouped per element so that invalidating one element does not
/// scan the whole cache. Every mutation that can change a preferred size
/// invalidates the element and its ancestors.
#[derive(Debug, Default)]
pub struct PreferredSizeCache {
    entries: HashMap<ElementId, HashMap<Size, Size>>,
    hits: usize,
    misses: usize,
}

impl PreferredSizeCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached size.
    pub fn get(&mut self, key: CacheKey) -> Option<Size> {
        let found = self
            .entries
            .get(&key.element)
            .and_then(|sizes| sizes.get(&key.proposed))
            .copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Insert a computed size into the cache.
    pub fn insert(&mut self, key: CacheKey, size: Size) {
        self.entries
            .entry(key.element)
            .or_default()
            .insert(key.proposed, size);
    }

    /// Drop every entry of one element.
    pub fn invalidate(&mut self, element: ElementId) {
        self.entries.remove(&element);
    }

    /// Clear the entire cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Get the number of cache hits.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of cache misses.
    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }

    /// Get the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }
}
