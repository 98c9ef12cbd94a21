//! Memoization of computed views
//!
//! A view is a pure function of (dataset version, filters, sort, page), so a
//! result computed once can be served again until the dataset is replaced.

use crate::core::error::Result;
use crate::core::page::ViewResult;
use crate::core::row::Dataset;
use crate::view::ViewState;
use indexmap::IndexMap;
use std::sync::RwLock;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// Dataset versions kept at once: the newest seen and the one before it
const MAX_VERSIONS: usize = 2;

/// Entries grouped by dataset version, versions in first-seen order
#[derive(Debug, Default)]
struct CacheInner {
    versions: IndexMap<Uuid, IndexMap<String, ViewResult>>,
}

impl CacheInner {
    fn get(&self, version: Uuid, key: &str) -> Option<&ViewResult> {
        self.versions.get(&version)?.get(key)
    }

    fn len(&self) -> usize {
        self.versions.values().map(IndexMap::len).sum()
    }

    fn insert(&mut self, version: Uuid, key: String, result: ViewResult, capacity: usize) {
        if !self.versions.contains_key(&version) {
            self.versions.insert(version, IndexMap::new());
            while self.versions.len() > MAX_VERSIONS {
                self.versions.shift_remove_index(0);
            }
        }

        if self.len() >= capacity
            && let Some(oldest) = self.versions.values_mut().find(|e| !e.is_empty())
        {
            oldest.shift_remove_index(0);
        }

        if let Some(entries) = self.versions.get_mut(&version) {
            entries.insert(key, result);
        }
    }
}

/// Bounded cache of [`ViewResult`]s keyed by dataset version and view state
///
/// Entries are evicted oldest-first once the capacity is reached. Only the two
/// most recently seen dataset versions are kept, so a late render of an older
/// snapshot never wipes the entries of the current one. A poisoned lock
/// degrades to computing without the cache.
#[derive(Debug)]
pub struct ViewCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Serve the view for `state` over `dataset`, computing it on a miss
    ///
    /// Errors are never cached.
    pub fn get_or_compute(&self, dataset: &Dataset, state: &ViewState) -> Result<ViewResult> {
        let key = cache_key(state);
        let version = dataset.version();

        if let Ok(inner) = self.inner.read()
            && let Some(hit) = inner.get(version, &key)
        {
            tracing::trace!(%version, "view cache hit");
            return Ok(hit.clone());
        }

        tracing::trace!(%version, "view cache miss");
        let result = state.compute(dataset)?;

        if let Ok(mut inner) = self.inner.write() {
            inner.insert(version, key, result.clone(), self.capacity);
        }

        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.versions.clear();
        }
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical key for a view state
///
/// Predicates are keyed in field order so two filter sets that differ only in
/// insertion order share an entry. The `Debug` form keeps every float
/// distinct (`inf`, `-inf` and `NaN` included), which JSON would collapse
/// to `null`.
fn cache_key(state: &ViewState) -> String {
    let mut filters: Vec<_> = state.filters.iter().collect();
    filters.sort_by(|a, b| a.0.cmp(b.0));

    format!("{:?}", (filters, &state.sort, state.page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterPredicate;
    use crate::core::row::Row;

    fn dataset() -> Dataset {
        (1..=30).map(|i| Row::new().with("score", i)).collect()
    }

    #[test]
    fn test_hit_returns_same_result() {
        let cache = ViewCache::new();
        let data = dataset();
        let state = ViewState::new(10).unwrap().toggle_sort("score");

        let first = cache.get_or_compute(&data, &state).unwrap();
        let second = cache.get_or_compute(&data, &state).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_filter_order_shares_entry() {
        let cache = ViewCache::new();
        let data = dataset();
        let base = ViewState::new(10).unwrap();
        let a = base
            .with_filter("score", FilterPredicate::in_range(1, 20).unwrap())
            .with_filter("name", FilterPredicate::contains("x"));
        let b = base
            .with_filter("name", FilterPredicate::contains("x"))
            .with_filter("score", FilterPredicate::in_range(1, 20).unwrap());

        cache.get_or_compute(&data, &a).unwrap();
        cache.get_or_compute(&data, &b).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_only_two_dataset_versions_are_kept() {
        let cache = ViewCache::new();
        let state = ViewState::new(10).unwrap();

        for _ in 0..3 {
            cache.get_or_compute(&dataset(), &state).unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_late_render_of_older_version_keeps_newer_entries() {
        let cache = ViewCache::new();
        let old = dataset();
        let new: Dataset = (1..=5).map(|i| Row::new().with("score", i)).collect();
        let state = ViewState::new(10).unwrap();

        cache.get_or_compute(&old, &state).unwrap();
        cache.get_or_compute(&new, &state).unwrap();
        cache.get_or_compute(&old, &state.goto_page(2)).unwrap();
        assert_eq!(cache.len(), 3);

        let current = cache.get_or_compute(&new, &state).unwrap();
        assert_eq!(current.total_matched_count, 5);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_infinite_bounds_get_distinct_entries() {
        let cache = ViewCache::new();
        let data: Dataset = [f64::INFINITY, 1.0, f64::NEG_INFINITY]
            .into_iter()
            .map(|x| Row::new().with("x", x))
            .collect();
        let base = ViewState::new(10).unwrap();
        let all = base.with_filter(
            "x",
            FilterPredicate::in_range(f64::NEG_INFINITY, f64::INFINITY).unwrap(),
        );
        let top = base.with_filter(
            "x",
            FilterPredicate::in_range(f64::INFINITY, f64::INFINITY).unwrap(),
        );

        assert_eq!(cache.get_or_compute(&data, &all).unwrap().total_matched_count, 3);
        let cached = cache.get_or_compute(&data, &top).unwrap();
        assert_eq!(cached, top.compute(&data).unwrap());
        assert_eq!(cached.total_matched_count, 1);
    }

    #[test]
    fn test_opposite_infinities_in_equals_do_not_collide() {
        let cache = ViewCache::new();
        let data: Dataset = [f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY]
            .into_iter()
            .map(|x| Row::new().with("x", x))
            .collect();
        let base = ViewState::new(10).unwrap();
        let pos = base.with_filter("x", FilterPredicate::equals(f64::INFINITY).unwrap());
        let neg = base.with_filter("x", FilterPredicate::equals(f64::NEG_INFINITY).unwrap());

        assert_eq!(cache.get_or_compute(&data, &pos).unwrap().total_matched_count, 1);
        assert_eq!(cache.get_or_compute(&data, &neg).unwrap().total_matched_count, 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ViewCache::with_capacity(2);
        let data = dataset();
        let state = ViewState::new(10).unwrap();

        for page in 0..3 {
            cache.get_or_compute(&data, &state.goto_page(page)).unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = ViewCache::new();
        let data: Dataset = vec![Row::new().with("v", 1), Row::new().with("v", "one")]
            .into_iter()
            .collect();
        let state = ViewState::new(10).unwrap().toggle_sort("v");

        assert!(cache.get_or_compute(&data, &state).is_err());
        assert!(cache.is_empty());
    }
}
