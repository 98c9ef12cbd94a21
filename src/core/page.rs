//! Pagination engine and page metadata

use crate::core::error::{GridError, Result};
use crate::core::row::Row;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Requested page: fixed size, zero-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub page_size: usize,
    pub page_index: usize,
}

impl PageSpec {
    pub fn new(page_size: usize, page_index: usize) -> Result<Self> {
        let spec = Self {
            page_size,
            page_index,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// First page of the given size
    pub fn first(page_size: usize) -> Result<Self> {
        Self::new(page_size, 0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPageSize { page_size: 0 });
        }
        Ok(())
    }

    pub fn with_index(self, page_index: usize) -> Self {
        Self { page_index, ..self }
    }
}

/// `ceil(total / page_size)`, zero only when there is nothing to show
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 {
        0
    } else {
        total.div_ceil(page_size.max(1))
    }
}

/// Clamp a requested page index into `[0, max(total_pages - 1, 0)]`
pub fn clamp_page_index(page_index: usize, total_pages: usize) -> usize {
    page_index.min(total_pages.saturating_sub(1))
}

/// The display-ready slice of a view plus pagination state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    /// Rows on the current page, in display order
    pub visible_rows: Vec<Row>,

    /// Rows satisfying every active predicate
    pub total_matched_count: usize,

    pub total_page_count: usize,

    /// Effective page index, after clamping
    pub page_index: usize,

    pub page_size: usize,
}

impl ViewResult {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.page_index, self.page_size, self.total_matched_count)
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }
}

/// Pagination metadata for page controls
///
/// Pages and items are 1-based here, as they are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// 1-based number of the first item on the page (0 when empty)
    pub first_item: usize,

    /// 1-based number of the last item on the page (0 when empty)
    pub last_item: usize,
}

impl PaginationMeta {
    /// Create pagination metadata from a zero-based page index
    pub fn new(page_index: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total_pages(total, limit);
        let page_index = clamp_page_index(page_index, total_pages);
        let start = page_index * limit;

        let (first_item, last_item) = if total == 0 {
            (0, 0)
        } else {
            (start + 1, (start + limit).min(total))
        };

        Self {
            page: page_index + 1,
            limit,
            total,
            total_pages,
            has_next: page_index + 1 < total_pages,
            has_prev: page_index > 0,
            first_item,
            last_item,
        }
    }
}

/// Zero-based page indices to render as page buttons
///
/// A window of at most `max_buttons` pages, centered on `page_index` and
/// shifted so it never runs past either end.
pub fn page_window(page_index: usize, total_pages: usize, max_buttons: usize) -> Range<usize> {
    let width = max_buttons.min(total_pages);
    if width == 0 {
        return 0..0;
    }

    let current = clamp_page_index(page_index, total_pages);
    let start = current.saturating_sub(width / 2).min(total_pages - width);
    start..start + width
}

/// Slice borrowed, already ordered rows into the requested page
pub(crate) fn paginate_rows(rows: &[&Row], spec: PageSpec) -> Result<ViewResult> {
    spec.validate()?;

    let total = rows.len();
    let pages = total_pages(total, spec.page_size);
    let page_index = clamp_page_index(spec.page_index, pages);
    if page_index != spec.page_index {
        tracing::debug!(
            requested = spec.page_index,
            clamped = page_index,
            pages,
            "page index out of range, clamped"
        );
    }

    let start = (page_index * spec.page_size).min(total);
    let end = (start + spec.page_size).min(total);

    Ok(ViewResult {
        visible_rows: rows[start..end].iter().copied().cloned().collect(),
        total_matched_count: total,
        total_page_count: pages,
        page_index,
        page_size: spec.page_size,
    })
}

/// Slice an ordered, filtered sequence into the requested page
///
/// The page index is clamped into range first, so asking past the end yields
/// the last page rather than an empty one.
pub fn apply_pagination(rows: &[Row], spec: PageSpec) -> Result<ViewResult> {
    let refs: Vec<&Row> = rows.iter().collect();
    paginate_rows(&refs, spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: i64) -> Vec<Row> {
        (1..=n).map(|i| Row::new().with("n", i)).collect()
    }

    fn values(result: &ViewResult) -> Vec<i64> {
        result
            .visible_rows
            .iter()
            .filter_map(|r| r.get("n").and_then(|v| v.as_integer()))
            .collect()
    }

    #[test]
    fn test_page_spec_rejects_zero_size() {
        let err = PageSpec::new(0, 0).unwrap_err();
        assert_eq!(err, GridError::InvalidPageSize { page_size: 0 });
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_apply_pagination_slices() {
        let rows = numbered(25);
        let result = apply_pagination(&rows, PageSpec::new(10, 1).unwrap()).unwrap();

        assert_eq!(values(&result), (11..=20).collect::<Vec<_>>());
        assert_eq!(result.total_matched_count, 25);
        assert_eq!(result.total_page_count, 3);
    }

    #[test]
    fn test_last_page_is_partial() {
        let rows = numbered(25);
        let result = apply_pagination(&rows, PageSpec::new(10, 2).unwrap()).unwrap();
        assert_eq!(values(&result), vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_index_past_end_clamps_to_last_page() {
        let rows = numbered(25);
        let result = apply_pagination(&rows, PageSpec::new(10, 9).unwrap()).unwrap();
        assert_eq!(result.page_index, 2);
        assert_eq!(result.visible_rows.len(), 5);
    }

    #[test]
    fn test_empty_input() {
        let result = apply_pagination(&[], PageSpec::new(10, 3).unwrap()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_page_count, 0);
        assert_eq!(result.page_index, 0);
    }

    #[test]
    fn test_deserialized_zero_page_size_is_rejected() {
        let spec: PageSpec = serde_json::from_str(r#"{"pageSize":0,"pageIndex":0}"#).unwrap();
        assert!(apply_pagination(&numbered(3), spec).is_err());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(0, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
        assert_eq!((meta.first_item, meta.last_item), (1, 20));
    }

    #[test]
    fn test_pagination_meta_last_page() {
        let meta = PaginationMeta::new(7, 20, 145);
        assert_eq!(meta.page, 8);
        assert!(meta.has_prev);
        assert!(!meta.has_next);
        assert_eq!((meta.first_item, meta.last_item), (141, 145));
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(0, 10, 0);
        assert_eq!(meta.page, 1);
        assert_eq!((meta.first_item, meta.last_item), (0, 0));
        assert!(!meta.has_next);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(0, 10, 5), 0..5);
        assert_eq!(page_window(5, 10, 5), 3..8);
        assert_eq!(page_window(9, 10, 5), 5..10);
        assert_eq!(page_window(1, 3, 5), 0..3);
        assert_eq!(page_window(0, 0, 5), 0..0);
    }
}
