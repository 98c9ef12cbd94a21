//! Numeric column summaries (leaderboard footers, KPI tiles)

use crate::core::row::Row;
use serde::Serialize;

/// Aggregate over the numeric values of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub field: String,
    /// Rows that contributed a numeric value
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize `field` over `rows`
///
/// Non-numeric, null and missing values are skipped, as are NaNs. Returns
/// `None` when nothing numeric remains.
pub fn summarize<'a, I>(rows: I, field: &str) -> Option<ColumnSummary>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for x in rows
        .into_iter()
        .filter_map(|row| row.get(field).and_then(|v| v.as_f64()))
        .filter(|x| !x.is_nan())
    {
        count += 1;
        sum += x;
        min = min.min(x);
        max = max.max(x);
    }

    (count > 0).then(|| ColumnSummary {
        field: field.to_string(),
        count,
        sum,
        mean: sum / count as f64,
        min,
        max,
    })
}
