//! Grouping reductions that turn typed records into chart-ready summaries.

use crate::date::order_year;
use crate::error::MalformedDateError;
use crate::records::{CategoryYear, PointRecord, PointSample, ProfitRecord, QuantityRecord, Summary};
use std::convert::Infallible;

/// Default upper bound on plotted scatter points.
pub const DEFAULT_SAMPLE_CAP: usize = 1000;

/// Folds `records` into a [`Summary`], adding `measure` under the key
/// produced by `key`. Stops at the first key error.
pub fn sum_by<R, K, E>(
    records: &[R],
    key: impl Fn(&R) -> Result<K, E>,
    measure: impl Fn(&R) -> f64,
) -> Result<Summary<K>, E>
where
    K: Ord,
{
    records
        .iter()
        .try_fold(Summary::new(), |acc, record| Ok(acc.with(key(record)?, measure(record))))
}

/// Total profit per category.
pub fn sum_by_category(records: &[ProfitRecord]) -> Summary<String> {
    let Ok(summary) = sum_by::<_, _, Infallible>(records, |r| Ok(r.category.clone()), |r| r.profit);
    summary
}

/// Total quantity per (category, order year).
///
/// # Errors
///
/// Returns [`MalformedDateError`] for the first order date that cannot be
/// normalized to a year.
pub fn sum_by_category_and_year(
    records: &[QuantityRecord],
) -> Result<Summary<CategoryYear>, MalformedDateError> {
    sum_by(
        records,
        |r| Ok(CategoryYear::new(r.category.clone(), order_year(&r.order_date)?)),
        |r| r.quantity,
    )
}

/// Keeps the first `limit` records in input order.
pub fn cap_sample(records: impl IntoIterator<Item = PointRecord>, limit: usize) -> PointSample {
    PointSample {
        points: records.into_iter().take(limit).collect(),
        cap: limit,
    }
}
