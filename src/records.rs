//! Data types flowing through the chart pipelines.

use crate::error::LoadError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A single row deserialized from a sales CSV file.
///
/// Every measure is optional at parse time; each pipeline only demands the
/// columns it actually plots.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SalesRow {
    /// 1-based source line, filled in by the loader.
    #[serde(skip)]
    pub line: u64,

    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Order Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Sales")]
    pub sales: Option<f64>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<f64>,
    #[serde(rename = "Discount")]
    pub discount: Option<f64>,
    #[serde(rename = "Profit")]
    pub profit: Option<f64>,
}

impl SalesRow {
    fn require<T: Clone>(&self, value: &Option<T>, field: &'static str) -> Result<T, LoadError> {
        value.clone().ok_or(LoadError::MissingField {
            line: self.line,
            field,
        })
    }
}

/// Input to the bar pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitRecord {
    pub category: String,
    pub profit: f64,
}

impl TryFrom<&SalesRow> for ProfitRecord {
    type Error = LoadError;

    fn try_from(row: &SalesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: row.require(&row.category, "Category")?,
            profit: row.require(&row.profit, "Profit")?,
        })
    }
}

/// Input to the scatter pipeline: x = sales, y = profit, colour = discount.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PointRecord {
    pub sales: f64,
    pub profit: f64,
    pub discount: f64,
    pub category: String,
}

impl TryFrom<&SalesRow> for PointRecord {
    type Error = LoadError;

    fn try_from(row: &SalesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            sales: row.require(&row.sales, "Sales")?,
            profit: row.require(&row.profit, "Profit")?,
            discount: row.require(&row.discount, "Discount")?,
            category: row.require(&row.category, "Category")?,
        })
    }
}

/// Input to the heatmap pipeline. The date stays raw until aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityRecord {
    pub category: String,
    pub order_date: String,
    pub quantity: f64,
}

impl TryFrom<&SalesRow> for QuantityRecord {
    type Error = LoadError;

    fn try_from(row: &SalesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: row.require(&row.category, "Category")?,
            order_date: row.require(&row.order_date, "Order Date")?,
            quantity: row.require(&row.quantity, "Quantity")?,
        })
    }
}

/// Composite heatmap key. Orders by category first, then year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct CategoryYear {
    pub category: String,
    pub year: i32,
}

impl CategoryYear {
    pub fn new(category: impl Into<String>, year: i32) -> Self {
        Self {
            category: category.into(),
            year,
        }
    }
}

/// Key to summed-measure mapping produced by a grouping reduction.
///
/// Keys iterate in ascending order, which is the display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<K: Ord> {
    totals: BTreeMap<K, f64>,
}

impl<K: Ord> Default for Summary<K> {
    fn default() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Summary<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the summary with `value` added to the running total for `key`.
    pub fn with(mut self, key: K, value: f64) -> Self {
        *self.totals.entry(key).or_insert(0.0) += value;
        self
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.totals.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.totals.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.totals.iter().map(|(k, v)| (k, *v))
    }

    /// Sum of every accumulated value.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

impl<K: Ord + Serialize> Serialize for Summary<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(key, value)| SummaryEntry { key, value }))
    }
}

struct SummaryEntry<'a, K> {
    key: &'a K,
    value: f64,
}

impl<K: Serialize> Serialize for SummaryEntry<'_, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_struct("SummaryEntry", 2)?;
        entry.serialize_field("key", self.key)?;
        entry.serialize_field("value", &self.value)?;
        entry.end()
    }
}

/// Order-preserving prefix of the scatter records, bounded by `cap`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PointSample {
    pub(crate) points: Vec<PointRecord>,
    pub(crate) cap: usize,
}

impl PointSample {
    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_with_accumulates() {
        let summary = Summary::new().with("A", 10.0).with("B", 5.0).with("A", 3.0);

        assert_eq!(summary.get(&"A"), Some(13.0));
        assert_eq!(summary.get(&"B"), Some(5.0));
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.total(), 18.0);
    }

    #[test]
    fn test_summary_keys_sorted() {
        let summary = Summary::new()
            .with("Technology".to_string(), 1.0)
            .with("Furniture".to_string(), 1.0)
            .with("Office Supplies".to_string(), 1.0);

        let keys: Vec<_> = summary.keys().cloned().collect();
        assert_eq!(keys, vec!["Furniture", "Office Supplies", "Technology"]);
    }

    #[test]
    fn test_category_year_orders_by_category_then_year() {
        let mut keys = vec![
            CategoryYear::new("B", 2019),
            CategoryYear::new("A", 2021),
            CategoryYear::new("A", 2018),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CategoryYear::new("A", 2018),
                CategoryYear::new("A", 2021),
                CategoryYear::new("B", 2019),
            ]
        );
    }

    #[test]
    fn test_summary_serializes_as_entries() {
        let summary = Summary::new().with(CategoryYear::new("A", 2020), 4.0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "key": { "category": "A", "year": 2020 }, "value": 4.0 }])
        );
    }

    #[test]
    fn test_missing_field_reports_line() {
        let row = SalesRow {
            line: 7,
            category: Some("A".into()),
            ..Default::default()
        };
        let err = ProfitRecord::try_from(&row).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                line: 7,
                field: "Profit"
            }
        ));
    }
}
