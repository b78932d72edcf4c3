//! Reductions over the sale records of one month.
//!
//! Every function here is pure: the caller selects the records with a month
//! filter and these functions only count and sum them.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::record::SaleRecord;

/// Totals for the sold and unsold records of a month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStatistics {
    /// The sum of the prices of the sold records.
    pub total_sale_amount: f64,
    /// The number of sold records.
    pub total_sold_items: u64,
    /// The number of records that were not sold.
    pub total_not_sold_items: u64,
}

/// Sum the prices of the sold records and count the sold and unsold records.
pub fn summarize(records: &[SaleRecord]) -> SaleStatistics {
    records
        .iter()
        .fold(SaleStatistics::default(), |mut statistics, record| {
            if record.sold {
                statistics.total_sale_amount += record.price;
                statistics.total_sold_items += 1;
            } else {
                statistics.total_not_sold_items += 1;
            }

            statistics
        })
}

/// The upper (inclusive) price of each bucket except the last.
const PRICE_THRESHOLDS: [f64; 9] = [100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 900.0];

/// The labels of the price buckets, in ascending order.
pub const PRICE_BUCKET_LABELS: [&str; 10] = [
    "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700", "701-800",
    "801-900", "901+",
];

/// The number of records in each of the ten fixed price ranges.
///
/// Serializes as a JSON object keyed by [PRICE_BUCKET_LABELS] in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; PRICE_BUCKET_LABELS.len()],
}

impl PriceHistogram {
    /// The bucket labels paired with their counts, in ascending order.
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        PRICE_BUCKET_LABELS.into_iter().zip(self.counts.iter().copied())
    }

    /// The total number of records across all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;

        for (label, count) in self.buckets() {
            map.serialize_entry(label, &count)?;
        }

        map.end()
    }
}

/// The index of the bucket for `price`.
///
/// Prices on a multiple of 100 fall in the lower bucket, e.g. 100 is in "0-100".
fn price_bucket(price: f64) -> usize {
    PRICE_THRESHOLDS
        .iter()
        .position(|&threshold| price <= threshold)
        .unwrap_or(PRICE_THRESHOLDS.len())
}

/// Count the records in each price range.
pub fn price_histogram(records: &[SaleRecord]) -> PriceHistogram {
    let mut histogram = PriceHistogram::default();

    for record in records {
        histogram.counts[price_bucket(record.price)] += 1;
    }

    histogram
}

/// The number of records in each category, sorted by category name.
pub type CategoryCounts = BTreeMap<String, u64>;

/// Count the records in each category.
///
/// Records without a category are not counted.
pub fn category_histogram(records: &[SaleRecord]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();

    for record in records.iter().filter(|record| !record.category.is_empty()) {
        *counts.entry(record.category.clone()).or_insert(0) += 1;
    }

    counts
}

/// The statistics, price ranges and category counts of a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    /// The sale totals, see [summarize].
    pub statistics: SaleStatistics,
    /// The price range counts, see [price_histogram].
    pub price_ranges: PriceHistogram,
    /// The category counts, see [category_histogram].
    pub category_counts: CategoryCounts,
}

/// Compute the statistics, price ranges and category counts of `records` in one report.
pub fn combined(records: &[SaleRecord]) -> MonthlyReport {
    MonthlyReport {
        statistics: summarize(records),
        price_ranges: price_histogram(records),
        category_counts: category_histogram(records),
    }
}
