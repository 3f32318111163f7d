//! Date-range bucketing for dashboard reports.
//!
//! A report range ends at "now" and starts one granularity unit earlier.
//! Records are bucketed by a formatted label -- hour of day for `day`,
//! calendar day for `week`, calendar month for `month` and `year` -- and
//! returned in chronological order of first occurrence.

use chrono::{Duration, Months};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Granularity of a dashboard report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRange {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl ReportRange {
    /// The `{start, end}` window for this range, ending at `now`.
    pub fn window(&self, now: Timestamp) -> (Timestamp, Timestamp) {
        let start = match self {
            ReportRange::Day => now - Duration::days(1),
            ReportRange::Week => now - Duration::days(7),
            // Month arithmetic clamps (e.g. Mar 31 - 1 month = Feb 28).
            ReportRange::Month => now - Months::new(1),
            ReportRange::Year => now - Months::new(12),
        };
        (start, now)
    }

    /// Bucket label for a record timestamp at this granularity.
    fn label(&self, at: Timestamp) -> String {
        match self {
            ReportRange::Day => at.format("%H:00").to_string(),
            ReportRange::Week => at.format("%d/%m").to_string(),
            ReportRange::Month | ReportRange::Year => at.format("%m/%Y").to_string(),
        }
    }
}

/// One `{label, count}` pair of a bucketed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: i64,
}

/// Bucket record timestamps into labelled counts.
///
/// Input order does not matter; records are sorted first so the output is
/// chronological. Buckets with no records simply do not appear.
pub fn bucket_by_label(timestamps: &[Timestamp], range: ReportRange) -> Vec<Bucket> {
    let mut sorted = timestamps.to_vec();
    sorted.sort();

    let mut buckets: Vec<Bucket> = Vec::new();
    for at in sorted {
        let label = range.label(at);
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket { label, count: 1 }),
        }
    }
    buckets
}

/// One bucket of a report that also aggregates a value per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueBucket {
    pub label: String,
    pub count: i64,
    pub sum: f64,
}

/// Bucket `(timestamp, value)` samples into labelled counts and sums.
///
/// Same ordering rules as [`bucket_by_label`]; the per-bucket mean is
/// `mean(sum, count)`.
pub fn bucket_values(samples: &[(Timestamp, f64)], range: ReportRange) -> Vec<ValueBucket> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|(at, _)| *at);

    let mut buckets: Vec<ValueBucket> = Vec::new();
    for (at, value) in sorted {
        let label = range.label(at);
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.sum += value;
            }
            None => buckets.push(ValueBucket {
                label,
                count: 1,
                sum: value,
            }),
        }
    }
    buckets
}

/// `part / whole` as a percentage; 0.0 when `whole` is zero.
pub fn ratio_pct(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// Arithmetic mean; 0.0 for an empty set (never NaN).
pub fn mean(sum: f64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
