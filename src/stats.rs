//! Period aggregation and period-over-period comparison.

use serde::Serialize;

use crate::period::{window_pair, PeriodUnit, PeriodWindow};
use crate::records::NormalizedVisit;

/// How the current period compares to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Sum for the preceding window
    pub previous: u64,
    /// current - previous
    pub change: i64,
    /// Rounded percent change relative to previous; 0 when the
    /// previous period had no visitors (defined, not an error).
    pub change_percent: i64,
}

/// Summary-card payload for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub label: String,
    /// Sum of visit totals in the current window
    pub value: u64,
    /// Display string for the window, e.g. "01 Mar 2025 - 31 Mar 2025"
    pub period: String,
    /// None when no comparison was requested — distinct from a
    /// comparison that happens to be flat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

/// Sum of visit totals whose date falls inside the window.
///
/// Membership is a closed interval: a record dated exactly on the
/// window's first or last day counts. Records with no parseable date
/// are skipped.
pub fn sum_in_window(records: &[NormalizedVisit], window: &PeriodWindow) -> u64 {
    records
        .iter()
        .filter(|r| matches!(r.date, Some(d) if window.contains_date(d)))
        .map(|r| r.total as u64)
        .sum()
}

/// Aggregate records into a stats card for the given window pair.
pub fn aggregate(
    records: &[NormalizedVisit],
    label: &str,
    current: &PeriodWindow,
    previous: &PeriodWindow,
    show_comparison: bool,
) -> PeriodStats {
    let value = sum_in_window(records, current);

    let comparison = show_comparison.then(|| {
        let prev = sum_in_window(records, previous);
        let change = value as i64 - prev as i64;
        let change_percent = if prev > 0 {
            ((change as f64 / prev as f64) * 100.0).round() as i64
        } else {
            0
        };
        Comparison {
            previous: prev,
            change,
            change_percent,
        }
    });

    PeriodStats {
        label: label.to_string(),
        value,
        period: current.label.clone(),
        comparison,
    }
}

/// Convenience wrapper that derives the window pair from a unit and a
/// reference date.
pub fn aggregate_unit(
    records: &[NormalizedVisit],
    unit: PeriodUnit,
    today: chrono::NaiveDate,
    show_comparison: bool,
) -> PeriodStats {
    let (current, previous) = window_pair(unit, today);
    let label = format!("Visitors this {}", unit.display_name());
    aggregate(records, &label, &current, &previous, show_comparison)
}
