//! Period window calculation for week/month/year rollups.
//!
//! Windows are computed relative to an explicit reference date so that
//! aggregation stays deterministic under test; nothing in this module
//! reads the wall clock.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime};

/// Unit of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    /// Sunday-based week (7 days)
    Week,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
}

impl PeriodUnit {
    /// Returns a display name for the unit.
    pub fn display_name(&self) -> &'static str {
        match self {
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

/// A closed date-time interval covering whole days.
///
/// `start` is midnight of the first day, `end` is the last millisecond
/// (23:59:59.999) of the last day, so closed-interval membership checks
/// include everything recorded on the boundary days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Human-readable date range, e.g. "02 Mar 2025 - 08 Mar 2025"
    pub label: String,
}

impl PeriodWindow {
    /// Build a window spanning `first..=last` whole days.
    pub fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: day_start(first),
            end: day_end(last),
            label: format!(
                "{} - {}",
                first.format("%d %b %Y"),
                last.format("%d %b %Y")
            ),
        }
    }

    /// True when `instant` falls inside the window (closed interval).
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// True when any instant of `date` falls inside the window.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(day_start(date))
    }
}

/// Midnight (00:00:00.000) of the given day.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight (0,0,0) is always valid")
}

/// Last millisecond (23:59:59.999) of the given day.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is always valid")
}

/// The Sunday that starts the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - ChronoDuration::days(date.weekday().num_days_from_sunday() as i64)
}

/// First and last day of the calendar month containing (`year`, `month`).
fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 is valid for any month");
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .expect("day 1 is valid for any month")
        - ChronoDuration::days(1);
    (first, last)
}

/// The window of the given unit containing `today`.
pub fn current_window(unit: PeriodUnit, today: NaiveDate) -> PeriodWindow {
    match unit {
        PeriodUnit::Week => {
            let start = week_start(today);
            PeriodWindow::spanning(start, start + ChronoDuration::days(6))
        }
        PeriodUnit::Month => {
            let (first, last) = month_bounds(today.year(), today.month());
            PeriodWindow::spanning(first, last)
        }
        PeriodUnit::Year => {
            let (first, _) = month_bounds(today.year(), 1);
            let (_, last) = month_bounds(today.year(), 12);
            PeriodWindow::spanning(first, last)
        }
    }
}

/// The window of the same unit immediately preceding the current one.
///
/// Preceding windows are contiguous: the previous window's last day is
/// the day before the current window's first day, with month and year
/// rollover handled (January's previous month is last year's December).
pub fn previous_window(unit: PeriodUnit, today: NaiveDate) -> PeriodWindow {
    match unit {
        PeriodUnit::Week => {
            let start = week_start(today) - ChronoDuration::days(7);
            PeriodWindow::spanning(start, start + ChronoDuration::days(6))
        }
        PeriodUnit::Month => {
            let (prev_y, prev_m) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            let (first, last) = month_bounds(prev_y, prev_m);
            PeriodWindow::spanning(first, last)
        }
        PeriodUnit::Year => {
            let (first, _) = month_bounds(today.year() - 1, 1);
            let (_, last) = month_bounds(today.year() - 1, 12);
            PeriodWindow::spanning(first, last)
        }
    }
}

/// Current and immediately preceding window as a pair.
pub fn window_pair(unit: PeriodUnit, today: NaiveDate) -> (PeriodWindow, PeriodWindow) {
    (current_window(unit, today), previous_window(unit, today))
}
