//! Month-grid construction merging booking requests and scheduled
//! events into per-day cells.
//!
//! The two streams are keyed independently (bookings by their
//! execution date, events by their event date) and are bucketed by
//! exact `YYYY-MM-DD` string equality against the cell's key. String
//! comparison is deliberate: parsing the stored date through a Date
//! type and comparing instants would let a UTC-suffixed timestamp
//! drift a record into a neighboring local day.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Workflow status of a booking request.
///
/// Strings the store sends outside the four known values map to
/// `Unknown` rather than silently becoming `Pending`, so a widened
/// upstream enum shows up as its own bucket instead of inflating the
/// pending count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Unknown => "unknown",
        }
    }
}

/// A group-visit booking request, read-only to this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Execution date as stored, `YYYY-MM-DD`
    #[serde(rename = "tanggalPelaksanaan", default)]
    pub execution_date: String,
    #[serde(rename = "namaInstansi", default)]
    pub institution: String,
    #[serde(rename = "jumlahPeserta", default)]
    pub participants: u32,
    #[serde(default)]
    pub status: BookingStatus,
}

/// A scheduled event, read-only to this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Event date as stored, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    /// Free-form display string, never machine-parsed
    #[serde(default)]
    pub time: String,
}

/// Number of items a day cell shows verbatim before summarizing.
pub const MAX_VISIBLE_ITEMS: usize = 2;

/// One cell of the month grid.
///
/// `day` is `None` only for the leading padding cells before day 1;
/// padding cells carry no records and are not clickable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDayCell {
    pub day: Option<u32>,
    pub visits: Vec<BookingRequest>,
    pub events: Vec<ScheduledEvent>,
}

impl CalendarDayCell {
    fn padding() -> Self {
        Self::default()
    }

    pub fn is_padding(&self) -> bool {
        self.day.is_none()
    }

    pub fn item_count(&self) -> usize {
        self.visits.len() + self.events.len()
    }

    /// Items beyond the first two, shown as a "+N" summary.
    pub fn overflow(&self) -> usize {
        self.item_count().saturating_sub(MAX_VISIBLE_ITEMS)
    }
}

/// A full month of day cells plus the month cursor they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarDayCell>,
}

impl MonthGrid {
    /// Whether the cell at `index` is today's cell.
    pub fn is_today(&self, index: usize, today: NaiveDate) -> bool {
        self.cells.get(index).is_some_and(|cell| {
            cell.day == Some(today.day())
                && self.month == today.month()
                && self.year == today.year()
        })
    }
}

/// Tagged entry in the per-day lookup, built once per grid.
enum DayEntry<'a> {
    Visit(&'a BookingRequest),
    Event(&'a ScheduledEvent),
}

/// Build the month grid for (`year`, `month`).
///
/// Layout: one padding cell per weekday preceding day 1 (weeks start
/// Sunday), then one cell per day `1..=N`, no trailing padding. An
/// invalid month yields an empty grid rather than a panic.
pub fn month_grid(
    year: i32,
    month: u32,
    bookings: &[BookingRequest],
    events: &[ScheduledEvent],
) -> MonthGrid {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthGrid {
            year,
            month,
            cells: Vec::new(),
        };
    };

    // Single pass over both streams into one keyed lookup, instead of
    // rescanning every record for every day cell.
    let mut buckets: HashMap<&str, Vec<DayEntry<'_>>> = HashMap::new();
    for booking in bookings {
        buckets
            .entry(booking.execution_date.as_str())
            .or_default()
            .push(DayEntry::Visit(booking));
    }
    for event in events {
        buckets
            .entry(event.date.as_str())
            .or_default()
            .push(DayEntry::Event(event));
    }

    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.resize_with(leading, CalendarDayCell::padding);

    for day in 1..=days {
        let key = format!("{year:04}-{month:02}-{day:02}");
        let mut cell = CalendarDayCell {
            day: Some(day),
            ..Default::default()
        };
        if let Some(entries) = buckets.get(key.as_str()) {
            for entry in entries {
                match entry {
                    DayEntry::Visit(b) => cell.visits.push((*b).clone()),
                    DayEntry::Event(e) => cell.events.push((*e).clone()),
                }
            }
        }
        cells.push(cell);
    }

    MonthGrid { year, month, cells }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .expect("day 1 is valid for any month")
        .pred_opt()
        .expect("day before a month start always exists")
        .day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(day: &str) -> BookingRequest {
        BookingRequest {
            execution_date: day.to_string(),
            institution: "SDN 3 Menteng".to_string(),
            participants: 25,
            status: BookingStatus::Scheduled,
        }
    }

    fn event(day: &str) -> ScheduledEvent {
        ScheduledEvent {
            date: day.to_string(),
            title: "Pelatihan Komputer".to_string(),
            time: "09.00 - 11.00".to_string(),
        }
    }

    fn day_cell<'a>(grid: &'a MonthGrid, day: u32) -> &'a CalendarDayCell {
        grid.cells
            .iter()
            .find(|c| c.day == Some(day))
            .expect("day cell should exist")
    }

    // ==================== Grid Shape Tests ====================

    #[test]
    fn test_leading_padding_matches_first_weekday() {
        // October 2025 starts on a Wednesday (index 3 from Sunday)
        let grid = month_grid(2025, 10, &[], &[]);
        assert!(grid.cells[..3].iter().all(|c| c.is_padding()));
        assert_eq!(grid.cells[3].day, Some(1));
        assert_eq!(grid.cells.len(), 3 + 31);
    }

    #[test]
    fn test_sunday_start_month_has_no_padding() {
        // June 2025 starts on a Sunday
        let grid = month_grid(2025, 6, &[], &[]);
        assert_eq!(grid.cells[0].day, Some(1));
        assert_eq!(grid.cells.len(), 30);
    }

    #[test]
    fn test_no_trailing_padding() {
        let grid = month_grid(2025, 3, &[], &[]);
        assert_eq!(grid.cells.last().unwrap().day, Some(31));
    }

    #[test]
    fn test_leap_february() {
        let grid = month_grid(2024, 2, &[], &[]);
        assert_eq!(grid.cells.last().unwrap().day, Some(29));
    }

    #[test]
    fn test_invalid_month_yields_empty_grid() {
        let grid = month_grid(2025, 13, &[], &[]);
        assert!(grid.cells.is_empty());
    }

    #[test]
    fn test_padding_cells_carry_no_records() {
        let grid = month_grid(2025, 10, &[booking("2025-10-01")], &[]);
        for cell in grid.cells.iter().filter(|c| c.is_padding()) {
            assert_eq!(cell.item_count(), 0);
        }
    }

    // ==================== Bucketing Tests ====================

    #[test]
    fn test_both_streams_land_in_same_cell() {
        let grid = month_grid(
            2025,
            3,
            &[booking("2025-03-05")],
            &[event("2025-03-05")],
        );
        let cell = day_cell(&grid, 5);

        assert_eq!(cell.visits.len(), 1);
        assert_eq!(cell.events.len(), 1);
        assert_eq!(cell.item_count(), 2);
        assert_eq!(cell.overflow(), 0);
    }

    #[test]
    fn test_third_item_reports_overflow_of_one() {
        let grid = month_grid(
            2025,
            3,
            &[booking("2025-03-05"), booking("2025-03-05")],
            &[event("2025-03-05")],
        );
        let cell = day_cell(&grid, 5);

        assert_eq!(cell.item_count(), 3);
        assert_eq!(cell.overflow(), 1);
    }

    #[test]
    fn test_records_outside_month_are_dropped() {
        let grid = month_grid(
            2025,
            3,
            &[booking("2025-02-28"), booking("2025-04-01")],
            &[event("2026-03-05")],
        );
        assert!(grid.cells.iter().all(|c| c.item_count() == 0));
    }

    #[test]
    fn test_bucketing_is_exact_string_match() {
        // A timestamp-suffixed date does not equal the day key, so it
        // must not be bucketed; only the bare date form matches.
        let grid = month_grid(
            2025,
            3,
            &[booking("2025-03-05T00:00:00.000Z")],
            &[event("2025-03-05")],
        );
        let cell = day_cell(&grid, 5);
        assert_eq!(cell.visits.len(), 0);
        assert_eq!(cell.events.len(), 1);
    }

    #[test]
    fn test_streams_keep_relative_order_within_a_day() {
        let mut second = booking("2025-03-05");
        second.institution = "TK Melati".to_string();
        let grid = month_grid(2025, 3, &[booking("2025-03-05"), second], &[]);
        let cell = day_cell(&grid, 5);

        assert_eq!(cell.visits[0].institution, "SDN 3 Menteng");
        assert_eq!(cell.visits[1].institution, "TK Melati");
    }

    // ==================== Today Flag Tests ====================

    #[test]
    fn test_is_today_requires_day_month_and_year() {
        let grid = month_grid(2025, 3, &[], &[]);
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let idx_of = |day: u32| {
            grid.cells
                .iter()
                .position(|c| c.day == Some(day))
                .unwrap()
        };

        assert!(grid.is_today(idx_of(5), today));
        assert!(!grid.is_today(idx_of(6), today));

        // Same day number, different month
        let other_month = month_grid(2025, 4, &[], &[]);
        let idx = other_month
            .cells
            .iter()
            .position(|c| c.day == Some(5))
            .unwrap();
        assert!(!other_month.is_today(idx, today));
    }

    #[test]
    fn test_padding_cell_is_never_today() {
        let grid = month_grid(2025, 10, &[], &[]);
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        assert!(!grid.is_today(0, today));
    }

    // ==================== Status Parsing Tests ====================

    #[test]
    fn test_known_statuses_deserialize() {
        for (raw, want) in [
            ("pending", BookingStatus::Pending),
            ("scheduled", BookingStatus::Scheduled),
            ("completed", BookingStatus::Completed),
            ("cancelled", BookingStatus::Cancelled),
        ] {
            let status: BookingStatus =
                serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(status, want);
        }
    }

    #[test]
    fn test_unrecognized_status_maps_to_unknown() {
        let status: BookingStatus =
            serde_json::from_value(serde_json::json!("archived")).unwrap();
        assert_eq!(status, BookingStatus::Unknown);
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let booking: BookingRequest = serde_json::from_value(serde_json::json!({
            "tanggalPelaksanaan": "2025-03-05",
            "namaInstansi": "SMP 1",
            "jumlahPeserta": 40
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    // ==================== Property-Based Tests ====================

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn grid_has_padding_plus_days_cells(
                year in 2000i32..2100,
                month in 1u32..=12
            ) {
                let grid = month_grid(year, month, &[], &[]);
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let leading = first.weekday().num_days_from_sunday() as usize;

                prop_assert_eq!(
                    grid.cells.len(),
                    leading + days_in_month(year, month) as usize
                );
                prop_assert!(grid.cells[..leading].iter().all(|c| c.is_padding()));
                for (i, cell) in grid.cells[leading..].iter().enumerate() {
                    prop_assert_eq!(cell.day, Some(i as u32 + 1));
                }
            }

            #[test]
            fn every_in_month_booking_is_bucketed_exactly_once(
                days in prop::collection::vec(1u32..=28, 0..30)
            ) {
                let bookings: Vec<BookingRequest> = days
                    .iter()
                    .map(|d| booking(&format!("2025-03-{d:02}")))
                    .collect();
                let grid = month_grid(2025, 3, &bookings, &[]);

                let bucketed: usize =
                    grid.cells.iter().map(|c| c.visits.len()).sum();
                prop_assert_eq!(bucketed, bookings.len());
            }

            #[test]
            fn overflow_is_items_beyond_two(extra in 0usize..6) {
                let bookings: Vec<BookingRequest> =
                    std::iter::repeat_with(|| booking("2025-03-05"))
                        .take(extra)
                        .collect();
                let grid = month_grid(2025, 3, &bookings, &[event("2025-03-05")]);
                let cell = grid
                    .cells
                    .iter()
                    .find(|c| c.day == Some(5))
                    .unwrap();

                let count = extra + 1;
                prop_assert_eq!(cell.item_count(), count);
                prop_assert_eq!(cell.overflow(), count.saturating_sub(2));
            }
        }
    }
}
