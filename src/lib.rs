//! Balai Monitor Library
//!
//! Visit and scheduling analytics for a community-center back office:
//! period rollups with period-over-period comparison, the filtered /
//! paginated visit table, and the month calendar that merges booking
//! requests and scheduled events per day.

pub mod api;
pub mod calendar;
pub mod config;
pub mod export;
pub mod period;
pub mod records;
pub mod stats;
pub mod table;
pub mod traits;

// Re-export commonly used types
pub use api::{FetchToken, MonthData, StoreClient};
pub use calendar::{
    BookingRequest,
    BookingStatus,
    CalendarDayCell,
    MonthGrid,
    ScheduledEvent,
    month_grid,
};
pub use config::AppConfig;
pub use export::export_visits_csv;
pub use period::{PeriodUnit, PeriodWindow, current_window, previous_window, window_pair};
pub use records::{NormalizedVisit, RawVisit, normalize};
pub use stats::{Comparison, PeriodStats, aggregate, aggregate_unit};
pub use table::{DateFilter, SortOrder, TablePage, apply, clamp_page, page_buttons};
pub use traits::{Clock, MockClock, SystemClock};
