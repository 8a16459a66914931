//! Time abstraction for deterministic testing.
//!
//! Window calculation, stats cards, and the calendar's "today" flag
//! all take an explicit date; the `Clock` trait is how callers resolve
//! that date once at the edge instead of reading the wall clock inside
//! pure functions.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate};

/// Trait for abstracting time access.
pub trait Clock: Send + Sync {
    /// Current time in the operating locale.
    fn now_local(&self) -> DateTime<Local>;

    /// Current calendar day in the operating locale.
    fn today(&self) -> NaiveDate {
        self.now_local().date_naive()
    }
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Mock clock for testing with controllable time.
#[derive(Debug, Clone)]
pub struct MockClock {
    time: Arc<Mutex<DateTime<Local>>>,
}

impl MockClock {
    /// Create a new mock clock set to the given local time.
    pub fn new(time: DateTime<Local>) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: DateTime<Local>) {
        *self.time.lock().unwrap() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.time.lock().unwrap();
        *time = *time + duration;
    }
}

impl Clock for MockClock {
    fn now_local(&self) -> DateTime<Local> {
        *self.time.lock().unwrap()
    }
}
