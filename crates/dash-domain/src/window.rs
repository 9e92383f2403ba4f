//! Inclusive calendar windows.

use std::fmt;

use chrono::{DateTime, TimeZone};

#[derive(Debug, Clone, PartialEq)]
/// An inclusive `[start, end]` range of instants in a single time zone.
pub struct CalendarWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> CalendarWindow<Tz> {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// True when `[start, end]` shares at least one instant with the window.
    pub fn overlaps(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
        *start <= self.end && *end >= self.start
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`CalendarWindow`] values.
pub enum WindowError {
    InvalidRange,
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::InvalidRange => f.write_str("window end must not precede start"),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(1);
        let window = CalendarWindow::new(start, end).expect("valid window");
        assert!(window.contains(&start));
        assert!(window.contains(&end));
        assert!(!window.contains(&(end + Duration::milliseconds(1))));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            CalendarWindow::new(start, end).unwrap_err(),
            WindowError::InvalidRange
        );
    }
}
