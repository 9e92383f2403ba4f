//! Month and week boundaries plus the window filters used by the calendar views.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use tracing::warn;

use dash_domain::{local_start_of_day, CalendarWindow, Event, Task};

use crate::CoreError;

/// Inclusive bounds of the local calendar days `first..=last` in `tz`.
fn day_span<Tz: TimeZone>(tz: &Tz, first: NaiveDate, last: NaiveDate) -> CalendarWindow<Tz> {
    let start = local_start_of_day(tz, first);
    let end = local_start_of_day(tz, last + Duration::days(1)) - Duration::milliseconds(1);
    CalendarWindow { start, end }
}

/// The calendar month containing `date`, from the 1st at 00:00:00.000 to the
/// last day at 23:59:59.999, in `date`'s time zone.
pub fn month_window<Tz: TimeZone>(date: &DateTime<Tz>) -> CalendarWindow<Tz> {
    let local = date.date_naive();
    let first = local.with_day(1).unwrap_or(local);
    let days = dash_domain::days_in_month(local.year(), local.month());
    let last = first + Duration::days(days as i64 - 1);
    day_span(&date.timezone(), first, last)
}

/// The seven-day week containing `date`, starting on `week_starts_on`.
pub fn week_window<Tz: TimeZone>(date: &DateTime<Tz>, week_starts_on: Weekday) -> CalendarWindow<Tz> {
    let local = date.date_naive();
    let offset = (local.weekday().num_days_from_monday() + 7
        - week_starts_on.num_days_from_monday())
        % 7;
    let first = local - Duration::days(offset as i64);
    day_span(&date.timezone(), first, first + Duration::days(6))
}

/// Inclusive window over the local days `first..=last` in `tz`.
pub fn range_window<Tz: TimeZone>(
    tz: &Tz,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<CalendarWindow<Tz>, CoreError> {
    let span = day_span(tz, first, last);
    Ok(CalendarWindow::new(span.start, span.end)?)
}

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_day(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(raw.to_string()))
}

/// Stateless helpers for the calendar and task views.
pub struct CalendarService;

impl CalendarService {
    /// Events overlapping `window`, in start order. Rows with bad timestamps are skipped.
    pub fn events_in_window<'a, Tz: TimeZone>(
        events: &'a [Event],
        window: &CalendarWindow<Tz>,
    ) -> Vec<&'a Event> {
        let tz = window.timezone();
        let mut hits: Vec<(DateTime<Tz>, &Event)> = events
            .iter()
            .filter_map(|event| {
                let (Some(start), Some(end)) = (event.starts_at(&tz), event.ends_at(&tz)) else {
                    warn!(id = %event.id, "skipping event with invalid start time");
                    return None;
                };
                window.overlaps(&start, &end).then_some((start, event))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        hits.into_iter().map(|(_, event)| event).collect()
    }

    /// Open tasks due inside `window`, soonest first, higher priority first on ties.
    pub fn tasks_due_in_window<'a, Tz: TimeZone>(
        tasks: &'a [Task],
        window: &CalendarWindow<Tz>,
    ) -> Vec<&'a Task> {
        let tz = window.timezone();
        let mut due: Vec<(DateTime<Tz>, &Task)> = tasks
            .iter()
            .filter(|task| !task.completed)
            .filter_map(|task| {
                let at = task.due_at(&tz)?;
                window.contains(&at).then_some((at, task))
            })
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.priority.cmp(&a.1.priority)));
        due.into_iter().map(|(_, task)| task).collect()
    }
}
