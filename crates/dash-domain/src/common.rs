//! Shared traits, timestamp parsing, and interval arithmetic.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for rows owned by the backend.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display title.
pub trait Titled {
    fn title(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a backend timestamp into the supplied time zone.
///
/// Offset-carrying values (RFC 3339, Postgres `timestamptz`) are converted;
/// naive date-times and plain dates are read as wall-clock time in `tz`.
/// Returns `None` for anything unrecognised.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(tz));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(tz));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return localize(tz, naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| local_start_of_day(tz, date))
}

/// Maps a wall-clock value into `tz`, moving forward out of DST gaps.
pub fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        (1..=3).find_map(|hours| {
            tz.from_local_datetime(&(naive + Duration::hours(hours)))
                .earliest()
        })
    })
}

/// First instant of `day` in `tz`.
pub fn local_start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Tz> {
    let midnight = day.and_time(NaiveTime::MIN);
    localize(tz, midnight).unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Parses a weekday name such as `monday`, `Mon`, or `sunday`.
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}

/// Lower-case full weekday name, the form stored in configuration.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Enumerates time units used by `TimeInterval`.
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Represents a time unit and multiplier for recurrence calculations.
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub fn new(every: u32, unit: TimeUnit) -> Self {
        Self {
            every: every.max(1),
            unit,
        }
    }

    pub fn monthly() -> Self {
        Self::new(1, TimeUnit::Month)
    }

    /// Returns the date `steps` intervals after `anchor`.
    ///
    /// Month and year steps are measured from the anchor, so a series that
    /// starts on the 31st lands on the last day of short months without
    /// drifting afterwards.
    pub fn nth_date(&self, anchor: NaiveDate, steps: u32) -> NaiveDate {
        let every = self.every.max(1) as i64;
        let span = every * steps as i64;
        match self.unit {
            TimeUnit::Day => anchor + Duration::days(span),
            TimeUnit::Week => anchor + Duration::weeks(span),
            TimeUnit::Month => shift_month(anchor, span as i32),
            TimeUnit::Year => shift_year(anchor, span as i32),
        }
    }

    /// Smallest step whose date is on or after `target`, or 0 when `target`
    /// is not after `anchor`.
    pub fn first_step_on_or_after(&self, anchor: NaiveDate, target: NaiveDate) -> u32 {
        if target <= anchor {
            return 0;
        }
        let every = self.every.max(1) as i64;
        let whole_steps = match self.unit {
            TimeUnit::Day => (target - anchor).num_days() / every,
            TimeUnit::Week => (target - anchor).num_days() / (7 * every),
            TimeUnit::Month => {
                let months = (target.year() as i64 * 12 + target.month0() as i64)
                    - (anchor.year() as i64 * 12 + anchor.month0() as i64);
                months / every
            }
            TimeUnit::Year => (target.year() - anchor.year()) as i64 / every,
        };
        // Clamped month ends can put the estimate past the target; one step
        // back is always before it.
        let mut step = u32::try_from(whole_steps.saturating_sub(1).max(0)).unwrap_or(u32::MAX);
        while step < u32::MAX && self.nth_date(anchor, step) < target {
            step += 1;
        }
        step
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_rfc3339_and_converts_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_timestamp("2025-02-15T22:30:00Z", &tz).expect("parse");
        assert_eq!(parsed.date_naive(), date(2025, 2, 16));
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn parses_postgres_timestamptz() {
        let parsed = parse_timestamp("2025-02-15 10:00:00+00", &Utc).expect("parse");
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn plain_date_is_local_midnight() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let parsed = parse_timestamp("2025-03-01", &tz).expect("parse");
        assert_eq!(parsed.date_naive(), date(2025, 3, 1));
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn wall_clock_in_a_spring_gap_moves_forward() {
        let paris = chrono_tz::Europe::Paris;
        let parsed = parse_timestamp("2025-03-30T02:30:00", &paris).expect("parse");
        assert_eq!(parsed.hour(), 3);
        assert_eq!(parsed.minute(), 30);
        assert_eq!(
            parsed.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 3, 30, 1, 30, 0).unwrap()
        );
    }

    #[test]
    fn missing_midnight_starts_the_day_at_the_first_valid_instant() {
        let santiago = chrono_tz::America::Santiago;
        let start = local_start_of_day(&santiago, date(2024, 9, 8));
        assert_eq!(start.date_naive(), date(2024, 9, 8));
        assert_eq!(start.hour(), 1);
        assert_eq!(
            start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 9, 8, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("", &Utc).is_none());
        assert!(parse_timestamp("yesterday", &Utc).is_none());
        assert!(parse_timestamp("2025-02-30", &Utc).is_none());
    }

    #[test]
    fn monthly_steps_clamp_without_drift() {
        let interval = TimeInterval::monthly();
        let anchor = date(2025, 1, 31);
        assert_eq!(interval.nth_date(anchor, 1), date(2025, 2, 28));
        assert_eq!(interval.nth_date(anchor, 2), date(2025, 3, 31));
        assert_eq!(interval.nth_date(anchor, 13), date(2026, 2, 28));
    }

    #[test]
    fn first_step_lands_on_or_after_target() {
        let daily = TimeInterval::new(1, TimeUnit::Day);
        let anchor = date(2022, 1, 1);
        let step = daily.first_step_on_or_after(anchor, date(2025, 3, 1));
        assert_eq!(daily.nth_date(anchor, step), date(2025, 3, 1));
        assert_eq!(daily.first_step_on_or_after(anchor, anchor), 0);

        let fortnightly = TimeInterval::new(2, TimeUnit::Week);
        let step = fortnightly.first_step_on_or_after(date(2024, 1, 1), date(2024, 1, 20));
        assert_eq!(step, 2);
        assert_eq!(fortnightly.nth_date(date(2024, 1, 1), step), date(2024, 1, 29));

        let monthly = TimeInterval::monthly();
        assert_eq!(monthly.first_step_on_or_after(date(2025, 1, 31), date(2025, 2, 28)), 1);
        assert_eq!(monthly.first_step_on_or_after(date(2025, 1, 31), date(2025, 3, 1)), 2);

        let yearly = TimeInterval::new(1, TimeUnit::Year);
        assert_eq!(yearly.first_step_on_or_after(date(2020, 2, 29), date(2024, 2, 29)), 4);
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in [Weekday::Mon, Weekday::Sun, Weekday::Sat] {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
        assert_eq!(parse_weekday("Mon"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("funday"), None);
    }
}
