//! Projection of recurring transactions into a calendar window.

use chrono::{DateTime, SecondsFormat, TimeZone};
use tracing::debug;
use uuid::Uuid;

use dash_domain::{localize, CalendarWindow, Transaction};

pub const MAX_OCCURRENCES_PER_SERIES: u32 = 1_000;

pub struct RecurrenceService;

impl RecurrenceService {
    /// Returns `transactions` plus the future occurrences of every recurring
    /// row that land inside `window`.
    ///
    /// Occurrences keep the source row's wall-clock time, carry a fresh id and
    /// no recurrence rule, so expanding twice does not compound.
    pub fn expand<Tz: TimeZone>(
        transactions: &[Transaction],
        window: &CalendarWindow<Tz>,
    ) -> Vec<Transaction> {
        let mut expanded = transactions.to_vec();
        for txn in transactions {
            expanded.extend(Self::occurrences(txn, window));
        }
        debug!(
            base = transactions.len(),
            projected = expanded.len() - transactions.len(),
            "expanded recurring transactions"
        );
        expanded
    }

    /// Occurrences after the source row that fall inside `window`.
    ///
    /// Stepping starts at the first date on or after the window's first day,
    /// so a long-running series costs only what the window holds. At most
    /// [`MAX_OCCURRENCES_PER_SERIES`] steps are taken from there.
    pub fn occurrences<Tz: TimeZone>(
        txn: &Transaction,
        window: &CalendarWindow<Tz>,
    ) -> Vec<Transaction> {
        let Some(rule) = txn.recurrence else {
            return Vec::new();
        };
        let tz = window.timezone();
        let Some(anchor) = txn.occurred_at(&tz) else {
            return Vec::new();
        };
        let anchor_date = anchor.date_naive();
        let time_of_day = anchor.time();

        let first = rule
            .interval
            .first_step_on_or_after(anchor_date, window.start.date_naive())
            .max(1);
        let last = first.saturating_add(MAX_OCCURRENCES_PER_SERIES - 1);

        let mut out = Vec::new();
        for step in first..=last {
            let day = rule.interval.nth_date(anchor_date, step);
            if rule.until.is_some_and(|last| day > last) {
                break;
            }
            let Some(at) = localize(&tz, day.and_time(time_of_day)) else {
                continue;
            };
            if at > window.end {
                break;
            }
            if at >= window.start {
                out.push(Self::occurrence_of(txn, &at));
            }
        }
        out
    }

    fn occurrence_of<Tz: TimeZone>(txn: &Transaction, at: &DateTime<Tz>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            recurrence: None,
            ..txn.clone()
        }
    }
}
