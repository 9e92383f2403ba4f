//! Financial transaction rows and their optional recurrence rule.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// A single income or expense entry.
///
/// `date` keeps the raw value returned by the backend. It is parsed on demand
/// in the caller's time zone so one malformed row never fails a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            amount,
            kind,
            category: category.into(),
            date: date.into(),
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Parsed transaction date in `tz`, or `None` when the raw value is malformed.
    pub fn occurred_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp(&self.date, tz)
    }

    /// Amounts must be finite and non-negative; the sign lives in `kind`.
    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Titled for Transaction {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Repeats a transaction every `interval`, optionally stopping after `until`.
pub struct Recurrence {
    pub interval: TimeInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            interval,
            until: None,
        }
    }

    pub fn until(mut self, last_day: NaiveDate) -> Self {
        self.until = Some(last_day);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn type_column_maps_to_kind() {
        let json = r#"{
            "id": "0b8f5d8e-3c55-4d9f-a1b0-6a1d2b3c4d5e",
            "user_id": "7d4f6f5e-8a59-4a3a-9d7e-2f7b9a8c1e10",
            "title": "Loyer",
            "amount": 850.0,
            "type": "expense",
            "category": "Logement",
            "date": "2025-02-01",
            "recurrence": { "interval": { "every": 1, "unit": "month" } }
        }"#;
        let txn: Transaction = serde_json::from_str(json).expect("deserialize");
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(
            txn.recurrence.map(|rule| rule.interval),
            Some(TimeInterval::monthly())
        );
        assert!(txn.occurred_at(&Utc).is_some());
    }

    #[test]
    fn negative_and_nan_amounts_are_invalid() {
        let user = Uuid::new_v4();
        let base = Transaction::new(user, "x", 1.0, TransactionKind::Income, "c", "2025-01-01");
        assert!(base.has_valid_amount());
        let mut negative = base.clone();
        negative.amount = -3.0;
        assert!(!negative.has_valid_amount());
        let mut nan = base;
        nan.amount = f64::NAN;
        assert!(!nan.has_valid_amount());
    }
}
