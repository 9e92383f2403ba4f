//! Income, expense, and category totals over a calendar period.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dash_domain::{CalendarWindow, Transaction, TransactionKind};

use crate::calendar::month_window;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Rounds a currency value to cents. Presentation only; never call during accumulation.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
/// Share of the monthly budget consumed by expenses.
///
/// `Unbounded` is reported when expenses exist but no positive budget is set.
pub enum BudgetUtilization {
    Percent(f64),
    Unbounded,
}

impl BudgetUtilization {
    fn compute(total_expenses: f64, monthly_budget: f64) -> Self {
        if monthly_budget.is_finite() && monthly_budget > 0.0 {
            BudgetUtilization::Percent(total_expenses / monthly_budget * 100.0)
        } else if total_expenses > 0.0 {
            BudgetUtilization::Unbounded
        } else {
            BudgetUtilization::Percent(0.0)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            BudgetUtilization::Percent(value) => *value,
            BudgetUtilization::Unbounded => f64::INFINITY,
        }
    }

    pub fn is_over(&self) -> bool {
        self.as_f64() > 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    pub share_pct: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period_start: DateTime<FixedOffset>,
    pub period_end: DateTime<FixedOffset>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub monthly_budget: f64,
    pub budget_used: BudgetUtilization,
    pub budget_remaining: f64,
    pub expense_categories: Vec<CategoryShare>,
    pub income_categories: Vec<CategoryShare>,
    pub transaction_count: usize,
    /// Rows ignored because of an unparseable date or malformed amount.
    pub skipped: usize,
}

impl PeriodSummary {
    pub fn budget_used_pct(&self) -> f64 {
        self.budget_used.as_f64()
    }

    pub fn expense_category(&self, name: &str) -> Option<&CategoryShare> {
        self.expense_categories
            .iter()
            .find(|entry| entry.category == name)
    }

    pub fn income_category(&self, name: &str) -> Option<&CategoryShare> {
        self.income_categories
            .iter()
            .find(|entry| entry.category == name)
    }

    /// Copy with every currency and percentage value rounded to two decimals.
    pub fn rounded(&self) -> Self {
        let round_shares = |shares: &[CategoryShare]| -> Vec<CategoryShare> {
            shares
                .iter()
                .map(|entry| CategoryShare {
                    category: entry.category.clone(),
                    total: round_currency(entry.total),
                    share_pct: round_currency(entry.share_pct),
                    count: entry.count,
                })
                .collect()
        };
        let budget_used = match self.budget_used {
            BudgetUtilization::Percent(value) => BudgetUtilization::Percent(round_currency(value)),
            BudgetUtilization::Unbounded => BudgetUtilization::Unbounded,
        };
        Self {
            period_start: self.period_start,
            period_end: self.period_end,
            total_income: round_currency(self.total_income),
            total_expenses: round_currency(self.total_expenses),
            balance: round_currency(self.balance),
            monthly_budget: round_currency(self.monthly_budget),
            budget_used,
            budget_remaining: round_currency(self.budget_remaining),
            expense_categories: round_shares(&self.expense_categories),
            income_categories: round_shares(&self.income_categories),
            transaction_count: self.transaction_count,
            skipped: self.skipped,
        }
    }
}

/// Category totals in first-seen order.
#[derive(Default)]
struct CategoryAccumulator {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64, usize)>,
}

impl CategoryAccumulator {
    fn add(&mut self, category: &str, amount: f64) {
        let label = match category.trim() {
            "" => UNCATEGORIZED,
            trimmed => trimmed,
        };
        match self.index.get(label) {
            Some(&slot) => {
                self.entries[slot].1 += amount;
                self.entries[slot].2 += 1;
            }
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), amount, 1));
            }
        }
    }

    /// Descending by total; the stable sort keeps first-seen order for ties.
    fn into_shares(self, denominator: f64) -> Vec<CategoryShare> {
        let mut shares: Vec<CategoryShare> = self
            .entries
            .into_iter()
            .map(|(category, total, count)| CategoryShare {
                category,
                total,
                share_pct: if denominator > 0.0 {
                    total / denominator * 100.0
                } else {
                    0.0
                },
                count,
            })
            .collect();
        shares.sort_by(|a, b| b.total.total_cmp(&a.total));
        shares
    }
}

/// Stateless period accounting over an already-fetched transaction snapshot.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Totals every well-formed transaction dated inside `window` (inclusive).
    pub fn aggregate<Tz: TimeZone>(
        transactions: &[Transaction],
        window: &CalendarWindow<Tz>,
        monthly_budget: f64,
    ) -> PeriodSummary {
        let tz = window.timezone();
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;
        let mut incomes = CategoryAccumulator::default();
        let mut expenses = CategoryAccumulator::default();
        let mut transaction_count = 0usize;
        let mut skipped = 0usize;

        for txn in transactions {
            let Some(occurred) = txn.occurred_at(&tz) else {
                warn!(id = %txn.id, date = %txn.date, "skipping transaction with invalid date");
                skipped += 1;
                continue;
            };
            if !window.contains(&occurred) {
                continue;
            }
            if !txn.has_valid_amount() {
                warn!(id = %txn.id, amount = txn.amount, "skipping transaction with invalid amount");
                skipped += 1;
                continue;
            }
            transaction_count += 1;
            match txn.kind {
                TransactionKind::Income => {
                    total_income += txn.amount;
                    incomes.add(&txn.category, txn.amount);
                }
                TransactionKind::Expense => {
                    total_expenses += txn.amount;
                    expenses.add(&txn.category, txn.amount);
                }
            }
        }

        let budget_used = BudgetUtilization::compute(total_expenses, monthly_budget);
        debug!(
            transaction_count,
            skipped, total_income, total_expenses, "aggregated period"
        );

        PeriodSummary {
            period_start: window.start.fixed_offset(),
            period_end: window.end.fixed_offset(),
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            monthly_budget,
            budget_used,
            budget_remaining: monthly_budget - total_expenses,
            expense_categories: expenses.into_shares(total_expenses),
            income_categories: incomes.into_shares(total_income),
            transaction_count,
            skipped,
        }
    }

    /// Aggregates the calendar month containing `reference`.
    pub fn summarize_month<Tz: TimeZone>(
        transactions: &[Transaction],
        reference: &DateTime<Tz>,
        monthly_budget: f64,
    ) -> PeriodSummary {
        Self::aggregate(transactions, &month_window(reference), monthly_budget)
    }
}

pub fn aggregate<Tz: TimeZone>(
    transactions: &[Transaction],
    window: &CalendarWindow<Tz>,
    monthly_budget: f64,
) -> PeriodSummary {
    PeriodAggregator::aggregate(transactions, window, monthly_budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn window() -> CalendarWindow<Utc> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        CalendarWindow::new(start, end).unwrap()
    }

    fn expense(category: &str, amount: f64, date: &str) -> Transaction {
        Transaction::new(
            Uuid::nil(),
            "t",
            amount,
            TransactionKind::Expense,
            category,
            date,
        )
    }

    #[test]
    fn zero_budget_with_spending_is_unbounded() {
        let txns = vec![expense("Food", 12.0, "2025-01-03")];
        let summary = aggregate(&txns, &window(), 0.0);
        assert_eq!(summary.budget_used, BudgetUtilization::Unbounded);
        assert!(summary.budget_used_pct().is_infinite());
        assert!(summary.budget_used.is_over());
    }

    #[test]
    fn zero_budget_without_spending_is_zero_percent() {
        let summary = aggregate(&[], &window(), 0.0);
        assert_eq!(summary.budget_used, BudgetUtilization::Percent(0.0));
    }

    #[test]
    fn malformed_rows_are_counted_not_fatal() {
        let mut negative = expense("Food", 5.0, "2025-01-04");
        negative.amount = -5.0;
        let txns = vec![
            expense("Food", 10.0, "not a date"),
            negative,
            expense("Food", 7.5, "2025-01-05"),
            expense("Food", 100.0, "2025-02-05"),
        ];
        let summary = aggregate(&txns, &window(), 100.0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.total_expenses, 7.5);
    }

    #[test]
    fn rounding_happens_only_on_presentation() {
        let txns = vec![
            expense("Misc", 0.1, "2025-01-02"),
            expense("Misc", 0.2, "2025-01-03"),
        ];
        let summary = aggregate(&txns, &window(), 1.0);
        assert_ne!(summary.total_expenses, 0.3);
        let shown = summary.rounded();
        assert_eq!(shown.total_expenses, 0.3);
        assert_eq!(shown.budget_used, BudgetUtilization::Percent(30.0));
    }

    #[test]
    fn blank_category_is_grouped() {
        let txns = vec![expense("  ", 4.0, "2025-01-02"), expense("", 6.0, "2025-01-02")];
        let summary = aggregate(&txns, &window(), 50.0);
        let entry = summary.expense_category(UNCATEGORIZED).expect("grouped");
        assert_eq!(entry.total, 10.0);
        assert_eq!(entry.count, 2);
    }

    #[test]
    fn summary_serializes_without_infinity() {
        let txns = vec![expense("Food", 12.0, "2025-01-03")];
        let summary = aggregate(&txns, &window(), 0.0);
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(json.contains("unbounded"));
    }
}
