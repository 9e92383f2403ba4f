use chrono::Local;
use dash_core::{BudgetUtilization, CategoryShare, PeriodSummary};

use crate::cli::core::{parse_day, parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, AmountFormatter};
use crate::cli::registry::CommandEntry;

const SUMMARY_USAGE: &str = "summary [YYYY-MM | FROM TO] [--projected]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Income, expenses, balance, and budget use for a month or a range of days",
        SUMMARY_USAGE,
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let projected = args.iter().any(|arg| matches!(*arg, "--projected" | "-p"));
    let period: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !matches!(*arg, "--projected" | "-p"))
        .collect();

    let snapshot = context.require_snapshot()?;
    let (summary, title) = match period.as_slice() {
        [] | [_] => {
            let month = period.first().map(|raw| parse_month(raw)).transpose()?;
            let reference = context.local_reference(month);
            let summary = context.service.month_summary(snapshot, &reference, projected);
            let title = summary.period_start.format("%B %Y").to_string();
            (summary, title)
        }
        [from, to] => {
            let (first, last) = (parse_day(from)?, parse_day(to)?);
            let summary = context
                .service
                .range_summary(snapshot, &Local, first, last, projected)?;
            (summary, format!("{first} to {last}"))
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "too many arguments; usage: {SUMMARY_USAGE}"
            )))
        }
    };

    let config = context.config();
    let fmt = AmountFormatter::new(&config.locale, &config.currency);
    print_summary(&summary.rounded(), &title, projected, &fmt);
    Ok(())
}

fn print_summary(summary: &PeriodSummary, title: &str, projected: bool, fmt: &AmountFormatter) {
    if projected {
        output::section(format!("Summary {title} (projected)"));
    } else {
        output::section(format!("Summary {title}"));
    }
    output::info(format!("  Income   : {}", fmt.amount(summary.total_income)));
    output::info(format!("  Expenses : {}", fmt.amount(summary.total_expenses)));
    output::info(format!("  Balance  : {}", fmt.amount(summary.balance)));

    if summary.monthly_budget > 0.0 {
        output::info(format!(
            "  Budget   : {} ({} used, {} left)",
            fmt.amount(summary.monthly_budget),
            fmt.percent(summary.budget_used_pct()),
            fmt.amount(summary.budget_remaining)
        ));
        if summary.budget_used.is_over() {
            output::warning("Monthly budget exceeded.");
        }
    } else if summary.budget_used == BudgetUtilization::Unbounded {
        output::hint("No monthly budget set. Use `config set monthly_budget <amount>`.");
    }

    print_categories("Expenses by category", &summary.expense_categories, fmt);
    print_categories("Income by category", &summary.income_categories, fmt);

    if summary.skipped > 0 {
        output::warning(format!(
            "{} transaction(s) skipped because of an invalid date or amount.",
            summary.skipped
        ));
    }
}

fn print_categories(title: &str, shares: &[CategoryShare], fmt: &AmountFormatter) {
    if shares.is_empty() {
        return;
    }
    output::section(title);
    for share in shares {
        output::info(format!(
            "  {:<20} {:>16} {:>7}",
            share.category,
            fmt.amount(share.total),
            fmt.percent(share.share_pct)
        ));
    }
}
