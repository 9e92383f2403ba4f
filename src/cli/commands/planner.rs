use chrono::Local;

use dash_domain::{weekday_name, TaskPriority};

use crate::cli::core::{parse_day, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "week",
            "List events overlapping the week containing a date",
            "week [YYYY-MM-DD]",
            cmd_week,
        ),
        CommandEntry::new(
            "tasks",
            "List open tasks due in the week containing a date",
            "tasks [YYYY-MM-DD]",
            cmd_tasks,
        ),
    ]
}

fn reference_day(args: &[&str], usage: &str) -> Result<Option<chrono::NaiveDate>, CommandError> {
    match args {
        [] => Ok(None),
        [raw] => parse_day(raw).map(Some),
        _ => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

fn cmd_week(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let day = reference_day(args, "week [YYYY-MM-DD]")?;
    let snapshot = context.require_snapshot()?;
    let reference = context.local_reference(day);
    let window = context.service.week(&reference);
    let events = context.service.events_in_week(snapshot, &reference);

    output::section(format!(
        "Week of {} ({} start)",
        window.start.format("%Y-%m-%d"),
        weekday_name(context.config().week_start())
    ));
    if events.is_empty() {
        output::info("  No events this week.");
        return Ok(());
    }
    for event in events {
        let when = event
            .starts_at(&Local)
            .map(|at| at.format("%a %d %H:%M").to_string())
            .unwrap_or_default();
        let mark = if event.completed { "x" } else { " " };
        output::info(format!("  [{mark}] {when:<12} {}", event.title));
    }
    Ok(())
}

fn cmd_tasks(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let day = reference_day(args, "tasks [YYYY-MM-DD]")?;
    let snapshot = context.require_snapshot()?;
    let reference = context.local_reference(day);
    let tasks = context.service.tasks_due_in_week(snapshot, &reference);

    output::section("Tasks due this week");
    if tasks.is_empty() {
        output::info("  Nothing due.");
        return Ok(());
    }
    for task in tasks {
        let due = task
            .due_at(&Local)
            .map(|at| at.format("%a %d").to_string())
            .unwrap_or_default();
        let priority = match task.priority {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        };
        output::info(format!("  {due:<7} {priority:<7} {}", task.title));
    }
    Ok(())
}
