use dash_core::{count_active_events, EntitlementNotice};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "plan",
            "Show the effective plan tier and any expiry notice",
            "plan",
            cmd_plan,
        ),
        CommandEntry::new(
            "can-create-event",
            "Check the free plan event quota before creating an event",
            "can-create-event",
            cmd_can_create_event,
        ),
    ]
}

fn cmd_plan(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.require_snapshot()?;
    let entitlement = context.service.entitlement(snapshot);
    let gate = context.service.quota_gate();
    let active = count_active_events(&snapshot.events);

    output::section("Plan");
    output::info(format!("  Tier           : {}", entitlement.tier));
    output::info(format!(
        "  Premium access : {}",
        if entitlement.is_premium_active { "yes" } else { "no" }
    ));
    if let Some(days) = entitlement.days_remaining {
        output::info(format!("  Days remaining : {days}"));
    }
    match gate.remaining(&entitlement, active) {
        Some(left) => output::info(format!(
            "  Active events  : {active} of {} ({left} left)",
            gate.limit()
        )),
        None => output::info(format!("  Active events  : {active} (unlimited)")),
    }

    match entitlement.notice {
        Some(EntitlementNotice::BetaExpired { ended_at }) => output::warning(match ended_at {
            Some(at) => format!("Beta access ended on {}.", at.format("%Y-%m-%d")),
            None => "Beta access has ended.".to_string(),
        }),
        Some(EntitlementNotice::TrialExpired { ended_at }) => output::warning(match ended_at {
            Some(at) => format!("Trial ended on {}.", at.format("%Y-%m-%d")),
            None => "Trial has ended.".to_string(),
        }),
        Some(EntitlementNotice::EndingSoon {
            tier,
            days_remaining,
        }) => output::warning(format!(
            "{tier} access ends in {days_remaining} day(s)."
        )),
        None => {}
    }
    Ok(())
}

fn cmd_can_create_event(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.require_snapshot()?;
    match context.service.ensure_can_create_event(snapshot) {
        Ok(()) => {
            output::success("An event can be created.");
            Ok(())
        }
        Err(err) => Err(CommandError::Message(format!(
            "{err}. Upgrade to Premium to add more events."
        ))),
    }
}
