use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::snapshot::Snapshot;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "load",
        "Load a user snapshot (subscription, transactions, events, tasks) from JSON",
        "load <path>",
        cmd_load,
    )]
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments("usage: load <path>".into()));
    };
    let path = PathBuf::from(*raw);
    let snapshot = Snapshot::load(&path)?;

    output::success(format!(
        "Loaded `{}`: {} transaction(s), {} event(s), {} task(s).",
        path.display(),
        snapshot.transactions.len(),
        snapshot.events.len(),
        snapshot.tasks.len()
    ));
    if snapshot.subscription.is_none() {
        output::hint("No subscription row; the Free plan applies.");
    }

    context.snapshot = Some(snapshot);
    let remembered = path.canonicalize().unwrap_or_else(|_| path.clone());
    context.config_mut().last_snapshot = Some(remembered);
    context.snapshot_path = Some(path);
    context.persist_config()
}
