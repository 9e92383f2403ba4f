pub mod config;
pub mod finance;
pub mod plan;
pub mod planner;
pub mod snapshot;
pub mod system;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(snapshot::definitions());
    commands.extend(plan::definitions());
    commands.extend(finance::definitions());
    commands.extend(planner::definitions());
    commands.extend(config::definitions());
    commands
}
