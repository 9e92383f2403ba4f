use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::{config::ConfigManager, core::services::DashboardService, snapshot::Snapshot};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub service: DashboardService,
    pub snapshot: Option<Snapshot>,
    pub snapshot_path: Option<PathBuf>,
    pub running: bool,
}
