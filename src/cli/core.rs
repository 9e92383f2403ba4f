//! Dispatch, error reporting, and shared helpers for the shell context.

use chrono::{DateTime, Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use dash_domain::local_start_of_day;

use crate::{
    config::{self, Config},
    core::services::DashboardService,
    errors::{CliError, DashboardError},
    snapshot::Snapshot,
};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No snapshot loaded. Use `load <path>` first.")]
    SnapshotNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] DashboardError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<config::ConfigError> for CommandError {
    fn from(err: config::ConfigError) -> Self {
        CommandError::Core(DashboardError::from(err))
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = config::default_manager()?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let mut context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            config_manager,
            service: DashboardService::with_system_clock(config),
            snapshot: None,
            snapshot_path: None,
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    /// Reopens the last snapshot in interactive sessions; failures only warn.
    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(path) = self.config().last_snapshot.clone() else {
            return;
        };
        match Snapshot::load(&path) {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                output::success(format!("Automatically loaded `{}`.", path.display()));
                self.snapshot_path = Some(path);
            }
            Err(err) => warn!(path = %path.display(), "could not reopen last snapshot: {err}"),
        }
    }

    pub fn config(&self) -> &Config {
        self.service.config()
    }

    pub(crate) fn config_mut(&mut self) -> &mut Config {
        self.service.config_mut()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(self.config())?;
        Ok(())
    }

    pub(crate) fn require_snapshot(&self) -> Result<&Snapshot, CommandError> {
        self.snapshot.as_ref().ok_or(CommandError::SnapshotNotLoaded)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.snapshot_path.as_ref().and_then(|path| path.file_stem()) {
            Some(name) => format!("dashboard [{}]> ", name.to_string_lossy()),
            None => "dashboard> ".to_string(),
        }
    }

    /// `(name, usage)` for every registered command, in registration order.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::SnapshotNotLoaded => {
                output::error(CommandError::SnapshotNotLoaded);
                output::hint("Try `load snapshot.json` to get started.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    /// Start of `day` in local time, used as the reference instant for windows.
    pub(crate) fn local_reference(&self, day: Option<NaiveDate>) -> DateTime<Local> {
        match day {
            Some(day) => local_start_of_day(&Local, day),
            None => self.service.now().with_timezone(&Local),
        }
    }
}

pub(crate) fn parse_day(raw: &str) -> Result<NaiveDate, CommandError> {
    dash_core::parse_day(raw)
        .map_err(|err| CommandError::InvalidArguments(format!("{err}; expected YYYY-MM-DD")))
}

pub(crate) fn parse_month(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("Invalid month `{raw}`; expected YYYY-MM"))
    })
}
