use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change dashboard preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show_config(context),
        [action] if action.eq_ignore_ascii_case("show") => show_config(context),
        [action, key, value @ ..] if action.eq_ignore_ascii_case("set") && !value.is_empty() => {
            set_config_value(context, key, &value.join(" "))
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config set <{}> <value>",
            Config::KEYS.join("|")
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = context.config();
    output::section("Configuration");
    for key in Config::KEYS {
        if let Some(value) = config.get(key) {
            output::info(format!("  {key:<20} {value}"));
        }
    }
    let last = config
        .last_snapshot
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".into());
    output::info(format!("  {:<20} {last}", "last_snapshot"));
    output::info(format!(
        "  {:<20} {}",
        "stored at",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    context.config_mut().set(&key, value)?;
    context.persist_config()?;
    if key == "ui_color_enabled" {
        output::set_color_enabled(context.config().ui_color_enabled);
    }
    let stored = context.config().get(&key).unwrap_or_default();
    output::success(format!("{key} set to {stored}."));
    Ok(())
}
