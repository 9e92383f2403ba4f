use std::{
    borrow::Cow,
    io::{self, Lines, StdinLock},
};

use chrono::NaiveDate;
use colored::Colorize;
use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::config::Config;
use crate::errors::CliError;

/// Setting this variable switches the shell to line-by-line stdin processing.
pub const SCRIPT_ENV: &str = "DASHBOARD_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = match mode {
        CliMode::Interactive => LineSource::editor(&context)?,
        CliMode::Script => LineSource::Stdin(io::stdin().lines()),
    };

    while context.running {
        match source.read(&context.prompt())? {
            Input::Line(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                source.remember(line);
                if let Err(err) = execute(&mut context, line) {
                    context.report_error(err)?;
                }
            }
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => {
                if mode == CliMode::Interactive {
                    output::info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// The line editor for a terminal session, plain stdin lines for scripts.
enum LineSource {
    Editor(Box<Editor<ShellHelper, DefaultHistory>>),
    Stdin(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn editor(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
        let today = context.local_reference(None).date_naive();
        editor.set_helper(Some(ShellHelper::new(context.command_usages(), today)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(LineSource::Editor(Box::new(editor)))
    }

    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self {
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => Ok(Input::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => Ok(Input::Closed),
                Err(err) => Err(err.into()),
            },
            LineSource::Stdin(lines) => match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::Closed),
            },
        }
    }

    fn remember(&mut self, line: &str) {
        if let LineSource::Editor(editor) = self {
            editor.add_history_entry(line).ok();
        }
    }
}

/// Tokenizes one input line and runs the command it names.
fn execute(context: &mut ShellContext, line: &str) -> Result<(), CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse input: {err}"));
            return Ok(());
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(());
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    if context.dispatch(&raw.to_lowercase(), raw, &args)? == LoopControl::Exit {
        context.running = false;
    }
    Ok(())
}

/// Completion and usage hints that know the dashboard's command grammar.
struct ShellHelper {
    usages: Vec<(&'static str, &'static str)>,
    files: FilenameCompleter,
    today: NaiveDate,
}

impl ShellHelper {
    fn new(usages: Vec<(&'static str, &'static str)>, today: NaiveDate) -> Self {
        Self {
            usages,
            files: FilenameCompleter::new(),
            today,
        }
    }

    fn command_names(&self) -> impl Iterator<Item = String> + '_ {
        self.usages.iter().map(|(name, _)| name.to_string())
    }

    /// Words that may follow the already-typed `words`.
    fn suggestions(&self, words: &[&str]) -> Vec<String> {
        let lowered: Vec<String> = words.iter().map(|word| word.to_ascii_lowercase()).collect();
        let words: Vec<&str> = lowered.iter().map(String::as_str).collect();
        match words.as_slice() {
            [] | ["help"] => self.command_names().collect(),
            ["summary", ..] => vec![
                "--projected".to_string(),
                self.today.format("%Y-%m").to_string(),
            ],
            ["week"] | ["tasks"] => vec![self.today.format("%Y-%m-%d").to_string()],
            ["config"] => vec!["show".to_string(), "set".to_string()],
            ["config", "set"] => Config::KEYS.iter().map(|key| key.to_string()).collect(),
            ["config", "set", "week_starts_on"] => ["monday", "sunday", "saturday"]
                .iter()
                .map(|day| day.to_string())
                .collect(),
            ["config", "set", "ui_color_enabled"] => vec!["true".to_string(), "false".to_string()],
            _ => Vec::new(),
        }
    }

    /// Argument part of the usage line once a known command and a space are typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let (name, rest) = line.split_once(' ')?;
        if !rest.is_empty() {
            return None;
        }
        let name = name.to_ascii_lowercase();
        let (command, usage) = self.usages.iter().find(|(command, _)| *command == name)?;
        let arguments = usage.strip_prefix(*command)?.trim_start();
        (!arguments.is_empty()).then(|| arguments.to_string())
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let typed: Vec<&str> = before[..start].split_whitespace().collect();

        if matches!(typed.as_slice(), [command] if command.eq_ignore_ascii_case("load")) {
            return self.files.complete(line, pos, ctx);
        }

        let needle = before[start..].to_ascii_lowercase();
        let candidates = self
            .suggestions(&typed)
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ShellHelper {}
