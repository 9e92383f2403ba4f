use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

/// Turns ANSI styling on or off for everything printed afterwards.
pub fn set_color_enabled(enabled: bool) {
    if enabled && std::env::var_os("NO_COLOR").is_none() {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "",
        MessageKind::Success => "OK: ",
        MessageKind::Warning => "WARNING: ",
        MessageKind::Error => "ERROR: ",
        MessageKind::Hint => "Hint: ",
        MessageKind::Section => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}{}", label(kind), text),
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.dimmed().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Decimal and grouping marks for a language tag such as `fr-FR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberLocale {
    /// Only the language subtag is considered; unknown languages use `1,234.50`.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "fr" | "pl" | "cs" | "sv" | "fi" | "nb" => (',', ' '),
            "de" | "es" | "it" | "nl" | "pt" | "da" => (',', '.'),
            _ => return Self::default(),
        };
        Self {
            decimal_separator,
            grouping_separator,
        }
    }

    fn group(&self, digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// Formats amounts and percentages with the user's locale and currency.
#[derive(Debug, Clone)]
pub struct AmountFormatter {
    locale: NumberLocale,
    currency: String,
}

impl AmountFormatter {
    pub fn new(locale_tag: &str, currency: &str) -> Self {
        Self {
            locale: NumberLocale::from_tag(locale_tag),
            currency: currency.to_string(),
        }
    }

    /// Rounds to cents here and nowhere earlier.
    pub fn amount(&self, value: f64) -> String {
        let cents = format!("{:.2}", value.abs());
        let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
        let sign = if value < 0.0 && cents != "0.00" { "-" } else { "" };
        format!(
            "{sign}{}{}{fraction} {}",
            self.locale.group(whole),
            self.locale.decimal_separator,
            self.currency
        )
    }

    pub fn percent(&self, value: f64) -> String {
        if !value.is_finite() {
            return "n/a".to_string();
        }
        let text = format!("{:.1}", value);
        format!("{}%", text.replace('.', &self.locale.decimal_separator.to_string()))
    }
}
