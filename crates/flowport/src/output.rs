//! How command results reach the terminal.
//!
//! Every command builds a result value and hands it to
//! [`OutputFormatter::print`], which picks plain text, colored text or one
//! line of JSON from the resolved [`OutputFormat`].

use crate::merge::Merge;
use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

/// `[pretty] colors` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colors when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn resolve(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// The `[pretty]` config section.
///
/// ```toml
/// [pretty]
/// enabled = true     # unset: on when stdout is a terminal
/// colors = "never"   # auto | always | never
/// ```
#[derive(Debug, Clone, Deserialize, Default, Merge)]
#[serde(default)]
pub struct PrettyConfig {
    pub enabled: Option<bool>,
    pub colors: Option<ColorMode>,
}

impl PrettyConfig {
    /// Pretty mode unless configured off; unset follows the terminal.
    pub fn enabled(&self) -> bool {
        self.enabled
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }

    /// `NO_COLOR` in the environment turns colors off whatever the config says.
    pub fn use_colors(&self) -> bool {
        std::env::var_os("NO_COLOR").is_none() && self.colors.unwrap_or_default().resolve()
    }
}

/// Resolved presentation for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty { colors: bool },
    /// A single JSON document on stdout; progress moves to stderr.
    Json,
}

impl OutputFormat {
    /// `--json` beats `--pretty`, `--compact` beats the config.
    pub fn from_cli(json: bool, pretty: bool, compact: bool, config: &PrettyConfig) -> Self {
        match (json, compact, pretty || config.enabled()) {
            (true, _, _) => OutputFormat::Json,
            (false, true, _) | (false, false, false) => OutputFormat::Compact,
            (false, false, true) => OutputFormat::Pretty {
                colors: config.use_colors(),
            },
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    pub fn use_colors(&self) -> bool {
        matches!(self, OutputFormat::Pretty { colors: true })
    }
}

/// A command result that can be shown as text or serialized as JSON.
pub trait OutputFormatter: Serialize {
    fn format_text(&self) -> String;

    /// Colored variant of [`format_text`](Self::format_text). Results with
    /// nothing worth highlighting keep the default.
    fn format_pretty(&self, _colors: bool) -> String {
        self.format_text()
    }

    fn print(&self, format: &OutputFormat) {
        let rendered = match format {
            OutputFormat::Compact => self.format_text(),
            OutputFormat::Pretty { colors } => self.format_pretty(*colors),
            OutputFormat::Json => match serde_json::to_string(self) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "cannot serialize result");
                    return;
                }
            },
        };
        println!("{}", rendered);
    }
}

/// Paint `text` when colors are on, otherwise return it unchanged.
pub fn paint(color: Color, text: &str, colors: bool) -> String {
    if colors {
        color.paint(text).to_string()
    } else {
        text.to_string()
    }
}
