//! Check command - probe the engine CLI.

use crate::config::FlowportConfig;
use crate::output::{OutputFormat, OutputFormatter, paint};
use clap::Args;
use flowport_engine::Engine;
use nu_ansi_term::Color::{Green, Red};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Check command arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Engine command, e.g. "npx n8n" (default: n8n)
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,
}

/// Engine availability report.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub engine: String,
    pub command: Vec<String>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_hint: Option<String>,
}

impl CheckReport {
    /// Probe `engine`. The version is only queried once the probe passed.
    pub fn probe(engine: &dyn Engine) -> Self {
        let info = engine.info();
        let available = engine.is_available();
        Self {
            engine: info.name.clone(),
            command: info.command.clone(),
            available,
            path: engine.locate(),
            version: if available { engine.version() } else { None },
            install_hint: (!available).then(|| info.install_hint.clone()),
        }
    }

    fn render(&self, colors: bool) -> String {
        let mut lines = Vec::new();
        if self.available {
            lines.push(format!(
                "{} {} is available",
                paint(Green, "✓", colors),
                self.engine
            ));
        } else {
            lines.push(format!(
                "{} {} CLI not found",
                paint(Red, "✗", colors),
                self.engine
            ));
        }
        lines.push(format!("  command: {}", self.command.join(" ")));
        if let Some(path) = &self.path {
            lines.push(format!("  path:    {}", path.display()));
        }
        if let Some(version) = &self.version {
            lines.push(format!("  version: {}", version));
        }
        if let Some(hint) = &self.install_hint {
            lines.push(format!("  install: {}", hint));
        }
        lines.join("\n")
    }
}

impl OutputFormatter for CheckReport {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.render(colors)
    }
}

/// Run check command with args.
pub fn run(args: CheckArgs, format: OutputFormat) -> i32 {
    let config = FlowportConfig::load(Path::new("."));
    let engine = super::engine_from_config(&config, args.engine.as_deref(), None);
    cmd_check(&engine, &format)
}

pub fn cmd_check(engine: &dyn Engine, format: &OutputFormat) -> i32 {
    let report = CheckReport::probe(engine);
    report.print(format);
    if report.available { 0 } else { 1 }
}
