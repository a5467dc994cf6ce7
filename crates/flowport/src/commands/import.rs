//! Import command - batch-import workflow files into the engine.

use crate::classify::{Classifier, display_category};
use crate::config::FlowportConfig;
use crate::discover::workflow_filename;
use crate::import::{BatchReport, ImportOutcome, Importer, Progress};
use crate::output::{OutputFormat, OutputFormatter, paint};
use crate::store::CategoryStore;
use clap::Args;
use flowport_engine::Engine;
use nu_ansi_term::Color::{Green, Red, Yellow};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Import command arguments.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Directory scanned recursively for workflow files (default: workflows)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Category store document (default: context/search_categories.json)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Per-file import timeout in seconds (default: 90)
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Engine command, e.g. "npx n8n" (default: n8n)
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,
}

/// Console progress: one line per file, plus the outcome.
///
/// Writes to stdout, or stderr when stdout carries JSON.
pub struct ConsoleProgress {
    colors: bool,
    to_stderr: bool,
}

impl ConsoleProgress {
    pub fn new(colors: bool, to_stderr: bool) -> Self {
        Self { colors, to_stderr }
    }

    fn emit(&self, line: &str) {
        if self.to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

impl Progress for ConsoleProgress {
    fn started(&mut self, total: usize) {
        self.emit(&format!("Starting import of {} workflows...", total));
        self.emit(&"-".repeat(50));
    }

    fn processing(&mut self, index: usize, total: usize, path: &Path) {
        self.emit(&format!(
            "[{}/{}] Processing {}...",
            index,
            total,
            workflow_filename(path)
        ));
    }

    fn finished(&mut self, outcome: &ImportOutcome) {
        if outcome.succeeded {
            self.emit(&format!(
                "{} Imported: {}",
                paint(Green, "✓", self.colors),
                outcome.filename
            ));
            let category = outcome.category.as_deref().unwrap_or("");
            self.emit(&format!(
                "  Categorized '{}' as '{}'",
                outcome.filename,
                display_category(category)
            ));
            if let Some(error) = &outcome.error {
                self.emit(&format!("  {} {}", paint(Yellow, "!", self.colors), error));
            }
        } else {
            self.emit(&format!(
                "{} Failed: {}",
                paint(Red, "✗", self.colors),
                outcome.filename
            ));
            if let Some(error) = &outcome.error {
                self.emit(&format!("   {}", error));
            }
        }
    }
}

/// Batch report plus the summary's display limit.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    #[serde(flatten)]
    pub report: BatchReport,
    #[serde(skip)]
    pub max_errors_shown: usize,
}

impl ImportResult {
    fn render(&self, colors: bool) -> String {
        let report = &self.report;
        if let Some(message) = &report.message {
            return format!("{} {}", paint(Red, "✗", colors), message);
        }

        let mut lines = vec![
            String::new(),
            "=".repeat(50),
            "Import summary:".to_string(),
            format!(
                "  {} Imported: {}",
                paint(Green, "✓", colors),
                report.imported
            ),
            format!("  {} Failed:   {}", paint(Red, "✗", colors), report.failed),
            format!("    Total:    {}", report.total),
        ];

        if !report.errors.is_empty() {
            lines.push(String::new());
            lines.push(paint(Red, "Errors encountered:", colors));
            for error in report.errors.iter().take(self.max_errors_shown) {
                lines.push(format!("  • {}", error));
            }
            if report.errors.len() > self.max_errors_shown {
                lines.push(format!(
                    "  ... and {} more errors",
                    report.errors.len() - self.max_errors_shown
                ));
            }
        }

        lines.join("\n")
    }
}

impl OutputFormatter for ImportResult {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.render(colors)
    }
}

/// Run import command with args.
pub fn run(args: ImportArgs, format: OutputFormat) -> i32 {
    let config = FlowportConfig::load(Path::new("."));
    let engine = super::engine_from_config(
        &config,
        args.engine.as_deref(),
        args.timeout.map(Duration::from_secs),
    );
    let root = args.root.unwrap_or_else(|| config.import.root());
    let store = CategoryStore::new(args.store.unwrap_or_else(|| config.import.store()));
    let classifier = Classifier::with_rules(config.classify.rules.clone());

    cmd_import(
        &engine,
        &root,
        store,
        classifier,
        config.import.max_errors_shown(),
        &format,
    )
}

/// Probe the engine, then import everything under `root`.
///
/// An unavailable engine aborts before discovery.
pub fn cmd_import(
    engine: &dyn Engine,
    root: &Path,
    store: CategoryStore,
    classifier: Classifier,
    max_errors_shown: usize,
    format: &OutputFormat,
) -> i32 {
    let info = engine.info();
    if !engine.is_available() {
        eprintln!(
            "{} {} CLI not found. Please install {} first:",
            paint(Red, "✗", format.use_colors()),
            info.name,
            info.name
        );
        eprintln!("   {}", info.install_hint);
        return 1;
    }

    let mut progress = ConsoleProgress::new(format.use_colors(), format.is_json());
    progress.emit(&format!("Importing workflows into {}", info.name));
    progress.emit(&"=".repeat(50));

    let report = Importer::new(engine, store)
        .with_classifier(classifier)
        .run(root, &mut progress);
    let exit_code = report.exit_code();

    ImportResult {
        report,
        max_errors_shown,
    }
    .print(format);

    exit_code
}
