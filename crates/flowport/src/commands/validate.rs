//! Validate command - structural check of every workflow file, no engine calls.

use crate::config::FlowportConfig;
use crate::discover::{discover_workflows, workflow_filename};
use crate::output::{OutputFormat, OutputFormatter, paint};
use crate::validate::check_workflow;
use clap::Args;
use nu_ansi_term::Color::{Green, Red};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validate command arguments.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory scanned recursively for workflow files (default: workflows)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

/// One file that failed validation.
#[derive(Debug, Serialize)]
pub struct InvalidFile {
    pub filename: String,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateReport {
    pub root: PathBuf,
    pub total: usize,
    pub valid: usize,
    pub invalid: Vec<InvalidFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidateReport {
    /// Discover and check every file under `root`.
    pub fn scan(root: &Path) -> Self {
        let mut report = Self {
            root: root.to_path_buf(),
            total: 0,
            valid: 0,
            invalid: Vec::new(),
            message: None,
        };

        if !root.is_dir() {
            report.message = Some(format!("Workflows directory not found: {}", root.display()));
            return report;
        }

        let files = discover_workflows(root);
        if files.is_empty() {
            report.message = Some(format!(
                "No workflow files found in: {} (searched recursively)",
                root.display()
            ));
            return report;
        }

        report.total = files.len();
        for path in files {
            match check_workflow(&path) {
                Ok(()) => report.valid += 1,
                Err(e) => report.invalid.push(InvalidFile {
                    filename: workflow_filename(&path),
                    path,
                    reason: e.to_string(),
                }),
            }
        }
        report
    }

    pub fn is_ok(&self) -> bool {
        self.message.is_none() && self.invalid.is_empty()
    }

    fn render(&self, colors: bool) -> String {
        if let Some(message) = &self.message {
            return format!("{} {}", paint(Red, "✗", colors), message);
        }

        let mut lines = Vec::new();
        for file in &self.invalid {
            lines.push(format!(
                "{} {}: {}",
                paint(Red, "✗", colors),
                file.path.display(),
                file.reason
            ));
        }
        let mark = if self.invalid.is_empty() {
            paint(Green, "✓", colors)
        } else {
            paint(Red, "✗", colors)
        };
        lines.push(format!(
            "{} {}/{} workflow files valid",
            mark, self.valid, self.total
        ));
        lines.join("\n")
    }
}

impl OutputFormatter for ValidateReport {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.render(colors)
    }
}

/// Run validate command with args.
pub fn run(args: ValidateArgs, format: OutputFormat) -> i32 {
    let config = FlowportConfig::load(Path::new("."));
    let root = args.root.unwrap_or_else(|| config.import.root());
    cmd_validate(&root, &format)
}

pub fn cmd_validate(root: &Path, format: &OutputFormat) -> i32 {
    let report = ValidateReport::scan(root);
    report.print(format);
    if report.is_ok() { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reports_invalid_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"nodes": [], "connections": {}}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"nodes": []}"#).unwrap();
        std::fs::write(nested.join("c.json"), "{ not json").unwrap();

        let report = ValidateReport::scan(dir.path());
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 1);
        let names: Vec<_> = report.invalid.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["b.json", "c.json"]);
        assert!(!report.is_ok());
        assert!(report.format_text().ends_with("✗ 1/3 workflow files valid"));
    }

    #[test]
    fn test_all_valid() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"nodes": [], "connections": {}}"#).unwrap();

        assert_eq!(cmd_validate(dir.path(), &OutputFormat::Compact), 0);
    }

    #[test]
    fn test_empty_and_missing_roots_fail() {
        let dir = tempdir().unwrap();
        assert_eq!(cmd_validate(dir.path(), &OutputFormat::Compact), 1);

        let missing = dir.path().join("missing");
        let report = ValidateReport::scan(&missing);
        assert!(
            report
                .message
                .as_deref()
                .is_some_and(|m| m.starts_with("Workflows directory not found"))
        );
    }
}
