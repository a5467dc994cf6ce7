//! Classify command - show the category a filename would get.

use crate::classify::{Classifier, display_category};
use crate::config::FlowportConfig;
use crate::output::{OutputFormat, OutputFormatter};
use clap::Args;
use nu_ansi_term::Color::Cyan;
use serde::Serialize;
use std::path::Path;

/// Classify command arguments.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Workflow filenames (only the name is used, files need not exist)
    #[arg(required = true)]
    pub filenames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Classification {
    pub filename: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ClassifyList {
    pub items: Vec<Classification>,
}

impl ClassifyList {
    pub fn new<S: AsRef<str>>(classifier: &Classifier, filenames: &[S]) -> Self {
        let items = filenames
            .iter()
            .map(|f| {
                let filename = f.as_ref();
                Classification {
                    filename: filename.to_string(),
                    category: classifier.classify(filename),
                }
            })
            .collect();
        Self { items }
    }
}

impl OutputFormatter for ClassifyList {
    fn format_text(&self) -> String {
        self.items
            .iter()
            .map(|c| format!("{}  {}", c.filename, display_category(&c.category)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        if !colors {
            return self.format_text();
        }
        self.items
            .iter()
            .map(|c| format!("{}  {}", c.filename, Cyan.paint(display_category(&c.category))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run classify command with args.
pub fn run(args: ClassifyArgs, format: OutputFormat) -> i32 {
    let config = FlowportConfig::load(Path::new("."));
    let classifier = Classifier::with_rules(config.classify.rules);
    ClassifyList::new(&classifier, &args.filenames).print(&format);
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_list_text() {
        let list = ClassifyList::new(
            &Classifier::builtin(),
            &["0001_Telegram_Schedule_Automation_Scheduled.json", "0002_Manual_Noop.json"],
        );
        assert_eq!(
            list.format_text(),
            "0001_Telegram_Schedule_Automation_Scheduled.json  Communication & Messaging\n\
             0002_Manual_Noop.json  Uncategorized"
        );
    }

    #[test]
    fn test_classify_list_json_is_array() {
        let list = ClassifyList::new(&Classifier::builtin(), &["0002_Manual_Noop.json"]);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["filename"], "0002_Manual_Noop.json");
        assert_eq!(json[0]["category"], "");
    }

    #[test]
    fn test_configured_rule_wins() {
        let classifier = Classifier::with_rules([(
            "telegram".to_string(),
            "Business Process Automation".to_string(),
        )]);
        let list = ClassifyList::new(&classifier, &["0001_Telegram_Bot.json"]);
        assert_eq!(list.items[0].category, "Business Process Automation");
    }
}
