//! Categories command - list category store entries, or compare them with
//! the workflow files on disk.

use crate::classify::display_category;
use crate::config::FlowportConfig;
use crate::discover::{discover_workflows, workflow_filename};
use crate::output::{OutputFormat, OutputFormatter, paint};
use crate::store::{CategoryEntry, CategoryStore, prune_orphans};
use clap::Args;
use nu_ansi_term::Color::{Cyan, DarkGray, Green, Red, Yellow};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Categories command arguments.
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Category store document (default: context/search_categories.json)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Only list entries with this category ("" or "uncategorized" for none)
    #[arg(short, long, value_name = "LABEL", conflicts_with = "orphans")]
    pub category: Option<String>,

    /// Compare the store with the files under the workflows directory
    #[arg(long)]
    pub orphans: bool,

    /// Remove entries whose workflow file no longer exists (implies --orphans)
    #[arg(long)]
    pub prune: bool,

    /// Workflows directory for --orphans (default: workflows)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub store: PathBuf,
    pub entries: Vec<CategoryEntry>,
    /// Entry count per category label, over the listed entries.
    pub counts: BTreeMap<String, usize>,
}

/// Does `category` match a user-supplied filter label?
///
/// Labels compare case-insensitively; an empty filter or "uncategorized"
/// matches entries without a category.
pub fn matches_filter(category: &str, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() || filter.eq_ignore_ascii_case("uncategorized") {
        return category.is_empty();
    }
    category.eq_ignore_ascii_case(filter)
}

impl CategoryList {
    pub fn new(store: &CategoryStore, filter: Option<&str>) -> Self {
        let entries: Vec<CategoryEntry> = store
            .load()
            .into_iter()
            .filter(|e| filter.is_none_or(|f| matches_filter(&e.category, f)))
            .collect();

        let mut counts = BTreeMap::new();
        for entry in &entries {
            *counts.entry(entry.category.clone()).or_insert(0) += 1;
        }

        Self {
            store: store.path().to_path_buf(),
            entries,
            counts,
        }
    }

    fn render(&self, colors: bool) -> String {
        if self.entries.is_empty() {
            return format!("No entries in {}", self.store.display());
        }

        let mut lines = Vec::new();
        for entry in &self.entries {
            let category = display_category(&entry.category);
            if colors {
                lines.push(format!(
                    "{}  {}",
                    entry.filename,
                    Cyan.paint(category)
                ));
            } else {
                lines.push(format!("{}  {}", entry.filename, category));
            }
        }

        lines.push(String::new());
        for (category, count) in &self.counts {
            let line = format!("{:>5}  {}", count, display_category(category));
            if colors {
                lines.push(DarkGray.paint(line).to_string());
            } else {
                lines.push(line);
            }
        }
        lines.join("\n")
    }
}

impl OutputFormatter for CategoryList {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.render(colors)
    }
}

/// Store entries and workflow files that do not match up.
#[derive(Debug, Serialize)]
pub struct StoreSync {
    pub store: PathBuf,
    pub root: PathBuf,
    pub entries: usize,
    pub files: usize,
    /// Entries whose workflow file is gone, in store order.
    pub orphans: Vec<String>,
    /// Workflow files with no entry, in discovery order.
    pub unindexed: Vec<String>,
    pub pruned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoreSync {
    /// Compare `store` with the files under `root`, removing orphaned
    /// entries when `prune` is set. The store is only rewritten when
    /// something was removed.
    pub fn check(store: &CategoryStore, root: &Path, prune: bool) -> Self {
        let mut sync = Self {
            store: store.path().to_path_buf(),
            root: root.to_path_buf(),
            entries: 0,
            files: 0,
            orphans: Vec::new(),
            unindexed: Vec::new(),
            pruned: false,
            message: None,
        };

        if !root.is_dir() {
            sync.message = Some(format!("Workflows directory not found: {}", root.display()));
            return sync;
        }

        let files: Vec<String> = discover_workflows(root)
            .iter()
            .map(|p| workflow_filename(p))
            .collect();
        let present: BTreeSet<String> = files.iter().cloned().collect();
        let mut entries = store.load();
        let indexed: BTreeSet<&str> = entries.iter().map(|e| e.filename.as_str()).collect();

        sync.files = files.len();
        sync.unindexed = files
            .iter()
            .filter(|f| !indexed.contains(f.as_str()))
            .cloned()
            .collect();
        sync.entries = entries.len();

        let mut kept = entries.clone();
        let removed = prune_orphans(&mut kept, &present);
        sync.orphans = removed.into_iter().map(|e| e.filename).collect();

        if prune && !sync.orphans.is_empty() {
            entries = kept;
            match store.save(&entries) {
                Ok(()) => {
                    tracing::info!(removed = sync.orphans.len(), "pruned orphaned store entries");
                    sync.pruned = true;
                    sync.entries = entries.len();
                }
                Err(e) => {
                    sync.message = Some(format!(
                        "Failed to save category store {}: {}",
                        store.path().display(),
                        e
                    ));
                }
            }
        }
        sync
    }

    pub fn is_ok(&self) -> bool {
        self.message.is_none()
    }

    fn render(&self, colors: bool) -> String {
        if let Some(message) = &self.message {
            return format!("{} {}", paint(Red, "✗", colors), message);
        }

        let mut lines = vec![format!(
            "{} entries in {}, {} workflow files under {}",
            self.entries,
            self.store.display(),
            self.files,
            self.root.display()
        )];

        if self.orphans.is_empty() && self.unindexed.is_empty() {
            lines.push(format!("{} Store and files agree", paint(Green, "✓", colors)));
            return lines.join("\n");
        }

        if !self.orphans.is_empty() {
            let verb = if self.pruned { "Removed" } else { "Found" };
            lines.push(format!(
                "{} {} {} entries without a workflow file:",
                paint(Yellow, "!", colors),
                verb,
                self.orphans.len()
            ));
            for filename in &self.orphans {
                lines.push(format!("  {}", filename));
            }
        }
        if !self.unindexed.is_empty() {
            lines.push(format!(
                "{} {} workflow files not in the store:",
                paint(Yellow, "!", colors),
                self.unindexed.len()
            ));
            for filename in &self.unindexed {
                lines.push(format!("  {}", filename));
            }
        }
        lines.join("\n")
    }
}

impl OutputFormatter for StoreSync {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self, colors: bool) -> String {
        self.render(colors)
    }
}

/// Run categories command with args.
pub fn run(args: CategoriesArgs, format: OutputFormat) -> i32 {
    let config = FlowportConfig::load(Path::new("."));
    let store = CategoryStore::new(args.store.unwrap_or_else(|| config.import.store()));

    if args.orphans || args.prune {
        let root = args.root.unwrap_or_else(|| config.import.root());
        let sync = StoreSync::check(&store, &root, args.prune);
        sync.print(&format);
        return if sync.is_ok() { 0 } else { 1 };
    }

    CategoryList::new(&store, args.category.as_deref()).print(&format);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::merge_entry;
    use tempfile::tempdir;

    fn sample_store(dir: &Path) -> CategoryStore {
        let store = CategoryStore::new(dir.join("search_categories.json"));
        let mut entries = Vec::new();
        merge_entry(&mut entries, "0001_Telegram_Bot.json", "Communication & Messaging");
        merge_entry(&mut entries, "0002_Manual_Noop.json", "");
        merge_entry(&mut entries, "0003_Slack_Alert.json", "Communication & Messaging");
        store.save(&entries).unwrap();
        store
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("", ""));
        assert!(matches_filter("", "Uncategorized"));
        assert!(!matches_filter("CRM & Sales", ""));
        assert!(matches_filter("CRM & Sales", "crm & sales"));
        assert!(!matches_filter("CRM & Sales", "CRM"));
    }

    #[test]
    fn test_list_all_with_counts() {
        let dir = tempdir().unwrap();
        let list = CategoryList::new(&sample_store(dir.path()), None);
        assert_eq!(list.entries.len(), 3);
        assert_eq!(list.counts.get("Communication & Messaging"), Some(&2));
        assert_eq!(list.counts.get(""), Some(&1));

        let text = list.format_text();
        assert!(text.contains("0002_Manual_Noop.json  Uncategorized"));
        assert!(text.contains("    2  Communication & Messaging"));
    }

    #[test]
    fn test_filter_uncategorized() {
        let dir = tempdir().unwrap();
        let list = CategoryList::new(&sample_store(dir.path()), Some("uncategorized"));
        let names: Vec<_> = list.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["0002_Manual_Noop.json"]);
    }

    fn sample_root(dir: &Path) -> PathBuf {
        let root = dir.join("workflows");
        std::fs::create_dir_all(root.join("chat")).unwrap();
        std::fs::write(root.join("0001_Telegram_Bot.json"), "{}").unwrap();
        std::fs::write(root.join("chat/0003_Slack_Alert.json"), "{}").unwrap();
        std::fs::write(root.join("0004_Stripe_Invoice.json"), "{}").unwrap();
        root
    }

    #[test]
    fn test_orphans_reported_without_writing() {
        let dir = tempdir().unwrap();
        let store = sample_store(dir.path());
        let root = sample_root(dir.path());
        let before = std::fs::read_to_string(store.path()).unwrap();

        let sync = StoreSync::check(&store, &root, false);
        assert!(sync.is_ok());
        assert_eq!(sync.orphans, vec!["0002_Manual_Noop.json"]);
        assert_eq!(sync.unindexed, vec!["0004_Stripe_Invoice.json"]);
        assert_eq!(sync.entries, 3);
        assert_eq!(sync.files, 3);
        assert!(!sync.pruned);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);

        let text = sync.format_text();
        assert!(text.contains("! Found 1 entries without a workflow file:\n  0002_Manual_Noop.json"));
        assert!(text.contains("! 1 workflow files not in the store:\n  0004_Stripe_Invoice.json"));
    }

    #[test]
    fn test_prune_removes_orphans() {
        let dir = tempdir().unwrap();
        let store = sample_store(dir.path());
        let root = sample_root(dir.path());

        let sync = StoreSync::check(&store, &root, true);
        assert!(sync.pruned);
        assert_eq!(sync.entries, 2);

        let names: Vec<_> = store.load().into_iter().map(|e| e.filename).collect();
        assert_eq!(names, vec!["0001_Telegram_Bot.json", "0003_Slack_Alert.json"]);
    }

    #[test]
    fn test_orphans_missing_root() {
        let dir = tempdir().unwrap();
        let store = sample_store(dir.path());
        let sync = StoreSync::check(&store, &dir.path().join("missing"), true);
        assert!(!sync.is_ok());
        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = CategoryStore::new(dir.path().join("none.json"));
        let list = CategoryList::new(&store, None);
        assert!(list.entries.is_empty());
        assert!(list.format_text().starts_with("No entries in"));
    }
}
