//! End-to-end batch runs against a scripted stand-in for the n8n CLI.

#![cfg(unix)]

use flowport::classify::{Classifier, classify};
use flowport::commands::import::cmd_import;
use flowport::import::{Importer, Silent};
use flowport::output::OutputFormat;
use flowport::store::CategoryStore;
use flowport_engine::{Engine, N8n};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// Answers `--version`, rejects workflows named "reject", hangs on "slow".
const FAKE_N8N: &str = r#"
case "$1" in
  --version) echo "1.64.0" ;;
  import:workflow)
    f="${2#--input=}"
    if grep -q '"reject"' "$f"; then echo "credentials missing" >&2; exit 1; fi
    if grep -q '"slow"' "$f"; then exec sleep 5; fi
    echo "Successfully imported 1 workflow."
    ;;
  *) exit 2 ;;
esac
"#;

fn fake_n8n() -> N8n {
    N8n::new()
        .with_command(
            ["sh", "-c", FAKE_N8N, "n8n"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .with_import_timeout(Duration::from_secs(1))
}

fn workflow(dir: &Path, filename: &str, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(filename),
        format!(r#"{{"name": "{}", "nodes": [], "connections": {{}}}}"#, name),
    )
    .unwrap();
}

#[test]
fn test_mixed_batch() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("workflows");
    workflow(&root, "0001_Telegram_Bot.json", "ok");
    workflow(&root.join("crm"), "0002_Hubspot_Sync.json", "reject");
    workflow(&root, "0003_Slack_Digest.json", "slow");
    fs::write(root.join("0004_Broken.json"), "{ nope").unwrap();

    let engine = fake_n8n();
    assert!(engine.is_available());
    assert_eq!(engine.version().as_deref(), Some("1.64.0"));

    let store_path = tmp.path().join("context/search_categories.json");
    let report = Importer::new(&engine, CategoryStore::new(&store_path)).run(&root, &mut Silent);

    assert_eq!(report.total, 4);
    assert_eq!(report.imported, 1);
    assert_eq!(report.failed, 3);
    assert!(!report.success);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.errors,
        vec![
            "Timeout importing 0003_Slack_Digest.json".to_string(),
            "Invalid JSON: 0004_Broken.json".to_string(),
            "Import failed for 0002_Hubspot_Sync.json: credentials missing".to_string(),
        ]
    );

    let entries = CategoryStore::new(&store_path).load();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "0001_Telegram_Bot.json");
    assert_eq!(entries[0].category, classify("0001_Telegram_Bot.json"));
}

#[test]
fn test_all_imported_exits_zero() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("workflows");
    workflow(&root, "a.json", "ok");
    workflow(&root, "b.json", "ok");
    let store_path = tmp.path().join("store.json");

    let code = cmd_import(
        &fake_n8n(),
        &root,
        CategoryStore::new(&store_path),
        Classifier::builtin(),
        10,
        &OutputFormat::Json,
    );

    assert_eq!(code, 0);
    let names: Vec<_> = CategoryStore::new(&store_path)
        .load()
        .into_iter()
        .map(|e| e.filename)
        .collect();
    assert_eq!(names, vec!["a.json", "b.json"]);
}

#[test]
fn test_missing_engine_aborts() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("workflows");
    workflow(&root, "a.json", "ok");
    let store_path = tmp.path().join("store.json");

    let engine = N8n::new().with_command(vec!["flowport-test-no-such-n8n".to_string()]);
    let code = cmd_import(
        &engine,
        &root,
        CategoryStore::new(&store_path),
        Classifier::builtin(),
        10,
        &OutputFormat::Compact,
    );

    assert_eq!(code, 1);
    assert!(!store_path.exists());
}
