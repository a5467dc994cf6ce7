//! Batch import pipeline.
//!
//! [`Importer::run`] discovers workflow files, then for each one in order:
//! validates it, hands it to the engine, and on success records its
//! classification in the category store. Failures are collected per file and
//! never stop the batch. There are no retries.

use crate::classify::Classifier;
use crate::discover::{discover_workflows, workflow_filename};
use crate::store::{CategoryEntry, CategoryStore, merge_entry};
use crate::validate::validate_workflow;
use flowport_engine::{Engine, EngineError};
use serde::Serialize;
use std::path::Path;

/// Result of importing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub filename: String,
    pub succeeded: bool,
    /// Failure reason. Also set on a success whose store write failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Category recorded for a successful import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ImportOutcome {
    pub fn success(filename: &str, category: String) -> Self {
        Self {
            filename: filename.to_string(),
            succeeded: true,
            error: None,
            category: Some(category),
        }
    }

    pub fn failure(filename: &str, error: impl ToString) -> Self {
        Self {
            filename: filename.to_string(),
            succeeded: false,
            error: Some(error.to_string()),
            category: None,
        }
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<String>,
    /// Why the run stopped before processing any file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub outcomes: Vec<ImportOutcome>,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self {
            success: true,
            imported: 0,
            failed: 0,
            total,
            errors: Vec::new(),
            message: None,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// A run that ended before any file was processed.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::new(0)
        }
    }

    fn record(&mut self, outcome: ImportOutcome) {
        if outcome.succeeded {
            self.imported += 1;
        } else {
            self.failed += 1;
        }
        if let Some(error) = &outcome.error {
            self.errors.push(error.clone());
        }
        self.success = self.failed == 0;
        self.outcomes.push(outcome);
    }

    /// Process exit status: 0 iff every discovered file imported.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }
}

/// Observer for per-file progress.
pub trait Progress {
    /// Files were discovered and processing is about to start.
    fn started(&mut self, _total: usize) {}

    /// `index` is 1-based.
    fn processing(&mut self, _index: usize, _total: usize, _path: &Path) {}

    fn finished(&mut self, _outcome: &ImportOutcome) {}
}

/// Progress observer that reports nothing.
pub struct Silent;

impl Progress for Silent {}

/// Import a single workflow file.
///
/// On success, `entries` gets the file's classification and the whole store
/// is rewritten. A failed write does not undo the import; it is reported in
/// the outcome's `error` while `succeeded` stays true.
pub fn import_one(
    engine: &dyn Engine,
    store: &CategoryStore,
    entries: &mut Vec<CategoryEntry>,
    classifier: &Classifier,
    path: &Path,
) -> ImportOutcome {
    let filename = workflow_filename(path);

    if !validate_workflow(path) {
        return ImportOutcome::failure(&filename, format!("Invalid JSON: {}", filename));
    }

    let output = match engine.import_workflow(path) {
        Ok(output) => output,
        Err(EngineError::Timeout(after)) => {
            tracing::warn!(file = %filename, timeout_secs = after.as_secs(), "import timed out");
            return ImportOutcome::failure(&filename, format!("Timeout importing {}", filename));
        }
        Err(EngineError::NotFound(_)) => {
            return ImportOutcome::failure(
                &filename,
                format!("{} CLI not found in PATH", engine.info().name),
            );
        }
        Err(e) => {
            return ImportOutcome::failure(&filename, format!("Error importing {}: {}", filename, e));
        }
    };

    if !output.success() {
        tracing::info!(file = %filename, code = ?output.code, "import rejected by engine");
        return ImportOutcome::failure(
            &filename,
            format!("Import failed for {}: {}", filename, output.diagnostic()),
        );
    }

    let category = classifier.classify(&filename);
    let action = merge_entry(entries, &filename, &category);
    tracing::info!(file = %filename, category = %category, ?action, "imported");

    let mut outcome = ImportOutcome::success(&filename, category);
    if let Err(e) = store.save(entries) {
        tracing::error!(file = %filename, error = %e, "failed to save category store");
        outcome.error = Some(format!(
            "Failed to save category store after importing {}: {}",
            filename, e
        ));
    }
    outcome
}

/// Sequential batch importer.
pub struct Importer<'a> {
    engine: &'a dyn Engine,
    store: CategoryStore,
    classifier: Classifier,
}

impl<'a> Importer<'a> {
    pub fn new(engine: &'a dyn Engine, store: CategoryStore) -> Self {
        Self {
            engine,
            store,
            classifier: Classifier::builtin(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Import every workflow file under `root`.
    ///
    /// Only a missing root or an empty discovery ends the run early; both
    /// leave existing store entries untouched.
    pub fn run(&self, root: &Path, progress: &mut dyn Progress) -> BatchReport {
        if let Err(e) = self.store.ensure() {
            tracing::error!(path = %self.store.path().display(), error = %e, "cannot create category store");
        }

        if !root.is_dir() {
            return BatchReport::aborted(format!(
                "Workflows directory not found: {}",
                root.display()
            ));
        }

        let files = discover_workflows(root);
        if files.is_empty() {
            return BatchReport::aborted(format!(
                "No workflow files found in: {} (searched recursively)",
                root.display()
            ));
        }

        let total = files.len();
        tracing::info!(root = %root.display(), total, "starting batch import");
        progress.started(total);

        let mut entries = self.store.load();
        let mut report = BatchReport::new(total);

        for (i, path) in files.iter().enumerate() {
            progress.processing(i + 1, total, path);
            let outcome = import_one(
                self.engine,
                &self.store,
                &mut entries,
                &self.classifier,
                path,
            );
            progress.finished(&outcome);
            report.record(outcome);
        }

        tracing::info!(
            imported = report.imported,
            failed = report.failed,
            total = report.total,
            "batch import finished"
        );
        report
    }
}
