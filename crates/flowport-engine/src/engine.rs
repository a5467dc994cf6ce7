//! Engine trait and common types.

use crate::CommandOutput;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Information about an engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    /// Display name (e.g., "n8n").
    pub name: String,
    /// Command prefix: executable followed by any fixed args (e.g., ["npx", "n8n"]).
    pub command: Vec<String>,
    /// Upper bound for a single import call.
    pub import_timeout: Duration,
    /// Upper bound for the availability probe.
    pub probe_timeout: Duration,
    /// Shown to the user when the engine is missing.
    pub install_hint: String,
}

impl EngineInfo {
    /// Executable name (first element of the command prefix).
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("")
    }
}

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0} not found in PATH")]
    NotFound(String),
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("empty engine command")]
    EmptyCommand,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for workflow engine adapters.
///
/// Implementations must never panic on a missing binary or a hung child;
/// those surface as [`EngineError::NotFound`] and [`EngineError::Timeout`].
pub trait Engine: Send + Sync {
    /// Get engine information.
    fn info(&self) -> &EngineInfo;

    /// Check if the engine CLI answers its version query with exit status zero.
    ///
    /// Bounded by [`EngineInfo::probe_timeout`]; any failure yields `false`.
    fn is_available(&self) -> bool;

    /// Get the engine version, if available.
    fn version(&self) -> Option<String>;

    /// Resolve the engine executable through `PATH`.
    fn locate(&self) -> Option<PathBuf> {
        which::which(self.info().program()).ok()
    }

    /// Import a single workflow file.
    ///
    /// Returns the captured output for any exit status; interpreting a
    /// non-zero code is up to the caller.
    fn import_workflow(&self, path: &Path) -> Result<CommandOutput, EngineError>;
}
