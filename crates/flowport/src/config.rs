//! Configuration system for flowport.
//!
//! Loads config from:
//! 1. Global: ~/.config/flowport/config.toml
//! 2. Per-project: .flowport/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [import]
//! root = "workflows"                       # discovery root
//! store = "context/search_categories.json" # category store document
//! timeout_secs = 90                        # per-file import bound
//! max_errors_shown = 10                    # errors listed in the summary
//!
//! [engine]
//! command = ["npx", "n8n"]   # default: ["n8n"]
//! probe_timeout_secs = 10
//!
//! [classify.rules]
//! "acme" = "Business Process Automation"   # checked before built-in rules
//!
//! [pretty]
//! enabled = true
//! colors = "auto"            # "auto", "always", or "never"
//! ```

use crate::merge::Merge;
use crate::output::PrettyConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_WORKFLOWS_DIR: &str = "workflows";
pub const DEFAULT_STORE_PATH: &str = "context/search_categories.json";

/// Import pipeline configuration.
#[derive(Debug, Clone, Deserialize, Default, Merge)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory scanned recursively for workflow files.
    pub root: Option<PathBuf>,
    /// Category store document.
    pub store: Option<PathBuf>,
    /// Upper bound for one import call, in seconds. Default: 90, also used for 0
    pub timeout_secs: Option<u64>,
    /// How many collected errors the summary lists. Default: 10
    pub max_errors_shown: Option<usize>,
}

impl ImportConfig {
    pub fn root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOWS_DIR))
    }

    pub fn store(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.filter(|&secs| secs > 0).unwrap_or(90))
    }

    pub fn max_errors_shown(&self) -> usize {
        self.max_errors_shown.unwrap_or(10)
    }
}

/// External engine configuration.
#[derive(Debug, Clone, Deserialize, Default, Merge)]
#[serde(default)]
pub struct EngineConfig {
    /// Command prefix, executable first. Default: ["n8n"]
    pub command: Option<Vec<String>>,
    /// Upper bound for the `--version` probe, in seconds. Default: 10
    pub probe_timeout_secs: Option<u64>,
}

impl EngineConfig {
    pub fn command(&self) -> Vec<String> {
        self.command
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| vec!["n8n".to_string()])
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.filter(|&secs| secs > 0).unwrap_or(10))
    }
}

/// Extra filename classification rules.
///
/// ```toml
/// [classify.rules]
/// "acme" = "Business Process Automation"
/// ```
#[derive(Debug, Clone, Deserialize, Default, Merge)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Keyword (case-insensitive substring of the file stem) to category label.
    pub rules: BTreeMap<String, String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, Merge)]
#[serde(default)]
pub struct FlowportConfig {
    pub import: ImportConfig,
    pub engine: EngineConfig,
    pub classify: ClassifyConfig,
    pub pretty: PrettyConfig,
}

impl FlowportConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/flowport/config.toml,
    /// then merges with per-project config from .flowport/config.toml.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config = config.merge(global);
            }
        }

        let project_path = root.join(".flowport").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("flowport").join("config.toml"))
    }

    /// Load config from a file path. Missing files are silent, bad ones warn.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }
}
