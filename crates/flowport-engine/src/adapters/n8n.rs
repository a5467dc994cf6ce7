//! n8n adapter - workflow automation platform.
//!
//! Imports go through the `import:workflow` CLI command.
//! https://docs.n8n.io/hosting/cli-commands/

use crate::{CommandOutput, Engine, EngineError, EngineInfo, run_command};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Default upper bound for one `import:workflow` call. Large workflows are slow.
pub const DEFAULT_IMPORT_TIMEOUT: Duration = Duration::from_secs(90);

/// Default upper bound for `--version`.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// n8n CLI adapter.
pub struct N8n {
    info: EngineInfo,
}

impl N8n {
    pub fn new() -> Self {
        Self {
            info: EngineInfo {
                name: "n8n".to_string(),
                command: vec!["n8n".to_string()],
                import_timeout: DEFAULT_IMPORT_TIMEOUT,
                probe_timeout: DEFAULT_PROBE_TIMEOUT,
                install_hint: "npm install -g n8n".to_string(),
            },
        }
    }

    /// Use a different command prefix, e.g. `["npx", "n8n"]`.
    ///
    /// An empty prefix is ignored.
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        if !command.is_empty() {
            self.info.command = command;
        }
        self
    }

    pub fn with_import_timeout(mut self, timeout: Duration) -> Self {
        self.info.import_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.info.probe_timeout = timeout;
        self
    }

    /// Run the command prefix followed by `args`.
    fn run(&self, args: Vec<OsString>, timeout: Duration) -> Result<CommandOutput, EngineError> {
        let (program, fixed) = self
            .info
            .command
            .split_first()
            .ok_or(EngineError::EmptyCommand)?;

        let mut full: Vec<OsString> = fixed.iter().map(OsString::from).collect();
        full.extend(args);
        run_command(program, &full, timeout)
    }
}

impl Default for N8n {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for N8n {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.run(vec!["--version".into()], self.info.probe_timeout)
            .map(|o| o.success())
            .unwrap_or(false)
    }

    fn version(&self) -> Option<String> {
        self.run(vec!["--version".into()], self.info.probe_timeout)
            .ok()
            .filter(|o| o.success())
            .and_then(|o| o.stdout.lines().next().map(|l| l.trim().to_string()))
            .filter(|v| !v.is_empty())
    }

    fn import_workflow(&self, path: &Path) -> Result<CommandOutput, EngineError> {
        let mut input = OsString::from("--input=");
        input.push(path.as_os_str());
        self.run(
            vec!["import:workflow".into(), input],
            self.info.import_timeout,
        )
    }
}
