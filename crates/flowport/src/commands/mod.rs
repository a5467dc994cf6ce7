//! CLI command implementations - one module per top-level command.

pub mod categories;
pub mod check;
pub mod classify;
pub mod import;
pub mod validate;

use crate::config::FlowportConfig;
use flowport_engine::N8n;
use std::time::Duration;

/// Build the engine adapter from config, with an optional command-line override.
///
/// `command` is split on whitespace, so `--engine "npx n8n"` works.
pub fn engine_from_config(
    config: &FlowportConfig,
    command: Option<&str>,
    import_timeout: Option<Duration>,
) -> N8n {
    let command = command
        .map(|c| c.split_whitespace().map(String::from).collect::<Vec<_>>())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.engine.command());

    N8n::new()
        .with_command(command)
        .with_import_timeout(import_timeout.unwrap_or_else(|| config.import.timeout()))
        .with_probe_timeout(config.engine.probe_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowport_engine::Engine;

    #[test]
    fn test_engine_defaults_from_config() {
        let engine = engine_from_config(&FlowportConfig::default(), None, None);
        assert_eq!(engine.info().command, vec!["n8n".to_string()]);
        assert_eq!(engine.info().import_timeout, Duration::from_secs(90));
        assert_eq!(engine.info().probe_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_engine_overrides() {
        let engine = engine_from_config(
            &FlowportConfig::default(),
            Some("npx  n8n"),
            Some(Duration::from_secs(5)),
        );
        assert_eq!(
            engine.info().command,
            vec!["npx".to_string(), "n8n".to_string()]
        );
        assert_eq!(engine.info().import_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_override_ignored() {
        let engine = engine_from_config(&FlowportConfig::default(), Some("   "), None);
        assert_eq!(engine.info().command, vec!["n8n".to_string()]);
    }
}
