//! Structural validation of workflow files.
//!
//! Only the shape the engine needs is checked: a JSON object carrying a node
//! list and a connection map. Contents of either are not inspected.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Top-level keys every workflow must carry.
pub const REQUIRED_KEYS: [&str; 2] = ["nodes", "connections"];

/// Why a file is not an importable workflow.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotAnObject,
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),
}

/// Check a workflow file, reporting the first problem found.
pub fn check_workflow(path: &Path) -> Result<(), ValidationError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(ValidationError::MissingKey(key));
        }
    }
    Ok(())
}

/// Fail-closed validity check: any read, parse, or shape problem is `false`.
pub fn validate_workflow(path: &Path) -> bool {
    check_workflow(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_valid_workflow() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ok.json");
        fs::write(&path, r#"{"name": "x", "nodes": [], "connections": {}}"#).unwrap();
        assert!(validate_workflow(&path));
    }

    #[test]
    fn test_contents_not_inspected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("odd.json");
        fs::write(&path, r#"{"nodes": null, "connections": 42}"#).unwrap();
        assert!(validate_workflow(&path));
    }

    #[test]
    fn test_missing_connections() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("b.json");
        fs::write(&path, r#"{"nodes": []}"#).unwrap();
        assert!(!validate_workflow(&path));
        assert!(matches!(
            check_workflow(&path),
            Err(ValidationError::MissingKey("connections"))
        ));
    }

    #[test]
    fn test_missing_nodes() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("c.json");
        fs::write(&path, r#"{"connections": {}}"#).unwrap();
        assert!(matches!(
            check_workflow(&path),
            Err(ValidationError::MissingKey("nodes"))
        ));
    }

    #[test]
    fn test_top_level_array() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("list.json");
        fs::write(&path, r#"[{"nodes": [], "connections": {}}]"#).unwrap();
        assert!(matches!(
            check_workflow(&path),
            Err(ValidationError::NotAnObject)
        ));
    }

    #[test]
    fn test_malformed_json() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{\"nodes\": [").unwrap();
        assert!(matches!(check_workflow(&path), Err(ValidationError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("absent.json");
        assert!(!validate_workflow(&path));
        assert!(matches!(check_workflow(&path), Err(ValidationError::Read(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("locked.json");
        fs::write(&path, r#"{"nodes": [], "connections": {}}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user.
        if fs::File::open(&path).is_ok() {
            return;
        }
        assert!(!validate_workflow(&path));
        assert!(matches!(check_workflow(&path), Err(ValidationError::Read(_))));
    }
}
