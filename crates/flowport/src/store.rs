//! Category store - the persisted index of imported workflow files.
//!
//! The store is a single JSON document holding an array of entries:
//!
//! ```json
//! [
//!   {
//!     "filename": "0001_Telegram_Schedule_Automation_Scheduled.json",
//!     "category": "Communication & Messaging",
//!     "name": "0001_Telegram_Schedule_Automation_Scheduled",
//!     "description": "",
//!     "nodes": []
//!   }
//! ]
//! ```
//!
//! The handle only knows the document's location. Entries live in an explicit
//! `Vec<CategoryEntry>` that callers load once, mutate with [`merge_entry`],
//! and flush with [`CategoryStore::save`]. There is no locking: two processes
//! writing the same store race and the last writer wins.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys with a typed field on [`CategoryEntry`], in output order.
pub const KNOWN_FIELDS: [&str; 5] = ["filename", "category", "name", "description", "nodes"];

/// One record in the category store.
///
/// Only `category` changes after creation. Fields this tool does not know
/// about are kept in `extra` and written back after the known ones. A known
/// field holding an unexpected type (`"description": null`, a numeric
/// `name`) reads as empty and its raw value is kept in `extra` under the same
/// key, so it is written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub filename: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub nodes: Vec<Value>,
    pub extra: Map<String, Value>,
}

impl CategoryEntry {
    /// Fresh entry: name from the file stem, everything else empty.
    pub fn new(filename: &str, category: &str) -> Self {
        let name = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());

        Self {
            filename: filename.to_string(),
            category: category.to_string(),
            name,
            description: String::new(),
            nodes: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Entry from a decoded JSON object. Never fails.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let mut raw = Map::new();
        let filename = take_string(&mut object, "filename", &mut raw);
        let category = take_string(&mut object, "category", &mut raw);
        let name = take_string(&mut object, "name", &mut raw);
        let description = take_string(&mut object, "description", &mut raw);
        let nodes = match object.remove("nodes") {
            Some(Value::Array(nodes)) => nodes,
            Some(other) => {
                raw.insert("nodes".to_string(), other);
                Vec::new()
            }
            None => Vec::new(),
        };
        raw.extend(object);

        Self {
            filename,
            category,
            name,
            description,
            nodes,
            extra: raw,
        }
    }

    /// Set the category, dropping any raw value it replaces.
    pub fn set_category(&mut self, category: &str) {
        self.extra.remove("category");
        self.category = category.to_string();
    }

    fn known_value(&self, key: &str) -> Value {
        match key {
            "filename" => Value::from(self.filename.as_str()),
            "category" => Value::from(self.category.as_str()),
            "name" => Value::from(self.name.as_str()),
            "description" => Value::from(self.description.as_str()),
            "nodes" => Value::Array(self.nodes.clone()),
            _ => Value::Null,
        }
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str, raw: &mut Map<String, Value>) -> String {
    match object.remove(key) {
        Some(Value::String(s)) => s,
        Some(other) => {
            raw.insert(key.to_string(), other);
            String::new()
        }
        None => String::new(),
    }
}

impl Serialize for CategoryEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in KNOWN_FIELDS {
            match self.extra.get(key) {
                Some(raw) => map.serialize_entry(key, raw)?,
                None => map.serialize_entry(key, &self.known_value(key))?,
            }
        }
        for (key, value) in &self.extra {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_object)
    }
}

/// What [`merge_entry`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Inserted,
    Updated,
}

/// Record `category` for `filename`.
///
/// An existing entry keeps its position and every field except `category`;
/// otherwise a new entry is appended. Nothing is persisted.
pub fn merge_entry(entries: &mut Vec<CategoryEntry>, filename: &str, category: &str) -> MergeAction {
    if let Some(entry) = entries.iter_mut().find(|e| e.filename == filename) {
        entry.set_category(category);
        return MergeAction::Updated;
    }
    entries.push(CategoryEntry::new(filename, category));
    MergeAction::Inserted
}

/// Split off entries whose filename is not in `present`.
///
/// Kept entries stay in order; the removed ones are returned in store order.
pub fn prune_orphans(entries: &mut Vec<CategoryEntry>, present: &BTreeSet<String>) -> Vec<CategoryEntry> {
    let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(entries)
        .into_iter()
        .partition(|e| present.contains(&e.filename));
    *entries = kept;
    removed
}

/// Error type for store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize category store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to the category store document.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the containing directory and an empty document if absent.
    ///
    /// An existing document is left untouched.
    pub fn ensure(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.save(&[])
    }

    /// Read all entries.
    ///
    /// A missing document is an empty store. So is one that cannot be read,
    /// is not valid JSON, or is not an array; that case is logged and its
    /// previous contents are lost on the next save. Array elements that are
    /// not objects are skipped with a warning.
    pub fn load(&self) -> Vec<CategoryEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read category store, starting empty");
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "category store is not an array, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "category store is corrupt, starting empty");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(object) => Some(CategoryEntry::from_object(object)),
                _ => {
                    tracing::warn!(path = %self.path.display(), index, "skipping category store entry that is not an object");
                    None
                }
            })
            .collect()
    }

    /// Rewrite the whole document.
    ///
    /// Output is pretty-printed with a trailing newline. The data goes to a
    /// sibling temp file first and is renamed into place.
    pub fn save(&self, entries: &[CategoryEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut json = serde_json::to_string_pretty(entries)?;
        json.push('\n');

        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::info!(path = %self.path.display(), entries = entries.len(), "category store saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "search_categories.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
