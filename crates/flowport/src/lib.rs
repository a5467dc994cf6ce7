//! Flowport - batch import of workflow definitions into n8n.
//!
//! This crate provides:
//! - Structural validation of workflow JSON files
//! - Recursive, deterministic discovery of workflow files
//! - A sequential import pipeline with per-file timeouts and error collection
//! - A persisted category store indexing every imported file
//! - Filename-based classification
//!
//! # Example
//!
//! ```ignore
//! use flowport::import::{Importer, Silent};
//! use flowport::store::CategoryStore;
//! use flowport_engine::N8n;
//! use std::path::Path;
//!
//! let engine = N8n::new();
//! let store = CategoryStore::new("context/search_categories.json");
//! let report = Importer::new(&engine, store).run(Path::new("workflows"), &mut Silent);
//! std::process::exit(report.exit_code());
//! ```

extern crate self as flowport;

pub mod classify;
pub mod commands;
pub mod config;
pub mod discover;
pub mod import;
pub mod merge;
pub mod output;
pub mod store;
pub mod validate;
