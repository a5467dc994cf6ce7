//! Blocking interface to external workflow engine CLIs.
//!
//! An [`Engine`] wraps one command-line tool (currently n8n) behind three
//! operations: probing availability, querying its version, and importing a
//! single workflow file. Every call is synchronous and bounded by a timeout;
//! a child that outlives its budget is killed, never salvaged.
//!
//! # Example
//!
//! ```ignore
//! use flowport_engine::{Engine, N8n};
//! use std::path::Path;
//!
//! let engine = N8n::new();
//! if engine.is_available() {
//!     let output = engine.import_workflow(Path::new("workflows/0001_Telegram.json"))?;
//!     assert!(output.success());
//! }
//! ```

pub mod adapters;
mod command;
mod engine;

pub use adapters::N8n;
pub use command::{CommandOutput, run_command};
pub use engine::{Engine, EngineError, EngineInfo};
