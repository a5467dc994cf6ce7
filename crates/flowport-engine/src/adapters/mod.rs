//! Engine adapters.
//!
//! Each adapter wraps an external workflow engine CLI and provides:
//! - Availability probing
//! - Version lookup
//! - Single-file workflow import

mod n8n;

pub use n8n::N8n;
