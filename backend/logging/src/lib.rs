//! Structured logging setup for vaultocr.
//!
//! Console output (plain or JSON) plus an optional rolling NDJSON file.

pub mod logger;

pub use logger::{init_logger, LogGuard};
