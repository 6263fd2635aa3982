//! Lint Language Server
//!
//! A Language Server Protocol bridge for an external command-line linter.
//!
//! This library provides:
//! - Linter subprocess invocation with exit-code classification
//! - Response parsing across the tool's output formats
//! - Diagnostic normalization and document matching
//! - LSP protocol implementation

pub mod config;
pub mod diagnostics;
pub mod invoke;
pub mod lsp;
pub mod matcher;
pub mod parser;

// Re-exports for clean public API
pub use config::Config;
pub use diagnostics::{DiagnosticGroup, DiagnosticRecord, Severity};
pub use invoke::{InvokeError, RawToolOutput, invoke};
pub use matcher::select_for_document;
pub use parser::parse_response;
