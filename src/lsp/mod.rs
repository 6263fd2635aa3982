//! LSP Protocol Implementation
//!
//! Clean LSP backend focused only on protocol handling; the lint pipeline
//! itself lives in the `invoke`, `parser` and `matcher` modules.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
