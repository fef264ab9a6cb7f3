//! Shared infrastructure for the rackling interpreter.
//!
//! This crate provides source-position tracking used by the lexer,
//! the reader, and diagnostics.

mod span;

pub use span::Span;
