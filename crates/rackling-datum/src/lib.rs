//! Runtime data model for rackling.
//!
//! Datums and runtime values share one representation: the reader produces
//! `Value` trees, the evaluator consumes and produces them, and the printer
//! renders them back to display text. This crate also owns the environment
//! chain, since closures capture environment handles inside values.

mod env;
mod keywords;
mod print;
mod value;

pub use env::{Env, ReservedName};
pub use keywords::is_reserved;
pub use print::{print, ListStyle};
pub use value::{car, cdr, cons, Closure, NativeFn, Record, Value};
