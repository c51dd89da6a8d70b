//! Database-agnostic filter model shared by every query compiler.

pub mod core;
pub mod document;
pub mod error;
pub mod filter;
