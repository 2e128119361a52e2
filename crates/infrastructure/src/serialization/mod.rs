//! Deterministic JSON for files written by the client.
//!
//! Keeps on-disk state readable and diff-friendly:
//! - Object keys sorted (via `BTreeMap` in stored types)
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
