//! Shared domain logic for the DermaLens backend.
//!
//! Everything here is pure and synchronous: the tolerant JSON extractor for
//! model output, the projection of a parsed result into flattened record
//! fields, and the shaping of aggregate statistics. I/O lives in the other
//! workspace crates.

pub mod assessment;
pub mod extract;
pub mod stats;
pub mod types;
