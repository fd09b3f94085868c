//! Deduplicating, hash-indexed table of every catalog program, plus its offline forms.

pub mod builder;
pub mod emit;

pub use builder::{BlendTable, BuildOpts, TableEntry};
pub use emit::{EmitFormat, PregenEntry, emit, to_json, to_rust_source};
