//! Advanced blend equations compiled to a small fixed-function microcode.
//!
//! Every supported (operator, overlap model, source premultiplied) triple maps to a straight-line
//! [`Program`] plus an [`AlphaDescriptor`]. Programs are content-hashed over their canonical
//! encoding so that configurations which compile to identical code share one artifact:
//!
//! - [`resolve`] a single configuration
//! - build the deduplicated [`BlendTable`] for the whole catalog
//! - emit it as JSON or Rust source for offline use
//! - cache backend artifacts per hash with [`ProgramCache`]
#![forbid(unsafe_code)]

mod foundation;

pub mod blend;
pub mod cache;
pub mod table;
pub mod ucode;

pub use crate::foundation::error::{BlendError, BlendResult};

pub use crate::blend::{
    AlphaBlendOp, AlphaDescriptor, BlendFactor, BlendKey, BlendOp, Overlap, ResolvedBlend,
    resolve, validate_program,
};
pub use crate::cache::ProgramCache;
pub use crate::table::{BlendTable, BuildOpts, EmitFormat, TableEntry};
pub use crate::ucode::{Assembler, Hash128, Program, hash_program};
