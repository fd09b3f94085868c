//! Generator families. Every public function here has the shape
//! `fn(&mut Assembler, Overlap, premultiplied) -> AlphaDescriptor`; the catalog binds each to the
//! triples it serves.
//!
//! Register convention: `Temp0` carries the result, `Temp1` the straight source, `Temp2` the
//! straight destination, `Acc` is scratch.

pub(crate) mod additive;
pub(crate) mod common;
pub(crate) mod hsl;
pub(crate) mod porter_duff;
pub(crate) mod separable;
