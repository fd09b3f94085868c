//! Blend microcode: instruction model, assembler, program container and the canonical encoding
//! that content hashes are computed over.

pub mod assembler;
mod disasm;
pub mod encode;
pub mod hash;
pub mod instruction;
pub mod program;

pub use assembler::Assembler;
pub use encode::{decode_bytes, decode_words, encode_bytes, encode_words};
pub use hash::{Hash128, hash_bytes};
pub use instruction::{
    AluInstruction, AluOp, Cond, ConstSlot, Dest, Instruction, OpAc, OpBd, Register, WriteMask,
};
pub use program::{Program, Rgb};

/// Hash of a program's canonical byte encoding.
pub fn hash_program(program: &Program) -> Hash128 {
    program.content_hash()
}
