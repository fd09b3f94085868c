use smallvec::SmallVec;

use crate::ucode::encode::{encode_bytes, encode_words};
use crate::ucode::hash::{Hash128, hash_bytes};
use crate::ucode::instruction::Instruction;

/// Literal RGB triple bound to a constant slot.
pub type Rgb = [f32; 3];

/// Straight-line microcode program plus the constants it binds, ordered by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    constants: SmallVec<[Rgb; 4]>,
}

impl Program {
    pub(crate) fn from_parts(instructions: Vec<Instruction>, constants: SmallVec<[Rgb; 4]>) -> Self {
        Self {
            instructions,
            constants,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Constant triples indexed by slot number.
    pub fn constants(&self) -> &[Rgb] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// True when any instruction routes a result into the alpha lane.
    pub fn writes_alpha(&self) -> bool {
        self.instructions.iter().any(Instruction::writes_alpha)
    }

    pub fn encode(&self) -> Vec<u32> {
        encode_words(self)
    }

    pub fn content_hash(&self) -> Hash128 {
        hash_bytes(&encode_bytes(self))
    }
}
