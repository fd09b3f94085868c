//! Canonical word encoding of a [`Program`].
//!
//! Stream layout (little-endian `u32` words):
//!
//! ```text
//! [instruction count] [instruction word]* [constant count] ([r bits] [g bits] [b bits])*
//! ```
//!
//! Instruction word fields:
//!
//! ```text
//! bits  0..4   opcode (AluOp code, or 10 for set_constant)
//! bits  4..7   condition
//! bits  7..9   destination register
//! bits  9..13  write mask
//! bits 13..17  A operand (set_constant: slot in 13..16)
//! bits 17..21  B operand
//! bits 21..25  C operand
//! bits 25..29  D operand
//! ```

use smallvec::SmallVec;

use crate::foundation::error::{BlendError, BlendResult};
use crate::ucode::instruction::{
    AluInstruction, AluOp, Cond, ConstSlot, Dest, Instruction, OpAc, OpBd, Register,
    SET_CONSTANT_OPCODE, WriteMask,
};
use crate::ucode::program::{Program, Rgb};

const OPCODE_SHIFT: u32 = 0;
const COND_SHIFT: u32 = 4;
const REG_SHIFT: u32 = 7;
const MASK_SHIFT: u32 = 9;
const A_SHIFT: u32 = 13;
const B_SHIFT: u32 = 17;
const C_SHIFT: u32 = 21;
const D_SHIFT: u32 = 25;
const USED_BITS: u32 = 29;

const NIBBLE: u32 = 0xf;

pub fn encode_instruction(inst: &Instruction) -> u32 {
    match inst {
        Instruction::Alu(alu) => {
            (alu.op.code() << OPCODE_SHIFT)
                | (alu.cond.code() << COND_SHIFT)
                | (alu.dest.reg().code() << REG_SHIFT)
                | (alu.dest.mask().code() << MASK_SHIFT)
                | (alu.a.code() << A_SHIFT)
                | (alu.b.code() << B_SHIFT)
                | (alu.c.code() << C_SHIFT)
                | (alu.d.code() << D_SHIFT)
        }
        Instruction::SetConstant { slot } => {
            (SET_CONSTANT_OPCODE << OPCODE_SHIFT) | (u32::from(slot.get()) << A_SHIFT)
        }
    }
}

pub fn decode_instruction(word: u32) -> BlendResult<Instruction> {
    if word >> USED_BITS != 0 {
        return Err(BlendError::decode(format!(
            "instruction word {word:#010x} has reserved bits set"
        )));
    }

    let field = |shift: u32, mask: u32| (word >> shift) & mask;
    let opcode = field(OPCODE_SHIFT, NIBBLE);

    if opcode == SET_CONSTANT_OPCODE {
        if word & !((NIBBLE << OPCODE_SHIFT) | (0x7 << A_SHIFT)) != 0 {
            return Err(BlendError::decode(format!(
                "set_constant word {word:#010x} has stray fields"
            )));
        }
        let slot = ConstSlot::new(field(A_SHIFT, 0x7) as u8)
            .ok_or_else(|| BlendError::decode("constant slot out of range"))?;
        return Ok(Instruction::SetConstant { slot });
    }

    let op = AluOp::from_code(opcode)
        .ok_or_else(|| BlendError::decode(format!("unknown opcode {opcode}")))?;
    let cond = Cond::from_code(field(COND_SHIFT, 0x7))
        .ok_or_else(|| BlendError::decode(format!("unknown condition in {word:#010x}")))?;
    let reg = Register::from_code(field(REG_SHIFT, 0x3))
        .ok_or_else(|| BlendError::decode(format!("unknown register in {word:#010x}")))?;
    let mask = WriteMask::from_code(field(MASK_SHIFT, NIBBLE))
        .ok_or_else(|| BlendError::decode(format!("unknown write mask in {word:#010x}")))?;
    if mask == WriteMask::Cc && reg != Register::Temp0 {
        return Err(BlendError::decode(format!(
            "condition-only word {word:#010x} names a register"
        )));
    }
    let a = OpAc::from_code(field(A_SHIFT, NIBBLE))
        .ok_or_else(|| BlendError::decode(format!("unknown A operand in {word:#010x}")))?;
    let b = OpBd::from_code(field(B_SHIFT, NIBBLE))
        .ok_or_else(|| BlendError::decode(format!("unknown B operand in {word:#010x}")))?;
    let c = OpAc::from_code(field(C_SHIFT, NIBBLE))
        .ok_or_else(|| BlendError::decode(format!("unknown C operand in {word:#010x}")))?;
    let d = OpBd::from_code(field(D_SHIFT, NIBBLE))
        .ok_or_else(|| BlendError::decode(format!("unknown D operand in {word:#010x}")))?;

    Ok(Instruction::Alu(AluInstruction {
        op,
        cond,
        dest: Dest::new(reg, mask),
        a,
        b,
        c,
        d,
    }))
}

pub fn encode_words(program: &Program) -> Vec<u32> {
    let insts = program.instructions();
    let consts = program.constants();
    let mut out = Vec::with_capacity(2 + insts.len() + consts.len() * 3);

    out.push(insts.len() as u32);
    out.extend(insts.iter().map(encode_instruction));
    out.push(consts.len() as u32);
    for rgb in consts {
        out.extend(rgb.iter().map(|c| c.to_bits()));
    }
    out
}

pub fn encode_bytes(program: &Program) -> Vec<u8> {
    encode_words(program)
        .into_iter()
        .flat_map(u32::to_le_bytes)
        .collect()
}

pub fn decode_words(words: &[u32]) -> BlendResult<Program> {
    let mut it = words.iter().copied();
    let mut next = |what: &str| {
        it.next()
            .ok_or_else(|| BlendError::decode(format!("stream ended while reading {what}")))
    };

    let n_insts = next("instruction count")? as usize;
    // At least the constant count follows the instructions.
    if n_insts >= words.len() {
        return Err(BlendError::decode(format!(
            "instruction count {n_insts} exceeds the {} words in the stream",
            words.len()
        )));
    }
    let mut instructions = Vec::with_capacity(n_insts);
    for _ in 0..n_insts {
        instructions.push(decode_instruction(next("instruction")?)?);
    }

    let n_consts = next("constant count")? as usize;
    if n_consts > ConstSlot::COUNT {
        return Err(BlendError::decode(format!(
            "{n_consts} constants exceed the {} slots",
            ConstSlot::COUNT
        )));
    }
    let mut constants = SmallVec::<[Rgb; 4]>::with_capacity(n_consts);
    for _ in 0..n_consts {
        let r = f32::from_bits(next("constant")?);
        let g = f32::from_bits(next("constant")?);
        let b = f32::from_bits(next("constant")?);
        constants.push([r, g, b]);
    }

    if it.next().is_some() {
        return Err(BlendError::decode("trailing words after constant block"));
    }

    Ok(Program::from_parts(instructions, constants))
}

pub fn decode_bytes(bytes: &[u8]) -> BlendResult<Program> {
    if !bytes.len().is_multiple_of(4) {
        return Err(BlendError::decode("byte stream is not a whole number of words"));
    }
    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    decode_words(&words)
}

#[cfg(test)]
#[path = "../../tests/unit/ucode/encode.rs"]
mod tests;
