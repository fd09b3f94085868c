//! Text rendering of instructions and programs.
//!
//! One instruction per line, `op.cond dest, a[, b[, c[, d]]]`, e.g.
//! `mmadd.always temp0.rgb, src.rgb, 1-dst.aaa, dst.rgb, 1-src.aaa`.

use std::fmt;

use crate::ucode::instruction::{AluInstruction, Dest, Instruction, WriteMask};
use crate::ucode::program::Program;

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mask() {
            WriteMask::Cc => f.write_str("cc"),
            mask => write!(f, "{}.{}", self.reg().name(), mask.suffix()),
        }
    }
}

impl fmt::Display for AluInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}, {}",
            self.op.mnemonic(),
            self.cond.suffix(),
            self.dest,
            self.a.name()
        )?;
        if self.op.uses_b() {
            write!(f, ", {}", self.b.name())?;
        }
        if self.op.uses_c() {
            write!(f, ", {}", self.c.name())?;
        }
        if self.op.uses_d() {
            write!(f, ", {}", self.d.name())?;
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alu(alu) => alu.fmt(f),
            Self::SetConstant { slot } => write!(f, "setc {}", slot.get()),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in self.instructions() {
            writeln!(f, "{inst}")?;
        }
        for (slot, [r, g, b]) in self.constants().iter().enumerate() {
            writeln!(f, "; c{slot} = ({r}, {g}, {b})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ucode/disasm.rs"]
mod tests;
