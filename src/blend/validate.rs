use crate::blend::AlphaDescriptor;
use crate::foundation::error::{BlendError, BlendResult};
use crate::ucode::{Cond, Instruction, OpAc, OpBd, Program, Register};

const RGB_LANES: u8 = 0b111;

/// Structural checks every catalog program must pass:
///
/// - alpha is written iff the descriptor says `Computed`,
/// - registers are fully written (all color lanes, unconditionally) before they are read,
/// - conditional writes only land on defined lanes and follow a condition-code update,
/// - `const` is read only after a `set_constant`,
/// - slots unused by an opcode hold `Zero`,
/// - the output register ends fully defined.
pub fn validate_program(program: &Program, alpha: &AlphaDescriptor) -> BlendResult<()> {
    if alpha.is_computed() != program.writes_alpha() {
        return Err(BlendError::invariant(format!(
            "alpha descriptor {alpha:?} disagrees with program (writes alpha: {})",
            program.writes_alpha()
        )));
    }

    let mut defined = [0u8; Register::ALL.len()];
    let mut flags_set = false;
    let mut constant_bound = false;

    for (pc, inst) in program.instructions().iter().enumerate() {
        let alu = match inst {
            Instruction::SetConstant { .. } => {
                constant_bound = true;
                continue;
            }
            Instruction::Alu(alu) => alu,
        };

        if (!alu.op.uses_b() && alu.b != OpBd::Zero)
            || (!alu.op.uses_c() && alu.c != OpAc::Zero)
            || (!alu.op.uses_d() && alu.d != OpBd::Zero)
        {
            return Err(BlendError::invariant(format!(
                "{pc}: `{inst}` carries operands its opcode does not use"
            )));
        }

        for reg in alu.read_registers() {
            if defined[reg.index()] != RGB_LANES {
                return Err(BlendError::invariant(format!(
                    "{pc}: `{inst}` reads {} before it is written",
                    reg.name()
                )));
            }
        }

        if alu.reads_constant() && !constant_bound {
            return Err(BlendError::invariant(format!(
                "{pc}: `{inst}` reads const before any set_constant"
            )));
        }

        if alu.cond != Cond::Always && !flags_set {
            return Err(BlendError::invariant(format!(
                "{pc}: `{inst}` is conditional but no condition codes were set"
            )));
        }

        let Some(reg) = alu.dest.written_register() else {
            flags_set = true;
            continue;
        };
        let written = alu.dest.mask().lane_sources()[..3]
            .iter()
            .enumerate()
            .filter(|(_, src)| src.is_some())
            .fold(0u8, |m, (lane, _)| m | (1 << lane));

        if alu.cond == Cond::Always {
            defined[reg.index()] |= written;
        } else if defined[reg.index()] & written != written {
            return Err(BlendError::invariant(format!(
                "{pc}: `{inst}` conditionally writes lanes that were never defined"
            )));
        }
    }

    if defined[Register::Temp0.index()] != RGB_LANES {
        return Err(BlendError::invariant("program never writes the full output color"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/blend/validate.rs"]
mod tests;
