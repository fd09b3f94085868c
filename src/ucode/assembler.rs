use smallvec::SmallVec;

use crate::foundation::error::{BlendError, BlendResult};
use crate::ucode::instruction::{
    AluInstruction, AluOp, Cond, ConstSlot, Dest, Instruction, OpAc, OpBd,
};
use crate::ucode::program::{Program, Rgb};

/// Append-only program builder.
///
/// One method per opcode; operands are typed by port, so a B/D-only operand cannot be passed to an
/// A/C slot. Constant bindings live here and are reset with every new assembler.
#[derive(Debug, Default)]
pub struct Assembler {
    instructions: Vec<Instruction>,
    slots: [Option<Rgb>; ConstSlot::COUNT],
    misuse: Vec<String>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[allow(clippy::too_many_arguments)]
    fn push_alu(
        &mut self,
        op: AluOp,
        cond: Cond,
        dest: Dest,
        a: OpAc,
        b: OpBd,
        c: OpAc,
        d: OpBd,
    ) {
        self.instructions.push(Instruction::Alu(AluInstruction {
            op,
            cond,
            dest,
            a,
            b,
            c,
            d,
        }));
    }

    pub fn mov(&mut self, cond: Cond, dest: impl Into<Dest>, a: impl Into<OpAc>) {
        self.push_alu(
            AluOp::Mov,
            cond,
            dest.into(),
            a.into(),
            OpBd::Zero,
            OpAc::Zero,
            OpBd::Zero,
        );
    }

    pub fn add(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
    ) {
        self.binary(AluOp::Add, cond, dest.into(), a.into(), b.into());
    }

    pub fn sub(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
    ) {
        self.binary(AluOp::Sub, cond, dest.into(), a.into(), b.into());
    }

    pub fn mul(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
    ) {
        self.binary(AluOp::Mul, cond, dest.into(), a.into(), b.into());
    }

    pub fn min(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
    ) {
        self.binary(AluOp::Min, cond, dest.into(), a.into(), b.into());
    }

    pub fn max(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
    ) {
        self.binary(AluOp::Max, cond, dest.into(), a.into(), b.into());
    }

    /// Approximate reciprocal; `1/0` is `+inf`.
    pub fn rcp(&mut self, cond: Cond, dest: impl Into<Dest>, a: impl Into<OpAc>) {
        self.push_alu(
            AluOp::Rcp,
            cond,
            dest.into(),
            a.into(),
            OpBd::Zero,
            OpAc::Zero,
            OpBd::Zero,
        );
    }

    /// `a * b + c`
    pub fn madd(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
        c: impl Into<OpAc>,
    ) {
        self.push_alu(
            AluOp::Madd,
            cond,
            dest.into(),
            a.into(),
            b.into(),
            c.into(),
            OpBd::Zero,
        );
    }

    /// `a * b + c * d`
    pub fn mmadd(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
        c: impl Into<OpAc>,
        d: impl Into<OpBd>,
    ) {
        self.push_alu(
            AluOp::Mmadd,
            cond,
            dest.into(),
            a.into(),
            b.into(),
            c.into(),
            d.into(),
        );
    }

    /// `a * b - c * d`
    pub fn mmsub(
        &mut self,
        cond: Cond,
        dest: impl Into<Dest>,
        a: impl Into<OpAc>,
        b: impl Into<OpBd>,
        c: impl Into<OpAc>,
        d: impl Into<OpBd>,
    ) {
        self.push_alu(
            AluOp::Mmsub,
            cond,
            dest.into(),
            a.into(),
            b.into(),
            c.into(),
            d.into(),
        );
    }

    /// Bind `rgb` to `slot`; `const` reads this triple until the next `set_constant`.
    ///
    /// Re-binding a slot with the same triple is fine. Out-of-range slots and re-binding a slot to a
    /// different triple are recorded and reported by [`Assembler::finish`].
    pub fn set_constant(&mut self, slot: u8, rgb: Rgb) {
        let Some(slot) = ConstSlot::new(slot) else {
            self.misuse.push(format!("constant slot {slot} is out of range"));
            return;
        };
        match self.slots[slot.index()] {
            Some(prev) if prev != rgb => {
                self.misuse.push(format!(
                    "constant slot {} rebound from {prev:?} to {rgb:?}",
                    slot.get()
                ));
            }
            _ => self.slots[slot.index()] = Some(rgb),
        }
        self.instructions.push(Instruction::SetConstant { slot });
    }

    fn binary(&mut self, op: AluOp, cond: Cond, dest: Dest, a: OpAc, b: OpBd) {
        self.push_alu(op, cond, dest, a, b, OpAc::Zero, OpBd::Zero);
    }

    /// Seal the program. Fails when constant slots were misused or left with gaps.
    pub fn finish(self) -> BlendResult<Program> {
        if let Some(first) = self.misuse.first() {
            return Err(BlendError::invariant(first.clone()));
        }

        let used = self.slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        let mut constants = SmallVec::<[Rgb; 4]>::with_capacity(used);
        for (i, slot) in self.slots[..used].iter().enumerate() {
            let Some(rgb) = slot else {
                return Err(BlendError::invariant(format!(
                    "constant slot {i} is unused but a higher slot is bound"
                )));
            };
            constants.push(*rgb);
        }

        Ok(Program::from_parts(self.instructions, constants))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ucode/assembler.rs"]
mod tests;
