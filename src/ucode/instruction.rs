//! Closed instruction vocabulary of the blend microcode.
//!
//! Every type here is a plain value with a fixed numeric field code. The two operand ports are
//! separate types ([`OpAc`] for slots A/C, [`OpBd`] for slots B/D) so an operand can only ever be
//! placed in a slot of the port it belongs to.

/// Vector register. `Temp0` carries the program output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    Temp0 = 0,
    Temp1 = 1,
    Temp2 = 2,
    /// Scratch accumulator.
    Acc = 3,
}

impl Register {
    /// Every variant, in code order.
    pub const ALL: [Register; 4] = [Self::Temp0, Self::Temp1, Self::Temp2, Self::Acc];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Zero-based index, for register files and constant arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Destination writing this register through `mask`.
    pub const fn with_mask(self, mask: WriteMask) -> Dest {
        Dest::new(self, mask)
    }

    /// `reg.rgb`
    pub const fn rgb(self) -> Dest {
        self.with_mask(WriteMask::Rgb)
    }

    pub const fn r(self) -> Dest {
        self.with_mask(WriteMask::R)
    }

    pub const fn g(self) -> Dest {
        self.with_mask(WriteMask::G)
    }

    pub const fn b(self) -> Dest {
        self.with_mask(WriteMask::B)
    }

    /// `reg.rrr`: the red result lane broadcast.
    pub const fn rrr(self) -> Dest {
        self.with_mask(WriteMask::Rrr)
    }

    pub const fn ggg(self) -> Dest {
        self.with_mask(WriteMask::Ggg)
    }

    pub const fn bbb(self) -> Dest {
        self.with_mask(WriteMask::Bbb)
    }

    /// `reg.gbr`: result lanes rotated left.
    pub const fn gbr(self) -> Dest {
        self.with_mask(WriteMask::Gbr)
    }

    /// `reg.r2a`: red result lane into alpha.
    pub const fn r_to_a(self) -> Dest {
        self.with_mask(WriteMask::RToA)
    }

    /// Disassembly name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temp0 => "temp0",
            Self::Temp1 => "temp1",
            Self::Temp2 => "temp2",
            Self::Acc => "acc",
        }
    }
}

/// Lane routing of a destination write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WriteMask {
    Rgb = 0,
    R = 1,
    G = 2,
    B = 3,
    Rrr = 4,
    Ggg = 5,
    Bbb = 6,
    /// dst.r <- res.g, dst.g <- res.b, dst.b <- res.r
    Gbr = 7,
    /// dst.a <- res.r
    RToA = 8,
    /// Updates the condition flags only.
    Cc = 9,
}

impl WriteMask {
    /// Every variant, in code order.
    pub const ALL: [WriteMask; 10] = [
        Self::Rgb,
        Self::R,
        Self::G,
        Self::B,
        Self::Rrr,
        Self::Ggg,
        Self::Bbb,
        Self::Gbr,
        Self::RToA,
        Self::Cc,
    ];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// For each destination lane (r, g, b, a), the result lane copied into it.
    ///
    /// `Cc` writes no register lane.
    pub const fn lane_sources(self) -> [Option<usize>; 4] {
        match self {
            Self::Rgb => [Some(0), Some(1), Some(2), None],
            Self::R => [Some(0), None, None, None],
            Self::G => [None, Some(1), None, None],
            Self::B => [None, None, Some(2), None],
            Self::Rrr => [Some(0), Some(0), Some(0), None],
            Self::Ggg => [Some(1), Some(1), Some(1), None],
            Self::Bbb => [Some(2), Some(2), Some(2), None],
            Self::Gbr => [Some(1), Some(2), Some(0), None],
            Self::RToA => [None, None, None, Some(0)],
            Self::Cc => [None; 4],
        }
    }

    /// Only `RToA` reaches the alpha lane.
    pub const fn writes_alpha(self) -> bool {
        matches!(self, Self::RToA)
    }

    /// False for the flag-only `Cc` mask.
    pub const fn writes_register(self) -> bool {
        !matches!(self, Self::Cc)
    }

    /// Disassembly suffix.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::R => "r",
            Self::G => "g",
            Self::B => "b",
            Self::Rrr => "rrr",
            Self::Ggg => "ggg",
            Self::Bbb => "bbb",
            Self::Gbr => "gbr",
            Self::RToA => "r2a",
            Self::Cc => "cc",
        }
    }
}

/// Destination of an ALU result: a register and the lane routing into it.
///
/// A condition-only destination carries no register, so every `Cc` destination compares equal
/// and encodes the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dest {
    reg: Register,
    mask: WriteMask,
}

impl Dest {
    /// Condition-only destination.
    pub const CC: Dest = Dest {
        reg: Register::Temp0,
        mask: WriteMask::Cc,
    };

    /// `reg` is ignored when `mask` is [`WriteMask::Cc`].
    pub const fn new(reg: Register, mask: WriteMask) -> Self {
        match mask {
            WriteMask::Cc => Self::CC,
            _ => Self { reg, mask },
        }
    }

    /// Register field as encoded. Always `Temp0` for `Cc`.
    pub const fn reg(self) -> Register {
        self.reg
    }

    /// Lane routing.
    pub const fn mask(self) -> WriteMask {
        self.mask
    }

    /// Register whose lanes this destination overwrites, if any.
    pub const fn written_register(self) -> Option<Register> {
        if self.mask.writes_register() {
            Some(self.reg)
        } else {
            None
        }
    }
}

impl From<Register> for Dest {
    fn from(reg: Register) -> Self {
        reg.rgb()
    }
}

/// Predicate tested against the per-lane condition flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cond {
    Always = 0,
    Gt = 1,
    Ge = 2,
    Lt = 3,
    Le = 4,
}

impl Cond {
    /// Every variant, in code order.
    pub const ALL: [Cond; 5] = [Self::Always, Self::Gt, Self::Ge, Self::Lt, Self::Le];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether a lane whose flag holds `flag` passes this condition.
    pub fn holds(self, flag: f32) -> bool {
        match self {
            Self::Always => true,
            Self::Gt => flag > 0.0,
            Self::Ge => flag >= 0.0,
            Self::Lt => flag < 0.0,
            Self::Le => flag <= 0.0,
        }
    }

    /// Disassembly suffix.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Always => ".always",
            Self::Gt => ".gt",
            Self::Ge => ".ge",
            Self::Lt => ".lt",
            Self::Le => ".le",
        }
    }
}

/// Operands accepted by slots A and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpAc {
    SrcRgb = 0,
    DstRgb = 1,
    SrcAaa = 2,
    DstAaa = 3,
    Temp0 = 4,
    Temp1 = 5,
    Temp2 = 6,
    Acc = 7,
    Zero = 8,
}

impl OpAc {
    /// Every variant, in code order.
    pub const ALL: [OpAc; 9] = [
        Self::SrcRgb,
        Self::DstRgb,
        Self::SrcAaa,
        Self::DstAaa,
        Self::Temp0,
        Self::Temp1,
        Self::Temp2,
        Self::Acc,
        Self::Zero,
    ];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// The register this operand reads, if it is one.
    pub const fn register(self) -> Option<Register> {
        match self {
            Self::Temp0 => Some(Register::Temp0),
            Self::Temp1 => Some(Register::Temp1),
            Self::Temp2 => Some(Register::Temp2),
            Self::Acc => Some(Register::Acc),
            _ => None,
        }
    }

    /// Disassembly name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SrcRgb => "src.rgb",
            Self::DstRgb => "dst.rgb",
            Self::SrcAaa => "src.aaa",
            Self::DstAaa => "dst.aaa",
            Self::Temp0 => "temp0",
            Self::Temp1 => "temp1",
            Self::Temp2 => "temp2",
            Self::Acc => "acc",
            Self::Zero => "0",
        }
    }
}

impl From<Register> for OpAc {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Temp0 => Self::Temp0,
            Register::Temp1 => Self::Temp1,
            Register::Temp2 => Self::Temp2,
            Register::Acc => Self::Acc,
        }
    }
}

/// Operands accepted by slots B and D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpBd {
    Zero = 0,
    One = 1,
    SrcRgb = 2,
    SrcAaa = 3,
    OneMinusSrcAaa = 4,
    DstRgb = 5,
    DstAaa = 6,
    OneMinusDstAaa = 7,
    Temp0 = 8,
    Temp1 = 9,
    Temp2 = 10,
    Acc = 11,
    /// The triple bound by the most recent `set_constant`.
    ConstantRgb = 12,
}

impl OpBd {
    /// Every variant, in code order.
    pub const ALL: [OpBd; 13] = [
        Self::Zero,
        Self::One,
        Self::SrcRgb,
        Self::SrcAaa,
        Self::OneMinusSrcAaa,
        Self::DstRgb,
        Self::DstAaa,
        Self::OneMinusDstAaa,
        Self::Temp0,
        Self::Temp1,
        Self::Temp2,
        Self::Acc,
        Self::ConstantRgb,
    ];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// The register this operand reads, if it is one.
    pub const fn register(self) -> Option<Register> {
        match self {
            Self::Temp0 => Some(Register::Temp0),
            Self::Temp1 => Some(Register::Temp1),
            Self::Temp2 => Some(Register::Temp2),
            Self::Acc => Some(Register::Acc),
            _ => None,
        }
    }

    /// Operands with no counterpart in the A/C port.
    pub const fn is_bd_only(self) -> bool {
        matches!(
            self,
            Self::One | Self::OneMinusSrcAaa | Self::OneMinusDstAaa | Self::ConstantRgb
        )
    }

    /// Disassembly name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::SrcRgb => "src.rgb",
            Self::SrcAaa => "src.aaa",
            Self::OneMinusSrcAaa => "1-src.aaa",
            Self::DstRgb => "dst.rgb",
            Self::DstAaa => "dst.aaa",
            Self::OneMinusDstAaa => "1-dst.aaa",
            Self::Temp0 => "temp0",
            Self::Temp1 => "temp1",
            Self::Temp2 => "temp2",
            Self::Acc => "acc",
            Self::ConstantRgb => "const",
        }
    }
}

impl From<Register> for OpBd {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Temp0 => Self::Temp0,
            Register::Temp1 => Self::Temp1,
            Register::Temp2 => Self::Temp2,
            Register::Acc => Self::Acc,
        }
    }
}

/// Arithmetic opcodes. Operand usage per opcode:
///
/// | op    | result        |
/// |-------|---------------|
/// | mov   | a             |
/// | add   | a + b         |
/// | sub   | a - b         |
/// | mul   | a * b         |
/// | min   | min(a, b)     |
/// | max   | max(a, b)     |
/// | rcp   | 1 / a         |
/// | madd  | a * b + c     |
/// | mmadd | a * b + c * d |
/// | mmsub | a * b - c * d |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AluOp {
    Mov = 0,
    Add = 1,
    Sub = 2,
    Mul = 3,
    Min = 4,
    Max = 5,
    Rcp = 6,
    Madd = 7,
    Mmadd = 8,
    Mmsub = 9,
}

/// Opcode value of `set_constant`, sharing the opcode field with [`AluOp`].
pub const SET_CONSTANT_OPCODE: u32 = 10;

impl AluOp {
    /// Every variant, in code order.
    pub const ALL: [AluOp; 10] = [
        Self::Mov,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Min,
        Self::Max,
        Self::Rcp,
        Self::Madd,
        Self::Mmadd,
        Self::Mmsub,
    ];

    /// Numeric field value in the instruction word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of `code`; `None` for values outside the field.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether slot B feeds the result.
    pub const fn uses_b(self) -> bool {
        !matches!(self, Self::Mov | Self::Rcp)
    }

    /// Whether slot C feeds the result.
    pub const fn uses_c(self) -> bool {
        matches!(self, Self::Madd | Self::Mmadd | Self::Mmsub)
    }

    /// Whether slot D feeds the result.
    pub const fn uses_d(self) -> bool {
        matches!(self, Self::Mmadd | Self::Mmsub)
    }

    /// Disassembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Min => "min",
            Self::Max => "max",
            Self::Rcp => "rcp",
            Self::Madd => "madd",
            Self::Mmadd => "mmadd",
            Self::Mmsub => "mmsub",
        }
    }
}

/// Constant slot label (0..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstSlot(u8);

impl ConstSlot {
    /// Number of constant slots a program may bind.
    pub const COUNT: usize = 8;

    /// `None` past the last slot.
    pub fn new(slot: u8) -> Option<Self> {
        (usize::from(slot) < Self::COUNT).then_some(Self(slot))
    }

    /// Slot number as encoded.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index, for register files and constant arrays.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One arithmetic instruction. Slots an opcode does not use hold `Zero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AluInstruction {
    pub op: AluOp,
    pub cond: Cond,
    pub dest: Dest,
    pub a: OpAc,
    pub b: OpBd,
    pub c: OpAc,
    pub d: OpBd,
}

impl AluInstruction {
    /// Registers read by the slots this opcode uses.
    pub fn read_registers(&self) -> impl Iterator<Item = Register> + '_ {
        let a = self.a.register();
        let b = self.op.uses_b().then(|| self.b.register()).flatten();
        let c = self.op.uses_c().then(|| self.c.register()).flatten();
        let d = self.op.uses_d().then(|| self.d.register()).flatten();
        [a, b, c, d].into_iter().flatten()
    }

    /// Whether a used B or D slot reads the bound constant.
    pub fn reads_constant(&self) -> bool {
        (self.op.uses_b() && self.b == OpBd::ConstantRgb)
            || (self.op.uses_d() && self.d == OpBd::ConstantRgb)
    }
}

/// One microcode instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Instruction {
    /// Arithmetic on the vector datapath.
    Alu(AluInstruction),
    /// Bind constant `slot` to the `ConstantRgb` operand.
    SetConstant { slot: ConstSlot },
}

impl Instruction {
    /// Whether this is an ALU write into the alpha lane.
    pub fn writes_alpha(&self) -> bool {
        matches!(self, Self::Alu(alu) if alu.dest.mask().writes_alpha())
    }

    /// The ALU form, or `None` for `set_constant`.
    pub fn as_alu(&self) -> Option<&AluInstruction> {
        match self {
            Self::Alu(alu) => Some(alu),
            Self::SetConstant { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ucode/instruction.rs"]
mod tests;
