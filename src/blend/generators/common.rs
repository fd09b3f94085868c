//! Building blocks shared by the generator families: straight-color loads, coverage weights,
//! the overlap-dependent coverage tail, and the result-alpha table.

use crate::blend::{AlphaDescriptor, BlendFactor, Overlap};
use crate::ucode::{Assembler, Cond, Dest, OpAc, OpBd, Register};

use Cond::Always;
use Register::{Acc, Temp0, Temp1, Temp2};

/// A straight (non-premultiplied) color, either an input operand or a register holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Src,
    Reg(Register),
}

impl Color {
    pub(crate) fn ac(self) -> OpAc {
        match self {
            Self::Src => OpAc::SrcRgb,
            Self::Reg(r) => r.into(),
        }
    }

    pub(crate) fn bd(self) -> OpBd {
        match self {
            Self::Src => OpBd::SrcRgb,
            Self::Reg(r) => r.into(),
        }
    }
}

/// `reg = alpha > 0 ? color / alpha : 0`. Clobbers `Acc` and the flags.
fn unpremultiply(asm: &mut Assembler, reg: Register, color: OpAc, alpha: OpAc) {
    asm.mov(Always, Dest::CC, alpha);
    asm.mov(Always, reg, OpAc::Zero);
    asm.rcp(Always, Acc, alpha);
    asm.mul(Cond::Gt, reg, color, Acc);
}

/// Straight destination color in `Temp2`.
pub(crate) fn load_dst(asm: &mut Assembler) -> Color {
    unpremultiply(asm, Temp2, OpAc::DstRgb, OpAc::DstAaa);
    Color::Reg(Temp2)
}

/// Straight source color: `Temp1` when the source arrives premultiplied, the raw operand otherwise.
pub(crate) fn load_src(asm: &mut Assembler, premultiplied: bool) -> Color {
    if premultiplied {
        unpremultiply(asm, Temp1, OpAc::SrcRgb, OpAc::SrcAaa);
        Color::Reg(Temp1)
    } else {
        Color::Src
    }
}

/// Scale factor of one term in a weighted color sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Weight {
    One,
    /// Directly addressable in port B/D.
    Operand(OpBd),
    /// `a * b`, computed into `Acc`.
    Product(OpAc, OpBd),
    /// Coverage of the overlap region.
    P0,
    /// Coverage of source only.
    P1,
    /// Coverage of destination only.
    P2,
}

impl Weight {
    fn needs_acc(self) -> bool {
        matches!(self, Self::Product(..) | Self::P0 | Self::P1 | Self::P2)
    }
}

/// Emit the sequence for the coverage weight `p` into `Acc`.
pub(crate) fn coverage_weight(asm: &mut Assembler, overlap: Overlap, p: Weight) {
    match (overlap, p) {
        (Overlap::Uncorrelated, Weight::P0) => asm.mul(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa),
        (Overlap::Uncorrelated, Weight::P1) => {
            asm.mul(Always, Acc, OpAc::SrcAaa, OpBd::OneMinusDstAaa)
        }
        (Overlap::Uncorrelated, Weight::P2) => {
            asm.mul(Always, Acc, OpAc::DstAaa, OpBd::OneMinusSrcAaa)
        }
        (Overlap::Conjoint, Weight::P0) => asm.min(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa),
        (Overlap::Conjoint, Weight::P1) => {
            asm.sub(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa);
            asm.max(Always, Acc, OpAc::Acc, OpBd::Zero);
        }
        (Overlap::Conjoint, Weight::P2) => {
            asm.sub(Always, Acc, OpAc::DstAaa, OpBd::SrcAaa);
            asm.max(Always, Acc, OpAc::Acc, OpBd::Zero);
        }
        (Overlap::Disjoint, Weight::P0) => {
            asm.add(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa);
            asm.sub(Always, Acc, OpAc::Acc, OpBd::One);
            asm.max(Always, Acc, OpAc::Acc, OpBd::Zero);
        }
        (Overlap::Disjoint, Weight::P1) => {
            asm.min(Always, Acc, OpAc::SrcAaa, OpBd::OneMinusDstAaa)
        }
        (Overlap::Disjoint, Weight::P2) => {
            asm.min(Always, Acc, OpAc::DstAaa, OpBd::OneMinusSrcAaa)
        }
        (_, Weight::Product(a, b)) => asm.mul(Always, Acc, a, b),
        (_, Weight::One | Weight::Operand(_)) => {}
    }
}

/// Materialize `w` as a port-B/D operand, computing into `Acc` when needed.
fn weight_operand(asm: &mut Assembler, overlap: Overlap, w: Weight) -> OpBd {
    match w {
        Weight::One => OpBd::One,
        Weight::Operand(op) => op,
        _ => {
            coverage_weight(asm, overlap, w);
            OpBd::Acc
        }
    }
}

/// `Temp0 = sum(color * weight)` for up to two terms. Colors must not live in `Temp0` or `Acc`.
pub(crate) fn weighted_sum(asm: &mut Assembler, overlap: Overlap, terms: &[(OpAc, Weight)]) {
    match *terms {
        [] => asm.mov(Always, Temp0, OpAc::Zero),
        [(c, Weight::One)] => asm.mov(Always, Temp0, c),
        [(c, w)] => {
            let b = weight_operand(asm, overlap, w);
            asm.mul(Always, Temp0, c, b);
        }
        [(c1, Weight::One), (c2, w2)] => {
            let b = weight_operand(asm, overlap, w2);
            asm.madd(Always, Temp0, c2, b, c1);
        }
        [(c1, w1), (c2, Weight::One)] => {
            let b = weight_operand(asm, overlap, w1);
            asm.madd(Always, Temp0, c1, b, c2);
        }
        [(c1, w1), (c2, w2)] if !(w1.needs_acc() && w2.needs_acc()) => {
            // At most one term goes through Acc; emit it first so the other stays a plain operand.
            let ((ca, wa), (cb, wb)) = if w2.needs_acc() {
                ((c2, w2), (c1, w1))
            } else {
                ((c1, w1), (c2, w2))
            };
            let ba = weight_operand(asm, overlap, wa);
            let bb = weight_operand(asm, overlap, wb);
            asm.mmadd(Always, Temp0, ca, ba, cb, bb);
        }
        [(c1, w1), (c2, w2)] => {
            let b1 = weight_operand(asm, overlap, w1);
            asm.mul(Always, Temp0, c1, b1);
            let b2 = weight_operand(asm, overlap, w2);
            asm.madd(Always, Temp0, c2, b2, OpAc::Temp0);
        }
        [..] => {
            // Three or more terms: fold one at a time.
            let (first, rest) = terms.split_at(1);
            weighted_sum(asm, overlap, first);
            for &(c, w) in rest {
                let b = weight_operand(asm, overlap, w);
                asm.madd(Always, Temp0, c, b, OpAc::Temp0);
            }
        }
    }
}

/// Blend `Temp0 = f * p0 + [y] cs * p1 + [z] cd * p2`, with the straight blend result `f` already
/// in `Temp0`. `cs`/`cd` are the straight colors; the uncorrelated tail works from the
/// premultiplied inputs instead and never reads them.
pub(crate) fn coverage_tail(
    asm: &mut Assembler,
    overlap: Overlap,
    premultiplied: bool,
    cs: Color,
    cd: Color,
    y: bool,
    z: bool,
) {
    coverage_weight(asm, overlap, Weight::P0);
    asm.mul(Always, Temp0, OpAc::Temp0, OpBd::Acc);

    if overlap == Overlap::Uncorrelated {
        if y {
            if premultiplied {
                asm.madd(Always, Temp0, OpAc::SrcRgb, OpBd::OneMinusDstAaa, OpAc::Temp0);
            } else {
                coverage_weight(asm, overlap, Weight::P1);
                asm.madd(Always, Temp0, OpAc::SrcRgb, OpBd::Acc, OpAc::Temp0);
            }
        }
        if z {
            asm.madd(Always, Temp0, OpAc::DstRgb, OpBd::OneMinusSrcAaa, OpAc::Temp0);
        }
        return;
    }

    if y {
        coverage_weight(asm, overlap, Weight::P1);
        asm.madd(Always, Temp0, cs.ac(), OpBd::Acc, OpAc::Temp0);
    }
    if z {
        coverage_weight(asm, overlap, Weight::P2);
        asm.madd(Always, Temp0, cd.ac(), OpBd::Acc, OpAc::Temp0);
    }
}

/// Which coverage regions contribute to the result (the X/Y/Z selectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Regions {
    pub(crate) x: bool,
    pub(crate) y: bool,
    pub(crate) z: bool,
}

impl Regions {
    pub(crate) const ALL: Regions = Regions::new(true, true, true);

    pub(crate) const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }
}

/// Result alpha `X * p0 + Y * p1 + Z * p2`, as fixed-function state where the overlap model
/// allows it, otherwise written by the program into `Temp0.a`. Emitted after the color, so it may
/// clobber `Temp1`.
pub(crate) fn coverage_alpha(asm: &mut Assembler, overlap: Overlap, r: Regions) -> AlphaDescriptor {
    use BlendFactor::{DstAlpha, One, OneMinusDstAlpha, OneMinusSrcAlpha, Zero};

    let r2a = Temp0.r_to_a();
    match (r.x, r.y, r.z) {
        (false, false, false) => AlphaDescriptor::add(Zero, Zero),
        // p0 + p1 == As and p0 + p2 == Ad under every overlap model.
        (true, true, false) => AlphaDescriptor::add(One, Zero),
        (true, false, true) => AlphaDescriptor::add(Zero, One),
        (true, true, true) => match overlap {
            Overlap::Uncorrelated => AlphaDescriptor::add(One, OneMinusSrcAlpha),
            Overlap::Conjoint => AlphaDescriptor::max(),
            Overlap::Disjoint => {
                asm.add(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa);
                asm.min(Always, r2a, OpAc::Acc, OpBd::One);
                AlphaDescriptor::Computed
            }
        },
        (true, false, false) => match overlap {
            Overlap::Uncorrelated => AlphaDescriptor::add(DstAlpha, Zero),
            Overlap::Conjoint => AlphaDescriptor::min(),
            Overlap::Disjoint => {
                coverage_weight(asm, overlap, Weight::P0);
                asm.mov(Always, r2a, OpAc::Acc);
                AlphaDescriptor::Computed
            }
        },
        (false, true, false) => match overlap {
            Overlap::Uncorrelated => AlphaDescriptor::add(OneMinusDstAlpha, Zero),
            _ => {
                coverage_weight(asm, overlap, Weight::P1);
                asm.mov(Always, r2a, OpAc::Acc);
                AlphaDescriptor::Computed
            }
        },
        (false, false, true) => match overlap {
            Overlap::Uncorrelated => AlphaDescriptor::add(Zero, OneMinusSrcAlpha),
            _ => {
                coverage_weight(asm, overlap, Weight::P2);
                asm.mov(Always, r2a, OpAc::Acc);
                AlphaDescriptor::Computed
            }
        },
        (false, true, true) => match overlap {
            Overlap::Uncorrelated => AlphaDescriptor::add(OneMinusDstAlpha, OneMinusSrcAlpha),
            Overlap::Conjoint => {
                // |As - Ad|
                asm.sub(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa);
                asm.sub(Always, Temp1, OpAc::DstAaa, OpBd::SrcAaa);
                asm.max(Always, r2a, OpAc::Acc, OpBd::Temp1);
                AlphaDescriptor::Computed
            }
            Overlap::Disjoint => {
                asm.min(Always, Acc, OpAc::SrcAaa, OpBd::OneMinusDstAaa);
                asm.min(Always, Temp1, OpAc::DstAaa, OpBd::OneMinusSrcAaa);
                asm.add(Always, r2a, OpAc::Acc, OpBd::Temp1);
                AlphaDescriptor::Computed
            }
        },
    }
}

/// Premultiplied source color as a single A/C operand, computing into `reg` when the source is
/// straight.
pub(crate) fn premultiplied_src(asm: &mut Assembler, premultiplied: bool, reg: Register) -> OpAc {
    if premultiplied {
        OpAc::SrcRgb
    } else {
        asm.mul(Always, reg, OpAc::SrcRgb, OpBd::SrcAaa);
        reg.into()
    }
}
