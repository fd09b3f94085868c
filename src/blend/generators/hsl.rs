//! Non-separable HSL operators (uncorrelated overlap only).
//!
//! Cross-channel reductions (sum, min, max) run in place with one scratch register by rotating a
//! copy through the `gbr` write mask, so the whole computation fits in the four registers.

use crate::blend::generators::common::{
    Color, Regions, coverage_alpha, coverage_tail, load_dst, load_src,
};
use crate::blend::{AlphaDescriptor, Overlap};
use crate::ucode::{Assembler, Cond, Dest, OpAc, OpBd, Register};

use Cond::Always;
use Register::{Acc, Temp0, Temp1, Temp2};

const LUMA: [f32; 3] = [0.30, 0.59, 0.11];

#[derive(Debug, Clone, Copy)]
enum Reduce {
    Sum,
    Min,
    Max,
}

fn reduce_step(asm: &mut Assembler, how: Reduce, dest: Dest, a: OpAc, b: OpBd) {
    match how {
        Reduce::Sum => asm.add(Always, dest, a, b),
        Reduce::Min => asm.min(Always, dest, a, b),
        Reduce::Max => asm.max(Always, dest, a, b),
    }
}

/// `dst = reduce(x.r, x.g, x.b)` broadcast to all lanes; clobbers `Acc`.
fn reduce3(asm: &mut Assembler, how: Reduce, dst: Register, x: Color) {
    asm.mov(Always, Acc.gbr(), x.ac());
    reduce_step(asm, how, Acc.gbr(), x.ac(), OpBd::Acc);
    reduce_step(asm, how, dst.rgb(), OpAc::Acc, x.bd());
}

/// `Temp0 = SetLum(base, lum(lum_src))` followed by ClipColor.
///
/// Clobbers every other register. `base` may live in `Temp0`.
fn set_lum(asm: &mut Assembler, base: Color, lum_src: Color) {
    asm.set_constant(0, LUMA);

    // Temp0 = base + lum(lum_src - base)
    let d = if base == Color::Reg(Temp0) { Temp1 } else { Temp0 };
    asm.sub(Always, d, lum_src.ac(), base.bd());
    asm.mul(Always, d, OpAc::from(d), OpBd::ConstantRgb);
    reduce3(asm, Reduce::Sum, d, Color::Reg(d));
    asm.add(Always, Temp0, base.ac(), OpBd::from(d));

    // ClipColor, with both clamps folded into one scale about the luminance:
    //   Temp0 = L + (C - L) * min(1, L / (L - min)) * min(1, (1 - L) / (max - L))
    asm.mul(Always, Temp1, OpAc::Temp0, OpBd::ConstantRgb);
    reduce3(asm, Reduce::Sum, Temp1, Color::Reg(Temp1));
    reduce3(asm, Reduce::Min, Temp2, Color::Reg(Temp0));

    // Spans are clamped at zero so a gray input gives inf or NaN here, which `min` maps to 1.
    asm.sub(Always, Acc, OpAc::Temp1, OpBd::Temp2);
    asm.max(Always, Acc, OpAc::Acc, OpBd::Zero);
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.mul(Always, Acc, OpAc::Temp1, OpBd::Acc);
    asm.min(Always, Temp2, OpAc::Acc, OpBd::One);

    reduce3(asm, Reduce::Max, Acc, Color::Reg(Temp0));
    asm.sub(Always, Acc, OpAc::Acc, OpBd::Temp1);
    asm.max(Always, Acc, OpAc::Acc, OpBd::Zero);
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.mmsub(Always, Acc, OpAc::Acc, OpBd::One, OpAc::Temp1, OpBd::Acc);
    asm.min(Always, Acc, OpAc::Acc, OpBd::One);

    asm.mul(Always, Acc, OpAc::Acc, OpBd::Temp2);
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::Temp1);
    asm.madd(Always, Temp0, OpAc::Temp0, OpBd::Acc, OpAc::Temp1);
}

/// `Temp0 = sat(x)` broadcast; clobbers `Acc`.
fn saturation_of(asm: &mut Assembler, x: Color) {
    reduce3(asm, Reduce::Max, Temp0, x);
    reduce3(asm, Reduce::Min, Acc, x);
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::Acc);
}

/// With the target saturation in `Temp0` and the base color in `Temp1`, leave
/// `SetSat(base, sat)` in `Temp0`. Clobbers `Temp1` and `Acc`.
fn set_sat(asm: &mut Assembler) {
    let base = Color::Reg(Temp1);
    reduce3(asm, Reduce::Min, Acc, base);
    asm.sub(Always, Temp1, OpAc::Temp1, OpBd::Acc);
    reduce3(asm, Reduce::Max, Acc, base);

    asm.mov(Always, Dest::CC, OpAc::Acc);
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.mul(Always, Acc, OpAc::Acc, OpBd::Temp0);
    asm.mov(Always, Temp0, OpAc::Zero);
    asm.mul(Cond::Gt, Temp0, OpAc::Temp1, OpBd::Acc);
}

/// Straight source color in `Temp1` whatever the input premultiplication.
fn src_into_temp1(asm: &mut Assembler, premultiplied: bool) {
    if premultiplied {
        load_src(asm, true);
    } else {
        asm.mov(Always, Temp1, OpAc::SrcRgb);
    }
}

fn finish(asm: &mut Assembler, premultiplied: bool) -> AlphaDescriptor {
    let overlap = Overlap::Uncorrelated;
    coverage_tail(
        asm,
        overlap,
        premultiplied,
        Color::Src,
        Color::Reg(Temp2),
        true,
        true,
    );
    coverage_alpha(asm, overlap, Regions::ALL)
}

/// SetLum(SetSat(cs, sat(cd)), lum(cd))
pub(crate) fn hue(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    let cd = load_dst(asm);
    saturation_of(asm, cd);
    src_into_temp1(asm, premultiplied);
    set_sat(asm);
    set_lum(asm, Color::Reg(Temp0), cd);
    finish(asm, premultiplied)
}

/// SetLum(SetSat(cd, sat(cs)), lum(cd))
pub(crate) fn saturation(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    let cd = load_dst(asm);
    let cs = load_src(asm, premultiplied);
    saturation_of(asm, cs);
    asm.mov(Always, Temp1, cd.ac());
    set_sat(asm);
    set_lum(asm, Color::Reg(Temp0), cd);
    finish(asm, premultiplied)
}

/// SetLum(cs, lum(cd))
pub(crate) fn color(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    let cd = load_dst(asm);
    let cs = load_src(asm, premultiplied);
    set_lum(asm, cs, cd);
    finish(asm, premultiplied)
}

/// SetLum(cd, lum(cs))
pub(crate) fn luminosity(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    let cd = load_dst(asm);
    let cs = load_src(asm, premultiplied);
    set_lum(asm, cd, cs);
    finish(asm, premultiplied)
}
