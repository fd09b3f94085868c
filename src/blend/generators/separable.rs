//! Per-channel blend functions `f(cs, cd)`.
//!
//! Each core leaves `f` in `Temp0` and may use `Acc` as scratch. The straight colors stay intact
//! for the coverage tail: the source in `Temp1` (or the raw operand), the destination in `Temp2`.

use crate::blend::generators::common::{
    Color, Regions, coverage_alpha, coverage_tail, load_dst, load_src,
};
use crate::blend::{AlphaDescriptor, Overlap};
use crate::ucode::{Assembler, Cond, Dest, OpAc, OpBd, Register};

use Cond::Always;
use Register::{Acc, Temp0};

type Core = fn(&mut Assembler, Color, Color);

/// Load both straight colors, evaluate `core`, then weight by coverage over all three regions.
fn blend(asm: &mut Assembler, overlap: Overlap, premultiplied: bool, core: Core) -> AlphaDescriptor {
    let cd = load_dst(asm);
    let cs = load_src(asm, premultiplied);
    core(asm, cs, cd);
    coverage_tail(asm, overlap, premultiplied, cs, cd, true, true);
    coverage_alpha(asm, overlap, Regions::ALL)
}

/// Like [`blend`] but without the source-only region. `reads_src` says whether `core` needs the
/// straight source color at all.
fn blend_xz(
    asm: &mut Assembler,
    overlap: Overlap,
    premultiplied: bool,
    reads_src: bool,
    core: Core,
) -> AlphaDescriptor {
    let cd = load_dst(asm);
    let cs = if reads_src {
        load_src(asm, premultiplied)
    } else {
        Color::Src
    };
    core(asm, cs, cd);
    coverage_tail(asm, overlap, premultiplied, cs, cd, false, true);
    coverage_alpha(asm, overlap, Regions::new(true, false, true))
}

fn half(asm: &mut Assembler) {
    asm.set_constant(0, [0.5; 3]);
}

fn multiply_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.mul(Always, Temp0, cs.ac(), cd.bd());
}

fn screen_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Acc, cs.ac(), cd.bd());
    asm.mmsub(Always, Temp0, OpAc::Acc, OpBd::One, cs.ac(), cd.bd());
}

/// `sel <= 0.5 ? 2 cs cd : 2 (cs + cd - cs cd) - 1`
fn hard_light_on(asm: &mut Assembler, cs: Color, cd: Color, sel: Color) {
    asm.mul(Always, Temp0, cs.ac(), cd.bd());
    asm.add(Always, Acc, cs.ac(), cd.bd());
    asm.sub(Always, Acc, OpAc::Acc, OpBd::Temp0);
    asm.add(Always, Acc, OpAc::Acc, OpBd::Acc);
    asm.sub(Always, Acc, OpAc::Acc, OpBd::One);
    asm.add(Always, Temp0, OpAc::Temp0, OpBd::Temp0);
    half(asm);
    asm.sub(Always, Dest::CC, sel.ac(), OpBd::ConstantRgb);
    asm.mov(Cond::Gt, Temp0, OpAc::Acc);
}

fn overlay_core(asm: &mut Assembler, cs: Color, cd: Color) {
    hard_light_on(asm, cs, cd, cd);
}

fn hard_light_core(asm: &mut Assembler, cs: Color, cd: Color) {
    hard_light_on(asm, cs, cd, cs);
}

fn darken_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.min(Always, Temp0, cs.ac(), cd.bd());
}

fn lighten_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.max(Always, Temp0, cs.ac(), cd.bd());
}

fn color_dodge_core(asm: &mut Assembler, cs: Color, cd: Color) {
    // min(1, cd / (1 - cs))
    asm.sub(Always, Acc, cs.ac(), OpBd::One);
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.mul(Always, Temp0, cd.ac(), OpBd::Acc);
    asm.sub(Always, Temp0, OpAc::Zero, OpBd::Temp0);
    asm.min(Always, Temp0, OpAc::Temp0, OpBd::One);
    // cs >= 1 -> 1
    asm.sub(Always, Dest::CC, cs.ac(), OpBd::One);
    asm.add(Cond::Ge, Temp0, OpAc::Zero, OpBd::One);
    // cd <= 0 -> 0
    asm.mov(Always, Dest::CC, cd.ac());
    asm.mov(Cond::Le, Temp0, OpAc::Zero);
}

fn color_burn_core(asm: &mut Assembler, cs: Color, cd: Color) {
    // max(0, 1 - (1 - cd) / cs)
    asm.rcp(Always, Acc, cs.ac());
    asm.sub(Always, Temp0, cd.ac(), OpBd::One);
    asm.mul(Always, Temp0, OpAc::Temp0, OpBd::Acc);
    asm.add(Always, Temp0, OpAc::Temp0, OpBd::One);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
    // cs <= 0 -> 0
    asm.mov(Always, Dest::CC, cs.ac());
    asm.mov(Cond::Le, Temp0, OpAc::Zero);
    // cd >= 1 -> 1
    asm.sub(Always, Dest::CC, cd.ac(), OpBd::One);
    asm.add(Cond::Ge, Temp0, OpAc::Zero, OpBd::One);
}

fn soft_light_core(asm: &mut Assembler, cs: Color, cd: Color) {
    half(asm);

    // sqrt(cd) by Newton's method from (1 + cd) / 2; only needed for cd > 1/4.
    asm.add(Always, Temp0, cd.ac(), OpBd::One);
    asm.mul(Always, Temp0, OpAc::Temp0, OpBd::ConstantRgb);
    for _ in 0..3 {
        asm.rcp(Always, Acc, OpAc::Temp0);
        asm.mul(Always, Acc, cd.ac(), OpBd::Acc);
        asm.add(Always, Temp0, OpAc::Temp0, OpBd::Acc);
        asm.mul(Always, Temp0, OpAc::Temp0, OpBd::ConstantRgb);
    }

    // cd + (2cs - 1)(sqrt(cd) - cd)
    asm.sub(Always, Temp0, OpAc::Temp0, cd.bd());
    asm.add(Always, Acc, cs.ac(), cs.bd());
    asm.sub(Always, Acc, OpAc::Acc, OpBd::One);
    asm.madd(Always, Temp0, OpAc::Temp0, OpBd::Acc, cd.ac());

    // cd <= 1/4: cd + (2cs - 1) g, with 2g = ((32 cd - 24) cd + 6) cd
    asm.set_constant(1, [32.0; 3]);
    asm.mul(Always, Acc, cd.ac(), OpBd::ConstantRgb);
    asm.set_constant(2, [24.0; 3]);
    asm.sub(Always, Acc, OpAc::Acc, OpBd::ConstantRgb);
    asm.mul(Always, Acc, OpAc::Acc, cd.bd());
    asm.set_constant(3, [6.0; 3]);
    asm.add(Always, Acc, OpAc::Acc, OpBd::ConstantRgb);
    asm.mul(Always, Acc, OpAc::Acc, cd.bd());
    half(asm);
    asm.mmsub(Always, Acc, cs.ac(), OpBd::Acc, OpAc::Acc, OpBd::ConstantRgb);
    asm.set_constant(4, [0.25; 3]);
    asm.sub(Always, Dest::CC, cd.ac(), OpBd::ConstantRgb);
    asm.add(Cond::Le, Temp0, cd.ac(), OpBd::Acc);

    // cs <= 1/2: cd + (2cs - 1) cd (1 - cd)
    asm.mul(Always, Acc, cd.ac(), cd.bd());
    asm.sub(Always, Acc, cd.ac(), OpBd::Acc);
    asm.add(Always, Acc, OpAc::Acc, OpBd::Acc);
    half(asm);
    asm.mmsub(Always, Acc, cs.ac(), OpBd::Acc, OpAc::Acc, OpBd::ConstantRgb);
    asm.sub(Always, Dest::CC, cs.ac(), OpBd::ConstantRgb);
    asm.add(Cond::Le, Temp0, cd.ac(), OpBd::Acc);
}

fn difference_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.sub(Always, Temp0, cs.ac(), cd.bd());
    asm.sub(Always, Acc, cd.ac(), cs.bd());
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Acc);
}

fn exclusion_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Acc, cs.ac(), cd.bd());
    asm.mul(Always, Temp0, cs.ac(), cd.bd());
    asm.add(Always, Temp0, OpAc::Temp0, OpBd::Temp0);
    asm.sub(Always, Temp0, OpAc::Acc, OpBd::Temp0);
}

fn invert_core(asm: &mut Assembler, _cs: Color, cd: Color) {
    asm.sub(Always, Acc, cd.ac(), OpBd::One);
    asm.sub(Always, Temp0, OpAc::Zero, OpBd::Acc);
}

fn invert_rgb_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.sub(Always, Acc, cd.ac(), OpBd::One);
    asm.mul(Always, Temp0, OpAc::Acc, cs.bd());
    asm.sub(Always, Temp0, OpAc::Zero, OpBd::Temp0);
}

fn linear_dodge_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Temp0, cs.ac(), cd.bd());
    asm.min(Always, Temp0, OpAc::Temp0, OpBd::One);
}

fn linear_burn_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Temp0, cs.ac(), cd.bd());
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::One);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
}

fn vivid_light_core(asm: &mut Assembler, cs: Color, cd: Color) {
    // cs < 1/2: max(0, 1 - (1 - cd) / 2cs)
    asm.add(Always, Acc, cs.ac(), cs.bd());
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.sub(Always, Temp0, cd.ac(), OpBd::One);
    asm.mul(Always, Temp0, OpAc::Temp0, OpBd::Acc);
    asm.add(Always, Temp0, OpAc::Temp0, OpBd::One);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
    // cs >= 1/2: min(1, cd / 2(1 - cs))
    asm.sub(Always, Acc, cs.ac(), OpBd::One);
    asm.add(Always, Acc, OpAc::Acc, OpBd::Acc);
    asm.rcp(Always, Acc, OpAc::Acc);
    asm.mul(Always, Acc, cd.ac(), OpBd::Acc);
    asm.sub(Always, Acc, OpAc::Zero, OpBd::Acc);
    asm.min(Always, Acc, OpAc::Acc, OpBd::One);
    half(asm);
    asm.sub(Always, Dest::CC, cs.ac(), OpBd::ConstantRgb);
    asm.mov(Cond::Ge, Temp0, OpAc::Acc);
    // cs <= 0 -> 0, cs >= 1 -> 1
    asm.mov(Always, Dest::CC, cs.ac());
    asm.mov(Cond::Le, Temp0, OpAc::Zero);
    asm.sub(Always, Dest::CC, cs.ac(), OpBd::One);
    asm.add(Cond::Ge, Temp0, OpAc::Zero, OpBd::One);
}

fn linear_light_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Temp0, cs.ac(), cs.bd());
    asm.add(Always, Temp0, OpAc::Temp0, cd.bd());
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::One);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
    asm.min(Always, Temp0, OpAc::Temp0, OpBd::One);
}

fn pin_light_core(asm: &mut Assembler, cs: Color, cd: Color) {
    // max(min(2cs, cd), 2cs - 1)
    asm.add(Always, Acc, cs.ac(), cs.bd());
    asm.min(Always, Temp0, OpAc::Acc, cd.bd());
    asm.sub(Always, Acc, OpAc::Acc, OpBd::One);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Acc);
}

fn hard_mix_core(asm: &mut Assembler, cs: Color, cd: Color) {
    asm.add(Always, Acc, cs.ac(), cd.bd());
    asm.sub(Always, Dest::CC, OpAc::Acc, OpBd::One);
    asm.mov(Always, Temp0, OpAc::Zero);
    asm.add(Cond::Ge, Temp0, OpAc::Zero, OpBd::One);
}

macro_rules! separable_ops {
    ($($name:ident => $blend:ident($core:ident);)+) => {
        $(
            pub(crate) fn $name(
                asm: &mut Assembler,
                overlap: Overlap,
                premultiplied: bool,
            ) -> AlphaDescriptor {
                $blend(asm, overlap, premultiplied, $core)
            }
        )+
    };
}

separable_ops! {
    multiply => blend(multiply_core);
    screen => blend(screen_core);
    overlay => blend(overlay_core);
    darken => blend(darken_core);
    lighten => blend(lighten_core);
    color_dodge => blend(color_dodge_core);
    color_burn => blend(color_burn_core);
    hard_light => blend(hard_light_core);
    soft_light => blend(soft_light_core);
    difference => blend(difference_core);
    exclusion => blend(exclusion_core);
    linear_dodge => blend(linear_dodge_core);
    linear_burn => blend(linear_burn_core);
    vivid_light => blend(vivid_light_core);
    linear_light => blend(linear_light_core);
    pin_light => blend(pin_light_core);
    hard_mix => blend(hard_mix_core);
}

/// `1 - cd` over the overlap region, destination elsewhere.
pub(crate) fn invert(asm: &mut Assembler, overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    if overlap != Overlap::Uncorrelated {
        return blend_xz(asm, overlap, premultiplied, false, invert_core);
    }
    // (Ad - Dp) As + Dp (1 - As)
    asm.sub(Always, Acc, OpAc::DstAaa, OpBd::DstRgb);
    asm.mmadd(
        Always,
        Temp0,
        OpAc::Acc,
        OpBd::SrcAaa,
        OpAc::DstRgb,
        OpBd::OneMinusSrcAaa,
    );
    coverage_alpha(asm, overlap, Regions::new(true, false, true))
}

/// `cs (1 - cd)` over the overlap region, destination elsewhere.
pub(crate) fn invert_rgb(
    asm: &mut Assembler,
    overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    if overlap != Overlap::Uncorrelated {
        return blend_xz(asm, overlap, premultiplied, true, invert_rgb_core);
    }
    // Sp (Ad - Dp) + Dp (1 - As)
    asm.sub(Always, Acc, OpAc::DstAaa, OpBd::DstRgb);
    if premultiplied {
        asm.mmadd(
            Always,
            Temp0,
            OpAc::Acc,
            OpBd::SrcRgb,
            OpAc::DstRgb,
            OpBd::OneMinusSrcAaa,
        );
    } else {
        asm.mul(Always, Acc, OpAc::Acc, OpBd::SrcRgb);
        asm.mmadd(
            Always,
            Temp0,
            OpAc::Acc,
            OpBd::SrcAaa,
            OpAc::DstRgb,
            OpBd::OneMinusSrcAaa,
        );
    }
    coverage_alpha(asm, overlap, Regions::new(true, false, true))
}
