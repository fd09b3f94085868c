//! Operators defined directly on premultiplied values, independent of the overlap model.

use crate::blend::generators::common::premultiplied_src;
use crate::blend::{AlphaBlendOp, AlphaDescriptor, BlendFactor, Overlap};
use crate::ucode::{Assembler, Cond, Dest, OpAc, OpBd, Register};

use Cond::Always;
use Register::{Acc, Temp0, Temp1, Temp2};

/// `Temp0 = Sp + Dp`
fn sum(asm: &mut Assembler, premultiplied: bool) {
    if premultiplied {
        asm.add(Always, Temp0, OpAc::DstRgb, OpBd::SrcRgb);
    } else {
        asm.madd(Always, Temp0, OpAc::SrcRgb, OpBd::SrcAaa, OpAc::DstRgb);
    }
}

/// `Temp0 = Dp - Sp`
fn difference(asm: &mut Assembler, premultiplied: bool) {
    if premultiplied {
        asm.sub(Always, Temp0, OpAc::DstRgb, OpBd::SrcRgb);
    } else {
        asm.mul(Always, Acc, OpAc::SrcRgb, OpBd::SrcAaa);
        asm.sub(Always, Temp0, OpAc::DstRgb, OpBd::Acc);
    }
}

/// `Acc = min(1, As + Ad)`
fn clamped_alpha_sum(asm: &mut Assembler) {
    asm.add(Always, Acc, OpAc::SrcAaa, OpBd::DstAaa);
    asm.min(Always, Acc, OpAc::Acc, OpBd::One);
}

fn r2a() -> Dest {
    Temp0.r_to_a()
}

pub(crate) fn plus(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    sum(asm, premultiplied);
    AlphaDescriptor::add(BlendFactor::One, BlendFactor::One)
}

pub(crate) fn plus_clamped(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    sum(asm, premultiplied);
    asm.min(Always, Temp0, OpAc::Temp0, OpBd::One);
    clamped_alpha_sum(asm);
    asm.mov(Always, r2a(), OpAc::Acc);
    AlphaDescriptor::Computed
}

/// Color clamped to the clamped alpha sum, keeping the result a valid premultiplied value.
pub(crate) fn plus_clamped_alpha(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    sum(asm, premultiplied);
    clamped_alpha_sum(asm);
    asm.min(Always, Temp0, OpAc::Temp0, OpBd::Acc);
    asm.mov(Always, r2a(), OpAc::Acc);
    AlphaDescriptor::Computed
}

/// `max(0, min(1, As + Ad) - (As - Sp) - (Ad - Dp))`
pub(crate) fn plus_darker(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    sum(asm, premultiplied);
    clamped_alpha_sum(asm);
    asm.add(Always, Temp0, OpAc::Temp0, OpBd::Acc);
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::SrcAaa);
    asm.sub(Always, Temp0, OpAc::Temp0, OpBd::DstAaa);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
    asm.mov(Always, r2a(), OpAc::Acc);
    AlphaDescriptor::Computed
}

pub(crate) fn minus(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    difference(asm, premultiplied);
    AlphaDescriptor::fixed(
        AlphaBlendOp::ReverseSubtract,
        BlendFactor::One,
        BlendFactor::One,
    )
}

pub(crate) fn minus_clamped(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    difference(asm, premultiplied);
    asm.max(Always, Temp0, OpAc::Temp0, OpBd::Zero);
    asm.sub(Always, Acc, OpAc::DstAaa, OpBd::SrcAaa);
    asm.max(Always, r2a(), OpAc::Acc, OpBd::Zero);
    AlphaDescriptor::Computed
}

/// `Ad/2 + 2 (Dp - Ad/2)(Sp - As/2)`
pub(crate) fn contrast(
    asm: &mut Assembler,
    _overlap: Overlap,
    premultiplied: bool,
) -> AlphaDescriptor {
    asm.set_constant(0, [0.5; 3]);
    asm.mul(Always, Acc, OpAc::DstAaa, OpBd::ConstantRgb);
    asm.sub(Always, Temp2, OpAc::DstRgb, OpBd::Acc);
    let sp = premultiplied_src(asm, premultiplied, Temp1);
    asm.mul(Always, Acc, OpAc::SrcAaa, OpBd::ConstantRgb);
    asm.sub(Always, Temp1, sp, OpBd::Acc);
    asm.mmadd(
        Always,
        Temp0,
        OpAc::Temp1,
        OpBd::Temp2,
        OpAc::Temp1,
        OpBd::Temp2,
    );
    asm.madd(Always, Temp0, OpAc::DstAaa, OpBd::ConstantRgb, OpAc::Temp0);
    AlphaDescriptor::add(BlendFactor::Zero, BlendFactor::One)
}

/// `As (1 - Dp) + (1 - As) Dp`
pub(crate) fn invert_ovg(
    asm: &mut Assembler,
    _overlap: Overlap,
    _premultiplied: bool,
) -> AlphaDescriptor {
    asm.sub(Always, Acc, OpAc::DstRgb, OpBd::One);
    asm.mmsub(
        Always,
        Temp0,
        OpAc::DstRgb,
        OpBd::OneMinusSrcAaa,
        OpAc::SrcAaa,
        OpBd::Acc,
    );
    AlphaDescriptor::add(BlendFactor::One, BlendFactor::OneMinusSrcAlpha)
}

/// Destination with one channel replaced by the premultiplied source channel.
fn replace_channel(asm: &mut Assembler, premultiplied: bool, lane: Dest) -> AlphaDescriptor {
    asm.mov(Always, Temp0, OpAc::DstRgb);
    if premultiplied {
        asm.mov(Always, lane, OpAc::SrcRgb);
    } else {
        asm.mul(Always, lane, OpAc::SrcRgb, OpBd::SrcAaa);
    }
    AlphaDescriptor::add(BlendFactor::Zero, BlendFactor::One)
}

pub(crate) fn red(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    replace_channel(asm, premultiplied, Temp0.r())
}

pub(crate) fn green(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    replace_channel(asm, premultiplied, Temp0.g())
}

pub(crate) fn blue(asm: &mut Assembler, _overlap: Overlap, premultiplied: bool) -> AlphaDescriptor {
    replace_channel(asm, premultiplied, Temp0.b())
}
