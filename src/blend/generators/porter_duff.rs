//! Porter-Duff operators.
//!
//! Each operator is a choice of blend result (`cs` or `cd`) plus the X/Y/Z region selectors, so
//! the color reduces to `cs * wS + cd * wD` where each weight is `As`/`Ad` (when both regions of
//! one color contribute), a single coverage term, or nothing.

use crate::blend::generators::common::{
    Regions, Weight, coverage_alpha, load_dst, load_src, weighted_sum,
};
use crate::blend::{AlphaDescriptor, Overlap};
use crate::ucode::{Assembler, OpAc, OpBd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Src,
    Dst,
}

/// Which coverage terms scale each color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coeff {
    None,
    /// `p0 + p1` for the source, `p0 + p2` for the destination: that color's own alpha.
    Own,
    Overlap,
    Exclusive,
}

fn coeffs(f: Option<Pick>, r: Regions) -> (Coeff, Coeff) {
    let coeff = |in_overlap: bool, exclusive: bool| match (in_overlap, exclusive) {
        (true, true) => Coeff::Own,
        (true, false) => Coeff::Overlap,
        (false, true) => Coeff::Exclusive,
        (false, false) => Coeff::None,
    };
    let src = coeff(r.x && f == Some(Pick::Src), r.y);
    let dst = coeff(r.x && f == Some(Pick::Dst), r.z);
    (src, dst)
}

fn porter_duff(
    asm: &mut Assembler,
    overlap: Overlap,
    premultiplied: bool,
    f: Option<Pick>,
    r: Regions,
) -> AlphaDescriptor {
    let (src, dst) = coeffs(f, r);
    let uncorrelated = overlap == Overlap::Uncorrelated;

    // Conjoint/disjoint coverage weights scale the straight colors, loaded on demand.
    let mut terms = Vec::with_capacity(2);

    let src_term = match (src, uncorrelated, premultiplied) {
        (Coeff::None, ..) => None,
        (Coeff::Own, _, true) => Some((OpAc::SrcRgb, Weight::One)),
        (Coeff::Own, _, false) => Some((OpAc::SrcRgb, Weight::Operand(OpBd::SrcAaa))),
        (Coeff::Overlap, true, true) => Some((OpAc::SrcRgb, Weight::Operand(OpBd::DstAaa))),
        (Coeff::Overlap, true, false) => {
            Some((OpAc::SrcRgb, Weight::Product(OpAc::SrcAaa, OpBd::DstAaa)))
        }
        (Coeff::Exclusive, true, true) => {
            Some((OpAc::SrcRgb, Weight::Operand(OpBd::OneMinusDstAaa)))
        }
        (Coeff::Exclusive, true, false) => Some((
            OpAc::SrcRgb,
            Weight::Product(OpAc::SrcAaa, OpBd::OneMinusDstAaa),
        )),
        (Coeff::Overlap, false, _) => Some((load_src(asm, premultiplied).ac(), Weight::P0)),
        (Coeff::Exclusive, false, _) => Some((load_src(asm, premultiplied).ac(), Weight::P1)),
    };

    let dst_term = match (dst, uncorrelated) {
        (Coeff::None, _) => None,
        (Coeff::Own, _) => Some((OpAc::DstRgb, Weight::One)),
        (Coeff::Overlap, true) => Some((OpAc::DstRgb, Weight::Operand(OpBd::SrcAaa))),
        (Coeff::Exclusive, true) => Some((OpAc::DstRgb, Weight::Operand(OpBd::OneMinusSrcAaa))),
        (Coeff::Overlap, false) => Some((load_dst(asm).ac(), Weight::P0)),
        (Coeff::Exclusive, false) => Some((load_dst(asm).ac(), Weight::P2)),
    };

    terms.extend(src_term);
    terms.extend(dst_term);
    weighted_sum(asm, overlap, &terms);

    coverage_alpha(asm, overlap, r)
}

macro_rules! porter_duff_ops {
    ($($name:ident => $f:expr, ($x:literal, $y:literal, $z:literal);)+) => {
        $(
            pub(crate) fn $name(
                asm: &mut Assembler,
                overlap: Overlap,
                premultiplied: bool,
            ) -> AlphaDescriptor {
                porter_duff(asm, overlap, premultiplied, $f, Regions::new($x, $y, $z))
            }
        )+
    };
}

porter_duff_ops! {
    zero => None, (false, false, false);
    src => Some(Pick::Src), (true, true, false);
    dst => Some(Pick::Dst), (true, false, true);
    src_over => Some(Pick::Src), (true, true, true);
    dst_over => Some(Pick::Dst), (true, true, true);
    src_in => Some(Pick::Src), (true, false, false);
    dst_in => Some(Pick::Dst), (true, false, false);
    src_out => None, (false, true, false);
    dst_out => None, (false, false, true);
    src_atop => Some(Pick::Src), (true, false, true);
    dst_atop => Some(Pick::Dst), (true, true, false);
    xor => None, (false, true, true);
}
