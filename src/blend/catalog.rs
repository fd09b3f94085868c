use std::collections::HashMap;
use std::sync::OnceLock;

use crate::blend::generators::{additive, hsl, porter_duff, separable};
use crate::blend::validate::validate_program;
use crate::blend::{AlphaDescriptor, BlendKey, BlendOp, Overlap};
use crate::foundation::error::{BlendError, BlendResult};
use crate::ucode::{Assembler, Hash128, Program};

/// Emits one triple's program into a fresh assembler and reports how alpha is produced.
pub type Generator = fn(&mut Assembler) -> AlphaDescriptor;

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: BlendKey,
    pub generate: Generator,
}

impl CatalogEntry {
    /// Run the generator and seal its program.
    pub fn run(&self) -> BlendResult<GeneratedBlend> {
        let mut asm = Assembler::new();
        let alpha = (self.generate)(&mut asm);
        let program = asm.finish()?;
        Ok(GeneratedBlend { program, alpha })
    }
}

/// Output of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBlend {
    pub program: Program,
    pub alpha: AlphaDescriptor,
}

/// A supported triple together with its program and content hash.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlend {
    pub key: BlendKey,
    pub program: Program,
    pub hash: Hash128,
    pub alpha: AlphaDescriptor,
}

macro_rules! triple {
    ($op:ident, $ov:ident, $pm:literal, $f:path) => {
        CatalogEntry {
            key: BlendKey::new(BlendOp::$op, Overlap::$ov, $pm),
            generate: |asm: &mut Assembler| $f(asm, Overlap::$ov, $pm),
        }
    };
}

macro_rules! catalog {
    ($($op:ident [$($ov:ident),+] => $f:path;)+) => {
        &[$($(
            triple!($op, $ov, true, $f),
            triple!($op, $ov, false, $f),
        )+)+]
    };
}

/// Every supported (operator, overlap, premultiplied) triple, in table-build order.
pub static CATALOG: &[CatalogEntry] = catalog! {
    Zero [Uncorrelated, Disjoint, Conjoint] => porter_duff::zero;
    Src [Uncorrelated, Disjoint, Conjoint] => porter_duff::src;
    Dst [Uncorrelated, Disjoint, Conjoint] => porter_duff::dst;
    SrcOver [Uncorrelated, Disjoint, Conjoint] => porter_duff::src_over;
    DstOver [Uncorrelated, Disjoint, Conjoint] => porter_duff::dst_over;
    SrcIn [Uncorrelated, Disjoint, Conjoint] => porter_duff::src_in;
    DstIn [Uncorrelated, Disjoint, Conjoint] => porter_duff::dst_in;
    SrcOut [Uncorrelated, Disjoint, Conjoint] => porter_duff::src_out;
    DstOut [Uncorrelated, Disjoint, Conjoint] => porter_duff::dst_out;
    SrcAtop [Uncorrelated, Disjoint, Conjoint] => porter_duff::src_atop;
    DstAtop [Uncorrelated, Disjoint, Conjoint] => porter_duff::dst_atop;
    Xor [Uncorrelated, Disjoint, Conjoint] => porter_duff::xor;

    Multiply [Uncorrelated, Disjoint, Conjoint] => separable::multiply;
    Screen [Uncorrelated, Disjoint, Conjoint] => separable::screen;
    Overlay [Uncorrelated, Disjoint, Conjoint] => separable::overlay;
    Darken [Uncorrelated, Disjoint, Conjoint] => separable::darken;
    Lighten [Uncorrelated, Disjoint, Conjoint] => separable::lighten;
    ColorDodge [Uncorrelated, Disjoint, Conjoint] => separable::color_dodge;
    ColorBurn [Uncorrelated, Disjoint, Conjoint] => separable::color_burn;
    HardLight [Uncorrelated, Disjoint, Conjoint] => separable::hard_light;
    SoftLight [Uncorrelated, Disjoint, Conjoint] => separable::soft_light;
    Difference [Uncorrelated, Disjoint, Conjoint] => separable::difference;
    Exclusion [Uncorrelated, Disjoint, Conjoint] => separable::exclusion;
    Invert [Uncorrelated, Disjoint, Conjoint] => separable::invert;
    InvertRgb [Uncorrelated, Disjoint, Conjoint] => separable::invert_rgb;
    LinearDodge [Uncorrelated, Disjoint, Conjoint] => separable::linear_dodge;
    LinearBurn [Uncorrelated, Disjoint, Conjoint] => separable::linear_burn;
    VividLight [Uncorrelated] => separable::vivid_light;
    LinearLight [Uncorrelated] => separable::linear_light;
    PinLight [Uncorrelated] => separable::pin_light;
    HardMix [Uncorrelated] => separable::hard_mix;

    HslHue [Uncorrelated] => hsl::hue;
    HslSaturation [Uncorrelated] => hsl::saturation;
    HslColor [Uncorrelated] => hsl::color;
    HslLuminosity [Uncorrelated] => hsl::luminosity;

    Plus [Uncorrelated, Disjoint] => additive::plus;
    PlusClamped [Uncorrelated, Disjoint] => additive::plus_clamped;
    PlusClampedAlpha [Uncorrelated, Disjoint] => additive::plus_clamped_alpha;
    PlusDarker [Uncorrelated, Disjoint] => additive::plus_darker;
    Minus [Uncorrelated, Disjoint] => additive::minus;
    MinusClamped [Uncorrelated, Disjoint] => additive::minus_clamped;
    Contrast [Uncorrelated] => additive::contrast;
    InvertOvg [Uncorrelated] => additive::invert_ovg;
    Red [Uncorrelated] => additive::red;
    Green [Uncorrelated] => additive::green;
    Blue [Uncorrelated] => additive::blue;
};

fn index() -> &'static HashMap<BlendKey, usize> {
    static INDEX: OnceLock<HashMap<BlendKey, usize>> = OnceLock::new();
    INDEX.get_or_init(|| {
        CATALOG
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key, i))
            .collect()
    })
}

/// Catalog entry for `key`, if the triple is supported.
pub fn entry(key: BlendKey) -> Option<&'static CatalogEntry> {
    index().get(&key).map(|&i| &CATALOG[i])
}

pub fn is_supported(key: BlendKey) -> bool {
    index().contains_key(&key)
}

/// Generate and validate the program for `key`.
pub fn generate(key: BlendKey) -> BlendResult<GeneratedBlend> {
    let entry = entry(key).ok_or_else(|| BlendError::unsupported(key))?;
    let out = entry.run()?;
    validate_program(&out.program, &out.alpha)?;
    Ok(out)
}

/// Program, alpha descriptor and content hash for a blend configuration.
pub fn resolve(op: BlendOp, overlap: Overlap, premultiplied: bool) -> BlendResult<ResolvedBlend> {
    let key = BlendKey::new(op, overlap, premultiplied);
    let GeneratedBlend { program, alpha } = generate(key)?;
    let hash = program.content_hash();
    Ok(ResolvedBlend {
        key,
        program,
        hash,
        alpha,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/blend/catalog.rs"]
mod tests;
