//! Blend configuration vocabulary: operators, overlap models, alpha descriptors, and the generator
//! catalog that turns a configuration into microcode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::BlendError;

pub mod catalog;
pub(crate) mod generators;
pub mod validate;

pub use catalog::{CATALOG, CatalogEntry, GeneratedBlend, ResolvedBlend, generate, resolve};
pub use validate::validate_program;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = BlendError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| {
                        BlendError::decode(format!(
                            concat!("unknown ", stringify!($name), " {:?}"),
                            s
                        ))
                    })
            }
        }
    };
}

named_enum! {
    /// Advanced blend operator.
    pub enum BlendOp {
        Zero => "zero",
        Src => "src",
        Dst => "dst",
        SrcOver => "src_over",
        DstOver => "dst_over",
        SrcIn => "src_in",
        DstIn => "dst_in",
        SrcOut => "src_out",
        DstOut => "dst_out",
        SrcAtop => "src_atop",
        DstAtop => "dst_atop",
        Xor => "xor",
        Plus => "plus",
        PlusClamped => "plus_clamped",
        PlusClampedAlpha => "plus_clamped_alpha",
        PlusDarker => "plus_darker",
        Multiply => "multiply",
        Screen => "screen",
        Overlay => "overlay",
        Darken => "darken",
        Lighten => "lighten",
        ColorDodge => "color_dodge",
        ColorBurn => "color_burn",
        HardLight => "hard_light",
        SoftLight => "soft_light",
        Difference => "difference",
        Minus => "minus",
        MinusClamped => "minus_clamped",
        Exclusion => "exclusion",
        Contrast => "contrast",
        Invert => "invert",
        InvertRgb => "invert_rgb",
        InvertOvg => "invert_ovg",
        LinearDodge => "linear_dodge",
        LinearBurn => "linear_burn",
        VividLight => "vivid_light",
        LinearLight => "linear_light",
        PinLight => "pin_light",
        HardMix => "hard_mix",
        Red => "red",
        Green => "green",
        Blue => "blue",
        HslHue => "hsl_hue",
        HslSaturation => "hsl_saturation",
        HslColor => "hsl_color",
        HslLuminosity => "hsl_luminosity",
    }
}

named_enum! {
    /// How source and destination coverage is assumed to overlap within a pixel.
    pub enum Overlap {
        Uncorrelated => "uncorrelated",
        Disjoint => "disjoint",
        Conjoint => "conjoint",
    }
}

/// Operator, overlap model and source premultiplication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlendKey {
    pub op: BlendOp,
    pub overlap: Overlap,
    pub premultiplied: bool,
}

impl BlendKey {
    pub const fn new(op: BlendOp, overlap: Overlap, premultiplied: bool) -> Self {
        Self {
            op,
            overlap,
            premultiplied,
        }
    }
}

impl fmt::Display for BlendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.premultiplied {
            "premultiplied"
        } else {
            "straight"
        };
        write!(f, "{}/{}/{}", self.op, self.overlap, state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaBlendOp {
    Add,
    /// `src - dst`
    Subtract,
    /// `dst - src`
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// How the result alpha is produced.
///
/// `Computed` means the program writes alpha itself; otherwise the fixed-function blender applies
/// `op(src_factor * As, dst_factor * Ad)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlphaDescriptor {
    Computed,
    FixedFunction {
        op: AlphaBlendOp,
        src_factor: BlendFactor,
        dst_factor: BlendFactor,
    },
}

impl AlphaDescriptor {
    pub const fn fixed(op: AlphaBlendOp, src_factor: BlendFactor, dst_factor: BlendFactor) -> Self {
        Self::FixedFunction {
            op,
            src_factor,
            dst_factor,
        }
    }

    /// `src_factor * As + dst_factor * Ad`
    pub const fn add(src_factor: BlendFactor, dst_factor: BlendFactor) -> Self {
        Self::fixed(AlphaBlendOp::Add, src_factor, dst_factor)
    }

    /// Min/max ignore their factors; they are recorded as `One`.
    pub const fn min() -> Self {
        Self::fixed(AlphaBlendOp::Min, BlendFactor::One, BlendFactor::One)
    }

    pub const fn max() -> Self {
        Self::fixed(AlphaBlendOp::Max, BlendFactor::One, BlendFactor::One)
    }

    pub const fn is_computed(self) -> bool {
        matches!(self, Self::Computed)
    }
}
