//! Offline forms of a [`BlendTable`]: JSON, and Rust source holding a static [`PregenEntry`] array.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::blend::{AlphaBlendOp, AlphaDescriptor, BlendFactor, BlendKey};
use crate::foundation::error::{BlendError, BlendResult};
use crate::table::builder::{BlendTable, TableEntry};
use crate::ucode::{Hash128, Rgb};

pub const FORMAT_VERSION: u32 = 1;

/// Output flavour for [`emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitFormat {
    #[default]
    Json,
    Rust,
}

#[derive(Serialize, Deserialize)]
struct TableFile {
    version: u32,
    entries: Vec<TableEntry>,
}

/// Compile-time table row, as written by [`to_rust_source`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PregenEntry {
    pub hash: u128,
    pub key: BlendKey,
    pub constants: &'static [Rgb],
    pub alpha: AlphaDescriptor,
    pub aliases: &'static [BlendKey],
}

impl PregenEntry {
    fn to_entry(self) -> TableEntry {
        TableEntry {
            hash: Hash128::from_u128(self.hash),
            key: self.key,
            constants: self.constants.to_vec(),
            alpha: self.alpha,
            aliases: self.aliases.to_vec(),
        }
    }
}

pub fn emit(table: &BlendTable, format: EmitFormat) -> BlendResult<String> {
    match format {
        EmitFormat::Json => to_json(table),
        EmitFormat::Rust => Ok(to_rust_source(table)),
    }
}

/// Pretty JSON, entries sorted by hash.
pub fn to_json(table: &BlendTable) -> BlendResult<String> {
    let file = TableFile {
        version: FORMAT_VERSION,
        entries: table.entries().cloned().collect(),
    };
    serde_json::to_string_pretty(&file).map_err(|e| BlendError::serde(e.to_string()))
}

/// Rust source defining `pub static BLEND_TABLE: &[blend_ucode::table::PregenEntry]`.
pub fn to_rust_source(table: &BlendTable) -> String {
    let mut out = String::new();
    out.push_str("// @generated by blend-ucode; do not edit.\n\n");
    out.push_str("#[allow(unused_imports)]\n");
    out.push_str("use blend_ucode::blend::{AlphaBlendOp, AlphaDescriptor, BlendFactor, BlendKey, BlendOp, Overlap};\n");
    out.push_str("use blend_ucode::table::PregenEntry;\n\n");
    out.push_str("pub static BLEND_TABLE: &[PregenEntry] = &[\n");

    for e in table.entries() {
        let _ = writeln!(out, "    PregenEntry {{");
        let _ = writeln!(out, "        hash: 0x{}_u128,", e.hash);
        let _ = writeln!(out, "        key: {},", key_expr(e.key));
        let consts: Vec<String> = e.constants.iter().map(|c| rgb_expr(*c)).collect();
        let _ = writeln!(out, "        constants: &[{}],", consts.join(", "));
        let _ = writeln!(out, "        alpha: {},", alpha_expr(e.alpha));
        let aliases: Vec<String> = e.aliases.iter().map(|k| key_expr(*k)).collect();
        let _ = writeln!(out, "        aliases: &[{}],", aliases.join(", "));
        let _ = writeln!(out, "    }},");
    }

    out.push_str("];\n");
    out
}

fn key_expr(key: BlendKey) -> String {
    format!(
        "BlendKey::new(BlendOp::{:?}, Overlap::{:?}, {})",
        key.op, key.overlap, key.premultiplied
    )
}

fn rgb_expr([r, g, b]: Rgb) -> String {
    format!("[{r:?}_f32, {g:?}_f32, {b:?}_f32]")
}

fn alpha_expr(alpha: AlphaDescriptor) -> String {
    match alpha {
        AlphaDescriptor::Computed => "AlphaDescriptor::Computed".to_string(),
        AlphaDescriptor::FixedFunction {
            op,
            src_factor,
            dst_factor,
        } => format!(
            "AlphaDescriptor::FixedFunction {{ op: {}, src_factor: {}, dst_factor: {} }}",
            alpha_op_expr(op),
            factor_expr(src_factor),
            factor_expr(dst_factor)
        ),
    }
}

fn alpha_op_expr(op: AlphaBlendOp) -> String {
    format!("AlphaBlendOp::{op:?}")
}

fn factor_expr(f: BlendFactor) -> String {
    format!("BlendFactor::{f:?}")
}

impl BlendTable {
    pub fn from_json(text: &str) -> BlendResult<Self> {
        let file: TableFile =
            serde_json::from_str(text).map_err(|e| BlendError::serde(e.to_string()))?;
        if file.version != FORMAT_VERSION {
            return Err(BlendError::serde(format!(
                "unsupported table version {} (expected {FORMAT_VERSION})",
                file.version
            )));
        }
        Self::from_entries(file.entries)
    }

    /// Rebuild from a table compiled in via [`to_rust_source`].
    pub fn from_pregenerated(entries: &[PregenEntry]) -> BlendResult<Self> {
        Self::from_entries(entries.iter().map(|e| e.to_entry()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/table/emit.rs"]
mod tests;
