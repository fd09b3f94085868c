use super::*;
use crate::blend::{BlendOp, Overlap};

fn small_table() -> BlendTable {
    use crate::blend::catalog::entry;
    use crate::table::builder::BuildOpts;

    let keys = [
        BlendKey::new(BlendOp::Zero, Overlap::Uncorrelated, true),
        BlendKey::new(BlendOp::Zero, Overlap::Disjoint, true),
        BlendKey::new(BlendOp::SoftLight, Overlap::Uncorrelated, true),
        BlendKey::new(BlendOp::Xor, Overlap::Conjoint, false),
    ];
    let catalog: Vec<_> = keys.iter().filter_map(|&k| entry(k).copied()).collect();
    assert_eq!(catalog.len(), keys.len());
    BlendTable::build_from(&catalog, &BuildOpts::default()).unwrap()
}

#[test]
fn json_shape() {
    let table = small_table();
    let text = to_json(&table).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["version"], 1);
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let hashes: Vec<&str> = entries.iter().map(|e| e["hash"].as_str().unwrap()).collect();
    let mut sorted = hashes.clone();
    sorted.sort();
    assert_eq!(hashes, sorted);
    assert!(hashes.iter().all(|h| h.len() == 32));

    let zero = entries
        .iter()
        .find(|e| e["key"]["op"] == "zero")
        .unwrap();
    assert_eq!(zero["key"]["overlap"], "uncorrelated");
    assert_eq!(zero["aliases"][0]["overlap"], "disjoint");
    assert_eq!(zero["alpha"]["kind"], "fixed_function");
    assert_eq!(zero["alpha"]["src_factor"], "zero");

    let xor = entries.iter().find(|e| e["key"]["op"] == "xor").unwrap();
    assert_eq!(xor["alpha"]["kind"], "computed");
    assert!(xor.get("aliases").is_none());
}

#[test]
fn json_round_trip() {
    let table = small_table();
    let back = BlendTable::from_json(&to_json(&table).unwrap()).unwrap();
    assert_eq!(back, table);
}

#[test]
fn rejects_other_versions_and_garbage() {
    let text = to_json(&small_table()).unwrap().replacen("\"version\": 1", "\"version\": 2", 1);
    let err = BlendTable::from_json(&text).unwrap_err();
    assert!(matches!(err, BlendError::Serde(_)), "{err}");

    assert!(BlendTable::from_json("{\"version\": 1}").is_err());
    assert!(BlendTable::from_json("not json").is_err());
}

#[test]
fn rust_source_lists_every_entry() {
    let table = small_table();
    let src = to_rust_source(&table);
    assert!(src.starts_with("// @generated"));
    assert!(src.contains("pub static BLEND_TABLE: &[PregenEntry] = &["));
    assert_eq!(src.matches("    PregenEntry {").count(), table.len());
    for e in table.entries() {
        assert!(src.contains(&format!("hash: 0x{}_u128,", e.hash)));
    }
    assert!(src.contains("BlendKey::new(BlendOp::SoftLight, Overlap::Uncorrelated, true)"));
    assert!(src.contains("aliases: &[BlendKey::new(BlendOp::Zero, Overlap::Disjoint, true)]"));
    assert!(src.contains("AlphaDescriptor::Computed"));
    assert!(src.contains("[0.5_f32, 0.5_f32, 0.5_f32]"));
}

#[test]
fn pregenerated_round_trip() {
    static ALIASES: &[BlendKey] = &[BlendKey::new(BlendOp::Dst, Overlap::Disjoint, true)];
    static ROWS: &[PregenEntry] = &[PregenEntry {
        hash: 0x0123_4567_89ab_cdef_0011_2233_4455_6677,
        key: BlendKey::new(BlendOp::Dst, Overlap::Uncorrelated, true),
        constants: &[[0.5, 0.25, 1.0]],
        alpha: AlphaDescriptor::FixedFunction {
            op: AlphaBlendOp::Add,
            src_factor: BlendFactor::Zero,
            dst_factor: BlendFactor::One,
        },
        aliases: ALIASES,
    }];

    let table = BlendTable::from_pregenerated(ROWS).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.triple_count(), 2);
    let hash = Hash128::from_u128(ROWS[0].hash);
    let e = table.lookup(hash).unwrap();
    assert_eq!(e.constants, vec![[0.5, 0.25, 1.0]]);
    assert_eq!(table.hash_for(ALIASES[0]), Some(hash));
}

#[test]
fn emit_dispatches_on_format() {
    let table = small_table();
    assert_eq!(emit(&table, EmitFormat::Json).unwrap(), to_json(&table).unwrap());
    assert_eq!(emit(&table, EmitFormat::Rust).unwrap(), to_rust_source(&table));
}
