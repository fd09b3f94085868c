use std::collections::HashSet;

use super::*;
use crate::blend::BlendFactor;
use crate::ucode::{AluOp, Cond, Dest, Instruction, OpAc, OpBd, Register, WriteMask};

#[test]
fn catalog_has_every_supported_triple_once() {
    assert_eq!(CATALOG.len(), 212);
    let keys: HashSet<BlendKey> = CATALOG.iter().map(|e| e.key).collect();
    assert_eq!(keys.len(), CATALOG.len());
}

#[test]
fn premultiplied_states_come_in_pairs() {
    for pair in CATALOG.chunks(2) {
        assert_eq!(pair[0].key.op, pair[1].key.op);
        assert_eq!(pair[0].key.overlap, pair[1].key.overlap);
        assert!(pair[0].key.premultiplied);
        assert!(!pair[1].key.premultiplied);
    }
}

#[test]
fn overlap_coverage_per_family() {
    let overlaps = |op: BlendOp| {
        Overlap::ALL
            .iter()
            .filter(|&&ov| is_supported(BlendKey::new(op, ov, true)))
            .count()
    };
    assert_eq!(overlaps(BlendOp::Xor), 3);
    assert_eq!(overlaps(BlendOp::SoftLight), 3);
    assert_eq!(overlaps(BlendOp::VividLight), 1);
    assert_eq!(overlaps(BlendOp::HslColor), 1);
    assert_eq!(overlaps(BlendOp::Minus), 2);
    assert_eq!(overlaps(BlendOp::Contrast), 1);
    assert!(!is_supported(BlendKey::new(BlendOp::Plus, Overlap::Conjoint, false)));
}

#[test]
fn absent_triple_is_unsupported() {
    let err = resolve(BlendOp::Minus, Overlap::Conjoint, true).unwrap_err();
    assert!(err.is_unsupported());
    assert!(entry(BlendKey::new(BlendOp::HslHue, Overlap::Disjoint, false)).is_none());
}

#[test]
fn plus_disjoint_is_a_single_add() {
    let r = resolve(BlendOp::Plus, Overlap::Disjoint, true).unwrap();
    assert_eq!(r.program.len(), 1);
    assert!(r.program.constants().is_empty());
    let Instruction::Alu(alu) = r.program.instructions()[0] else {
        panic!("expected an ALU instruction");
    };
    assert_eq!(alu.op, AluOp::Add);
    assert_eq!(alu.cond, Cond::Always);
    assert_eq!(alu.dest, Dest::new(Register::Temp0, WriteMask::Rgb));
    assert_eq!(alu.a, OpAc::DstRgb);
    assert_eq!(alu.b, OpBd::SrcRgb);
    assert_eq!(r.alpha, AlphaDescriptor::add(BlendFactor::One, BlendFactor::One));
}

#[test]
fn every_entry_generates_a_valid_program() {
    for e in CATALOG {
        let out = generate(e.key).unwrap_or_else(|err| panic!("{}: {err}", e.key));
        assert!(!out.program.is_empty(), "{}", e.key);
        assert_eq!(out.alpha.is_computed(), out.program.writes_alpha(), "{}", e.key);
    }
}

#[test]
fn resolve_hash_matches_program() {
    let r = resolve(BlendOp::SoftLight, Overlap::Conjoint, false).unwrap();
    assert_eq!(r.hash, r.program.content_hash());
    assert_eq!(r.key, BlendKey::new(BlendOp::SoftLight, Overlap::Conjoint, false));
}

#[test]
fn generators_are_deterministic() {
    for e in CATALOG {
        assert_eq!(e.run().unwrap(), e.run().unwrap(), "{}", e.key);
    }
}
