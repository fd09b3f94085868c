use super::*;
use crate::blend::BlendFactor;
use crate::ucode::{Assembler, Dest};

fn add_one_one() -> AlphaDescriptor {
    AlphaDescriptor::add(BlendFactor::One, BlendFactor::One)
}

fn check(asm: Assembler, alpha: AlphaDescriptor) -> BlendResult<()> {
    validate_program(&asm.finish().unwrap(), &alpha)
}

#[test]
fn accepts_minimal_program() {
    let mut asm = Assembler::new();
    asm.add(Cond::Always, Register::Temp0, OpAc::DstRgb, OpBd::SrcRgb);
    check(asm, add_one_one()).unwrap();
}

#[test]
fn computed_alpha_requires_alpha_write() {
    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp0, OpAc::SrcRgb);
    let err = check(asm, AlphaDescriptor::Computed).unwrap_err();
    assert!(matches!(err, BlendError::Invariant(_)));

    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp0, OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp0.r_to_a(), OpAc::SrcAaa);
    assert!(check(asm, add_one_one()).is_err());
}

#[test]
fn rejects_read_before_write() {
    let mut asm = Assembler::new();
    asm.mul(Cond::Always, Register::Temp0, OpAc::SrcRgb, OpBd::Acc);
    let err = check(asm, add_one_one()).unwrap_err().to_string();
    assert!(err.contains("reads acc"), "{err}");
}

#[test]
fn partial_lanes_do_not_count_as_defined() {
    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp1.r(), OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp1.g(), OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp0, OpAc::Temp1);
    assert!(check(asm, add_one_one()).is_err());

    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp1.r(), OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp1.g(), OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp1.b(), OpAc::SrcRgb);
    asm.mov(Cond::Always, Register::Temp0, OpAc::Temp1);
    check(asm, add_one_one()).unwrap();
}

#[test]
fn conditional_writes_need_flags_and_defined_lanes() {
    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp0, OpAc::Zero);
    asm.mov(Cond::Gt, Register::Temp0, OpAc::SrcRgb);
    assert!(check(asm, add_one_one()).is_err());

    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Dest::CC, OpAc::SrcAaa);
    asm.mov(Cond::Gt, Register::Temp0, OpAc::SrcRgb);
    assert!(check(asm, add_one_one()).is_err());

    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Dest::CC, OpAc::SrcAaa);
    asm.mov(Cond::Always, Register::Temp0, OpAc::Zero);
    asm.mov(Cond::Gt, Register::Temp0, OpAc::SrcRgb);
    check(asm, add_one_one()).unwrap();
}

#[test]
fn const_needs_binding() {
    let mut asm = Assembler::new();
    asm.mul(Cond::Always, Register::Temp0, OpAc::SrcRgb, OpBd::ConstantRgb);
    let err = check(asm, add_one_one()).unwrap_err().to_string();
    assert!(err.contains("const"), "{err}");

    let mut asm = Assembler::new();
    asm.set_constant(0, [0.5; 3]);
    asm.mul(Cond::Always, Register::Temp0, OpAc::SrcRgb, OpBd::ConstantRgb);
    check(asm, add_one_one()).unwrap();
}

#[test]
fn output_must_be_fully_written() {
    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp1, OpAc::SrcRgb);
    assert!(check(asm, add_one_one()).is_err());

    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp0.rrr(), OpAc::SrcRgb);
    check(asm, add_one_one()).unwrap();
}
