use super::*;
use crate::ucode::instruction::Register;

#[test]
fn emits_instructions_in_call_order() {
    let mut asm = Assembler::new();
    asm.mov(Cond::Always, Register::Temp1, OpAc::SrcRgb);
    asm.madd(
        Cond::Gt,
        Register::Temp0,
        OpAc::Temp1,
        OpBd::OneMinusDstAaa,
        OpAc::DstRgb,
    );
    assert_eq!(asm.len(), 2);

    let program = asm.finish().unwrap();
    let insts = program.instructions();
    let first = insts[0].as_alu().unwrap();
    assert_eq!(first.op, AluOp::Mov);
    assert_eq!(first.dest, Register::Temp1.rgb());
    assert_eq!(first.b, OpBd::Zero);
    assert_eq!(first.c, OpAc::Zero);

    let second = insts[1].as_alu().unwrap();
    assert_eq!(second.op, AluOp::Madd);
    assert_eq!(second.cond, Cond::Gt);
    assert_eq!(second.b, OpBd::OneMinusDstAaa);
    assert_eq!(second.c, OpAc::DstRgb);
    assert_eq!(second.d, OpBd::Zero);
    assert!(program.constants().is_empty());
}

#[test]
fn constants_are_listed_by_slot() {
    let mut asm = Assembler::new();
    asm.set_constant(1, [0.25; 3]);
    asm.set_constant(0, [0.5; 3]);
    asm.mul(Cond::Always, Register::Temp0, OpAc::SrcRgb, OpBd::ConstantRgb);
    let program = asm.finish().unwrap();
    assert_eq!(program.constants(), &[[0.5; 3], [0.25; 3]]);
}

#[test]
fn rebinding_same_value_is_allowed() {
    let mut asm = Assembler::new();
    asm.set_constant(0, [0.5; 3]);
    asm.set_constant(2, [6.0; 3]);
    asm.set_constant(1, [1.0; 3]);
    asm.set_constant(0, [0.5; 3]);
    let program = asm.finish().unwrap();
    assert_eq!(program.len(), 4);
    assert_eq!(program.constants().len(), 3);
}

#[test]
fn rebinding_different_value_fails() {
    let mut asm = Assembler::new();
    asm.set_constant(0, [0.5; 3]);
    asm.set_constant(0, [0.25; 3]);
    let err = asm.finish().unwrap_err();
    assert!(matches!(err, BlendError::Invariant(_)), "{err}");
}

#[test]
fn out_of_range_slot_fails() {
    let mut asm = Assembler::new();
    asm.set_constant(8, [0.0; 3]);
    assert!(asm.is_empty());
    assert!(asm.finish().is_err());
}

#[test]
fn slot_gaps_fail() {
    let mut asm = Assembler::new();
    asm.set_constant(1, [0.5; 3]);
    let err = asm.finish().unwrap_err();
    assert!(err.to_string().contains("slot 0"), "{err}");
}
