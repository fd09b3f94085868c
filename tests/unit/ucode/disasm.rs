use crate::ucode::{Assembler, Cond, Dest, OpAc, OpBd, Register};

#[test]
fn instruction_lines() {
    let mut asm = Assembler::new();
    asm.set_constant(0, [0.5, 0.25, 1.0]);
    asm.sub(Cond::Always, Dest::CC, OpAc::SrcAaa, OpBd::ConstantRgb);
    asm.mmadd(
        Cond::Gt,
        Register::Temp0,
        OpAc::SrcRgb,
        OpBd::OneMinusDstAaa,
        OpAc::DstRgb,
        OpBd::OneMinusSrcAaa,
    );
    asm.rcp(Cond::Always, Register::Acc.gbr(), OpAc::Temp1);
    asm.mov(Cond::Le, Register::Temp0.r_to_a(), OpAc::Zero);
    let program = asm.finish().unwrap();

    let text = program.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "setc 0",
            "sub.always cc, src.aaa, const",
            "mmadd.gt temp0.rgb, src.rgb, 1-dst.aaa, dst.rgb, 1-src.aaa",
            "rcp.always acc.gbr, temp1",
            "mov.le temp0.r2a, 0",
            "; c0 = (0.5, 0.25, 1)",
        ]
    );
}
