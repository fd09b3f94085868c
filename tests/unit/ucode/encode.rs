use super::*;
use crate::ucode::assembler::Assembler;
use crate::ucode::hash::hash_bytes;

fn sample() -> Program {
    let mut asm = Assembler::new();
    asm.set_constant(0, [0.5, 0.5, 0.5]);
    asm.sub(Cond::Always, Dest::CC, OpAc::DstRgb, OpBd::ConstantRgb);
    asm.mmadd(
        Cond::Ge,
        Register::Temp0.gbr(),
        OpAc::SrcRgb,
        OpBd::DstAaa,
        OpAc::Acc,
        OpBd::OneMinusSrcAaa,
    );
    asm.min(Cond::Always, Register::Temp0.r_to_a(), OpAc::Acc, OpBd::One);
    asm.finish().unwrap()
}

#[test]
fn word_layout() {
    let words = encode_words(&sample());
    assert_eq!(words.len(), 1 + 4 + 1 + 3);
    assert_eq!(words[0], 4);
    assert_eq!(words[1], SET_CONSTANT_OPCODE);

    let mmadd = words[3];
    assert_eq!(mmadd & 0xf, AluOp::Mmadd.code());
    assert_eq!((mmadd >> 4) & 0x7, Cond::Ge.code());
    assert_eq!((mmadd >> 7) & 0x3, Register::Temp0.code());
    assert_eq!((mmadd >> 9) & 0xf, WriteMask::Gbr.code());
    assert_eq!((mmadd >> 13) & 0xf, OpAc::SrcRgb.code());
    assert_eq!((mmadd >> 17) & 0xf, OpBd::DstAaa.code());
    assert_eq!((mmadd >> 21) & 0xf, OpAc::Acc.code());
    assert_eq!((mmadd >> 25) & 0xf, OpBd::OneMinusSrcAaa.code());

    assert_eq!(words[5], 1);
    assert_eq!(words[6], 0.5f32.to_bits());
}

#[test]
fn bytes_are_little_endian_words() {
    let p = sample();
    let words = encode_words(&p);
    let bytes = encode_bytes(&p);
    assert_eq!(bytes.len(), words.len() * 4);
    assert_eq!(&bytes[..4], &4u32.to_le_bytes());
}

#[test]
fn encoding_is_deterministic() {
    assert_eq!(encode_bytes(&sample()), encode_bytes(&sample()));
    assert_eq!(
        hash_bytes(&encode_bytes(&sample())),
        sample().content_hash()
    );
}

#[test]
fn decode_inverts_encode() {
    let p = sample();
    let back = decode_words(&encode_words(&p)).unwrap();
    assert_eq!(back, p);
    assert_eq!(decode_bytes(&encode_bytes(&p)).unwrap(), p);
}

#[test]
fn decode_rejects_malformed_streams() {
    let words = encode_words(&sample());
    assert!(decode_words(&words[..words.len() - 1]).is_err());

    let mut extra = words.clone();
    extra.push(0);
    assert!(decode_words(&extra).is_err());

    let mut reserved = words.clone();
    reserved[2] |= 1 << 30;
    assert!(decode_words(&reserved).is_err());

    let mut bad_op = words;
    bad_op[2] = (bad_op[2] & !0xf) | 15;
    assert!(decode_words(&bad_op).is_err());

    assert!(decode_bytes(&[0, 0, 0]).is_err());
}

#[test]
fn any_field_change_moves_the_hash() {
    let base = sample();
    let base_hash = base.content_hash();
    let words = encode_words(&base);

    // Flip one field at a time in the mmadd word and re-hash the raw stream.
    let edits: [(u32, u32); 8] = [
        (0, AluOp::Mmsub.code()),
        (4, Cond::Gt.code()),
        (7, Register::Acc.code()),
        (9, WriteMask::Rgb.code()),
        (13, OpAc::DstRgb.code()),
        (17, OpBd::SrcAaa.code()),
        (21, OpAc::Temp1.code()),
        (25, OpBd::One.code()),
    ];
    let mut seen = vec![base_hash];
    for (shift, code) in edits {
        let mut w = words.clone();
        let width_mask = match shift {
            4 => 0x7,
            7 => 0x3,
            _ => 0xf,
        };
        w[3] = (w[3] & !(width_mask << shift)) | (code << shift);
        let edited = decode_words(&w).unwrap();
        let h = edited.content_hash();
        assert!(!seen.contains(&h), "collision after editing bits at {shift}");
        seen.push(h);
    }

    let mut w = words;
    w[6] = 0.25f32.to_bits();
    let h = decode_words(&w).unwrap().content_hash();
    assert!(!seen.contains(&h));
}

#[test]
fn decode_rejects_oversized_instruction_count() {
    assert!(matches!(
        decode_words(&[u32::MAX]),
        Err(BlendError::Decode(_))
    ));
    assert!(matches!(decode_words(&[3, 0, 0]), Err(BlendError::Decode(_))));
    assert!(decode_words(&[]).is_err());
    assert!(decode_bytes(&u32::MAX.to_le_bytes()).is_err());
}

#[test]
fn condition_only_destination_is_canonical() {
    assert_eq!(Dest::new(Register::Temp1, WriteMask::Cc), Dest::CC);
    assert_eq!(Register::Acc.with_mask(WriteMask::Cc), Dest::CC);
    assert_eq!(Dest::CC.written_register(), None);

    let mut a = Assembler::new();
    a.sub(Cond::Always, Dest::CC, OpAc::DstRgb, OpBd::SrcRgb);
    a.mov(Cond::Always, Register::Temp0.rgb(), OpAc::SrcRgb);
    let mut b = Assembler::new();
    b.sub(
        Cond::Always,
        Register::Temp2.with_mask(WriteMask::Cc),
        OpAc::DstRgb,
        OpBd::SrcRgb,
    );
    b.mov(Cond::Always, Register::Temp0.rgb(), OpAc::SrcRgb);
    let (a, b) = (a.finish().unwrap(), b.finish().unwrap());
    assert_eq!(a, b);
    assert_eq!(encode_words(&a), encode_words(&b));
    assert_eq!(a.content_hash(), b.content_hash());

    // A Cc word carrying a register is not a canonical encoding.
    let words = encode_words(&a);
    let mut w = words.clone();
    w[1] |= Register::Temp2.code() << 7;
    assert!(matches!(decode_words(&w), Err(BlendError::Decode(_))));
}
