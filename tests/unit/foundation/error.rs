use super::*;
use crate::blend::{BlendOp, Overlap};

#[test]
fn display_prefixes_are_stable() {
    let key = BlendKey::new(BlendOp::Minus, Overlap::Conjoint, true);
    assert!(
        BlendError::unsupported(key)
            .to_string()
            .contains("unsupported blend configuration:")
    );
    assert!(
        BlendError::invariant("x")
            .to_string()
            .contains("invariant violation:")
    );
    assert!(
        BlendError::table_conflict("x")
            .to_string()
            .contains("table conflict:")
    );
    assert!(BlendError::decode("x").to_string().contains("decode error:"));
    assert!(
        BlendError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn unsupported_names_the_triple() {
    let key = BlendKey::new(BlendOp::Minus, Overlap::Conjoint, true);
    let err = BlendError::unsupported(key);
    assert!(err.is_unsupported());
    let msg = err.to_string();
    assert!(msg.contains("minus"), "{msg}");
    assert!(msg.contains("conjoint"), "{msg}");
    assert!(msg.contains("premultiplied"), "{msg}");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlendError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_unsupported());
}
