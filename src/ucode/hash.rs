use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::BlendError;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// 128-bit content hash of an encoded program.
///
/// Ordered by `(hi, lo)`, which is also the order of its 32-digit hex rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash128 {
    pub hi: u64,
    pub lo: u64,
}

impl Hash128 {
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    pub const fn as_u128(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    pub const fn from_u128(v: u128) -> Self {
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl FromStr for Hash128 {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(BlendError::decode(format!(
                "expected 32 hex digits for a program hash, got {s:?}"
            )));
        }
        let v = u128::from_str_radix(s, 16)
            .map_err(|e| BlendError::decode(format!("bad program hash {s:?}: {e}")))?;
        Ok(Self::from_u128(v))
    }
}

impl Serialize for Hash128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Streaming seeded XXH3-128.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn finish(self) -> Hash128 {
        Hash128::from_u128(self.inner.digest128())
    }
}

/// Hash an encoded byte stream. Equal inputs give equal hashes in every process and on every host.
pub fn hash_bytes(bytes: &[u8]) -> Hash128 {
    let mut h = StableHasher::new();
    h.write_bytes(bytes);
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/ucode/hash.rs"]
mod tests;
