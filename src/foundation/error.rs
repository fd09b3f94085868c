use crate::blend::BlendKey;

/// Result alias used across the crate.
pub type BlendResult<T> = Result<T, BlendError>;

/// Errors produced while generating, tabulating or decoding blend programs.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// The catalog has no program for this triple.
    #[error("unsupported blend configuration: {key}")]
    Unsupported { key: BlendKey },

    /// A generated program or table broke a structural rule.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// Two catalog triples produced the same program with different metadata, or a loaded
    /// table lists a key or hash twice.
    #[error("table conflict: {0}")]
    TableConflict(String),

    /// Malformed microcode words, hash text or enum names.
    #[error("decode error: {0}")]
    Decode(String),

    /// JSON table text that does not parse or carries another format version.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error propagated from a dependency.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build [`BlendError::Unsupported`].
    pub fn unsupported(key: BlendKey) -> Self {
        Self::Unsupported { key }
    }

    /// Build [`BlendError::Invariant`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build [`BlendError::TableConflict`].
    pub fn table_conflict(msg: impl Into<String>) -> Self {
        Self::TableConflict(msg.into())
    }

    /// Build [`BlendError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build [`BlendError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for the recoverable "no catalog entry" condition.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
