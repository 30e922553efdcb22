//! Format-specific encoding and decoding for persisted references
//! (feature-gated).
//!
//! [`Verifier`](crate::Verifier) and [`VerifierGroup`](crate::VerifierGroup)
//! serialize as their stored references only; caches and version counters are
//! runtime state and are recomputed after loading. [`encode`] and [`decode`]
//! convert any serde-serializable value to and from byte buffers in RON or
//! bincode format.

use std::fmt;

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// RON (Rusty Object Notation) — human-readable text format.
    #[cfg(feature = "serialize-ron")]
    Ron,
    /// Bincode — compact binary format.
    #[cfg(feature = "serialize-bincode")]
    Bincode,
}

/// Errors from [`encode`] and [`decode`].
#[derive(Debug)]
pub enum PersistError {
    /// Format encoding error.
    Encode(String),
    /// Format decoding error (includes malformed UTF-8 for text formats).
    Decode(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for PersistError {}

/// Encode a serde-serializable value to bytes in the given format.
#[allow(unused_variables)]
pub fn encode<T: serde::Serialize>(value: &T, format: Format) -> Result<Vec<u8>, PersistError> {
    match format {
        #[cfg(feature = "serialize-ron")]
        Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map(|s| s.into_bytes())
            .map_err(|e| PersistError::Encode(e.to_string())),
        #[cfg(feature = "serialize-bincode")]
        Format::Bincode => {
            bincode::serialize(value).map_err(|e| PersistError::Encode(e.to_string()))
        }
    }
}

/// Decode bytes in the given format to a serde-deserializable type.
#[allow(unused_variables)]
pub fn decode<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
    format: Format,
) -> Result<T, PersistError> {
    match format {
        #[cfg(feature = "serialize-ron")]
        Format::Ron => {
            let s =
                std::str::from_utf8(bytes).map_err(|e| PersistError::Decode(e.to_string()))?;
            ron::from_str(s).map_err(|e| PersistError::Decode(e.to_string()))
        }
        #[cfg(feature = "serialize-bincode")]
        Format::Bincode => {
            bincode::deserialize(bytes).map_err(|e| PersistError::Decode(e.to_string()))
        }
    }
}
