//! Error types for ostatus-rs.

use thiserror::Error;

/// Protocol result type.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Protocol error type.
///
/// Covers every failure the core can surface: malformed wire input,
/// unsupported envelope metadata, and key-format problems. Signature
/// mismatches are deliberately *not* an error; verification returns a
/// boolean so callers can still inspect the sender's claimed identity.
#[derive(Debug, Error)]
pub enum ProtocolError {
    // === Wire input errors ===
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Missing required element: {0}")]
    MissingElement(&'static str),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Invalid base64url data: {0}")]
    InvalidArmor(String),

    // === Key errors ===
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Key too small: {modulus_bytes} byte modulus cannot hold a SHA-256 EMSA block")]
    KeyTooSmall { modulus_bytes: usize },

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

impl ProtocolError {
    /// Whether this error comes from data received off the wire, as
    /// opposed to bad material supplied by the caller (keys).
    #[must_use]
    pub const fn is_wire_error(&self) -> bool {
        !matches!(
            self,
            Self::InvalidKeyFormat(_) | Self::KeyTooSmall { .. } | Self::KeyGeneration(_)
        )
    }
}
