//! base64url armoring helpers.
//!
//! Magic envelopes and magic keys armor binary fields as base64url.
//! Encoding always pads; decoding tolerates missing padding and embedded
//! whitespace, since armored payloads in the wild arrive line-wrapped.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::{ProtocolError, ProtocolResult};

/// base64url-encode bytes, with padding.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

/// Decode a base64url string, stripping ASCII whitespace first.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidArmor`] when the input is not valid
/// base64url in either padded or unpadded form.
pub fn decode(data: &str) -> ProtocolResult<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    URL_SAFE
        .decode(&compact)
        .or_else(|_| URL_SAFE_NO_PAD.decode(&compact))
        .map_err(|e| ProtocolError::InvalidArmor(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads() {
        assert_eq!(encode(b"application/atom+xml"), "YXBwbGljYXRpb24vYXRvbSt4bWw=");
        assert_eq!(encode(b"base64url"), "YmFzZTY0dXJs");
    }

    #[test]
    fn test_decode_round_trip() {
        let data = b"RSA-SHA256";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn test_decode_unpadded_and_wrapped() {
        assert_eq!(decode("YXBwbGljYXRpb24vYXRvbSt4bWw").unwrap(), b"application/atom+xml");
        assert_eq!(decode("YXBwbGlj\nYXRpb24vYXRvbSt4bWw=\n").unwrap(), b"application/atom+xml");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("!!!"), Err(ProtocolError::InvalidArmor(_))));
    }
}
