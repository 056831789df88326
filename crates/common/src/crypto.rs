//! Cryptographic primitives for Salmon magic signatures.
//!
//! This module provides the magic-key string codec and the EMSA-style
//! RSA-SHA256 signature scheme used by the Salmon protocol. Keys travel
//! as `RSA.<modulus>.<exponent>` with both integers armored as base64url
//! big-endian bytes, so a key here is a plain modulus/exponent pair
//! rather than a full PKCS#8 key.
//!
//! # Examples
//!
//! ```
//! use ostatus_common::crypto::{self, MagicKey};
//!
//! let keypair = crypto::new_keypair(1024).expect("Failed to generate keypair");
//!
//! let private_key = MagicKey::decode(&keypair.private_key).expect("Failed to parse");
//! let public_key = MagicKey::decode(&keypair.public_key).expect("Failed to parse");
//!
//! let signature = crypto::emsa_sign(b"payload", &private_key).expect("Failed to sign");
//! assert!(crypto::emsa_verify(b"payload", &signature, &public_key));
//! ```

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::{armor, ProtocolError, ProtocolResult};

/// RSA key pair in the magic-key string form.
///
/// The private key string carries the private exponent in place of the
/// public one; both strings parse with [`MagicKey::decode`].
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Public key as `RSA.<modulus>.<public exponent>`.
    pub public_key: String,
    /// Private key as `RSA.<modulus>.<private exponent>`.
    pub private_key: String,
}

/// A parsed magic key: an RSA modulus with one exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicKey {
    modulus: BigUint,
    exponent: BigUint,
}

/// ASN.1 DER prefix for a SHA-256 `DigestInfo`: the AlgorithmIdentifier
/// followed by an OCTET STRING header of length 0x20.
const DIGEST_INFO_SHA256: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// EMSA requires at least this many `0xFF` padding bytes (RFC 8017 §9.2).
const MIN_PAD_LEN: usize = 8;

/// Generate a new RSA key pair with the given bit length.
///
/// Both keys are returned in the magic-key string form. The big-endian
/// byte encoding of each integer is minimal length: no leading zero byte
/// beyond what the value itself requires.
///
/// # Errors
///
/// Returns [`ProtocolError::KeyGeneration`] if RSA key generation fails.
pub fn new_keypair(bits: usize) -> ProtocolResult<KeyPair> {
    let mut rng = rand::thread_rng();

    let private_key = RsaPrivateKey::new(&mut rng, bits)
        .map_err(|e| ProtocolError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let public = MagicKey {
        modulus: public_key.n().clone(),
        exponent: public_key.e().clone(),
    };
    let private = MagicKey {
        modulus: private_key.n().clone(),
        exponent: private_key.d().clone(),
    };

    Ok(KeyPair {
        public_key: public.encode(),
        private_key: private.encode(),
    })
}

impl MagicKey {
    /// Create a key from a raw modulus/exponent pair.
    #[must_use]
    pub const fn new(modulus: BigUint, exponent: BigUint) -> Self {
        Self { modulus, exponent }
    }

    /// Parse a `RSA.<modulus>.<exponent>` key string.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidKeyFormat`] if the string does not
    /// have exactly the `RSA.` prefix and two base64url segments. A
    /// corrupted key must never silently verify, so this fails loudly.
    pub fn decode(key: &str) -> ProtocolResult<Self> {
        let rest = key
            .strip_prefix("RSA.")
            .ok_or_else(|| ProtocolError::InvalidKeyFormat(format!("missing RSA prefix: {key}")))?;

        let mut parts = rest.splitn(2, '.');
        let modulus = parts.next().unwrap_or_default();
        let exponent = parts
            .next()
            .ok_or_else(|| ProtocolError::InvalidKeyFormat("missing exponent segment".into()))?;

        let decode_part = |part: &str| -> ProtocolResult<BigUint> {
            let bytes = armor::decode(part)
                .map_err(|_| ProtocolError::InvalidKeyFormat(format!("bad base64url: {part}")))?;
            Ok(BigUint::from_bytes_be(&bytes))
        };

        Ok(Self {
            modulus: decode_part(modulus)?,
            exponent: decode_part(exponent)?,
        })
    }

    /// Encode as a `RSA.<modulus>.<exponent>` key string.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "RSA.{}.{}",
            armor::encode(&self.modulus.to_bytes_be()),
            armor::encode(&self.exponent.to_bytes_be())
        )
    }

    /// The modulus.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The exponent.
    #[must_use]
    pub const fn exponent(&self) -> &BigUint {
        &self.exponent
    }

    /// Byte length of the modulus, which fixes the signature block size.
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.modulus.to_bytes_be().len()
    }
}

/// Build the EMSA-SHA256 padded block for a message.
///
/// Layout: `00 01 FF.. 00 <DigestInfo> <SHA-256 digest>`, with the `FF`
/// run sized so the block length equals the modulus byte length exactly.
///
/// # Errors
///
/// Returns [`ProtocolError::KeyTooSmall`] when the modulus cannot hold
/// the digest, prefix, and minimum padding. SHA-256 needs roughly a
/// 512-bit modulus or larger.
pub fn emsa_signature(message: &[u8], key: &MagicKey) -> ProtocolResult<Vec<u8>> {
    let modulus_len = key.modulus_len();
    let digest = Sha256::digest(message);

    let overhead = DIGEST_INFO_SHA256.len() + digest.len() + 3;
    let pad_len = modulus_len
        .checked_sub(overhead)
        .filter(|len| *len >= MIN_PAD_LEN)
        .ok_or(ProtocolError::KeyTooSmall {
            modulus_bytes: modulus_len,
        })?;

    let mut block = Vec::with_capacity(modulus_len);
    block.push(0x00);
    block.push(0x01);
    block.resize(2 + pad_len, 0xff);
    block.push(0x00);
    block.extend_from_slice(&DIGEST_INFO_SHA256);
    block.extend_from_slice(&digest);

    debug_assert_eq!(block.len(), modulus_len);
    Ok(block)
}

/// Sign a message: EMSA-encode it, then apply the raw RSA private-key
/// primitive. The signature is always exactly the modulus byte length.
///
/// # Errors
///
/// Returns [`ProtocolError::KeyTooSmall`] when the key cannot hold a
/// SHA-256 EMSA block.
pub fn emsa_sign(message: &[u8], private_key: &MagicKey) -> ProtocolResult<Vec<u8>> {
    let block = emsa_signature(message, private_key)?;
    let m = BigUint::from_bytes_be(&block);
    let s = m.modpow(private_key.exponent(), private_key.modulus());
    Ok(to_bytes_be_padded(&s, private_key.modulus_len()))
}

/// Verify an EMSA signature. Never errors: any structural problem with
/// the signature or key sizing verifies as `false`.
///
/// The raw RSA result is left-padded to the modulus byte length before
/// comparing, since integer arithmetic drops leading zero bytes.
#[must_use]
pub fn emsa_verify(message: &[u8], signature: &[u8], public_key: &MagicKey) -> bool {
    let Ok(expected) = emsa_signature(message, public_key) else {
        return false;
    };

    if signature.is_empty() {
        tracing::debug!("rejecting empty signature");
        return false;
    }

    let s = BigUint::from_bytes_be(signature);
    if s >= *public_key.modulus() {
        tracing::debug!(
            signature_bytes = signature.len(),
            "rejecting signature, value is not below the modulus"
        );
        return false;
    }

    let m = s.modpow(public_key.exponent(), public_key.modulus());
    to_bytes_be_padded(&m, public_key.modulus_len()) == expected
}

/// Raw RSA primitive with the given key: `data^exp mod n`.
///
/// No OAEP or PKCS#1 encryption padding. This exists only as the
/// asymmetric substrate under the EMSA scheme; the result uses the
/// integer's minimal big-endian encoding.
#[must_use]
pub fn encrypt(public_key: &MagicKey, data: &[u8]) -> Vec<u8> {
    let m = BigUint::from_bytes_be(data);
    m.modpow(public_key.exponent(), public_key.modulus())
        .to_bytes_be()
}

/// Raw RSA primitive with a private key. See [`encrypt`].
#[must_use]
pub fn decrypt(private_key: &MagicKey, data: &[u8]) -> Vec<u8> {
    encrypt(private_key, data)
}

/// Big-endian bytes of `value`, left-padded with zeros to `len`.
fn to_bytes_be_padded(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() >= len {
        return bytes;
    }

    let mut padded = vec![0u8; len - bytes.len()];
    padded.extend_from_slice(&bytes);
    padded
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_keypair(bits: usize) -> (MagicKey, MagicKey) {
        let keypair = new_keypair(bits).unwrap();
        (
            MagicKey::decode(&keypair.public_key).unwrap(),
            MagicKey::decode(&keypair.private_key).unwrap(),
        )
    }

    #[test]
    fn test_keypair_string_form() {
        let keypair = new_keypair(512).unwrap();

        assert!(keypair.public_key.starts_with("RSA."));
        assert!(keypair.private_key.starts_with("RSA."));
        assert_eq!(keypair.public_key.split('.').count(), 3);
        assert_eq!(keypair.private_key.split('.').count(), 3);
    }

    #[test]
    fn test_key_encode_round_trip() {
        for bits in [512, 1024, 2048] {
            let keypair = new_keypair(bits).unwrap();

            let public = MagicKey::decode(&keypair.public_key).unwrap();
            let private = MagicKey::decode(&keypair.private_key).unwrap();

            assert_eq!(public.encode(), keypair.public_key);
            assert_eq!(private.encode(), keypair.private_key);
        }
    }

    #[test]
    fn test_modulus_encoding_is_minimal() {
        let keypair = new_keypair(512).unwrap();
        let key = MagicKey::decode(&keypair.public_key).unwrap();

        // A 512-bit modulus has a high bit set, so its minimal encoding
        // is exactly 64 bytes with no leading zero.
        let bytes = key.modulus().to_bytes_be();
        assert_eq!(bytes.len(), 64);
        assert_ne!(bytes[0], 0);
    }

    #[test]
    fn test_decode_rejects_malformed_keys() {
        for bad in ["", "RSA.", "RSA.onlyonesegment", "DSA.AQAB.AQAB", "RSA.@@@.AQAB"] {
            let result = MagicKey::decode(bad);
            assert!(
                matches!(result, Err(ProtocolError::InvalidKeyFormat(_))),
                "expected InvalidKeyFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn test_emsa_block_layout() {
        let (public, _) = test_keypair(1024);
        let block = emsa_signature(b"payload", &public).unwrap();

        assert_eq!(block.len(), public.modulus_len());
        assert_eq!(&block[..2], &[0x00, 0x01]);

        // Padding runs up to the 0x00 separator before the DigestInfo.
        let sep = 2 + block[2..].iter().position(|b| *b != 0xff).unwrap();
        assert_eq!(block[sep], 0x00);
        assert!(sep - 2 >= MIN_PAD_LEN);
        assert_eq!(&block[sep + 1..sep + 1 + 19], &DIGEST_INFO_SHA256);

        let digest = Sha256::digest(b"payload");
        assert_eq!(&block[block.len() - 32..], digest.as_slice());
    }

    #[test]
    fn test_sign_and_verify() {
        let (public, private) = test_keypair(1024);

        let signature = emsa_sign(b"some payload", &private).unwrap();
        assert_eq!(signature.len(), private.modulus_len());
        assert!(emsa_verify(b"some payload", &signature, &public));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let (public, private) = test_keypair(1024);

        let signature = emsa_sign(b"some payload", &private).unwrap();
        assert!(!emsa_verify(b"some Payload", &signature, &public));
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let (public, private) = test_keypair(1024);

        let mut signature = emsa_sign(b"some payload", &private).unwrap();
        signature[10] ^= 0x01;
        assert!(!emsa_verify(b"some payload", &signature, &public));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (_, private) = test_keypair(1024);
        let (other_public, _) = test_keypair(1024);

        let signature = emsa_sign(b"some payload", &private).unwrap();
        assert!(!emsa_verify(b"some payload", &signature, &other_public));
    }

    #[test]
    fn test_verify_empty_signature() {
        let (public, _) = test_keypair(1024);
        assert!(!emsa_verify(b"some payload", b"", &public));
    }

    #[test]
    fn test_verify_rejects_signature_not_below_modulus() {
        let (public, _) = test_keypair(1024);
        let oversized = public.modulus().to_bytes_be();
        assert!(!emsa_verify(b"some payload", &oversized, &public));
    }

    #[test]
    fn test_small_key_rejected() {
        let (_, private) = test_keypair(256);
        let result = emsa_sign(b"payload", &private);
        assert!(matches!(result, Err(ProtocolError::KeyTooSmall { .. })));
    }

    #[test]
    fn test_raw_primitive_round_trip() {
        let (public, private) = test_keypair(512);

        // Keep the plaintext below the modulus; the primitive is pure
        // modular arithmetic.
        let data = [0x01, 0x23, 0x45, 0x67, 0x89];
        let obscured = encrypt(&public, &data);
        assert_ne!(obscured, data);
        assert_eq!(decrypt(&private, &obscured), data);
    }
}
