//! Common utilities and shared types for ostatus-rs.
//!
//! This crate provides the foundation used across the ostatus-rs crates:
//!
//! - **Error handling**: Unified error types via [`ProtocolError`] and
//!   [`ProtocolResult`]
//! - **Armoring**: base64url encode/decode for envelope fields and keys
//! - **Cryptography**: magic-key RSA encoding and the EMSA-SHA256
//!   signature scheme used by Salmon magic envelopes
//!
//! # Example
//!
//! ```
//! use ostatus_common::crypto::{self, MagicKey};
//!
//! let keypair = crypto::new_keypair(1024)?;
//! let key = MagicKey::decode(&keypair.public_key)?;
//! assert!(key.modulus_len() >= 128);
//! # Ok::<(), ostatus_common::ProtocolError>(())
//! ```

pub mod armor;
pub mod crypto;
pub mod error;

pub use crypto::{KeyPair, MagicKey, emsa_sign, emsa_signature, emsa_verify, new_keypair};
pub use error::{ProtocolError, ProtocolResult};
