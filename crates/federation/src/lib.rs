//! Wire codecs for the OStatus federation protocol.
//!
//! Two layers:
//!
//! - [`atom`]: the Atom Activity Streams codec, turning
//!   `ostatus-model` activities, people, and feeds into namespaced XML
//!   documents and back
//! - [`envelope`]: the Salmon Magic Envelope, wrapping an Atom payload
//!   with an RSA-SHA256 magic signature for delivery between servers
//!
//! The crate never does network I/O; callers hand it documents and keys
//! and get documents, models, and verification verdicts back.

pub mod atom;
pub mod envelope;

mod xml;

pub use atom::author::{parse_person, serialize_person};
pub use atom::entry::{parse_activity, serialize_activity};
pub use atom::feed::{parse_feed, serialize_feed};
pub use envelope::MagicEnvelope;
