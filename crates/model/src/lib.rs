//! Canonical data model for ostatus-rs.
//!
//! The in-memory representation of federated social actions and their
//! participants:
//!
//! - [`Activity`]: a verb applied by actors to an object
//! - [`ActivityObject`]: the polymorphic object of an activity
//! - [`ContentObject`]: typed content payloads (notes, comments, ...)
//! - [`Person`]: actors, with Portable Contacts sub-records
//! - [`Feed`]: collections of activities
//! - [`Verb`] / [`ObjectKind`]: open wire vocabularies
//!
//! Pure data with validated construction; serialization to and from the
//! Atom wire form lives in `ostatus-federation`.

pub mod activity;
pub mod feed;
pub mod object;
pub mod person;
pub mod verb;

pub use activity::{Activity, ActivityBuilder};
pub use feed::{Category, Feed, Generator};
pub use object::{ActivityObject, ContentObject, ThreadRef};
pub use person::{Account, Address, ExtendedName, Organization, Person};
pub use verb::{ObjectKind, Verb, SCHEMA_ROOT};
