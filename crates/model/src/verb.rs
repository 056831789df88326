//! Verb and object-type vocabularies.
//!
//! Both vocabularies are open-ended: a fixed standard set of local names
//! lives under the ActivityStreams schema root, but arbitrary URI-valued
//! extensions are legal on the wire. A closed enum would reject valid
//! extension verbs, so these are string newtypes with named constructors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The URI prefix that fully qualifies standard verb and object-type
/// local names in the wire format.
pub const SCHEMA_ROOT: &str = "http://activitystrea.ms/schema/1.0/";

/// The action an activity performs.
///
/// Holds either a bare local name from the standard set (`post`,
/// `follow`, ...) or a full extension URI. Bare names are qualified with
/// [`SCHEMA_ROOT`] when serialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verb(String);

impl Verb {
    /// A verb from a wire value: full URIs pass through untouched,
    /// schema-rooted URIs are stripped back to their local name.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        let value = value.trim();
        value
            .strip_prefix(SCHEMA_ROOT)
            .map_or_else(|| Self(value.to_string()), |local| Self(local.to_string()))
    }

    /// The fully qualified form for the wire: already-absolute URIs pass
    /// through, bare names gain the schema root.
    #[must_use]
    pub fn to_wire(&self) -> String {
        if self.0.contains("://") {
            self.0.clone()
        } else {
            format!("{SCHEMA_ROOT}{}", self.0)
        }
    }

    /// The local name or extension URI as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the implied-post verb.
    #[must_use]
    pub fn is_post(&self) -> bool {
        self.0 == "post"
    }

    #[must_use]
    pub fn post() -> Self {
        Self("post".into())
    }

    #[must_use]
    pub fn follow() -> Self {
        Self("follow".into())
    }

    #[must_use]
    pub fn favorite() -> Self {
        Self("favorite".into())
    }

    #[must_use]
    pub fn unfavorite() -> Self {
        Self("unfavorite".into())
    }

    #[must_use]
    pub fn share() -> Self {
        Self("share".into())
    }

    #[must_use]
    pub fn like() -> Self {
        Self("like".into())
    }

    #[must_use]
    pub fn update() -> Self {
        Self("update".into())
    }

    #[must_use]
    pub fn join() -> Self {
        Self("join".into())
    }

    #[must_use]
    pub fn save() -> Self {
        Self("save".into())
    }

    #[must_use]
    pub fn tag() -> Self {
        Self("tag".into())
    }

    #[must_use]
    pub fn play() -> Self {
        Self("play".into())
    }

    #[must_use]
    pub fn make_friend() -> Self {
        Self("make-friend".into())
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Verb {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The noun of an activity object.
///
/// Same open vocabulary scheme as [`Verb`]. The legacy alias `status` is
/// normalized to `note` when constructed from wire values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKind(String);

impl ObjectKind {
    /// A kind from a wire value, stripping the schema root and applying
    /// the `status` → `note` alias.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        let value = value.trim();
        let local = value.strip_prefix(SCHEMA_ROOT).unwrap_or(value);
        if local == "status" {
            Self("note".into())
        } else {
            Self(local.to_string())
        }
    }

    /// The fully qualified form for the wire.
    #[must_use]
    pub fn to_wire(&self) -> String {
        if self.0.contains("://") {
            self.0.clone()
        } else {
            format!("{SCHEMA_ROOT}{}", self.0)
        }
    }

    /// The local name or extension URI as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn note() -> Self {
        Self("note".into())
    }

    #[must_use]
    pub fn comment() -> Self {
        Self("comment".into())
    }

    #[must_use]
    pub fn bookmark() -> Self {
        Self("bookmark".into())
    }

    #[must_use]
    pub fn activity() -> Self {
        Self("activity".into())
    }

    #[must_use]
    pub fn person() -> Self {
        Self("person".into())
    }
}

impl Default for ObjectKind {
    fn default() -> Self {
        Self::note()
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKind {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_wire_qualification() {
        assert_eq!(Verb::post().to_wire(), "http://activitystrea.ms/schema/1.0/post");
        assert_eq!(
            Verb::from("http://ostatus.org/schema/1.0/unfollow").to_wire(),
            "http://ostatus.org/schema/1.0/unfollow"
        );
    }

    #[test]
    fn test_verb_from_wire_strips_schema_root() {
        let verb = Verb::from_wire("http://activitystrea.ms/schema/1.0/follow");
        assert_eq!(verb, Verb::follow());

        let foreign = Verb::from_wire("http://ostatus.org/schema/1.0/unfollow");
        assert_eq!(foreign.as_str(), "http://ostatus.org/schema/1.0/unfollow");
    }

    #[test]
    fn test_status_alias() {
        assert_eq!(
            ObjectKind::from_wire("http://activitystrea.ms/schema/1.0/status"),
            ObjectKind::note()
        );
        assert_eq!(ObjectKind::from_wire("status"), ObjectKind::note());
    }
}
