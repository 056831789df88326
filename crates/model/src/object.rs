//! Activity objects: the *what* an activity is about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Activity, Feed, ObjectKind, Person};

/// A reference to something this object replies to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRef {
    /// The unique id of the referenced entry.
    pub uid: String,
    /// The url of the referenced entry.
    pub url: String,
}

impl ThreadRef {
    #[must_use]
    pub fn new(uid: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            url: url.into(),
        }
    }
}

/// The polymorphic object of an activity.
///
/// The discriminant is explicit: the codec's type dispatch is an
/// exhaustive match over this enum rather than open-ended downcasting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActivityObject {
    /// Another activity, e.g. the target of a share.
    Activity(Box<Activity>),
    /// A person, e.g. the target of a follow.
    Person(Box<Person>),
    /// A typed content object such as a note or comment.
    Object(ContentObject),
}

impl ActivityObject {
    /// The content object inside, when this is the `Object` variant.
    #[must_use]
    pub const fn as_content(&self) -> Option<&ContentObject> {
        match self {
            Self::Object(content) => Some(content),
            _ => None,
        }
    }

    /// The person inside, when this is the `Person` variant.
    #[must_use]
    pub const fn as_person(&self) -> Option<&Person> {
        match self {
            Self::Person(person) => Some(person),
            _ => None,
        }
    }

    /// Authors attributed to this object, used as the actor fallback when
    /// an entry carries no author of its own.
    #[must_use]
    pub fn authors(&self) -> &[Person] {
        match self {
            Self::Activity(activity) => &activity.actors,
            Self::Person(_) => &[],
            Self::Object(content) => &content.authors,
        }
    }
}

impl From<ContentObject> for ActivityObject {
    fn from(content: ContentObject) -> Self {
        Self::Object(content)
    }
}

impl From<Person> for ActivityObject {
    fn from(person: Person) -> Self {
        Self::Person(Box::new(person))
    }
}

impl From<Activity> for ActivityObject {
    fn from(activity: Activity) -> Self {
        Self::Activity(Box::new(activity))
    }
}

/// A typed content payload: note, comment, bookmark, or an extension
/// kind. Distinguished from [`Activity`] by the absence of verb/actor
/// semantics; a content object is what an activity is about, not the
/// action itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentObject {
    /// The noun naming this object's type.
    pub kind: ObjectKind,
    /// Title of the object.
    pub title: Option<String>,
    /// Natural-language, plain-text name.
    pub display_name: Option<String>,
    /// Natural-language summarization.
    pub summary: Option<String>,

    /// Content as plain text.
    pub text: Option<String>,
    /// Content as html.
    pub html: Option<String>,
    /// Content with an unrecognized content type, kept verbatim.
    pub content: Option<String>,

    /// Canonical url of the object.
    pub url: Option<String>,
    /// Unique id of the object.
    pub uid: Option<String>,

    /// When the object was originally published.
    pub published: Option<DateTime<Utc>>,
    /// When the object was last updated.
    pub updated: Option<DateTime<Utc>>,

    /// People who authored this object.
    pub authors: Vec<Person>,
    /// The feed this object was copied from, when syndicated.
    pub source: Option<Box<Feed>>,
    /// Entries this object replies to.
    pub in_reply_to: Vec<ThreadRef>,

    /// The bookmarked target, for bookmark objects.
    pub target_url: Option<String>,
}

impl ContentObject {
    /// An empty object of the given kind.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// A note with plain-text content.
    #[must_use]
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::note(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A comment with html content.
    #[must_use]
    pub fn comment(html: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::comment(),
            html: Some(html.into()),
            ..Self::default()
        }
    }
}
