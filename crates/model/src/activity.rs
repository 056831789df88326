//! The Activity model: a verb applied by actors to an object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActivityObject, Feed, Person, ThreadRef, Verb};

/// A social action: the protocol's unit of federated exchange.
///
/// Constructed either directly by the codec when parsing wire documents
/// (wire timestamps are authoritative and never defaulted) or through
/// [`ActivityBuilder`] when authored locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// The action being performed.
    pub verb: Verb,
    /// What the action applies to.
    pub object: Option<Box<ActivityObject>>,
    /// The indirect target of the action, when the verb takes one.
    pub target: Option<Box<ActivityObject>>,
    /// Who performed the action.
    pub actors: Vec<Person>,
    /// The feed this activity was copied from, when syndicated.
    pub source: Option<Box<Feed>>,

    /// When the activity was originally published.
    pub published: Option<DateTime<Utc>>,
    /// When the activity was last updated.
    pub updated: Option<DateTime<Utc>>,

    /// Stable unique id.
    pub uid: Option<String>,
    /// Canonical url.
    pub url: Option<String>,

    /// Entries this activity replies to.
    pub in_reply_to: Vec<ThreadRef>,

    /// Activities replying to this one.
    pub replies: Vec<Activity>,
    /// People who favorited this activity.
    pub likes: Vec<Person>,
    /// People who shared this activity.
    pub shares: Vec<Person>,
    /// People mentioned by this activity.
    pub mentions: Vec<Person>,
}

impl Activity {
    /// Start building a locally authored activity.
    #[must_use]
    pub fn builder() -> ActivityBuilder {
        ActivityBuilder::default()
    }

    /// The actors, falling back to the object's own authors when the
    /// activity carries none itself.
    #[must_use]
    pub fn effective_actors(&self) -> &[Person] {
        if self.actors.is_empty() {
            if let Some(object) = &self.object {
                return object.authors();
            }
        }
        &self.actors
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            verb: Verb::post(),
            object: None,
            target: None,
            actors: Vec::new(),
            source: None,
            published: None,
            updated: None,
            uid: None,
            url: None,
            in_reply_to: Vec::new(),
            replies: Vec::new(),
            likes: Vec::new(),
            shares: Vec::new(),
            mentions: Vec::new(),
        }
    }
}

/// Builder for locally authored activities.
///
/// This is the single place authoring defaults are computed: the verb
/// falls back to `post`, a single in-reply-to reference is normalized to
/// a one-element list, and missing timestamps are stamped with now.
/// Parsed activities never pass through here.
#[derive(Debug, Default)]
pub struct ActivityBuilder {
    verb: Option<Verb>,
    object: Option<ActivityObject>,
    target: Option<ActivityObject>,
    actors: Vec<Person>,
    source: Option<Feed>,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    uid: Option<String>,
    url: Option<String>,
    in_reply_to: Vec<ThreadRef>,
}

impl ActivityBuilder {
    #[must_use]
    pub fn verb(mut self, verb: Verb) -> Self {
        self.verb = Some(verb);
        self
    }

    #[must_use]
    pub fn object(mut self, object: impl Into<ActivityObject>) -> Self {
        self.object = Some(object.into());
        self
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<ActivityObject>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add a single actor.
    #[must_use]
    pub fn actor(mut self, actor: Person) -> Self {
        self.actors.push(actor);
        self
    }

    #[must_use]
    pub fn actors(mut self, actors: Vec<Person>) -> Self {
        self.actors = actors;
        self
    }

    #[must_use]
    pub fn source(mut self, source: Feed) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }

    #[must_use]
    pub fn updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self
    }

    #[must_use]
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Reply to a single entry; may be called repeatedly.
    #[must_use]
    pub fn in_reply_to(mut self, reference: ThreadRef) -> Self {
        self.in_reply_to.push(reference);
        self
    }

    /// Finish, computing authoring defaults.
    #[must_use]
    pub fn build(self) -> Activity {
        let now = Utc::now();

        Activity {
            verb: self.verb.unwrap_or_else(Verb::post),
            object: self.object.map(Box::new),
            target: self.target.map(Box::new),
            actors: self.actors,
            source: self.source.map(Box::new),
            published: Some(self.published.unwrap_or(now)),
            updated: Some(self.updated.unwrap_or(now)),
            uid: self.uid,
            url: self.url,
            in_reply_to: self.in_reply_to,
            ..Activity::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ContentObject;

    #[test]
    fn test_builder_defaults_verb_to_post() {
        let activity = Activity::builder()
            .object(ContentObject::note("hello"))
            .build();

        assert!(activity.verb.is_post());
    }

    #[test]
    fn test_builder_stamps_timestamps() {
        let activity = Activity::builder().build();

        assert!(activity.published.is_some());
        assert_eq!(activity.published, activity.updated);
    }

    #[test]
    fn test_builder_keeps_explicit_timestamps() {
        let when = DateTime::parse_from_rfc3339("2012-04-02T06:00:00Z")
            .map(|dt| dt.with_timezone(&Utc))
            .ok();

        let activity = Activity::builder()
            .published(when.unwrap())
            .updated(when.unwrap())
            .build();

        assert_eq!(activity.published, when);
    }

    #[test]
    fn test_in_reply_to_accumulates() {
        let activity = Activity::builder()
            .in_reply_to(ThreadRef::new("1", "https://example.org/1"))
            .in_reply_to(ThreadRef::new("2", "https://example.org/2"))
            .build();

        assert_eq!(activity.in_reply_to.len(), 2);
    }

    #[test]
    fn test_activity_survives_json_round_trip() {
        let activity = Activity::builder()
            .object(ContentObject::note("hi"))
            .actor(Person::with_name("wilkie"))
            .build();

        let json = serde_json::to_string(&activity).unwrap();
        let back: Activity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, activity);
    }

    #[test]
    fn test_effective_actors_falls_back_to_object_authors() {
        let mut note = ContentObject::note("hi");
        note.authors.push(Person::with_name("wilkie"));

        let activity = Activity {
            object: Some(Box::new(note.into())),
            ..Activity::default()
        };

        assert_eq!(activity.effective_actors().len(), 1);
    }
}
