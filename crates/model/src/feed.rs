//! Feed: a collection of activities with channel-level metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Activity, Person};

/// An Atom feed of activities.
///
/// Also used nested as a `<source>` element when an entry was copied
/// into one feed from another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Unique identifier for this feed.
    pub uid: Option<String>,
    /// The url that represents this feed.
    pub url: Option<String>,

    /// Feed title.
    pub title: Option<String>,
    /// Content type of the title, "text" or "html".
    pub title_type: Option<String>,
    /// Feed subtitle.
    pub subtitle: Option<String>,
    /// Content type of the subtitle.
    pub subtitle_type: Option<String>,

    /// Human-readable rights statement covering entries without one of
    /// their own. Not machine interpreted.
    pub rights: Option<String>,
    /// Url of a 1:1 icon for this feed.
    pub icon: Option<String>,
    /// Url of a 2:1 logo for this feed.
    pub logo: Option<String>,
    /// The agent that generated this feed.
    pub generator: Option<Generator>,

    /// Authors of the feed.
    pub authors: Vec<Person>,
    /// Contributors to the feed.
    pub contributors: Vec<Person>,
    /// Categories describing the feed content.
    pub categories: Vec<Category>,
    /// Hub endpoints available for subscription management.
    pub hubs: Vec<String>,

    /// The activities in the feed.
    pub items: Vec<Activity>,
    /// The feed this one was copied from, when nested as a source.
    pub source: Option<Box<Feed>>,

    /// When the feed was originally published.
    pub published: Option<DateTime<Utc>>,
    /// When the feed was last updated.
    pub updated: Option<DateTime<Utc>>,
}

/// A category term with optional scheme and label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category term itself.
    pub term: Option<String>,
    /// The IRI of the categorization scheme.
    pub scheme: Option<String>,
    /// Human-readable label.
    pub label: Option<String>,
}

/// The agent responsible for generating a feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    /// Agent name.
    pub name: Option<String>,
    /// Agent homepage.
    pub uri: Option<String>,
    /// Agent version.
    pub version: Option<String>,
}
