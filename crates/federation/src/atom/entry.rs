//! Entry codec: activities to and from `<entry>` documents.
//!
//! The wire format has one notable asymmetry, inherited from the
//! ActivityStreams Atom binding: a `post` of a content object is
//! "implied" and the object's fields are hoisted onto the entry itself,
//! with no `<activity:object>` element. Every other verb, and every
//! non-content object, embeds the object as an explicit sub-tree.

use roxmltree::Node;

use ostatus_common::{ProtocolError, ProtocolResult};
use ostatus_model::{Activity, ActivityObject, ContentObject, ObjectKind, Person, ThreadRef, Verb};

use super::author::{parse_person_node, write_person};
use super::ns::{ACTIVITY_NS, ATOM_NS, POCO_NS, ROOT_NS_DECLS, THREAD_NS};
use super::{feed, format_timestamp, link_rank, node_text, parse_timestamp};
use crate::xml::XmlWriter;

/// Serialize an activity as a standalone `<entry>` document.
pub fn serialize_activity(activity: &Activity) -> ProtocolResult<String> {
    let mut writer = XmlWriter::new();
    write_activity(&mut writer, activity, "entry", true)?;
    writer.finish()
}

/// Parse an activity from an `<entry>` document.
pub fn parse_activity(xml: &str) -> ProtocolResult<Activity> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;

    let root = doc.root_element();
    let node = if root.has_tag_name((ATOM_NS, "entry")) {
        root
    } else {
        doc.descendants()
            .find(|n| n.has_tag_name((ATOM_NS, "entry")))
            .ok_or(ProtocolError::MissingElement("entry"))?
    };

    parse_activity_node(node)
}

pub(crate) fn write_activity(
    writer: &mut XmlWriter,
    activity: &Activity,
    tag: &str,
    declare_ns: bool,
) -> ProtocolResult<()> {
    if declare_ns {
        writer.start(tag, &ROOT_NS_DECLS)?;
    } else {
        writer.start(tag, &[])?;
    }

    // post + content object is the implied form: no <activity:object>,
    // the object's fields sit directly on the entry.
    let implied = activity
        .object
        .as_deref()
        .and_then(ActivityObject::as_content)
        .filter(|_| activity.verb.is_post());

    if let Some(content) = implied {
        write_implied_entry(writer, activity, content)?;
    } else {
        write_explicit_entry(writer, activity)?;
    }

    writer.end(tag)
}

fn write_implied_entry(
    writer: &mut XmlWriter,
    activity: &Activity,
    content: &ContentObject,
) -> ProtocolResult<()> {
    if let Some(uid) = content.uid.as_ref().or(activity.uid.as_ref()) {
        writer.text_element("id", &[], uid)?;
    }
    if let Some(title) = &content.title {
        writer.text_element("title", &[], title)?;
    }
    if let Some(summary) = &content.summary {
        writer.text_element("summary", &[], summary)?;
    }
    if let Some(display_name) = &content.display_name {
        writer.text_element("poco:displayName", &[], display_name)?;
    }

    write_timestamps(writer, activity)?;

    writer.text_element("activity:object-type", &[], &content.kind.to_wire())?;
    writer.text_element("activity:verb", &[], &activity.verb.to_wire())?;

    let authors = if content.authors.is_empty() {
        &activity.actors
    } else {
        &content.authors
    };
    for author in authors {
        write_person(writer, author, "author", false)?;
    }

    write_content(writer, content)?;

    if let Some(url) = content.url.as_ref().or(activity.url.as_ref()) {
        writer.empty(
            "link",
            &[("rel", "self"), ("type", "application/atom+xml"), ("href", url)],
        )?;
    }

    let references = if content.in_reply_to.is_empty() {
        &activity.in_reply_to
    } else {
        &content.in_reply_to
    };
    for reference in references {
        write_thread_ref(writer, reference)?;
    }

    if let Some(target_url) = &content.target_url {
        writer.empty("link", &[("rel", "related"), ("href", target_url)])?;
    }

    if let Some(source) = content.source.as_deref().or(activity.source.as_deref()) {
        feed::write_feed(writer, source, "source", false)?;
    }

    Ok(())
}

fn write_explicit_entry(writer: &mut XmlWriter, activity: &Activity) -> ProtocolResult<()> {
    if let Some(uid) = &activity.uid {
        writer.text_element("id", &[], uid)?;
    }

    write_timestamps(writer, activity)?;

    writer.text_element("activity:verb", &[], &activity.verb.to_wire())?;

    for actor in &activity.actors {
        write_person(writer, actor, "author", false)?;
    }

    if let Some(object) = activity.object.as_deref() {
        write_object(writer, object)?;
    }

    if let Some(url) = &activity.url {
        writer.empty(
            "link",
            &[("rel", "self"), ("type", "application/atom+xml"), ("href", url)],
        )?;
    }

    for reference in &activity.in_reply_to {
        write_thread_ref(writer, reference)?;
    }

    if let Some(source) = activity.source.as_deref() {
        feed::write_feed(writer, source, "source", false)?;
    }

    Ok(())
}

fn write_object(writer: &mut XmlWriter, object: &ActivityObject) -> ProtocolResult<()> {
    match object {
        ActivityObject::Person(person) => write_person(writer, person, "activity:object", false),
        ActivityObject::Object(content) => {
            write_content_object(writer, content, "activity:object")
        }
        ActivityObject::Activity(inner) => {
            // Nested activities are carried in a minimal entry shape.
            writer.start("activity:object", &[])?;
            writer.text_element(
                "activity:object-type",
                &[],
                &ObjectKind::activity().to_wire(),
            )?;
            if let Some(uid) = &inner.uid {
                writer.text_element("id", &[], uid)?;
            }
            writer.text_element("activity:verb", &[], &inner.verb.to_wire())?;
            if let Some(url) = &inner.url {
                writer.empty(
                    "link",
                    &[("rel", "self"), ("type", "application/atom+xml"), ("href", url)],
                )?;
            }
            writer.end("activity:object")
        }
    }
}

pub(crate) fn write_content_object(
    writer: &mut XmlWriter,
    content: &ContentObject,
    tag: &str,
) -> ProtocolResult<()> {
    writer.start(tag, &[])?;

    writer.text_element("activity:object-type", &[], &content.kind.to_wire())?;

    if let Some(uid) = &content.uid {
        writer.text_element("id", &[], uid)?;
    }
    if let Some(title) = &content.title {
        writer.text_element("title", &[], title)?;
    }
    if let Some(summary) = &content.summary {
        writer.text_element("summary", &[], summary)?;
    }
    if let Some(display_name) = &content.display_name {
        writer.text_element("poco:displayName", &[], display_name)?;
    }

    if let Some(published) = &content.published {
        writer.text_element("published", &[], &format_timestamp(*published))?;
    }
    if let Some(updated) = &content.updated {
        writer.text_element("updated", &[], &format_timestamp(*updated))?;
    }

    for author in &content.authors {
        write_person(writer, author, "author", false)?;
    }

    write_content(writer, content)?;

    if let Some(url) = &content.url {
        writer.empty(
            "link",
            &[("rel", "self"), ("type", "application/atom+xml"), ("href", url)],
        )?;
    }

    for reference in &content.in_reply_to {
        write_thread_ref(writer, reference)?;
    }

    if let Some(target_url) = &content.target_url {
        writer.empty("link", &[("rel", "related"), ("href", target_url)])?;
    }

    if let Some(source) = content.source.as_deref() {
        feed::write_feed(writer, source, "source", false)?;
    }

    writer.end(tag)
}

fn write_content(writer: &mut XmlWriter, content: &ContentObject) -> ProtocolResult<()> {
    if let Some(html) = &content.html {
        writer.text_element("content", &[("type", "html")], html)?;
    } else if let Some(text) = &content.text {
        writer.text_element("content", &[("type", "text")], text)?;
    } else if let Some(raw) = &content.content {
        writer.text_element("content", &[], raw)?;
    }
    Ok(())
}

fn write_timestamps(writer: &mut XmlWriter, activity: &Activity) -> ProtocolResult<()> {
    if let Some(published) = &activity.published {
        writer.text_element("published", &[], &format_timestamp(*published))?;
    }
    if let Some(updated) = &activity.updated {
        writer.text_element("updated", &[], &format_timestamp(*updated))?;
    }
    Ok(())
}

fn write_thread_ref(writer: &mut XmlWriter, reference: &ThreadRef) -> ProtocolResult<()> {
    writer.empty(
        "thr:in-reply-to",
        &[("ref", &reference.uid), ("href", &reference.url)],
    )
}

/// Parse an activity from an entry-shaped sub-tree.
pub(crate) fn parse_activity_node(node: Node<'_, '_>) -> ProtocolResult<Activity> {
    let mut activity = Activity::default();
    let mut entry = EntryFields::default();

    let mut object_node = None;
    for child in node.children().filter(Node::is_element) {
        if child.has_tag_name((ACTIVITY_NS, "object")) {
            object_node = Some(child);
        } else if child.has_tag_name((ACTIVITY_NS, "verb")) {
            activity.verb = Verb::from_wire(&node_text(child));
        } else {
            entry.collect(child)?;
        }
    }

    activity.published = entry.published;
    activity.updated = entry.updated;
    activity.source = entry.source.take().map(Box::new);

    if let Some(object_node) = object_node {
        activity.uid = entry.uid.take();
        activity.url = entry.url.take();
        activity.actors = std::mem::take(&mut entry.authors);
        activity.in_reply_to = std::mem::take(&mut entry.in_reply_to);

        let object = parse_object_node(object_node)?;
        if let ActivityObject::Object(content) = &object {
            // Some peers put the id and permalink only on the object.
            if activity.uid.is_none() {
                activity.uid.clone_from(&content.uid);
            }
            if activity.url.is_none() {
                activity.url.clone_from(&content.url);
            }
            if activity.in_reply_to.is_empty() {
                activity.in_reply_to.clone_from(&content.in_reply_to);
            }
        }
        activity.object = Some(Box::new(object));
    } else if activity.verb.is_post() {
        // Implied form: the entry's own fields are the object. Thread
        // references are visible from both levels.
        let content = entry.into_content();
        activity.in_reply_to.clone_from(&content.in_reply_to);
        activity.object = Some(Box::new(ActivityObject::Object(content)));
    } else {
        activity.uid = entry.uid.take();
        activity.url = entry.url.take();
        activity.actors = std::mem::take(&mut entry.authors);
        activity.in_reply_to = std::mem::take(&mut entry.in_reply_to);

        // StatusNet-style entries hoist object fields even for verbs
        // like favorite; keep the content instead of dropping it.
        if entry.has_object_fields() {
            activity.object = Some(Box::new(ActivityObject::Object(entry.into_content())));
        }
    }

    Ok(activity)
}

/// Parse a content object from an object-shaped sub-tree.
pub(crate) fn parse_content_object_node(node: Node<'_, '_>) -> ProtocolResult<ContentObject> {
    let mut entry = EntryFields::default();
    for child in node.children().filter(Node::is_element) {
        entry.collect(child)?;
    }

    Ok(entry.into_content())
}

fn parse_object_node(node: Node<'_, '_>) -> ProtocolResult<ActivityObject> {
    let kind = node
        .children()
        .filter(Node::is_element)
        .find(|child| child.has_tag_name((ACTIVITY_NS, "object-type")))
        .map(|child| ObjectKind::from_wire(&node_text(child)));

    if kind == Some(ObjectKind::person()) {
        return Ok(ActivityObject::Person(Box::new(parse_person_node(node)?)));
    }

    parse_content_object_node(node).map(ActivityObject::Object)
}

/// Fields accumulated from an entry- or object-shaped element, before
/// the implied/explicit split decides where they belong.
#[derive(Default)]
struct EntryFields {
    kind: Option<ObjectKind>,
    uid: Option<String>,
    url: Option<String>,
    url_rank: u8,
    title: Option<String>,
    summary: Option<String>,
    display_name: Option<String>,
    text: Option<String>,
    html: Option<String>,
    content: Option<String>,
    published: Option<chrono::DateTime<chrono::Utc>>,
    updated: Option<chrono::DateTime<chrono::Utc>>,
    authors: Vec<Person>,
    in_reply_to: Vec<ThreadRef>,
    target_url: Option<String>,
    source: Option<ostatus_model::Feed>,
}

impl EntryFields {
    fn collect(&mut self, child: Node<'_, '_>) -> ProtocolResult<()> {
        let ns = child.tag_name().namespace().unwrap_or_default();
        let name = child.tag_name().name();

        match (ns, name) {
            (ATOM_NS, "id") => self.uid = Some(node_text(child)),
            (ATOM_NS, "title") => self.title = Some(node_text(child)),
            (ATOM_NS, "summary") => self.summary = Some(node_text(child)),
            (POCO_NS, "displayName") => self.display_name = Some(node_text(child)),
            (ATOM_NS, "published") => self.published = Some(parse_timestamp(&node_text(child))?),
            (ATOM_NS, "updated") => self.updated = Some(parse_timestamp(&node_text(child))?),
            (ATOM_NS, "author") | (ACTIVITY_NS, "actor") => {
                self.authors.push(parse_person_node(child)?);
            }
            (ATOM_NS, "content") => match child.attribute("type") {
                Some("html") => self.html = Some(node_text(child)),
                Some("text") => self.text = Some(node_text(child)),
                _ => self.content = Some(node_text(child)),
            },
            (ATOM_NS, "link") => match child.attribute("rel") {
                rel @ (Some("self") | Some("alternate") | None) => {
                    let rank = link_rank(rel, child.attribute("type"));
                    if self.url.is_none() || rank > self.url_rank {
                        self.url = child.attribute("href").map(str::to_string);
                        self.url_rank = rank;
                    }
                }
                Some("related") => {
                    self.target_url = child.attribute("href").map(str::to_string);
                }
                _ => {}
            },
            (ATOM_NS, "source") => self.source = Some(feed::parse_feed_node(child)?),
            (ACTIVITY_NS, "object-type") => {
                self.kind = Some(ObjectKind::from_wire(&node_text(child)));
            }
            (THREAD_NS, "in-reply-to") => {
                self.in_reply_to.push(ThreadRef::new(
                    child.attribute("ref").unwrap_or_default(),
                    child.attribute("href").unwrap_or_default(),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Whether any hoisted object field was present, i.e. whether an
    /// entry without an explicit object still describes one.
    fn has_object_fields(&self) -> bool {
        self.kind.is_some()
            || self.title.is_some()
            || self.summary.is_some()
            || self.display_name.is_some()
            || self.text.is_some()
            || self.html.is_some()
            || self.content.is_some()
            || self.target_url.is_some()
    }

    fn into_content(self) -> ContentObject {
        ContentObject {
            kind: self.kind.unwrap_or_default(),
            title: self.title,
            display_name: self.display_name,
            summary: self.summary,
            text: self.text,
            html: self.html,
            content: self.content,
            url: self.url,
            uid: self.uid,
            published: self.published,
            updated: self.updated,
            authors: self.authors,
            source: self.source.map(Box::new),
            in_reply_to: self.in_reply_to,
            target_url: self.target_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ostatus_model::Person;

    fn posted_note(text: &str) -> Activity {
        let mut note = ContentObject::note(text);
        note.uid = Some("https://example.social/notes/1".into());
        note.url = Some("https://example.social/notes/1.atom".into());
        note.authors.push(Person::with_name("wilkie"));

        Activity::builder().object(note).build()
    }

    #[test]
    fn test_posted_note_uses_implied_form() {
        let xml = serialize_activity(&posted_note("Hello")).unwrap();

        assert!(!xml.contains("<activity:object>"));
        assert!(xml.contains("http://activitystrea.ms/schema/1.0/post"));
        assert!(xml.contains("http://activitystrea.ms/schema/1.0/note"));
        assert!(xml.contains(r#"<content type="text">Hello</content>"#));
    }

    #[test]
    fn test_implied_form_round_trip() {
        let activity = posted_note("Hello");
        let xml = serialize_activity(&activity).unwrap();
        let parsed = parse_activity(&xml).unwrap();

        assert!(parsed.verb.is_post());
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.kind, ObjectKind::note());
        assert_eq!(content.text.as_deref(), Some("Hello"));
        assert_eq!(content.uid.as_deref(), Some("https://example.social/notes/1"));
        assert_eq!(parsed.effective_actors()[0].name.as_deref(), Some("wilkie"));
    }

    #[test]
    fn test_html_content_round_trip() {
        let mut comment = ContentObject::comment("<p>nice post</p>");
        comment.uid = Some("https://example.social/comments/9".into());
        let activity = Activity::builder().object(comment).build();

        let xml = serialize_activity(&activity).unwrap();
        assert!(xml.contains(r#"<content type="html">"#));

        let parsed = parse_activity(&xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.html.as_deref(), Some("<p>nice post</p>"));
        assert_eq!(content.kind, ObjectKind::comment());
    }

    #[test]
    fn test_follow_embeds_person_object() {
        let activity = Activity::builder()
            .verb(Verb::follow())
            .actor(Person::with_name("wilkie"))
            .object(Person {
                uid: Some("acct:target@example.social".into()),
                name: Some("target".into()),
                ..Person::default()
            })
            .uid(String::from("https://example.social/activities/5"))
            .build();

        let xml = serialize_activity(&activity).unwrap();
        assert!(xml.contains("<activity:object>"));
        assert!(xml.contains("http://activitystrea.ms/schema/1.0/follow"));
        assert!(xml.contains("http://activitystrea.ms/schema/1.0/person"));

        let parsed = parse_activity(&xml).unwrap();
        assert_eq!(parsed.verb, Verb::follow());
        let person = parsed.object.as_deref().unwrap().as_person().unwrap();
        assert_eq!(person.uid.as_deref(), Some("acct:target@example.social"));
        assert_eq!(parsed.actors[0].name.as_deref(), Some("wilkie"));
        assert_eq!(parsed.uid.as_deref(), Some("https://example.social/activities/5"));
    }

    #[test]
    fn test_reply_thread_round_trip() {
        let mut comment = ContentObject::comment("agreed");
        comment.in_reply_to.push(ThreadRef::new(
            "https://example.social/notes/1",
            "https://example.social/notes/1.atom",
        ));
        let activity = Activity::builder().object(comment).build();

        let xml = serialize_activity(&activity).unwrap();
        assert!(xml.contains("thr:in-reply-to"));

        let parsed = parse_activity(&xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.in_reply_to.len(), 1);
        assert_eq!(content.in_reply_to[0].uid, "https://example.social/notes/1");
        assert_eq!(parsed.in_reply_to, content.in_reply_to);
    }

    #[test]
    fn test_bookmark_target_round_trip() {
        let mut bookmark = ContentObject::new(ObjectKind::bookmark());
        bookmark.title = Some("a fine page".into());
        bookmark.target_url = Some("https://example.org/fine-page".into());
        let activity = Activity::builder().object(bookmark).build();

        let xml = serialize_activity(&activity).unwrap();
        assert!(xml.contains(r#"rel="related""#));

        let parsed = parse_activity(&xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.target_url.as_deref(), Some("https://example.org/fine-page"));
    }

    #[test]
    fn test_status_alias_normalizes_to_note() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
                            xmlns:activity="http://activitystrea.ms/spec/1.0/">
            <id>tag:example.social,2012:1</id>
            <activity:object-type>http://activitystrea.ms/schema/1.0/status</activity:object-type>
            <content type="text">old style</content>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.kind, ObjectKind::note());
    }

    #[test]
    fn test_extension_verb_passes_through() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
                            xmlns:activity="http://activitystrea.ms/spec/1.0/">
            <id>tag:example.social,2012:2</id>
            <activity:verb>http://ostatus.org/schema/1.0/unfollow</activity:verb>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        assert_eq!(parsed.verb.as_str(), "http://ostatus.org/schema/1.0/unfollow");
        assert_eq!(
            parsed.verb.to_wire(),
            "http://ostatus.org/schema/1.0/unfollow"
        );
        // No object element and no hoisted object fields: nothing to
        // synthesize.
        assert!(parsed.object.is_none());
        assert_eq!(parsed.uid.as_deref(), Some("tag:example.social,2012:2"));
    }

    #[test]
    fn test_non_post_entry_keeps_hoisted_object_fields() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
                            xmlns:activity="http://activitystrea.ms/spec/1.0/">
            <id>tag:example.social,2012:5</id>
            <activity:verb>http://activitystrea.ms/schema/1.0/favorite</activity:verb>
            <activity:object-type>http://activitystrea.ms/schema/1.0/note</activity:object-type>
            <content type="text">wilkie favorited a status</content>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        assert_eq!(parsed.verb, Verb::favorite());
        assert_eq!(parsed.uid.as_deref(), Some("tag:example.social,2012:5"));

        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.kind, ObjectKind::note());
        assert_eq!(content.text.as_deref(), Some("wilkie favorited a status"));
    }

    #[test]
    fn test_activity_actor_counts_as_an_author() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
                            xmlns:activity="http://activitystrea.ms/spec/1.0/">
            <id>tag:example.social,2012:4</id>
            <activity:verb>http://activitystrea.ms/schema/1.0/favorite</activity:verb>
            <activity:actor><name>wilkie</name></activity:actor>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        assert_eq!(parsed.verb, Verb::favorite());
        assert_eq!(parsed.actors[0].name.as_deref(), Some("wilkie"));
    }

    #[test]
    fn test_html_typed_link_is_preferred() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
            <id>tag:example.social,2012:6</id>
            <link rel="alternate" href="https://example.social/notes/6.atom"/>
            <link rel="alternate" type="text/html" href="https://example.social/notes/6"/>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.url.as_deref(), Some("https://example.social/notes/6"));
    }

    #[test]
    fn test_self_link_beats_html_alternate() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
            <id>tag:example.social,2012:7</id>
            <link rel="alternate" type="text/html" href="https://example.social/notes/7"/>
            <link rel="self" type="application/atom+xml" href="https://example.social/notes/7.atom"/>
        </entry>"#;

        let parsed = parse_activity(xml).unwrap();
        let content = parsed.object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(
            content.url.as_deref(),
            Some("https://example.social/notes/7.atom")
        );
    }

    #[test]
    fn test_bad_entry_timestamp_is_hard_error() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
            <id>tag:example.social,2012:3</id>
            <published>last tuesday</published>
        </entry>"#;

        assert!(matches!(
            parse_activity(xml),
            Err(ProtocolError::InvalidTimestamp(_))
        ));
    }
}
