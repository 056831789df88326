//! Feed codec: activity collections to and from `<feed>` documents.

use roxmltree::Node;

use ostatus_common::{ProtocolError, ProtocolResult};
use ostatus_model::{Category, Feed, Generator};

use super::author::{parse_person_node, write_person};
use super::ns::{ATOM_NS, ROOT_NS_DECLS};
use super::{entry, format_timestamp, link_rank, node_text, parse_timestamp};
use crate::xml::XmlWriter;

/// Serialize a feed as a standalone `<feed>` document.
pub fn serialize_feed(feed: &Feed) -> ProtocolResult<String> {
    let mut writer = XmlWriter::new();
    write_feed(&mut writer, feed, "feed", true)?;
    writer.finish()
}

/// Parse a feed from a `<feed>` document.
pub fn parse_feed(xml: &str) -> ProtocolResult<Feed> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;

    let root = doc.root_element();
    if !root.has_tag_name((ATOM_NS, "feed")) {
        return Err(ProtocolError::MissingElement("feed"));
    }

    parse_feed_node(root)
}

/// Write a feed sub-tree, as the document root or nested as `source`.
pub(crate) fn write_feed(
    writer: &mut XmlWriter,
    feed: &Feed,
    tag: &str,
    declare_ns: bool,
) -> ProtocolResult<()> {
    if declare_ns {
        writer.start(tag, &ROOT_NS_DECLS)?;
    } else {
        writer.start(tag, &[])?;
    }

    if let Some(uid) = &feed.uid {
        writer.text_element("id", &[], uid)?;
    }
    if let Some(rights) = &feed.rights {
        writer.text_element("rights", &[], rights)?;
    }
    if let Some(logo) = &feed.logo {
        writer.text_element("logo", &[], logo)?;
    }
    if let Some(icon) = &feed.icon {
        writer.text_element("icon", &[], icon)?;
    }
    if let Some(generator) = &feed.generator {
        write_generator(writer, generator)?;
    }

    if let Some(published) = &feed.published {
        writer.text_element("published", &[], &format_timestamp(*published))?;
    }
    if let Some(updated) = &feed.updated {
        writer.text_element("updated", &[], &format_timestamp(*updated))?;
    }

    if let Some(subtitle) = &feed.subtitle {
        let kind = feed.subtitle_type.as_deref().unwrap_or("text");
        writer.text_element("subtitle", &[("type", kind)], subtitle)?;
    }
    if let Some(title) = &feed.title {
        let kind = feed.title_type.as_deref().unwrap_or("text");
        writer.text_element("title", &[("type", kind)], title)?;
    }

    for category in &feed.categories {
        write_category(writer, category)?;
    }

    for author in &feed.authors {
        write_person(writer, author, "author", false)?;
    }
    for contributor in &feed.contributors {
        write_person(writer, contributor, "contributor", false)?;
    }

    if let Some(source) = feed.source.as_deref() {
        write_feed(writer, source, "source", false)?;
    }

    if let Some(url) = &feed.url {
        writer.empty(
            "link",
            &[("rel", "self"), ("type", "application/atom+xml"), ("href", url)],
        )?;
    }
    for hub in &feed.hubs {
        writer.empty("link", &[("rel", "hub"), ("href", hub)])?;
    }

    for item in &feed.items {
        entry::write_activity(writer, item, "entry", false)?;
    }

    writer.end(tag)
}

/// Parse a feed from a feed- or source-shaped sub-tree.
pub(crate) fn parse_feed_node(node: Node<'_, '_>) -> ProtocolResult<Feed> {
    let mut feed = Feed::default();
    let mut url_rank = 0u8;

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().namespace() != Some(ATOM_NS) {
            continue;
        }

        match child.tag_name().name() {
            "id" => feed.uid = Some(node_text(child)),
            "rights" => feed.rights = Some(node_text(child)),
            "logo" => feed.logo = Some(node_text(child)),
            "icon" => feed.icon = Some(node_text(child)),
            "generator" => {
                feed.generator = Some(Generator {
                    name: Some(node_text(child)).filter(|name| !name.is_empty()),
                    uri: child.attribute("uri").map(str::to_string),
                    version: child.attribute("version").map(str::to_string),
                });
            }
            "published" => feed.published = Some(parse_timestamp(&node_text(child))?),
            "updated" => feed.updated = Some(parse_timestamp(&node_text(child))?),
            "subtitle" => {
                feed.subtitle = Some(node_text(child));
                feed.subtitle_type = child.attribute("type").map(str::to_string);
            }
            "title" => {
                feed.title = Some(node_text(child));
                feed.title_type = child.attribute("type").map(str::to_string);
            }
            "category" => {
                feed.categories.push(Category {
                    term: child.attribute("term").map(str::to_string),
                    scheme: child.attribute("scheme").map(str::to_string),
                    label: child.attribute("label").map(str::to_string),
                });
            }
            "author" => feed.authors.push(parse_person_node(child)?),
            "contributor" => feed.contributors.push(parse_person_node(child)?),
            "source" => feed.source = Some(Box::new(parse_feed_node(child)?)),
            "link" => match child.attribute("rel") {
                Some("hub") => {
                    if let Some(href) = child.attribute("href") {
                        feed.hubs.push(href.to_string());
                    }
                }
                rel @ (Some("self") | Some("alternate") | None) => {
                    let rank = link_rank(rel, child.attribute("type"));
                    if feed.url.is_none() || rank > url_rank {
                        feed.url = child.attribute("href").map(str::to_string);
                        url_rank = rank;
                    }
                }
                _ => {}
            },
            "entry" => feed.items.push(entry::parse_activity_node(child)?),
            _ => {}
        }
    }

    Ok(feed)
}

fn write_generator(writer: &mut XmlWriter, generator: &Generator) -> ProtocolResult<()> {
    let mut attrs = Vec::new();
    if let Some(uri) = &generator.uri {
        attrs.push(("uri", uri.as_str()));
    }
    if let Some(version) = &generator.version {
        attrs.push(("version", version.as_str()));
    }
    writer.text_element("generator", &attrs, generator.name.as_deref().unwrap_or_default())
}

fn write_category(writer: &mut XmlWriter, category: &Category) -> ProtocolResult<()> {
    let mut attrs = Vec::new();
    if let Some(term) = &category.term {
        attrs.push(("term", term.as_str()));
    }
    if let Some(scheme) = &category.scheme {
        attrs.push(("scheme", scheme.as_str()));
    }
    if let Some(label) = &category.label {
        attrs.push(("label", label.as_str()));
    }
    writer.empty("category", &attrs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ostatus_model::{Activity, ContentObject, Person};

    fn sample_feed() -> Feed {
        Feed {
            uid: Some("https://example.social/users/wilkie/feed".into()),
            url: Some("https://example.social/users/wilkie/feed.atom".into()),
            title: Some("wilkie's stream".into()),
            title_type: Some("text".into()),
            subtitle: Some("things wilkie said".into()),
            subtitle_type: Some("text".into()),
            rights: Some("CC0".into()),
            icon: Some("https://example.social/icon.png".into()),
            logo: Some("https://example.social/logo.png".into()),
            generator: Some(Generator {
                name: Some("ostatus-rs".into()),
                uri: Some("https://example.social".into()),
                version: Some("0.1".into()),
            }),
            authors: vec![Person::with_name("wilkie")],
            categories: vec![Category {
                term: Some("microblog".into()),
                scheme: Some("https://example.social/tags".into()),
                label: Some("Microblog".into()),
            }],
            hubs: vec![
                "https://hub.example.social/".into(),
                "https://hub2.example.social/".into(),
            ],
            items: vec![Activity::builder().object(ContentObject::note("hi")).build()],
            ..Feed::default()
        }
    }

    #[test]
    fn test_feed_round_trip() {
        let feed = sample_feed();
        let xml = serialize_feed(&feed).unwrap();
        let parsed = parse_feed(&xml).unwrap();

        assert_eq!(parsed.uid, feed.uid);
        assert_eq!(parsed.url, feed.url);
        assert_eq!(parsed.title, feed.title);
        assert_eq!(parsed.hubs, feed.hubs);
        assert_eq!(parsed.categories, feed.categories);
        assert_eq!(parsed.generator, feed.generator);
        assert_eq!(parsed.authors[0].name.as_deref(), Some("wilkie"));
        assert_eq!(parsed.items.len(), 1);

        let content = parsed.items[0].object.as_deref().unwrap().as_content().unwrap();
        assert_eq!(content.text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_nested_source_round_trip() {
        let mut feed = sample_feed();
        feed.source = Some(Box::new(Feed {
            uid: Some("https://origin.example/feed".into()),
            title: Some("origin".into()),
            ..Feed::default()
        }));

        let xml = serialize_feed(&feed).unwrap();
        let parsed = parse_feed(&xml).unwrap();

        let source = parsed.source.unwrap();
        assert_eq!(source.uid.as_deref(), Some("https://origin.example/feed"));
        assert_eq!(source.title.as_deref(), Some("origin"));
    }

    #[test]
    fn test_hub_links_do_not_clobber_url() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <id>https://example.social/feed</id>
            <link rel="hub" href="https://hub.example.social/"/>
            <link rel="alternate" href="https://example.social/feed.html"/>
        </feed>"#;

        let parsed = parse_feed(xml).unwrap();
        assert_eq!(parsed.hubs, vec!["https://hub.example.social/".to_string()]);
        assert_eq!(parsed.url.as_deref(), Some("https://example.social/feed.html"));
    }

    #[test]
    fn test_non_feed_root_is_rejected() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"/>"#;
        assert!(matches!(
            parse_feed(xml),
            Err(ProtocolError::MissingElement("feed"))
        ));
    }
}
