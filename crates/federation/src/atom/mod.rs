//! Atom Activity Streams codec.
//!
//! Serializes the `ostatus-model` types to namespaced Atom XML and
//! parses wire documents back, per Atom (RFC 4287), ActivityStreams 1.0,
//! Atom Threading (RFC 4685), and Portable Contacts.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use roxmltree::Node;

use ostatus_common::{ProtocolError, ProtocolResult};

pub mod author;
pub mod entry;
pub mod feed;
pub mod ns;

/// RFC 3339 with whole seconds and a `Z` suffix, the form peer
/// implementations emit.
pub(crate) fn format_timestamp(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Strict RFC 3339. Unparseable timestamps are a hard error rather than
/// a silently dropped field: a bad timestamp means a malformed document.
pub(crate) fn parse_timestamp(text: &str) -> ProtocolResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|_| ProtocolError::InvalidTimestamp(text.trim().to_string()))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(text: &str) -> ProtocolResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ProtocolError::InvalidTimestamp(text.trim().to_string()))
}

/// Concatenated text content of an element.
pub(crate) fn node_text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

/// Preference order when several links can supply the url:
/// `rel="self"` beats `alternate`, and within each rel a
/// `type="text/html"` link beats an untyped one.
pub(crate) fn link_rank(rel: Option<&str>, media_type: Option<&str>) -> u8 {
    let html = media_type == Some("text/html");
    match (rel, html) {
        (Some("self"), true) => 4,
        (Some("self"), false) => 3,
        (_, true) => 2,
        (_, false) => 1,
    }
}
