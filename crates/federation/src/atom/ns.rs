//! XML namespaces layered by the wire format.

/// Atom, the default namespace of every document this codec emits.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Simplified ActivityStreams 1.0 vocabulary (`activity:` prefix).
pub const ACTIVITY_NS: &str = "http://activitystrea.ms/spec/1.0/";

/// Atom Threading Extensions (`thr:` prefix).
pub const THREAD_NS: &str = "http://purl.org/syndication/thread/1.0";

/// Portable Contacts (`poco:` prefix).
pub const POCO_NS: &str = "http://portablecontacts.net/spec/1.0";

/// OStatus schema (`ostatus:` prefix), declared for extension consumers.
pub const OSTATUS_NS: &str = "http://ostatus.org/schema/1.0";

/// Namespace declarations placed on every document root.
pub(crate) const ROOT_NS_DECLS: [(&str, &str); 5] = [
    ("xmlns", ATOM_NS),
    ("xmlns:activity", ACTIVITY_NS),
    ("xmlns:ostatus", OSTATUS_NS),
    ("xmlns:poco", POCO_NS),
    ("xmlns:thr", THREAD_NS),
];
