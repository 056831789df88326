//! Thin event-writer wrapper used by the Atom codec and the envelope.
//!
//! Keeps the quick-xml plumbing and error mapping in one place so the
//! codecs read as a sequence of element writes.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use ostatus_common::{ProtocolError, ProtocolResult};

pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    /// Open an element, with attributes.
    pub(crate) fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> ProtocolResult<()> {
        let mut elem = BytesStart::new(tag);
        for (name, value) in attrs {
            elem.push_attribute((*name, *value));
        }
        self.write(Event::Start(elem))
    }

    /// Close an element.
    pub(crate) fn end(&mut self, tag: &str) -> ProtocolResult<()> {
        self.write(Event::End(BytesEnd::new(tag)))
    }

    /// Write `<tag attrs>text</tag>`.
    pub(crate) fn text_element(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> ProtocolResult<()> {
        self.start(tag, attrs)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    /// Write `<tag attrs/>`.
    pub(crate) fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> ProtocolResult<()> {
        let mut elem = BytesStart::new(tag);
        for (name, value) in attrs {
            elem.push_attribute((*name, *value));
        }
        self.write(Event::Empty(elem))
    }

    /// Finish and return the document text.
    pub(crate) fn finish(self) -> ProtocolResult<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| ProtocolError::MalformedXml(e.to_string()))
    }

    fn write(&mut self, event: Event<'_>) -> ProtocolResult<()> {
        self.inner
            .write_event(event)
            .map_err(|e| ProtocolError::MalformedXml(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut writer = XmlWriter::new();
        writer
            .text_element("content", &[("type", "html")], "<b>hi & bye</b>")
            .unwrap();
        writer.empty("link", &[("href", "https://example.org/?a=1&b=2")]).unwrap();

        let xml = writer.finish().unwrap();
        assert!(xml.contains("&lt;b&gt;hi &amp; bye&lt;/b&gt;"));
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
