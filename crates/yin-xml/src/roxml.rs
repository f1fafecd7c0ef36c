//! A [`roxmltree`]-backed implementation of [`Element`].

use crate::element::Element;

/// A parsed YIN document, borrowed from the source text passed to
/// [`parse`].
pub struct XmlDocument<'a>(roxmltree::Document<'a>);

/// Error parsing a YIN document's underlying XML.
#[derive(Debug)]
pub struct ParseError(roxmltree::Error);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed XML: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Parse `xml` into a [`XmlDocument`].
///
/// This is the sole place in the workspace that invokes the underlying XML
/// tokenizer/tree builder; the rest of the core never calls `roxmltree`
/// directly.
pub fn parse(xml: &str) -> Result<XmlDocument<'_>, ParseError> {
    roxmltree::Document::parse(xml).map(XmlDocument).map_err(ParseError)
}

impl<'a> XmlDocument<'a> {
    /// The document's root element (e.g. the `<module>` or `<submodule>`
    /// element).
    pub fn root(&self) -> XmlNode<'_> {
        XmlNode(self.0.root_element())
    }
}

/// A handle to a single XML element, borrowed from an [`XmlDocument`].
#[derive(Clone, Copy)]
pub struct XmlNode<'a>(roxmltree::Node<'a, 'a>);

impl<'a> Element for XmlNode<'a> {
    fn name(&self) -> &str {
        self.0.tag_name().name()
    }

    fn namespace(&self) -> Option<&str> {
        self.0.tag_name().namespace()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attribute(name)
    }

    fn line(&self) -> u32 {
        let pos = self.0.document().text_pos_at(self.0.range().start);
        pos.row
    }

    fn children(&self) -> Vec<Self> {
        self.0.children().filter(|n| n.is_element()).map(XmlNode).collect()
    }

    fn direct_text(&self) -> Option<String> {
        self.0.text().map(|s| s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_module() {
        let doc = parse(
            r#"<module name="m" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
                 <namespace uri="urn:x"/>
                 <prefix value="m"/>
               </module>"#,
        )
        .expect("valid xml");
        let root = doc.root();
        assert_eq!(root.name(), "module");
        assert_eq!(root.attribute("name"), Some("m"));
        assert!(root.is_yin_element());

        let children = root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "namespace");
        assert_eq!(children[0].attribute("uri"), Some("urn:x"));
        assert_eq!(children[1].attribute("value"), Some("m"));
    }

    #[test]
    fn text_child_is_trimmed() {
        let doc = parse(
            r#"<leaf name="x" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
                 <description><text>
                   hello world
                 </text></description>
               </leaf>"#,
        )
        .expect("valid xml");
        let description = doc.root().child("description").expect("description");
        assert_eq!(description.text_child().as_deref(), Some("hello world"));
    }

    #[test]
    fn line_numbers_are_tracked() {
        let doc = parse("<a xmlns=\"urn:ietf:params:xml:ns:yang:yin:1\">\n<b/>\n</a>").unwrap();
        let b = doc.root().child("b").unwrap();
        assert_eq!(b.line(), 2);
    }
}
