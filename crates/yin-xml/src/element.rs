//! The narrow interface the schema compiler core consumes.

/// The YIN namespace, per RFC 6020 §12. Only elements in this namespace are
/// processed by the module loader; everything else is discarded.
pub const YIN_NAMESPACE: &str = "urn:ietf:params:xml:ns:yang:yin:1";

/// An XML element as seen by the schema compiler core.
///
/// Implementors are expected to be cheap, `Clone`-able handles into a larger
/// tree (as `roxmltree::Node` is) rather than owning subtrees themselves.
pub trait Element: Clone {
    /// The local (non-namespace-qualified) element name, e.g. `"container"`.
    fn name(&self) -> &str;

    /// The element's namespace URI, if any.
    fn namespace(&self) -> Option<&str>;

    /// The value of an attribute by name (`name`, `value`, `date`, `uri`,
    /// `module`, ...), if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// The 1-based source line this element started on, if known.
    fn line(&self) -> u32;

    /// Direct child elements, in document order. Text nodes and comments are
    /// not elements and are not included.
    fn children(&self) -> Vec<Self>
    where
        Self: Sized;

    /// The text content of this element's `<text>` child, if one is
    /// present — the YIN convention for text-valued arguments (e.g.
    /// `<description><text>...</text></description>`).
    fn text_child(&self) -> Option<String>
    where
        Self: Sized,
    {
        self.children()
            .into_iter()
            .find(|c| c.name() == "text")
            .map(|c| c.direct_text().unwrap_or_default())
    }

    /// This element's own direct text content (not a child's).
    fn direct_text(&self) -> Option<String>;

    /// Whether this element belongs to the YIN namespace.
    fn is_yin_element(&self) -> bool {
        self.namespace() == Some(YIN_NAMESPACE)
    }

    /// Find the first direct child with the given local name.
    fn child(&self, name: &str) -> Option<Self>
    where
        Self: Sized,
    {
        self.children().into_iter().find(|c| c.name() == name)
    }

    /// All direct children with the given local name.
    fn children_named(&self, name: &str) -> Vec<Self>
    where
        Self: Sized,
    {
        self.children().into_iter().filter(|c| c.name() == name).collect()
    }
}
