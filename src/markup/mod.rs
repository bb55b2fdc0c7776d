//! Tagged markup: the serialized form of a document
//!
//! The pagination engine, the codec and the host exchange documents as an
//! HTML-like markup string. [`parse`] turns it into a small node tree and
//! [`to_string`] writes the canonical form back. Writing, parsing and writing
//! again yields the same string.

mod parser;
mod writer;

pub use parser::parse;
pub use writer::to_string;

/// Class marking a page-break block (`<div class="page-break"></div>`)
pub const PAGE_BREAK_CLASS: &str = "page-break";
/// Class marking a page-number field (`<span class="page-number"></span>`)
pub const PAGE_NUMBER_CLASS: &str = "page-number";

/// Elements that never take children
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "br", "img", "hr", "input", "meta", "link", "col", "wbr", "source", "area", "base",
];

/// Markup node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// Markup element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Lower-case tag name
    pub name: String,
    /// Attributes in document order
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Closed set of element kinds the codec and engine understand.
///
/// Anything else is [`Tag::Other`] and is treated as a transparent container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Paragraph,
    Heading(u8),
    ListItem,
    UnorderedList,
    OrderedList,
    Table,
    TableRow,
    TableCell,
    TableHeaderCell,
    Image,
    PageBreak,
    PageNumber,
    LineBreak,
    Bold,
    Italic,
    Underline,
    Span,
    Link,
    Division,
    Other,
}

impl Element {
    /// Create an element without attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<div class="page-break"></div>`
    pub fn page_break() -> Self {
        Self::new("div").with_attr("class", PAGE_BREAK_CLASS)
    }

    /// `<span class="page-number"></span>`
    pub fn page_number() -> Self {
        Self::new("span").with_attr("class", PAGE_NUMBER_CLASS)
    }

    /// Add an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Add children
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Set or replace an attribute
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_ascii_lowercase();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `class` attribute lists `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Classify this element
    pub fn tag(&self) -> Tag {
        match self.name.as_str() {
            "p" => Tag::Paragraph,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "li" => Tag::ListItem,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "table" => Tag::Table,
            "tr" => Tag::TableRow,
            "td" => Tag::TableCell,
            "th" => Tag::TableHeaderCell,
            "img" => Tag::Image,
            "br" => Tag::LineBreak,
            "b" | "strong" => Tag::Bold,
            "i" | "em" => Tag::Italic,
            "u" | "ins" => Tag::Underline,
            "a" => Tag::Link,
            "div" | "hr" if self.has_class(PAGE_BREAK_CLASS) => Tag::PageBreak,
            "span" if self.has_class(PAGE_NUMBER_CLASS) => Tag::PageNumber,
            "span" => Tag::Span,
            "div" => Tag::Division,
            _ => Tag::Other,
        }
    }

    /// Whether this element can never hold children
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl Node {
    /// Text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// The element, if this is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Concatenated leaf text
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Whitespace-only text
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    /// A paragraph with no visible content (`<p></p>` or `<p><br></p>`)
    pub fn is_empty_paragraph(&self) -> bool {
        let Node::Element(e) = self else {
            return false;
        };
        e.tag() == Tag::Paragraph
            && e.children.iter().all(|c| match c {
                Node::Text(t) => t.trim().is_empty(),
                Node::Element(child) => child.tag() == Tag::LineBreak,
            })
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_classification() {
        assert_eq!(Element::new("H3").tag(), Tag::Heading(3));
        assert_eq!(Element::new("strong").tag(), Tag::Bold);
        assert_eq!(Element::page_break().tag(), Tag::PageBreak);
        assert_eq!(Element::page_number().tag(), Tag::PageNumber);
        assert_eq!(Element::new("span").tag(), Tag::Span);
        assert_eq!(Element::new("section").tag(), Tag::Other);
    }

    #[test]
    fn test_empty_paragraph_detection() {
        let empty = Node::from(Element::new("p").with_children(vec![Element::new("br").into()]));
        assert!(empty.is_empty_paragraph());

        let full = Node::from(Element::new("p").with_text("x"));
        assert!(!full.is_empty_paragraph());
        assert!(!Node::from(Element::page_break()).is_empty_paragraph());
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut e = Element::new("p").with_attr("style", "a");
        e.set_attr("STYLE", "b");
        assert_eq!(e.attrs, vec![("style".to_string(), "b".to_string())]);
    }
}
