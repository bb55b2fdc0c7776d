//! Canonical markup serialization

use super::{Element, Node};
use quick_xml::escape::{escape, partial_escape};

/// Serialize nodes to their canonical markup string
pub fn to_string(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

impl Node {
    /// Canonical markup of this node
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::Element(e) => write_element(e, out),
    }
}

fn write_element(e: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&e.name);
    for (key, value) in &e.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    out.push('>');

    if e.is_void() {
        return;
    }

    for child in &e.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&e.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_output_is_stable() {
        let inputs = [
            "<p>Hello <b>World</b></p>",
            r#"<p style="text-align: justify">x &amp; y &lt; z</p><div class="page-break"></div>"#,
            r#"<ul><li>one</li><li><span style="color: #ff0000">two</span></li></ul>"#,
            r#"<p>line<br>break <img src="data:image/png;base64,AAAA" width="10"></p>"#,
            r#"<p title="say &quot;hi&quot;">q</p>"#,
        ];

        for input in inputs {
            let once = to_string(&parse(input).unwrap());
            let twice = to_string(&parse(&once).unwrap());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_self_closing_input_is_normalised() {
        let out = to_string(&parse("<p>a<br/>b</p>").unwrap());
        assert_eq!(out, "<p>a<br>b</p>");
    }

    #[test]
    fn test_void_children_are_dropped() {
        let mut br = Element::new("br");
        br.children.push(Node::text("ignored"));
        assert_eq!(Node::from(br).to_markup(), "<br>");
    }
}
