//! Lenient markup parser built on quick-xml
//!
//! Accepts the HTML-ish subset produced by editors: void elements without a
//! closing slash, mismatched end tags, unquoted or valueless attributes and
//! the common named character references.

use super::{Element, Node};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a markup string into its top-level nodes
pub fn parse(markup: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::InvalidMarkup(format!("{} at {}", e, reader.error_position())))?;

        match event {
            Event::Start(e) => {
                let element = element_from_start(&e);
                if element.is_void() {
                    append(&mut stack, &mut root, element.into());
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                append(&mut stack, &mut root, element_from_start(&e).into());
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Stray end tags are ignored; a matching open element closes
                // everything opened after it.
                if let Some(pos) = stack.iter().rposition(|el| el.name == name) {
                    while stack.len() > pos {
                        close_top(&mut stack, &mut root);
                    }
                }
            }
            Event::Text(t) => {
                let text = match t.unescape_with(resolve_entity) {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                append_text(&mut stack, &mut root, text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append_text(&mut stack, &mut root, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }

    Ok(root)
}

fn element_from_start(e: &BytesStart) -> Element {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let mut element = Element::new(name);
    for attr in e.html_attributes().filter_map(|a| a.ok()) {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = match attr.unescape_value_with(resolve_entity) {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        element.set_attr(key, value);
    }
    element
}

fn close_top(stack: &mut Vec<Element>, root: &mut Vec<Node>) {
    if let Some(element) = stack.pop() {
        append(stack, root, element.into());
    }
}

fn append(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

fn append_text(stack: &mut [Element], root: &mut Vec<Node>, text: String) {
    if text.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => root,
    };
    match siblings.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(&text),
        _ => siblings.push(Node::Text(text)),
    }
}

/// Named references beyond the five XML ones
fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        "ensp" => Some("\u{2002}"),
        "emsp" => Some("\u{2003}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Tag;

    fn first(markup: &str) -> Element {
        match parse(markup).unwrap().into_iter().next() {
            Some(Node::Element(e)) => e,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_runs() {
        let p = first("<p>Hello <b>World</b></p>");
        assert_eq!(p.tag(), Tag::Paragraph);
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[0], Node::text("Hello "));
        assert_eq!(p.text_content(), "Hello World");
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let p = first(r#"<p>a<br>b<img src="x.png">c</p>"#);
        assert_eq!(p.children.len(), 5);
        assert_eq!(p.text_content(), "abc");
    }

    #[test]
    fn test_unclosed_and_mismatched_tags() {
        let nodes = parse("<p><b>bold</p><p>next").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text_content(), "bold");
        assert_eq!(nodes[1].text_content(), "next");

        let stray = parse("text</span>more").unwrap();
        assert_eq!(stray, vec![Node::text("textmore")]);
    }

    #[test]
    fn test_entities_and_html_attributes() {
        let p = first("<p data-x=1 hidden>a&nbsp;&amp;&lt;b</p>");
        assert_eq!(p.attr("data-x"), Some("1"));
        assert_eq!(p.attr("hidden"), Some(""));
        assert_eq!(p.text_content(), "a\u{a0}&<b");
    }

    #[test]
    fn test_uppercase_names_are_lowered() {
        let p = first(r#"<P STYLE="text-align: center">x</P>"#);
        assert_eq!(p.name, "p");
        assert_eq!(p.attr("style"), Some("text-align: center"));
    }
}
