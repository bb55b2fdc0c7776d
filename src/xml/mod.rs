//! XML utilities: namespaces, on/off values and a small element tree

mod namespace;
mod node;

pub use namespace::*;
pub use node::{XmlElement, XmlNode};

/// Interpret an OOXML on/off value ("1", "true", "on", or missing val)
pub fn parse_bool(val: Option<&str>) -> bool {
    match val {
        None => true,
        Some(v) => matches!(v, "1" | "true" | "on"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tree_queries() {
        let xml = r#"<w:p xmlns:w="ns"><w:pPr><w:jc w:val="both"/></w:pPr><w:r><w:t xml:space="preserve">Hello </w:t></w:r></w:p>"#;
        let root = XmlElement::parse_document(xml).unwrap();

        assert_eq!(root.local_name(), "p");
        let jc = root.child("pPr").and_then(|p| p.child("jc")).unwrap();
        assert_eq!(jc.w_val(), Some("both"));
        assert_eq!(root.text(), "Hello ");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(None));
        assert!(parse_bool(Some("true")));
        assert!(!parse_bool(Some("0")));
        assert!(!parse_bool(Some("false")));
    }

    #[test]
    fn test_namespace_constants() {
        assert!(W.contains("wordprocessingml"));
        assert!(R.contains("relationships"));
    }
}
