//! Block-level view over top-level markup nodes

use crate::markup::{Node, Tag};

/// Kind of a top-level content block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    /// A list container (`ul`/`ol`) or a stray list item
    ListItem,
    Table,
    Image,
    PageBreak,
    PageNumberField,
    /// Unrecognised element or loose text
    Other,
}

impl BlockKind {
    /// Classify a top-level node
    pub fn of(node: &Node) -> BlockKind {
        let Node::Element(e) = node else {
            return BlockKind::Other;
        };
        match e.tag() {
            Tag::Paragraph => BlockKind::Paragraph,
            Tag::Heading(level) => BlockKind::Heading(level),
            Tag::ListItem | Tag::UnorderedList | Tag::OrderedList => BlockKind::ListItem,
            Tag::Table => BlockKind::Table,
            Tag::Image => BlockKind::Image,
            Tag::PageBreak => BlockKind::PageBreak,
            Tag::PageNumber => BlockKind::PageNumberField,
            _ => BlockKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    #[test]
    fn test_classify_blocks() {
        let nodes = parse(
            r#"<h2>t</h2><p>x</p><ul><li>a</li></ul><table></table><img src="a"><div class="page-break"></div>loose"#,
        )
        .unwrap();
        let kinds: Vec<_> = nodes.iter().map(BlockKind::of).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading(2),
                BlockKind::Paragraph,
                BlockKind::ListItem,
                BlockKind::Table,
                BlockKind::Image,
                BlockKind::PageBreak,
                BlockKind::Other,
            ]
        );
    }
}
