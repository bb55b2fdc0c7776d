//! Static and settings-driven package parts: styles, numbering, section properties

use super::wml::{empty, end, start};
use super::ExportOptions;
use crate::error::Result;
use crate::model::units::mm_to_twips;
use crate::model::PageSettings;
use quick_xml::Writer;
use std::io::Write;

/// Abstract definitions written to every `numbering.xml`
const BULLET_ABSTRACT_ID: &str = "0";
const DECIMAL_ABSTRACT_ID: &str = "1";

/// `w:num` instances handed out during one export.
///
/// Every top-level list gets its own instances so that adjacent lists stay
/// separate lists when the package is read back.
#[derive(Debug, Default)]
pub struct ListInstances {
    ordered: Vec<bool>,
}

impl ListInstances {
    /// Allocate a new instance and return its `w:numId`
    pub fn add(&mut self, ordered: bool) -> String {
        self.ordered.push(ordered);
        self.ordered.len().to_string()
    }
}

/// Font sizes (half-points) of Heading1..Heading6
const HEADING_SIZES: [&str; 6] = ["32", "28", "26", "24", "22", "22"];
const BULLETS: [&str; 3] = ["\u{2022}", "\u{25e6}", "\u{25aa}"];

/// `styles.xml`: defaults (including the first-line indent) and the
/// paragraph styles the exporter references
pub fn styles_xml(settings: &PageSettings) -> Result<Vec<u8>> {
    super::wml::part("w:styles", true, |w| {
        start(w, "w:docDefaults", &[])?;
        start(w, "w:rPrDefault", &[])?;
        start(w, "w:rPr", &[])?;
        empty(
            w,
            "w:rFonts",
            &[("w:ascii", "Calibri"), ("w:hAnsi", "Calibri"), ("w:eastAsia", "Calibri"), ("w:cs", "Calibri")],
        )?;
        empty(w, "w:sz", &[("w:val", "22")])?;
        empty(w, "w:szCs", &[("w:val", "22")])?;
        end(w, "w:rPr")?;
        end(w, "w:rPrDefault")?;
        start(w, "w:pPrDefault", &[])?;
        start(w, "w:pPr", &[])?;
        empty(w, "w:spacing", &[("w:after", "120"), ("w:line", "240"), ("w:lineRule", "auto")])?;
        if settings.first_line_indent > 0.0 {
            let indent = mm_to_twips(settings.first_line_indent).to_string();
            empty(w, "w:ind", &[("w:firstLine", indent.as_str())])?;
        }
        end(w, "w:pPr")?;
        end(w, "w:pPrDefault")?;
        end(w, "w:docDefaults")?;

        start(
            w,
            "w:style",
            &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
        )?;
        empty(w, "w:name", &[("w:val", "Normal")])?;
        empty(w, "w:qFormat", &[])?;
        end(w, "w:style")?;

        for (i, size) in HEADING_SIZES.iter().enumerate() {
            let level = i + 1;
            let id = format!("Heading{}", level);
            let name = format!("heading {}", level);
            let outline = i.to_string();
            start(w, "w:style", &[("w:type", "paragraph"), ("w:styleId", id.as_str())])?;
            empty(w, "w:name", &[("w:val", name.as_str())])?;
            empty(w, "w:basedOn", &[("w:val", "Normal")])?;
            empty(w, "w:next", &[("w:val", "Normal")])?;
            empty(w, "w:qFormat", &[])?;
            start(w, "w:pPr", &[])?;
            empty(w, "w:keepNext", &[])?;
            empty(w, "w:spacing", &[("w:before", "240"), ("w:after", "120")])?;
            empty(w, "w:ind", &[("w:firstLine", "0")])?;
            empty(w, "w:outlineLvl", &[("w:val", outline.as_str())])?;
            end(w, "w:pPr")?;
            start(w, "w:rPr", &[])?;
            empty(w, "w:b", &[])?;
            empty(w, "w:sz", &[("w:val", *size)])?;
            empty(w, "w:szCs", &[("w:val", *size)])?;
            end(w, "w:rPr")?;
            end(w, "w:style")?;
        }

        start(w, "w:style", &[("w:type", "paragraph"), ("w:styleId", "ListParagraph")])?;
        empty(w, "w:name", &[("w:val", "List Paragraph")])?;
        empty(w, "w:basedOn", &[("w:val", "Normal")])?;
        start(w, "w:pPr", &[])?;
        empty(w, "w:ind", &[("w:firstLine", "0")])?;
        end(w, "w:pPr")?;
        end(w, "w:style")?;

        start(w, "w:style", &[("w:type", "character"), ("w:styleId", "Hyperlink")])?;
        empty(w, "w:name", &[("w:val", "Hyperlink")])?;
        start(w, "w:rPr", &[])?;
        empty(w, "w:color", &[("w:val", "0563C1")])?;
        empty(w, "w:u", &[("w:val", "single")])?;
        end(w, "w:rPr")?;
        end(w, "w:style")?;

        start(w, "w:style", &[("w:type", "table"), ("w:styleId", "TableGrid")])?;
        empty(w, "w:name", &[("w:val", "Table Grid")])?;
        end(w, "w:style")
    })
}

/// `numbering.xml`: one bulleted and one decimal list definition plus the
/// instances used by the exported lists
pub fn numbering_xml(instances: &ListInstances) -> Result<Vec<u8>> {
    super::wml::part("w:numbering", true, |w| {
        for (abstract_id, bullet) in [(BULLET_ABSTRACT_ID, true), (DECIMAL_ABSTRACT_ID, false)] {
            start(w, "w:abstractNum", &[("w:abstractNumId", abstract_id)])?;
            empty(w, "w:multiLevelType", &[("w:val", "hybridMultilevel")])?;
            for level in 0..9usize {
                let ilvl = level.to_string();
                let (format, text) = if bullet {
                    ("bullet", BULLETS[level % BULLETS.len()].to_string())
                } else {
                    ("decimal", format!("%{}.", level + 1))
                };
                let left = (720 * (level + 1)).to_string();

                start(w, "w:lvl", &[("w:ilvl", ilvl.as_str())])?;
                empty(w, "w:start", &[("w:val", "1")])?;
                empty(w, "w:numFmt", &[("w:val", format)])?;
                empty(w, "w:lvlText", &[("w:val", text.as_str())])?;
                empty(w, "w:lvlJc", &[("w:val", "left")])?;
                start(w, "w:pPr", &[])?;
                empty(w, "w:ind", &[("w:left", left.as_str()), ("w:hanging", "360")])?;
                end(w, "w:pPr")?;
                end(w, "w:lvl")?;
            }
            end(w, "w:abstractNum")?;
        }

        for (index, ordered) in instances.ordered.iter().enumerate() {
            let num_id = (index + 1).to_string();
            let abstract_id = if *ordered { DECIMAL_ABSTRACT_ID } else { BULLET_ABSTRACT_ID };
            start(w, "w:num", &[("w:numId", num_id.as_str())])?;
            empty(w, "w:abstractNumId", &[("w:val", abstract_id)])?;
            end(w, "w:num")?;
        }
        Ok(())
    })
}

/// Relationship ids of the header and footer parts, when enabled
#[derive(Clone, Copy, Debug, Default)]
pub struct SectionRefs<'a> {
    pub header: Option<&'a str>,
    pub footer: Option<&'a str>,
}

/// `w:sectPr`: header/footer references, page size and margins
pub fn write_section_properties<W: Write>(
    w: &mut Writer<W>,
    settings: &PageSettings,
    options: &ExportOptions,
    refs: SectionRefs<'_>,
) -> Result<()> {
    start(w, "w:sectPr", &[])?;
    if let Some(id) = refs.header {
        empty(w, "w:headerReference", &[("w:type", "default"), ("r:id", id)])?;
    }
    if let Some(id) = refs.footer {
        empty(w, "w:footerReference", &[("w:type", "default"), ("r:id", id)])?;
    }

    let width = mm_to_twips(options.page_width_mm).to_string();
    let height = mm_to_twips(options.page_height_mm).to_string();
    empty(w, "w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;

    let margins = &settings.margins;
    let top = mm_to_twips(margins.top).to_string();
    let right = mm_to_twips(margins.right).to_string();
    let bottom = mm_to_twips(margins.bottom).to_string();
    let left = mm_to_twips(margins.left).to_string();
    empty(
        w,
        "w:pgMar",
        &[
            ("w:top", top.as_str()),
            ("w:right", right.as_str()),
            ("w:bottom", bottom.as_str()),
            ("w:left", left.as_str()),
            ("w:header", "709"),
            ("w:footer", "709"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Margins;

    #[test]
    fn test_styles_carry_first_line_indent() {
        let settings = PageSettings {
            first_line_indent: 10.0,
            ..Default::default()
        };
        let xml = String::from_utf8(styles_xml(&settings).unwrap()).unwrap();
        assert!(xml.contains(r#"<w:ind w:firstLine="567"/>"#));
        assert!(xml.contains(r#"w:styleId="Heading6""#));

        let plain = String::from_utf8(styles_xml(&PageSettings::default()).unwrap()).unwrap();
        assert!(!plain.contains(r#"<w:ind w:firstLine="567"/>"#));
    }

    #[test]
    fn test_numbering_defines_both_lists() {
        let mut instances = ListInstances::default();
        assert_eq!(instances.add(false), "1");
        assert_eq!(instances.add(true), "2");
        assert_eq!(instances.add(false), "3");

        let xml = String::from_utf8(numbering_xml(&instances).unwrap()).unwrap();
        assert!(xml.contains(r#"<w:numFmt w:val="bullet"/>"#));
        assert!(xml.contains(r#"<w:lvlText w:val="%3."/>"#));
        assert!(xml.contains(r#"<w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>"#));
        assert!(xml.contains(r#"<w:num w:numId="3"><w:abstractNumId w:val="0"/></w:num>"#));
    }

    #[test]
    fn test_section_properties_convert_margins() {
        let settings = PageSettings {
            margins: Margins {
                top: 25.4,
                bottom: 20.0,
                left: 30.0,
                right: 15.0,
            },
            ..Default::default()
        };
        let mut buf = Vec::new();
        let mut w = Writer::new(&mut buf);
        write_section_properties(
            &mut w,
            &settings,
            &ExportOptions::default(),
            SectionRefs {
                header: Some("rId3"),
                footer: None,
            },
        )
        .unwrap();
        let xml = String::from_utf8(buf).unwrap();

        assert!(xml.contains(r#"<w:headerReference w:type="default" r:id="rId3"/>"#));
        assert!(!xml.contains("footerReference"));
        assert!(xml.contains(r#"w:top="1440""#));
        assert!(xml.contains(r#"w:bottom="1134""#));
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }
}
