//! Markup to WordprocessingML

use super::media::{sniff_size, DataUri, MediaStore};
use super::parts::{self, ListInstances, SectionRefs};
use super::wml::{empty, end, start, text_element};
use super::ExportOptions;
use crate::error::Result;
use crate::markup::{self, Element, Node, Tag};
use crate::model::units::{mm_to_twips, pt_to_half_points, px_to_emu, LINE_UNITS};
use crate::model::{highlight_name, BlockStyle, HeaderFooter, PageSettings, RunStyle};
use crate::opc::{
    rel_types, well_known, Package, Part, Relationship, Relationships, TargetMode, FOOTER, HEADER,
    MAIN_DOCUMENT, NUMBERING, STYLES,
};
use crate::xml::{XmlElement, A, PIC};
use quick_xml::Writer;
use std::io::Write;

/// Fixed relationship ids of the main document part
pub const STYLES_REL_ID: &str = "rId1";
pub const NUMBERING_REL_ID: &str = "rId2";
pub const HEADER_REL_ID: &str = "rId3";
pub const FOOTER_REL_ID: &str = "rId4";
/// First id handed out to images and hyperlinks
pub const FIRST_DYNAMIC_REL: u32 = 5;

/// Twips per CSS pixel
const TWIPS_PER_PX: f64 = 15.0;

/// Elements that are laid out as blocks but carry no meaning of their own
const TRANSPARENT_BLOCKS: &[&str] = &[
    "section", "article", "blockquote", "pre", "header", "footer", "main", "nav", "aside",
    "figure", "thead", "tbody", "tfoot", "hr", "body", "html",
];

/// Serialize markup and settings into DOCX package bytes
pub fn export(markup: &str, settings: &PageSettings, options: &ExportOptions) -> Result<Vec<u8>> {
    let nodes = markup::parse(markup)?;
    let text_width = mm_to_twips(
        options.page_width_mm - settings.margins.left - settings.margins.right,
    )
    .max(1440);

    let mut media = MediaStore::default();
    let mut lists = ListInstances::default();

    let mut fixed = Relationships::new();
    fixed.insert(Relationship::new(STYLES_REL_ID, rel_types::STYLES, "styles.xml"));
    fixed.insert(Relationship::new(NUMBERING_REL_ID, rel_types::NUMBERING, "numbering.xml"));
    let refs = SectionRefs {
        header: settings.header.enabled.then_some(HEADER_REL_ID),
        footer: settings.footer.enabled.then_some(FOOTER_REL_ID),
    };
    if refs.header.is_some() {
        fixed.insert(Relationship::new(HEADER_REL_ID, rel_types::HEADER, "header1.xml"));
    }
    if refs.footer.is_some() {
        fixed.insert(Relationship::new(FOOTER_REL_ID, rel_types::FOOTER, "footer1.xml"));
    }

    let mut body = PartWriter::new(&mut media, &mut lists, text_width, options, fixed);
    let document_xml = super::wml::part("w:document", false, |w| {
        start(w, "w:body", &[])?;
        if body.write_blocks(w, &nodes)? == 0 {
            empty(w, "w:p", &[])?;
        }
        parts::write_section_properties(w, settings, options, refs)?;
        end(w, "w:body")
    })?;
    let document_rels = body.into_relationships();

    let mut sink = (&mut media, &mut lists);
    let header = write_header_footer(&settings.header, "w:hdr", &mut sink, text_width, options)?;
    let footer = write_header_footer(&settings.footer, "w:ftr", &mut sink, text_width, options)?;

    let mut package = Package::new();
    package
        .relationships_mut()
        .add(rel_types::OFFICE_DOCUMENT, "word/document.xml");

    package.add_part(
        Part::new(well_known::document(), MAIN_DOCUMENT, document_xml)
            .with_relationships(document_rels),
    );
    package.add_part(Part::new(well_known::styles(), STYLES, parts::styles_xml(settings)?));
    package.add_part(Part::new(well_known::numbering(), NUMBERING, parts::numbering_xml(&lists)?));
    if let Some((xml, rels)) = header {
        package.add_part(Part::new(well_known::header(), HEADER, xml).with_relationships(rels));
    }
    if let Some((xml, rels)) = footer {
        package.add_part(Part::new(well_known::footer(), FOOTER, xml).with_relationships(rels));
    }

    let files = media.into_files();
    log::debug!("exporting package with {} media files", files.len());
    for file in files {
        package.add_part(Part::new(file.uri, file.mime, file.data));
    }

    package.to_bytes()
}

fn write_header_footer(
    config: &HeaderFooter,
    root: &str,
    (media, lists): &mut (&mut MediaStore, &mut ListInstances),
    text_width: i64,
    options: &ExportOptions,
) -> Result<Option<(Vec<u8>, Relationships)>> {
    if !config.enabled {
        return Ok(None);
    }
    let nodes = markup::parse(&config.content)?;
    let mut writer = PartWriter::new(media, lists, text_width, options, Relationships::new());
    let xml = super::wml::part(root, false, |w| {
        if writer.write_blocks(w, &nodes)? == 0 {
            empty(w, "w:p", &[])?;
        }
        Ok(())
    })?;
    Ok(Some((xml, writer.into_relationships())))
}

/// Paragraph-level properties
#[derive(Debug, Default)]
struct ParagraphFormat {
    style: Option<String>,
    /// (numId, level)
    numbering: Option<(String, usize)>,
    block: BlockStyle,
}

/// Writes the blocks of one part and collects that part's relationships
struct PartWriter<'a> {
    media: &'a mut MediaStore,
    lists: &'a mut ListInstances,
    /// Bullet and decimal instances of the top-level list being written
    list_ids: [Option<String>; 2],
    options: &'a ExportOptions,
    rels: Relationships,
    next_rel: u32,
    text_width: i64,
    in_link: bool,
    last_was_table: bool,
}

impl<'a> PartWriter<'a> {
    fn new(
        media: &'a mut MediaStore,
        lists: &'a mut ListInstances,
        text_width: i64,
        options: &'a ExportOptions,
        rels: Relationships,
    ) -> Self {
        Self {
            media,
            lists,
            list_ids: [None, None],
            options,
            rels,
            next_rel: FIRST_DYNAMIC_REL,
            text_width,
            in_link: false,
            last_was_table: false,
        }
    }

    fn into_relationships(self) -> Relationships {
        self.rels
    }

    fn add_relationship(&mut self, rel_type: &str, target: &str, mode: TargetMode) -> String {
        let id = format!("rId{}", self.next_rel);
        self.next_rel += 1;
        self.rels
            .insert(Relationship::new(id.as_str(), rel_type, target).with_mode(mode));
        id
    }

    /// Write a block sequence; loose inline content is wrapped in implicit
    /// paragraphs. Returns the number of paragraphs and tables written.
    fn write_blocks<W: Write>(&mut self, w: &mut Writer<W>, nodes: &[Node]) -> Result<usize> {
        let mut written = 0;
        let mut pending: Vec<Node> = Vec::new();

        for node in nodes {
            if is_block(node) {
                written += self.flush_inline(w, &mut pending)?;
                if let Node::Element(e) = node {
                    written += self.write_block(w, e)?;
                }
            } else if !(pending.is_empty() && node.is_blank_text()) {
                pending.push(node.clone());
            }
        }
        written += self.flush_inline(w, &mut pending)?;

        Ok(written)
    }

    fn flush_inline<W: Write>(&mut self, w: &mut Writer<W>, pending: &mut Vec<Node>) -> Result<usize> {
        if pending.iter().all(Node::is_blank_text) {
            pending.clear();
            return Ok(0);
        }
        let inline = std::mem::take(pending);
        self.write_paragraph(w, &ParagraphFormat::default(), &inline)?;
        Ok(1)
    }

    fn write_block<W: Write>(&mut self, w: &mut Writer<W>, e: &Element) -> Result<usize> {
        self.last_was_table = false;
        match e.tag() {
            Tag::Paragraph => {
                let format = ParagraphFormat {
                    block: BlockStyle::of(e),
                    ..Default::default()
                };
                self.write_paragraph(w, &format, &e.children)?;
                Ok(1)
            }
            Tag::Heading(level) => {
                let format = ParagraphFormat {
                    style: Some(format!("Heading{}", level)),
                    block: BlockStyle::of(e),
                    ..Default::default()
                };
                self.write_paragraph(w, &format, &e.children)?;
                Ok(1)
            }
            Tag::UnorderedList | Tag::OrderedList | Tag::ListItem => {
                // Each top-level list restarts its numbering
                self.list_ids = [None, None];
                match e.tag() {
                    Tag::ListItem => self.write_list_item(w, e, false, 0),
                    tag => self.write_list(w, e, tag == Tag::OrderedList, 0),
                }
            }
            Tag::Table => {
                let written = self.write_table(w, e)?;
                self.last_was_table = written > 0;
                Ok(written)
            }
            Tag::PageBreak => {
                start(w, "w:p", &[])?;
                start(w, "w:r", &[])?;
                empty(w, "w:br", &[("w:type", "page")])?;
                end(w, "w:r")?;
                end(w, "w:p")?;
                Ok(1)
            }
            _ => self.write_blocks(w, &e.children),
        }
    }

    fn write_list<W: Write>(
        &mut self,
        w: &mut Writer<W>,
        list: &Element,
        ordered: bool,
        depth: usize,
    ) -> Result<usize> {
        let mut written = 0;
        for child in &list.children {
            match child {
                Node::Element(e) => match e.tag() {
                    Tag::UnorderedList => written += self.write_list(w, e, false, depth + 1)?,
                    Tag::OrderedList => written += self.write_list(w, e, true, depth + 1)?,
                    _ => written += self.write_list_item(w, e, ordered, depth)?,
                },
                Node::Text(t) if !t.trim().is_empty() => {
                    let item = Element::new("li").with_text(t.clone());
                    written += self.write_list_item(w, &item, ordered, depth)?;
                }
                Node::Text(_) => {}
            }
        }
        Ok(written)
    }

    fn write_list_item<W: Write>(
        &mut self,
        w: &mut Writer<W>,
        item: &Element,
        ordered: bool,
        depth: usize,
    ) -> Result<usize> {
        let is_nested_list = |n: &Node| {
            n.as_element()
                .map(|e| matches!(e.tag(), Tag::UnorderedList | Tag::OrderedList))
                .unwrap_or(false)
        };
        let inline: Vec<Node> = item
            .children
            .iter()
            .filter(|n| !is_nested_list(n))
            .cloned()
            .collect();

        let lists = &mut *self.lists;
        let num_id = self.list_ids[usize::from(ordered)]
            .get_or_insert_with(|| lists.add(ordered))
            .clone();
        let format = ParagraphFormat {
            style: Some("ListParagraph".into()),
            numbering: Some((num_id, depth.min(8))),
            block: BlockStyle::of(item),
        };
        self.write_paragraph(w, &format, &inline)?;

        let mut written = 1;
        for nested in item.children.iter().filter(|n| is_nested_list(n)) {
            if let Node::Element(e) = nested {
                let ordered = e.tag() == Tag::OrderedList;
                written += self.write_list(w, e, ordered, depth + 1)?;
            }
        }
        Ok(written)
    }

    fn write_paragraph<W: Write>(
        &mut self,
        w: &mut Writer<W>,
        format: &ParagraphFormat,
        inline: &[Node],
    ) -> Result<()> {
        start(w, "w:p", &[])?;

        let line_height = format.block.line_height.or_else(|| find_line_height(inline));
        let has_props = format.style.is_some()
            || format.numbering.is_some()
            || line_height.is_some()
            || format.block.alignment.is_some();

        if has_props {
            start(w, "w:pPr", &[])?;
            if let Some(style) = &format.style {
                empty(w, "w:pStyle", &[("w:val", style.as_str())])?;
            }
            if let Some((num_id, level)) = &format.numbering {
                let level = level.to_string();
                start(w, "w:numPr", &[])?;
                empty(w, "w:ilvl", &[("w:val", level.as_str())])?;
                empty(w, "w:numId", &[("w:val", num_id.as_str())])?;
                end(w, "w:numPr")?;
            }
            if let Some(multiplier) = line_height {
                let line = ((multiplier as f64) * LINE_UNITS).round().max(1.0).to_string();
                empty(w, "w:spacing", &[("w:line", line.as_str()), ("w:lineRule", "auto")])?;
            }
            if let Some(alignment) = format.block.alignment {
                empty(w, "w:jc", &[("w:val", alignment.as_docx())])?;
            }
            end(w, "w:pPr")?;
        }

        self.write_inline(w, inline, &RunStyle::default())?;
        end(w, "w:p")
    }

    fn write_inline<W: Write>(&mut self, w: &mut Writer<W>, nodes: &[Node], style: &RunStyle) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => self.write_text_run(w, text, style)?,
                Node::Element(e) => match e.tag() {
                    Tag::LineBreak => {
                        start(w, "w:r", &[])?;
                        self.write_run_properties(w, style)?;
                        empty(w, "w:br", &[])?;
                        end(w, "w:r")?;
                    }
                    Tag::PageBreak => {
                        start(w, "w:r", &[])?;
                        empty(w, "w:br", &[("w:type", "page")])?;
                        end(w, "w:r")?;
                    }
                    Tag::Image => self.write_image(w, e)?,
                    Tag::PageNumber => self.write_page_number(w, style)?,
                    Tag::Link => self.write_link(w, e, style)?,
                    _ => self.write_inline(w, &e.children, &style.enter(e))?,
                },
            }
        }
        Ok(())
    }

    fn write_text_run<W: Write>(&mut self, w: &mut Writer<W>, text: &str, style: &RunStyle) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        start(w, "w:r", &[])?;
        self.write_run_properties(w, style)?;
        for (i, segment) in text.split('\t').enumerate() {
            if i > 0 {
                empty(w, "w:tab", &[])?;
            }
            if segment.is_empty() {
                continue;
            }
            let preserve = segment.starts_with(char::is_whitespace)
                || segment.ends_with(char::is_whitespace)
                || segment.contains("  ");
            let attrs: &[(&str, &str)] = if preserve {
                &[("xml:space", "preserve")]
            } else {
                &[]
            };
            text_element(w, "w:t", attrs, segment)?;
        }
        end(w, "w:r")
    }

    fn write_run_properties<W: Write>(&self, w: &mut Writer<W>, style: &RunStyle) -> Result<()> {
        let has_content = self.in_link
            || style.bold
            || style.italic
            || style.underline
            || style.color.is_some()
            || style.highlight.is_some()
            || style.font_family.is_some()
            || style.font_size_pt.is_some();
        if !has_content {
            return Ok(());
        }

        start(w, "w:rPr", &[])?;
        if self.in_link {
            empty(w, "w:rStyle", &[("w:val", "Hyperlink")])?;
        }
        if let Some(family) = &style.font_family {
            let family = family.as_str();
            empty(
                w,
                "w:rFonts",
                &[("w:ascii", family), ("w:hAnsi", family), ("w:eastAsia", family), ("w:cs", family)],
            )?;
        }
        if style.bold {
            empty(w, "w:b", &[])?;
        }
        if style.italic {
            empty(w, "w:i", &[])?;
        }
        if let Some(color) = &style.color {
            let hex = docx_hex(color);
            empty(w, "w:color", &[("w:val", hex.as_str())])?;
        }
        if let Some(size) = style.font_size_pt {
            let half_points = pt_to_half_points(size).to_string();
            empty(w, "w:sz", &[("w:val", half_points.as_str())])?;
            empty(w, "w:szCs", &[("w:val", half_points.as_str())])?;
        }
        let mut shading = None;
        match style.highlight.as_deref() {
            Some("none") => empty(w, "w:highlight", &[("w:val", "none")])?,
            Some(hex) => match highlight_name(hex) {
                Some(name) => empty(w, "w:highlight", &[("w:val", name)])?,
                None => shading = Some(docx_hex(hex)),
            },
            None => {}
        }
        if style.underline {
            empty(w, "w:u", &[("w:val", "single")])?;
        }
        if let Some(fill) = shading {
            empty(
                w,
                "w:shd",
                &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill.as_str())],
            )?;
        }
        end(w, "w:rPr")
    }

    /// Field code sequence that makes the consumer render the live page number
    fn write_page_number<W: Write>(&mut self, w: &mut Writer<W>, style: &RunStyle) -> Result<()> {
        let field_char = |w: &mut Writer<W>, this: &Self, kind: &str| -> Result<()> {
            start(w, "w:r", &[])?;
            this.write_run_properties(w, style)?;
            empty(w, "w:fldChar", &[("w:fldCharType", kind)])?;
            end(w, "w:r")
        };

        field_char(w, self, "begin")?;
        start(w, "w:r", &[])?;
        self.write_run_properties(w, style)?;
        text_element(w, "w:instrText", &[("xml:space", "preserve")], " PAGE ")?;
        end(w, "w:r")?;
        field_char(w, self, "separate")?;
        start(w, "w:r", &[])?;
        self.write_run_properties(w, style)?;
        text_element(w, "w:t", &[], "1")?;
        end(w, "w:r")?;
        field_char(w, self, "end")
    }

    fn write_link<W: Write>(&mut self, w: &mut Writer<W>, e: &Element, style: &RunStyle) -> Result<()> {
        let href = e.attr("href").map(str::trim).unwrap_or("");
        if href.is_empty() || self.in_link {
            return self.write_inline(w, &e.children, &style.enter(e));
        }

        if let Some(anchor) = href.strip_prefix('#') {
            start(w, "w:hyperlink", &[("w:anchor", anchor)])?;
        } else {
            let id = self.add_relationship(rel_types::HYPERLINK, href, TargetMode::External);
            start(w, "w:hyperlink", &[("r:id", id.as_str())])?;
        }
        self.in_link = true;
        let result = self.write_inline(w, &e.children, &style.enter(e));
        self.in_link = false;
        result?;
        end(w, "w:hyperlink")
    }

    fn write_image<W: Write>(&mut self, w: &mut Writer<W>, e: &Element) -> Result<()> {
        let src = e.attr("src").unwrap_or("");
        let image = match DataUri::parse(src) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("omitting image: {}", err);
                return Ok(());
            }
        };

        let (width, height) = self.image_extent(e, &image.data);
        let target = self.media.add(image);
        let rel_id = self.add_relationship(rel_types::IMAGE, &target, TargetMode::Internal);
        let drawing_id = self.media.len().to_string();
        let file_name = target.trim_start_matches("media/").to_string();
        let cx = px_to_emu(width).to_string();
        let cy = px_to_emu(height).to_string();

        let mut doc_pr = XmlElement::new("wp:docPr")
            .with_attr("id", drawing_id.as_str())
            .with_attr("name", format!("Picture {}", drawing_id));
        if let Some(alt) = e.attr("alt").filter(|a| !a.is_empty()) {
            doc_pr = doc_pr.with_attr("descr", alt);
        }

        let picture = XmlElement::new("pic:pic")
            .with_attr("xmlns:pic", PIC)
            .with_child(
                XmlElement::new("pic:nvPicPr")
                    .with_child(
                        XmlElement::new("pic:cNvPr")
                            .with_attr("id", "0")
                            .with_attr("name", file_name),
                    )
                    .with_child(XmlElement::new("pic:cNvPicPr")),
            )
            .with_child(
                XmlElement::new("pic:blipFill")
                    .with_child(XmlElement::new("a:blip").with_attr("r:embed", rel_id))
                    .with_child(
                        XmlElement::new("a:stretch").with_child(XmlElement::new("a:fillRect")),
                    ),
            )
            .with_child(
                XmlElement::new("pic:spPr")
                    .with_child(
                        XmlElement::new("a:xfrm")
                            .with_child(XmlElement::new("a:off").with_attr("x", "0").with_attr("y", "0"))
                            .with_child(
                                XmlElement::new("a:ext")
                                    .with_attr("cx", cx.as_str())
                                    .with_attr("cy", cy.as_str()),
                            ),
                    )
                    .with_child(
                        XmlElement::new("a:prstGeom")
                            .with_attr("prst", "rect")
                            .with_child(XmlElement::new("a:avLst")),
                    ),
            );

        let drawing = XmlElement::new("w:drawing").with_child(
            XmlElement::new("wp:inline")
                .with_attr("distT", "0")
                .with_attr("distB", "0")
                .with_attr("distL", "0")
                .with_attr("distR", "0")
                .with_child(
                    XmlElement::new("wp:extent")
                        .with_attr("cx", cx.as_str())
                        .with_attr("cy", cy.as_str()),
                )
                .with_child(doc_pr)
                .with_child(
                    XmlElement::new("a:graphic").with_attr("xmlns:a", A).with_child(
                        XmlElement::new("a:graphicData")
                            .with_attr("uri", "http://schemas.openxmlformats.org/drawingml/2006/picture")
                            .with_child(picture),
                    ),
                ),
        );

        start(w, "w:r", &[])?;
        drawing.write_to(w)?;
        end(w, "w:r")
    }

    /// Display size in pixels: explicit attributes first, then the image's
    /// own header, scaled down to fit the text column
    fn image_extent(&self, e: &Element, data: &[u8]) -> (u32, u32) {
        let px = |name: &str| {
            e.attr(name)
                .and_then(|v| v.trim().trim_end_matches("px").trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
        };
        let (natural_w, natural_h) = sniff_size(data)
            .filter(|(w, h)| *w > 0 && *h > 0)
            .map(|(w, h)| (w as f64, h as f64))
            .unwrap_or((
                self.options.default_image_width_px as f64,
                self.options.default_image_height_px as f64,
            ));

        let (mut width, mut height) = match (px("width"), px("height")) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * natural_h / natural_w),
            (None, Some(h)) => (h * natural_w / natural_h, h),
            (None, None) => (natural_w, natural_h),
        };

        let max_width = self.text_width as f64 / TWIPS_PER_PX;
        if width > max_width {
            height *= max_width / width;
            width = max_width;
        }

        (width.round().max(1.0) as u32, height.round().max(1.0) as u32)
    }

    fn write_table<W: Write>(&mut self, w: &mut Writer<W>, table: &Element) -> Result<usize> {
        let mut rows = Vec::new();
        collect_rows(table, &mut rows);
        let rows: Vec<Vec<&Element>> = rows
            .into_iter()
            .map(|row| {
                row.children
                    .iter()
                    .filter_map(Node::as_element)
                    .filter(|c| matches!(c.tag(), Tag::TableCell | Tag::TableHeaderCell))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }

        let columns = rows
            .iter()
            .map(|cells| cells.iter().map(|c| col_span(c)).sum::<usize>())
            .max()
            .unwrap_or(1)
            .max(1);
        let column_width = self.text_width / columns as i64;
        let column_width_str = column_width.to_string();

        start(w, "w:tbl", &[])?;
        start(w, "w:tblPr", &[])?;
        empty(w, "w:tblStyle", &[("w:val", "TableGrid")])?;
        empty(w, "w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
        start(w, "w:tblBorders", &[])?;
        for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
            empty(
                w,
                side,
                &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", "auto")],
            )?;
        }
        end(w, "w:tblBorders")?;
        end(w, "w:tblPr")?;

        start(w, "w:tblGrid", &[])?;
        for _ in 0..columns {
            empty(w, "w:gridCol", &[("w:w", column_width_str.as_str())])?;
        }
        end(w, "w:tblGrid")?;

        for cells in rows {
            start(w, "w:tr", &[])?;
            for cell in cells {
                let span = col_span(cell);
                let width = (column_width * span as i64).to_string();
                start(w, "w:tc", &[])?;
                start(w, "w:tcPr", &[])?;
                empty(w, "w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
                if span > 1 {
                    let span = span.to_string();
                    empty(w, "w:gridSpan", &[("w:val", span.as_str())])?;
                }
                end(w, "w:tcPr")?;

                let written = self.write_blocks(w, &cell.children)?;
                // A cell must end with a paragraph
                if written == 0 || self.last_was_table {
                    empty(w, "w:p", &[])?;
                }
                self.last_was_table = false;
                end(w, "w:tc")?;
            }
            end(w, "w:tr")?;
        }

        end(w, "w:tbl")?;
        Ok(1)
    }
}

fn is_block(node: &Node) -> bool {
    let Node::Element(e) = node else {
        return false;
    };
    match e.tag() {
        Tag::Paragraph
        | Tag::Heading(_)
        | Tag::UnorderedList
        | Tag::OrderedList
        | Tag::ListItem
        | Tag::Table
        | Tag::PageBreak
        | Tag::Division => true,
        Tag::Other => TRANSPARENT_BLOCKS.contains(&e.name.as_str()),
        _ => false,
    }
}

fn collect_rows<'n>(e: &'n Element, rows: &mut Vec<&'n Element>) {
    for child in e.children.iter().filter_map(Node::as_element) {
        match child.tag() {
            Tag::TableRow => rows.push(child),
            Tag::Table => {}
            _ => collect_rows(child, rows),
        }
    }
}

fn col_span(cell: &Element) -> usize {
    cell.attr("colspan")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 63)
}

/// First line-height set on any descendant run
fn find_line_height(nodes: &[Node]) -> Option<f32> {
    nodes.iter().find_map(|node| {
        let e = node.as_element()?;
        let mut style = RunStyle::default();
        if let Some(css) = e.attr("style") {
            style.apply_css(css);
        }
        style.line_height.or_else(|| find_line_height(&e.children))
    })
}

/// `#ff00aa` to `FF00AA`
fn docx_hex(color: &str) -> String {
    color.trim_start_matches('#').to_ascii_uppercase()
}
