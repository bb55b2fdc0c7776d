//! WordprocessingML to markup

use std::collections::HashMap;

use super::media::{mime_for, DataUri};
use super::ImportedDocument;
use crate::error::{Error, Result};
use crate::markup::{self, Element, Node};
use crate::model::units::{emu_to_px, half_points_to_pt, parse_twips_mm, twips_to_mm, DEFAULT_MARGIN_MM, LINE_UNITS};
use crate::model::{highlight_hex, Alignment, BlockStyle, HeaderFooter, Margins, PageSettings, RunStyle};
use crate::opc::{rel_types, well_known, Package, Part};
use crate::xml::{parse_bool, XmlElement};

/// Parse DOCX package bytes into markup and page settings
pub fn import(bytes: &[u8]) -> Result<ImportedDocument> {
    let package = Package::from_bytes(bytes).map_err(Error::into_malformed)?;
    let main = package
        .main_document_part()
        .or_else(|| package.part(&well_known::document()))
        .ok_or_else(|| Error::MalformedPackage("main document part is missing".into()))?;

    let root = parse_part(main).map_err(Error::into_malformed)?;
    let body = root
        .child("body")
        .ok_or_else(|| Error::MalformedPackage("main document has no body".into()))?;

    let resources = Resources::load(&package, main);
    let mut nodes = Vec::new();
    BodyWalker { res: &resources }.walk_blocks(body, &mut nodes);

    let settings = body
        .child("sectPr")
        .map(|sect| read_settings(sect, resources.first_line_indent));

    log::debug!(
        "imported {} top-level blocks, {} images",
        nodes.len(),
        resources.images.len()
    );

    Ok(ImportedDocument {
        markup: markup::to_string(&nodes),
        settings,
    })
}

fn parse_part(part: &Part) -> Result<XmlElement> {
    XmlElement::parse_document(part.xml()?)
}

/// Section properties to page settings. Header and footer are detected by
/// their references only; their content stays empty.
fn read_settings(sect: &XmlElement, first_line_indent: f64) -> PageSettings {
    let pg_mar = sect.child("pgMar");
    let margin = |side: &str| {
        parse_twips_mm(pg_mar.and_then(|m| m.attr_local(side)), DEFAULT_MARGIN_MM).abs()
    };
    let has_reference = |local: &str| sect.elements().any(|e| e.local_name() == local);

    PageSettings {
        margins: Margins {
            top: margin("top"),
            bottom: margin("bottom"),
            left: margin("left"),
            right: margin("right"),
        },
        first_line_indent,
        header: HeaderFooter {
            enabled: has_reference("headerReference"),
            content: String::new(),
        },
        footer: HeaderFooter {
            enabled: has_reference("footerReference"),
            content: String::new(),
        },
    }
}

/// Lookup tables built from the main part's relationships; discarded once the
/// markup is built
#[derive(Debug, Default)]
struct Resources {
    /// Relationship id to data URI
    images: HashMap<String, String>,
    /// Relationship id to external target
    links: HashMap<String, String>,
    /// (numId, level) to ordered
    list_formats: HashMap<(String, u32), bool>,
    /// Style id to heading level
    heading_styles: HashMap<String, u8>,
    first_line_indent: f64,
}

impl Resources {
    fn load(package: &Package, main: &Part) -> Self {
        let mut res = Resources::default();
        let Some(rels) = main.relationships() else {
            return res;
        };

        for rel in rels.iter() {
            if rel.rel_type == rel_types::HYPERLINK {
                res.links.insert(rel.id.clone(), rel.target.clone());
                continue;
            }
            if rel.is_external() {
                continue;
            }
            let Some(part) = main
                .uri()
                .resolve(&rel.target)
                .ok()
                .and_then(|uri| package.part(&uri))
            else {
                log::warn!("relationship {} points to a missing part {}", rel.id, rel.target);
                continue;
            };

            if rel.rel_type == rel_types::IMAGE {
                let mime = if part.content_type().starts_with("image/") {
                    part.content_type()
                } else {
                    mime_for(part.uri()).unwrap_or("application/octet-stream")
                };
                res.images
                    .insert(rel.id.clone(), DataUri::encode(mime, part.data()));
            } else if rel.rel_type == rel_types::NUMBERING {
                match parse_part(part) {
                    Ok(numbering) => res.read_numbering(&numbering),
                    Err(e) => log::warn!("ignoring unreadable numbering part: {}", e),
                }
            } else if rel.rel_type == rel_types::STYLES {
                match parse_part(part) {
                    Ok(styles) => res.read_styles(&styles),
                    Err(e) => log::warn!("ignoring unreadable styles part: {}", e),
                }
            }
        }
        res
    }

    fn read_numbering(&mut self, numbering: &XmlElement) {
        let mut abstract_formats: HashMap<&str, Vec<(u32, bool)>> = HashMap::new();
        for abs in numbering.elements().filter(|e| e.local_name() == "abstractNum") {
            let Some(id) = abs.attr_local("abstractNumId") else {
                continue;
            };
            let levels = abs
                .elements()
                .filter(|e| e.local_name() == "lvl")
                .filter_map(|lvl| {
                    let level = lvl.attr_local("ilvl")?.parse().ok()?;
                    let format = lvl.child("numFmt").and_then(XmlElement::w_val).unwrap_or("bullet");
                    Some((level, format != "bullet"))
                })
                .collect();
            abstract_formats.insert(id, levels);
        }

        for num in numbering.elements().filter(|e| e.local_name() == "num") {
            let (Some(num_id), Some(abs_id)) = (
                num.attr_local("numId"),
                num.child("abstractNumId").and_then(XmlElement::w_val),
            ) else {
                continue;
            };
            for (level, ordered) in abstract_formats.get(abs_id).into_iter().flatten() {
                self.list_formats.insert((num_id.to_string(), *level), *ordered);
            }
        }
    }

    fn read_styles(&mut self, styles: &XmlElement) {
        let default_indent = styles
            .child("docDefaults")
            .and_then(|d| d.child("pPrDefault"))
            .and_then(|d| d.child("pPr"))
            .and_then(first_line_twips);

        let mut normal_indent = None;
        for style in styles.elements().filter(|e| e.local_name() == "style") {
            let Some(id) = style.attr_local("styleId") else {
                continue;
            };
            let is_default = style.attr_local("type") == Some("paragraph")
                && style.attr_local("default").map(|d| parse_bool(Some(d))).unwrap_or(false);
            if id == "Normal" || is_default {
                normal_indent = normal_indent.or_else(|| style.child("pPr").and_then(first_line_twips));
            }
            let name = style.child("name").and_then(XmlElement::w_val).unwrap_or(id);
            let level = heading_level(name).or_else(|| {
                style
                    .child("pPr")
                    .and_then(|p| p.child("outlineLvl"))
                    .and_then(outline_level)
            });
            if let Some(level) = level {
                self.heading_styles.insert(id.to_string(), level);
            }
        }

        if let Some(twips) = default_indent.or(normal_indent) {
            self.first_line_indent = twips_to_mm(twips).max(0.0);
        }
    }

    fn list_is_ordered(&self, num_id: &str, level: u32) -> bool {
        self.list_formats
            .get(&(num_id.to_string(), level))
            .or_else(|| self.list_formats.get(&(num_id.to_string(), 0)))
            .copied()
            .unwrap_or(false)
    }
}

fn first_line_twips(ppr: &XmlElement) -> Option<f64> {
    ppr.child("ind")?.attr_local("firstLine")?.trim().parse().ok()
}

/// `Heading 2`, `heading2` and `Title` style names
fn heading_level(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    if lower == "title" {
        return Some(1);
    }
    let level: u8 = lower.strip_prefix("heading")?.trim().parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn outline_level(e: &XmlElement) -> Option<u8> {
    let level: u8 = e.w_val()?.parse().ok()?;
    (level < 6).then_some(level + 1)
}

/// Paragraph output before list grouping
enum Block {
    Node(Node),
    ListItem {
        num_id: String,
        level: u32,
        ordered: bool,
        item: Element,
    },
}

/// Inline content of a paragraph before runs are coalesced
enum Piece {
    Inline(RunStyle, Node),
    Link(String, Vec<Piece>),
    PageBreak,
}

/// Field code being read inside a paragraph
enum Field {
    Instruction(String),
    /// Between separate and end; the cached result is dropped for page numbers
    Result { page_number: bool },
}

struct BodyWalker<'r> {
    res: &'r Resources,
}

impl BodyWalker<'_> {
    fn walk_blocks(&self, container: &XmlElement, out: &mut Vec<Node>) {
        let mut blocks = Vec::new();
        self.collect_blocks(container, &mut blocks);
        group_lists(blocks, out);
    }

    fn collect_blocks(&self, container: &XmlElement, out: &mut Vec<Block>) {
        for e in container.elements() {
            match e.local_name() {
                "p" => self.paragraph(e, out),
                "tbl" => out.push(Block::Node(self.table(e))),
                "sdt" => {
                    if let Some(content) = e.child("sdtContent") {
                        self.collect_blocks(content, out);
                    }
                }
                "sectPr" | "del" | "tblPr" | "tcPr" | "trPr" => {}
                _ => self.collect_blocks(e, out),
            }
        }
    }

    fn paragraph(&self, p: &XmlElement, out: &mut Vec<Block>) {
        let ppr = p.child("pPr");
        let prop = |local: &str| ppr.and_then(|ppr| ppr.child(local));

        let heading = prop("pStyle")
            .and_then(XmlElement::w_val)
            .and_then(|id| self.res.heading_styles.get(id).copied().or_else(|| heading_level(id)))
            .or_else(|| prop("outlineLvl").and_then(outline_level));

        let block_style = BlockStyle {
            alignment: prop("jc").and_then(XmlElement::w_val).and_then(Alignment::from_docx),
            line_height: prop("spacing").and_then(line_multiplier),
        };

        let numbering = prop("numPr").and_then(|num| {
            let id = num.child("numId").and_then(XmlElement::w_val)?;
            let level = num
                .child("ilvl")
                .and_then(XmlElement::w_val)
                .and_then(|l| l.parse().ok())
                .unwrap_or(0);
            (id != "0").then(|| (id, level))
        });

        let mut pieces = Vec::new();
        let mut fields = Vec::new();
        self.inline(p, &RunStyle::default(), &mut fields, &mut pieces);

        let page_break_before = prop("pageBreakBefore")
            .map(|e| parse_bool(e.w_val()))
            .unwrap_or(false);
        if page_break_before {
            out.push(Block::Node(Element::page_break().into()));
        }

        let segments = split_page_breaks(pieces);
        let has_breaks = segments.len() > 1;
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                out.push(Block::Node(Element::page_break().into()));
            }
            if has_breaks && segment.is_empty() {
                continue;
            }
            let children = coalesce(segment);

            if let Some((num_id, level)) = numbering {
                let mut item = Element::new("li").with_children(children);
                if let Some(css) = block_style.to_css() {
                    item.set_attr("style", css);
                }
                out.push(Block::ListItem {
                    num_id: num_id.to_string(),
                    level,
                    ordered: self.res.list_is_ordered(num_id, level),
                    item,
                });
                continue;
            }

            let name = match heading {
                Some(level) => format!("h{}", level),
                None => "p".to_string(),
            };
            let mut block = Element::new(name).with_children(children);
            if let Some(css) = block_style.to_css() {
                block.set_attr("style", css);
            }
            out.push(Block::Node(block.into()));
        }
    }

    /// Walk paragraph-level content: runs, hyperlinks, simple fields and the
    /// containers that may wrap them
    fn inline(&self, container: &XmlElement, base: &RunStyle, fields: &mut Vec<Field>, out: &mut Vec<Piece>) {
        for e in container.elements() {
            match e.local_name() {
                "r" => self.run(e, base, fields, out),
                "hyperlink" => {
                    let href = e
                        .attr_local("id")
                        .and_then(|id| self.res.links.get(id).cloned())
                        .or_else(|| e.attr_local("anchor").map(|a| format!("#{}", a)));
                    let mut children = Vec::new();
                    self.inline(e, base, fields, &mut children);
                    match href {
                        Some(href) => out.push(Piece::Link(href, children)),
                        None => out.extend(children),
                    }
                }
                "fldSimple" => {
                    if e.attr_local("instr").map(is_page_field).unwrap_or(false) {
                        let style = e
                            .descendant("rPr")
                            .map(|rpr| run_style(rpr, base))
                            .unwrap_or_else(|| base.clone());
                        out.push(Piece::Inline(style, Element::page_number().into()));
                    } else {
                        self.inline(e, base, fields, out);
                    }
                }
                "sdt" => {
                    if let Some(content) = e.child("sdtContent") {
                        self.inline(content, base, fields, out);
                    }
                }
                "pPr" | "del" | "moveFrom" | "bookmarkStart" | "bookmarkEnd" | "proofErr" => {}
                _ => self.inline(e, base, fields, out),
            }
        }
    }

    fn run(&self, r: &XmlElement, base: &RunStyle, fields: &mut Vec<Field>, out: &mut Vec<Piece>) {
        let style = r.child("rPr").map(|rpr| run_style(rpr, base)).unwrap_or_else(|| base.clone());
        let hidden = |fields: &Vec<Field>| {
            fields.iter().any(|f| matches!(f, Field::Instruction(_) | Field::Result { page_number: true }))
        };

        for e in r.elements() {
            match e.local_name() {
                "fldChar" => match e.attr_local("fldCharType").unwrap_or("") {
                    "begin" => fields.push(Field::Instruction(String::new())),
                    "separate" => {
                        if let Some(Field::Instruction(instr)) = fields.last() {
                            let page_number = is_page_field(instr);
                            if page_number {
                                out.push(Piece::Inline(style.clone(), Element::page_number().into()));
                            }
                            if let Some(field) = fields.last_mut() {
                                *field = Field::Result { page_number };
                            }
                        }
                    }
                    "end" => {
                        // Field without a cached result
                        if let Some(Field::Instruction(instr)) = fields.pop() {
                            if is_page_field(&instr) {
                                out.push(Piece::Inline(style.clone(), Element::page_number().into()));
                            }
                        }
                    }
                    _ => {}
                },
                "instrText" => {
                    if let Some(Field::Instruction(instr)) = fields.last_mut() {
                        instr.push_str(&e.text());
                    }
                }
                _ if hidden(fields) => {}
                "t" => {
                    let text = e.text();
                    if !text.is_empty() {
                        out.push(Piece::Inline(style.clone(), Node::text(text)));
                    }
                }
                "tab" => out.push(Piece::Inline(style.clone(), Node::text("\t"))),
                "noBreakHyphen" => out.push(Piece::Inline(style.clone(), Node::text("-"))),
                "br" if e.attr_local("type") == Some("page") => out.push(Piece::PageBreak),
                "br" | "cr" => out.push(Piece::Inline(style.clone(), Element::new("br").into())),
                "drawing" => {
                    if let Some(img) = self.drawing(e) {
                        out.push(Piece::Inline(RunStyle::default(), img.into()));
                    }
                }
                "pict" | "object" => {
                    if let Some(img) = self.vml_image(e) {
                        out.push(Piece::Inline(RunStyle::default(), img.into()));
                    }
                }
                "AlternateContent" => {
                    if let Some(choice) = e.child("Choice").or_else(|| e.child("Fallback")) {
                        let wrapper = XmlElement {
                            children: choice.children.clone(),
                            ..r.clone()
                        };
                        self.run(&wrapper, base, fields, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn image(&self, rel_id: &str) -> Option<Element> {
        match self.res.images.get(rel_id) {
            Some(src) => Some(Element::new("img").with_attr("src", src.as_str())),
            None => {
                log::warn!("image relationship {} not found", rel_id);
                None
            }
        }
    }

    fn drawing(&self, drawing: &XmlElement) -> Option<Element> {
        let rel_id = drawing.descendant("blip")?.attr_local("embed")?;
        let mut img = self.image(rel_id)?;

        if let Some(alt) = drawing
            .descendant("docPr")
            .and_then(|d| d.attr("descr"))
            .filter(|a| !a.is_empty())
        {
            img.set_attr("alt", alt);
        }
        if let Some(extent) = drawing.descendant("extent") {
            let emu = |name: &str| extent.attr(name).and_then(|v| v.trim().parse::<i64>().ok());
            if let (Some(cx), Some(cy)) = (emu("cx"), emu("cy")) {
                img.set_attr("width", emu_to_px(cx).to_string());
                img.set_attr("height", emu_to_px(cy).to_string());
            }
        }
        Some(img)
    }

    fn vml_image(&self, pict: &XmlElement) -> Option<Element> {
        let data = pict.descendant("imagedata")?;
        let rel_id = data.attr("r:id").or_else(|| data.attr_local("id"))?;
        self.image(rel_id)
    }

    fn table(&self, tbl: &XmlElement) -> Node {
        let mut table = Element::new("table");
        for tr in tbl.elements().filter(|e| e.local_name() == "tr") {
            let mut row = Element::new("tr");
            for tc in tr.elements().filter(|e| e.local_name() == "tc") {
                let mut cell = Element::new("td");
                let span = tc
                    .child("tcPr")
                    .and_then(|p| p.child("gridSpan"))
                    .and_then(XmlElement::w_val)
                    .and_then(|v| v.parse::<u32>().ok())
                    .filter(|span| *span > 1);
                if let Some(span) = span {
                    cell.set_attr("colspan", span.to_string());
                }

                let mut blocks = Vec::new();
                self.walk_blocks(tc, &mut blocks);
                cell.children = unwrap_single_paragraph(blocks);
                row.children.push(cell.into());
            }
            table.children.push(row.into());
        }
        table.into()
    }
}

/// A cell holding one unstyled paragraph keeps only its inline content
fn unwrap_single_paragraph(mut blocks: Vec<Node>) -> Vec<Node> {
    if blocks.len() == 1 {
        if let Some(Node::Element(p)) = blocks.first() {
            if p.name == "p" && p.attrs.is_empty() {
                if let Some(Node::Element(p)) = blocks.pop() {
                    return p.children;
                }
            }
        }
    }
    blocks
}

/// `w:spacing` line value as a unitless multiplier; exact and at-least
/// spacing have no multiplier equivalent
fn line_multiplier(spacing: &XmlElement) -> Option<f32> {
    let rule = spacing.attr_local("lineRule").unwrap_or("auto");
    if rule != "auto" {
        return None;
    }
    let line: f64 = spacing.attr_local("line")?.trim().parse().ok()?;
    let multiplier = ((line / LINE_UNITS) * 100.0).round() / 100.0;
    (multiplier > 0.0).then_some(multiplier as f32)
}

fn is_page_field(instruction: &str) -> bool {
    instruction.split_whitespace().next() == Some("PAGE")
}

/// Direct run formatting on top of the inherited style
fn run_style(rpr: &XmlElement, base: &RunStyle) -> RunStyle {
    let mut style = base.clone();
    let toggle = |local: &str| rpr.child(local).map(|e| parse_bool(e.w_val()));

    if let Some(bold) = toggle("b") {
        style.bold = bold;
    }
    if let Some(italic) = toggle("i") {
        style.italic = italic;
    }
    if let Some(u) = rpr.child("u") {
        style.underline = u.w_val().map(|v| v != "none").unwrap_or(true);
    }
    if let Some(color) = rpr
        .child("color")
        .and_then(XmlElement::w_val)
        .filter(|c| *c != "auto" && c.len() == 6)
    {
        style.color = Some(format!("#{}", color.to_ascii_lowercase()));
    }
    if let Some(size) = rpr
        .child("sz")
        .and_then(XmlElement::w_val)
        .and_then(|v| v.parse::<u32>().ok())
    {
        style.font_size_pt = Some(half_points_to_pt(size));
    }
    if let Some(fonts) = rpr.child("rFonts") {
        if let Some(family) = fonts.attr_local("ascii").or_else(|| fonts.attr_local("hAnsi")) {
            style.font_family = Some(family.to_string());
        }
    }
    if let Some(highlight) = rpr
        .child("highlight")
        .and_then(XmlElement::w_val)
        .and_then(highlight_hex)
    {
        style.highlight = Some(highlight.to_string());
    } else if let Some(fill) = rpr
        .child("shd")
        .and_then(|s| s.attr_local("fill"))
        .filter(|f| *f != "auto" && f.len() == 6)
    {
        style.highlight = Some(format!("#{}", fill.to_ascii_lowercase()));
    }
    style
}

/// Split paragraph content at page breaks
fn split_page_breaks(pieces: Vec<Piece>) -> Vec<Vec<Piece>> {
    let mut segments = vec![Vec::new()];
    for piece in pieces {
        match piece {
            Piece::PageBreak => segments.push(Vec::new()),
            other => {
                if let Some(current) = segments.last_mut() {
                    current.push(other);
                }
            }
        }
    }
    segments
}

/// Merge adjacent pieces with the same style and wrap each group in
/// `b > i > u > span[style]`
fn coalesce(pieces: Vec<Piece>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut group: Option<(RunStyle, Vec<Node>)> = None;

    for piece in pieces {
        match piece {
            Piece::Inline(style, node) => {
                if let Some((current, nodes)) = &mut group {
                    if *current == style {
                        push_merged(nodes, node);
                        continue;
                    }
                }
                if let Some((previous, nodes)) = group.take() {
                    out.extend(wrap(&previous, nodes));
                }
                group = Some((style, vec![node]));
            }
            Piece::Link(href, children) => {
                if let Some((style, nodes)) = group.take() {
                    out.extend(wrap(&style, nodes));
                }
                out.push(Element::new("a").with_attr("href", href).with_children(coalesce(children)).into());
            }
            // Already split out
            Piece::PageBreak => {}
        }
    }
    if let Some((style, nodes)) = group {
        out.extend(wrap(&style, nodes));
    }
    out
}

fn push_merged(nodes: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Text(last)), Node::Text(text)) = (nodes.last_mut(), &node) {
        last.push_str(text);
        return;
    }
    nodes.push(node);
}

fn wrap(style: &RunStyle, nodes: Vec<Node>) -> Vec<Node> {
    let mut nodes = nodes;
    let css = style.to_css();
    if !css.is_empty() {
        nodes = vec![Element::new("span").with_attr("style", css).with_children(nodes).into()];
    }
    for (on, name) in [(style.underline, "u"), (style.italic, "i"), (style.bold, "b")] {
        if on {
            nodes = vec![Element::new(name).with_children(nodes).into()];
        }
    }
    nodes
}

/// Group consecutive list paragraphs into nested `ul`/`ol` by level.
/// A top-level item under a different numbering instance starts a new list.
fn group_lists(blocks: Vec<Block>, out: &mut Vec<Node>) {
    let mut items = Vec::new();
    let mut instance: Option<String> = None;
    for block in blocks {
        match block {
            Block::ListItem {
                num_id,
                level,
                ordered,
                item,
            } => {
                if level == 0 && instance.as_deref() != Some(num_id.as_str()) {
                    flush_list(&mut items, out);
                    instance = Some(num_id);
                }
                items.push((level, ordered, item));
            }
            Block::Node(node) => {
                flush_list(&mut items, out);
                instance = None;
                out.push(node);
            }
        }
    }
    flush_list(&mut items, out);
}

fn flush_list(items: &mut Vec<(u32, bool, Element)>, out: &mut Vec<Node>) {
    let mut pos = 0;
    while pos < items.len() {
        out.push(build_list(items, &mut pos, 0).into());
    }
    items.clear();
}

fn build_list(items: &[(u32, bool, Element)], pos: &mut usize, level: u32) -> Element {
    let ordered = items[*pos].1;
    let mut list = Element::new(if ordered { "ol" } else { "ul" });

    while let Some((item_level, item_ordered, item)) = items.get(*pos) {
        if *item_level < level {
            break;
        }
        if *item_level > level {
            let nested: Node = build_list(items, pos, level + 1).into();
            match list.children.last_mut() {
                Some(Node::Element(li)) => li.children.push(nested),
                _ => list.children.push(nested),
            }
            continue;
        }
        if *item_ordered != ordered {
            break;
        }
        list.children.push(item.clone().into());
        *pos += 1;
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::{Relationships, MAIN_DOCUMENT, NUMBERING, STYLES};
    use pretty_assertions::assert_eq;

    const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn package_with(body: &str, rels: Relationships, extra: Vec<Part>) -> Vec<u8> {
        let xml = format!(r#"<?xml version="1.0"?><w:document {}><w:body>{}</w:body></w:document>"#, W_NS, body);
        let mut package = Package::new();
        package
            .relationships_mut()
            .add(rel_types::OFFICE_DOCUMENT, "word/document.xml");
        package.add_part(
            Part::new(well_known::document(), MAIN_DOCUMENT, xml.into_bytes()).with_relationships(rels),
        );
        for part in extra {
            package.add_part(part);
        }
        package.to_bytes().unwrap()
    }

    fn import_body(body: &str) -> ImportedDocument {
        import(&package_with(body, Relationships::new(), Vec::new())).unwrap()
    }

    #[test]
    fn test_runs_are_coalesced_and_wrapped() {
        let doc = import_body(
            r#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Wor</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ld</w:t></w:r></w:p>"#,
        );
        assert_eq!(doc.markup, "<p>Hello <b>World</b></p>");
        assert_eq!(doc.settings, None);
    }

    #[test]
    fn test_run_properties_to_css() {
        let doc = import_body(
            r#"<w:p><w:r><w:rPr><w:i/><w:u w:val="single"/><w:color w:val="FF0000"/><w:sz w:val="21"/><w:highlight w:val="yellow"/></w:rPr><w:t>x</w:t></w:r><w:r><w:rPr><w:b w:val="0"/><w:u w:val="none"/><w:shd w:fill="ABCDEF"/></w:rPr><w:t>y</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            doc.markup,
            r#"<p><i><u><span style="color: #ff0000; background-color: #ffff00; font-size: 10.5pt">x</span></u></i><span style="background-color: #abcdef">y</span></p>"#
        );
    }

    #[test]
    fn test_paragraph_properties() {
        let doc = import_body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/><w:jc w:val="both"/></w:pPr><w:r><w:t>T</w:t></w:r></w:p><w:p><w:pPr><w:spacing w:line="360" w:lineRule="auto"/></w:pPr><w:r><w:t>b</w:t></w:r></w:p><w:p/>"#,
        );
        assert_eq!(
            doc.markup,
            r#"<h2 style="text-align: justify">T</h2><p style="line-height: 1.5">b</p><p></p>"#
        );
    }

    #[test]
    fn test_page_number_fields() {
        let complex = r#"<w:p><w:r><w:t xml:space="preserve">Page </w:t></w:r><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>7</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#;
        assert_eq!(
            import_body(complex).markup,
            r#"<p>Page <span class="page-number"></span></p>"#
        );

        let simple = r#"<w:p><w:fldSimple w:instr=" PAGE \* MERGEFORMAT "><w:r><w:t>3</w:t></w:r></w:fldSimple></w:p>"#;
        assert_eq!(import_body(simple).markup, r#"<p><span class="page-number"></span></p>"#);

        // Other fields keep their cached result
        let other = r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText>NUMPAGES</w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>9</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#;
        assert_eq!(import_body(other).markup, "<p>9</p>");
    }

    #[test]
    fn test_breaks_and_tabs() {
        let doc = import_body(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/><w:t>d</w:t></w:r></w:p><w:p><w:r><w:br w:type="page"/></w:r></w:p>"#,
        );
        assert_eq!(
            doc.markup,
            "<p>a\tb<br>c</p><div class=\"page-break\"></div><p>d</p><div class=\"page-break\"></div>"
        );
    }

    #[test]
    fn test_tables() {
        let doc = import_body(
            r#"<w:tbl><w:tblPr/><w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(
            doc.markup,
            r#"<table><tr><td colspan="2">a</td></tr><tr><td></td><td><p>b</p><p>c</p></td></tr></table>"#
        );
    }

    #[test]
    fn test_section_properties() {
        let doc = import_body(
            r#"<w:p/><w:sectPr><w:headerReference w:type="default" r:id="rId3"/><w:pgMar w:top="1440" w:bottom="-2000" w:left="oops" w:right="567"/></w:sectPr>"#,
        );
        let settings = doc.settings.unwrap();
        assert_eq!(settings.margins.top, 25.4);
        assert_eq!(settings.margins.bottom, 35.3);
        assert_eq!(settings.margins.left, 25.4);
        assert_eq!(settings.margins.right, 10.0);
        assert!(settings.header.enabled);
        assert!(settings.header.content.is_empty());
        assert!(!settings.footer.enabled);
    }

    #[test]
    fn test_lists_from_numbering() {
        let numbering = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl><w:lvl w:ilvl="1"><w:numFmt w:val="decimal"/></w:lvl></w:abstractNum><w:num w:numId="4"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;
        let mut rels = Relationships::new();
        rels.add(rel_types::NUMBERING, "numbering.xml");
        let item = |level: u32, text: &str| {
            format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="4"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
                level, text
            )
        };
        let body = format!("{}{}{}<w:p><w:r><w:t>after</w:t></w:r></w:p>", item(0, "a"), item(1, "b"), item(0, "c"));
        let bytes = package_with(
            &body,
            rels,
            vec![Part::new(well_known::numbering(), NUMBERING, numbering.as_bytes().to_vec())],
        );

        assert_eq!(
            import(&bytes).unwrap().markup,
            "<ul><li>a<ol><li>b</li></ol></li><li>c</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_adjacent_lists_stay_separate() {
        let numbering = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num><w:num w:numId="2"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;
        let mut rels = Relationships::new();
        rels.add(rel_types::NUMBERING, "numbering.xml");
        let item = |num_id: u32, text: &str| {
            format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
                num_id, text
            )
        };
        let body = format!("{}{}{}", item(1, "a"), item(1, "b"), item(2, "c"));
        let bytes = package_with(
            &body,
            rels,
            vec![Part::new(well_known::numbering(), NUMBERING, numbering.as_bytes().to_vec())],
        );

        assert_eq!(
            import(&bytes).unwrap().markup,
            "<ul><li>a</li><li>b</li></ul><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn test_first_line_indent_and_heading_names() {
        let styles = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:pPrDefault><w:pPr><w:ind w:firstLine="567"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:styleId="berschrift1"><w:name w:val="heading 1"/></w:style></w:styles>"#;
        let mut rels = Relationships::new();
        rels.add(rel_types::STYLES, "styles.xml");
        let bytes = package_with(
            r#"<w:p><w:pPr><w:pStyle w:val="berschrift1"/></w:pPr><w:r><w:t>H</w:t></w:r></w:p><w:sectPr/>"#,
            rels,
            vec![Part::new(well_known::styles(), STYLES, styles.as_bytes().to_vec())],
        );

        let doc = import(&bytes).unwrap();
        assert_eq!(doc.markup, "<h1>H</h1>");
        assert_eq!(doc.settings.unwrap().first_line_indent, 10.0);
    }

    #[test]
    fn test_missing_image_is_dropped() {
        let doc = import_body(
            r#"<w:p><w:r><w:drawing><wp:inline xmlns:wp="wp"><a:graphic xmlns:a="a"><a:graphicData><pic:pic xmlns:pic="pic"><pic:blipFill><a:blip r:embed="rId9"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(doc.markup, "<p>x</p>");
    }

    #[test]
    fn test_malformed_packages() {
        assert!(matches!(import(b"not a zip"), Err(Error::MalformedPackage(_))));

        let mut package = Package::new();
        package.add_part(Part::new(well_known::styles(), STYLES, b"<w:styles/>".to_vec()));
        let bytes = package.to_bytes().unwrap();
        assert!(matches!(import(&bytes), Err(Error::MalformedPackage(_))));

        let mut package = Package::new();
        package
            .relationships_mut()
            .add(rel_types::OFFICE_DOCUMENT, "word/document.xml");
        package.add_part(Part::new(well_known::document(), MAIN_DOCUMENT, b"<w:document><w:body>".to_vec()));
        let bytes = package.to_bytes().unwrap();
        assert!(matches!(import(&bytes), Err(Error::MalformedPackage(_))));
    }
}
