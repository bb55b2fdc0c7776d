//! Run and paragraph styling carried by markup `style` attributes

use crate::markup::{Element, Tag};

/// Inline style attributes in effect for a run.
///
/// Attributes are inherited from ancestor elements and overridden by closer
/// scopes; they are never stored per character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Foreground colour, `#rrggbb`
    pub color: Option<String>,
    /// Highlight colour, `#rrggbb` or `none`
    pub highlight: Option<String>,
    pub font_family: Option<String>,
    pub font_size_pt: Option<f32>,
    /// Unitless multiplier
    pub line_height: Option<f32>,
}

impl RunStyle {
    /// Style in effect inside `element`, given the style of its parent scope
    pub fn enter(&self, element: &Element) -> RunStyle {
        let mut style = self.clone();
        match element.tag() {
            Tag::Bold => style.bold = true,
            Tag::Italic => style.italic = true,
            Tag::Underline => style.underline = true,
            _ => {}
        }
        if let Some(css) = element.attr("style") {
            style.apply_css(css);
        }
        style
    }

    /// Apply CSS declarations on top of this style
    pub fn apply_css(&mut self, css: &str) {
        for (property, value) in declarations(css) {
            match property.as_str() {
                "font-weight" => {
                    self.bold = value == "bold"
                        || value == "bolder"
                        || value.parse::<u32>().map(|w| w >= 600).unwrap_or(false)
                }
                "font-style" => self.italic = value == "italic" || value == "oblique",
                "text-decoration" | "text-decoration-line" => {
                    self.underline = value.contains("underline")
                }
                "color" => self.color = normalize_color(&value),
                "background-color" | "background" => {
                    self.highlight = if value == "none" || value == "transparent" {
                        Some("none".into())
                    } else {
                        normalize_color(&value)
                    }
                }
                "font-family" => {
                    let family = value.split(',').next().unwrap_or("").trim();
                    let family = family.trim_matches(|c| c == '"' || c == '\'');
                    if !family.is_empty() {
                        self.font_family = Some(family.to_string());
                    }
                }
                "font-size" => {
                    if let Some(pt) = parse_font_size_pt(&value) {
                        self.font_size_pt = Some(pt);
                    }
                }
                "line-height" => {
                    if let Ok(multiplier) = value.parse::<f32>() {
                        self.line_height = Some(multiplier);
                    }
                }
                _ => {}
            }
        }
    }

    /// CSS for the non-boolean attributes (booleans are written as tags)
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(color) = &self.color {
            parts.push(format!("color: {}", color));
        }
        if let Some(highlight) = &self.highlight {
            parts.push(format!("background-color: {}", highlight));
        }
        if let Some(family) = &self.font_family {
            parts.push(format!("font-family: {}", family));
        }
        if let Some(size) = self.font_size_pt {
            parts.push(format!("font-size: {}pt", size));
        }
        if let Some(line_height) = self.line_height {
            parts.push(format!("line-height: {}", line_height));
        }
        parts.join("; ")
    }
}

/// Paragraph alignment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse a CSS `text-align` value
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim() {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// Parse a `w:jc` value
    pub fn from_docx(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// CSS `text-align` value
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    /// `w:jc` value
    pub fn as_docx(&self) -> &'static str {
        match self {
            Alignment::Justify => "both",
            other => other.as_css(),
        }
    }
}

/// Paragraph-level style read from a block's `style` attribute
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStyle {
    pub alignment: Option<Alignment>,
    pub line_height: Option<f32>,
}

impl BlockStyle {
    /// Read from a block element
    pub fn of(element: &Element) -> Self {
        let mut style = BlockStyle::default();
        if let Some(css) = element.attr("style") {
            for (property, value) in declarations(css) {
                match property.as_str() {
                    "text-align" => style.alignment = Alignment::from_css(&value),
                    "line-height" => style.line_height = value.parse().ok(),
                    _ => {}
                }
            }
        }
        if style.alignment.is_none() {
            style.alignment = element.attr("align").and_then(Alignment::from_css);
        }
        style
    }

    /// CSS for the block's `style` attribute, `None` if nothing is set
    pub fn to_css(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(alignment) = self.alignment {
            parts.push(format!("text-align: {}", alignment.as_css()));
        }
        if let Some(line_height) = self.line_height {
            parts.push(format!("line-height: {}", line_height));
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

/// Split a CSS declaration block into lower-cased (property, value) pairs
fn declarations(css: &str) -> impl Iterator<Item = (String, String)> + '_ {
    css.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim();
        if property.is_empty() || value.is_empty() {
            return None;
        }
        let value = if property == "font-family" {
            value.to_string()
        } else {
            value.to_ascii_lowercase()
        };
        Some((property, value))
    })
}

fn parse_font_size_pt(value: &str) -> Option<f32> {
    let (number, factor) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else {
        (value, 1.0)
    };
    let size = number.trim().parse::<f32>().ok()? * factor;
    (size > 0.0).then_some(size)
}

/// Normalise a CSS colour to `#rrggbb`
pub fn normalize_color(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return match hex.len() {
            6 if hex.chars().all(|c| c.is_ascii_hexdigit()) => Some(format!("#{}", hex)),
            3 if hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                Some(hex.chars().flat_map(|c| [c, c]).fold(String::from("#"), |mut s, c| {
                    s.push(c);
                    s
                }))
            }
            _ => None,
        };
    }
    if let Some(args) = value
        .strip_prefix("rgb(")
        .or_else(|| value.strip_prefix("rgba("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<u8> = args
            .split(',')
            .take(3)
            .filter_map(|c| c.trim().parse::<u8>().ok())
            .collect();
        if let [r, g, b] = channels[..] {
            return Some(format!("#{:02x}{:02x}{:02x}", r, g, b));
        }
        return None;
    }
    HIGHLIGHT_PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&value))
        .map(|(_, hex)| hex.to_string())
}

/// The fixed `w:highlight` palette
const HIGHLIGHT_PALETTE: [(&str, &str); 16] = [
    ("black", "#000000"),
    ("blue", "#0000ff"),
    ("cyan", "#00ffff"),
    ("green", "#00ff00"),
    ("magenta", "#ff00ff"),
    ("red", "#ff0000"),
    ("yellow", "#ffff00"),
    ("white", "#ffffff"),
    ("darkBlue", "#000080"),
    ("darkCyan", "#008080"),
    ("darkGreen", "#008000"),
    ("darkMagenta", "#800080"),
    ("darkRed", "#800000"),
    ("darkYellow", "#808000"),
    ("darkGray", "#808080"),
    ("lightGray", "#c0c0c0"),
];

/// `w:highlight` name for a hex colour, if it is in the palette
pub fn highlight_name(hex: &str) -> Option<&'static str> {
    HIGHLIGHT_PALETTE
        .iter()
        .find(|(_, h)| h.eq_ignore_ascii_case(hex))
        .map(|(name, _)| *name)
}

/// Hex colour for a `w:highlight` name
pub fn highlight_hex(name: &str) -> Option<&'static str> {
    if name == "none" {
        return Some("none");
    }
    HIGHLIGHT_PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hex)| *hex)
}
