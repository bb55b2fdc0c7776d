//! Length conversions between the document model and WordprocessingML
//!
//! The document model measures page geometry in millimetres and font sizes
//! in points. DOCX uses twentieths of a point (twips) for geometry,
//! half-points for font sizes and EMUs for drawing extents.

/// Twips per millimetre
pub const TWIPS_PER_MM: f64 = 56.693;
/// EMUs per CSS pixel (96 dpi)
pub const EMU_PER_PX: i64 = 9525;
/// Margin used when a measurement is absent or unparsable
pub const DEFAULT_MARGIN_MM: f64 = 25.4;
/// Single line spacing in `w:spacing/@w:line` units
pub const LINE_UNITS: f64 = 240.0;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Twips to millimetres, rounded to one decimal
pub fn twips_to_mm(twips: f64) -> f64 {
    round1(twips / TWIPS_PER_MM)
}

/// Millimetres to whole twips
pub fn mm_to_twips(mm: f64) -> i64 {
    (mm * TWIPS_PER_MM).round() as i64
}

/// Parse a twips attribute into millimetres, falling back to `fallback`
pub fn parse_twips_mm(value: Option<&str>, fallback: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(twips_to_mm)
        .unwrap_or(fallback)
}

/// Half-points to points
pub fn half_points_to_pt(half_points: u32) -> f32 {
    half_points as f32 / 2.0
}

/// Points to whole half-points
pub fn pt_to_half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(1.0) as u32
}

/// EMUs to whole pixels
pub fn emu_to_px(emu: i64) -> u32 {
    ((emu as f64) / EMU_PER_PX as f64).round().max(0.0) as u32
}

/// Pixels to EMUs
pub fn px_to_emu(px: u32) -> i64 {
    px as i64 * EMU_PER_PX
}
