//! Embedded catalog typeface (DejaVu Sans) and its glyph metrics

use std::sync::OnceLock;
use ttf_parser::Face;

pub const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
pub const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Advance assumed for glyphs the face cannot measure, in em
const FALLBACK_ADVANCE_EM: f32 = 0.6;

static REGULAR: OnceLock<Option<Face<'static>>> = OnceLock::new();
static BOLD: OnceLock<Option<Face<'static>>> = OnceLock::new();

fn face(bold: bool) -> Option<&'static Face<'static>> {
    let (cell, bytes) = if bold {
        (&BOLD, BOLD_TTF)
    } else {
        (&REGULAR, REGULAR_TTF)
    };
    cell.get_or_init(|| Face::parse(bytes, 0).ok()).as_ref()
}

/// Horizontal advance of `c` as a fraction of the font size
pub fn advance_em(c: char, bold: bool) -> f32 {
    face(bold)
        .and_then(|face| {
            let glyph = face.glyph_index(c)?;
            let advance = face.glyph_hor_advance(glyph)?;
            Some(f32::from(advance) / f32::from(face.units_per_em()))
        })
        .unwrap_or(FALLBACK_ADVANCE_EM)
}

/// Whether the face can draw `c`; characters without a glyph are dropped
/// from the page
pub fn has_glyph(c: char, bold: bool) -> bool {
    face(bold).is_some_and(|face| face.glyph_index(c).is_some())
}
