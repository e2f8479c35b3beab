//! PDF backend: draws paginated catalog blocks with printpdf

use super::flow::{Page, PageGeometry};
use super::fonts::{has_glyph, BOLD_TTF, REGULAR_TTF};
use super::layout::{
    Band, Block, CatalogLayout, PlacedImage, TextLine, TextStyle, CARD_PADDING_MM, IMAGE_GAP_MM,
};
use super::text::text_width_mm;
use super::RenderWarning;
use crate::error::{CatalogError, CatalogResult};
use image::GenericImageView;
use printpdf::{
    Color, Greyscale, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, warn};

const LAYER_NAME: &str = "Catalog";
const IMAGE_DPI: f32 = 300.0;
const BORDER_GREY: f32 = 0.5;
const BORDER_THICKNESS_PT: f32 = 0.25;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    /// Embed the catalog faces; text is written as Unicode glyph ids
    fn embed(doc: &PdfDocumentReference) -> CatalogResult<Self> {
        let load = |bytes: &'static [u8]| {
            doc.add_external_font(bytes)
                .map_err(|e| CatalogError::Pdf(format!("cannot load font: {}", e)))
        };
        Ok(Self {
            regular: load(REGULAR_TTF)?,
            bold: load(BOLD_TTF)?,
        })
    }

    fn for_style(&self, style: TextStyle) -> &IndirectFontRef {
        if style.bold() {
            &self.bold
        } else {
            &self.regular
        }
    }
}

/// Draw `pages` of `layout` and write the document to `output`.
///
/// Images that fail to decode at this stage are skipped and reported.
pub fn write_pdf(
    layout: &CatalogLayout,
    pages: &[Page],
    geometry: &PageGeometry,
    title: &str,
    output: &Path,
) -> CatalogResult<Vec<RenderWarning>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(geometry.width), Mm(geometry.height), LAYER_NAME);
    let fonts = Fonts::embed(&doc)?;

    let mut painter = Painter {
        geometry: *geometry,
        fonts,
        warnings: Vec::new(),
    };

    for (idx, page) in pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) =
                doc.add_page(Mm(geometry.width), Mm(geometry.height), LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for placement in &page.placements {
            match &layout.blocks[placement.block] {
                Block::Logo(image) => {
                    if !painter.image(&layer, image, geometry.margin, placement.top) {
                        painter.warnings.push(RenderWarning::LogoUnavailable {
                            path: image.path.clone(),
                            reason: "cannot decode image".to_string(),
                        });
                    }
                }
                Block::Title(lines) => painter.centered_lines(&layer, lines, placement.top),
                Block::Spacer(_) => (),
                Block::Band(band) => painter.band(&layer, band, placement.top),
            }
        }
    }

    debug!(pages = pages.len(), path = %output.display(), "writing catalog document");
    save(doc, output)?;
    Ok(painter.warnings)
}

fn save(doc: PdfDocumentReference, output: &Path) -> CatalogResult<()> {
    let file = File::create(output).map_err(|e| {
        CatalogError::Pdf(format!("cannot write output {}: {}", output.display(), e))
    })?;
    doc.save(&mut BufWriter::new(file)).map_err(|e| {
        CatalogError::Pdf(format!("cannot write output {}: {}", output.display(), e))
    })
}

struct Painter {
    geometry: PageGeometry,
    fonts: Fonts,
    warnings: Vec<RenderWarning>,
}

impl Painter {
    /// PDF y coordinate of a distance measured from the page top
    fn y(&self, top: f32) -> Mm {
        Mm(self.geometry.height - top)
    }

    fn text(&self, layer: &PdfLayerReference, line: &TextLine, x: f32, top: f32) {
        let size = line.style.size_pt();
        if line
            .text
            .chars()
            .any(|c| !c.is_whitespace() && !has_glyph(c, line.style.bold()))
        {
            warn!(text = %line.text, "characters without a glyph are left out");
        }
        // Baseline sits at roughly 80% of the line box
        let baseline = top + line.style.line_height_mm() * 0.8;
        layer.use_text(
            line.text.clone(),
            size,
            Mm(x),
            self.y(baseline),
            self.fonts.for_style(line.style),
        );
    }

    fn centered_lines(&self, layer: &PdfLayerReference, lines: &[TextLine], top: f32) {
        let mut cursor = top;
        for line in lines {
            let width = text_width_mm(&line.text, line.style.size_pt(), line.style.bold());
            let x = ((self.geometry.width - width) / 2.0).max(self.geometry.margin);
            self.text(layer, line, x, cursor);
            cursor += line.style.line_height_mm();
        }
    }

    /// Draw an image with its top-left corner at (`x`, `top`), stretched to
    /// the placed size. Returns false when the file cannot be decoded.
    fn image(&self, layer: &PdfLayerReference, placed: &PlacedImage, x: f32, top: f32) -> bool {
        let decoded = match image::io::Reader::open(&placed.path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| e.to_string())
            .and_then(|reader| reader.decode().map_err(|e| e.to_string()))
        {
            Ok(decoded) => decoded,
            Err(reason) => {
                warn!(path = %placed.path.display(), %reason, "image not drawn");
                return false;
            }
        };

        let (px_w, px_h) = decoded.dimensions();
        let (px_w, px_h) = (px_w.max(1), px_h.max(1));
        let natural_w = px_w as f32 / IMAGE_DPI * 25.4;
        let natural_h = px_h as f32 / IMAGE_DPI * 25.4;

        let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
        Image::from_dynamic_image(&rgb).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(self.y(top + placed.height)),
                scale_x: Some(placed.width / natural_w),
                scale_y: Some(placed.height / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        true
    }

    fn border(&self, layer: &PdfLayerReference, x: f32, top: f32, width: f32, height: f32) {
        let (left, right) = (Mm(x), Mm(x + width));
        let (upper, lower) = (self.y(top), self.y(top + height));
        layer.set_outline_color(Color::Greyscale(Greyscale::new(BORDER_GREY, None)));
        layer.set_outline_thickness(BORDER_THICKNESS_PT);
        layer.add_line(Line {
            points: vec![
                (Point::new(left, upper), false),
                (Point::new(right, upper), false),
                (Point::new(right, lower), false),
                (Point::new(left, lower), false),
            ],
            is_closed: true,
        });
    }

    fn band(&mut self, layer: &PdfLayerReference, band: &Band, top: f32) {
        for (slot, card) in band.cards.iter().enumerate() {
            let x = self.geometry.margin + slot as f32 * band.column_width;
            self.border(layer, x, top, band.column_width, card.height());

            let inner_x = x + CARD_PADDING_MM;
            let mut cursor = top + CARD_PADDING_MM;
            if let Some(image) = &card.image {
                if !self.image(layer, image, inner_x, cursor) {
                    self.warnings.push(RenderWarning::CardImageUnavailable {
                        sku: card.sku.clone(),
                        path: image.path.clone(),
                        reason: "cannot decode image".to_string(),
                    });
                }
                // Keep the reserved space so band heights stay as measured
                cursor += image.height + IMAGE_GAP_MM;
            }
            for line in &card.lines {
                self.text(layer, line, inner_x, cursor);
                cursor += line.style.line_height_mm();
            }
        }
    }
}
