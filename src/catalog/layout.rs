//! Catalog story building
//!
//! Turns products and a layout request into an ordered list of blocks
//! (header, spacer, card bands) with measured heights. Where blocks land on
//! pages is decided later by [`super::flow`].

use super::text::{truncate_chars, wrap, PT_TO_MM};
use super::RenderWarning;
use crate::types::{CatalogLayoutRequest, Product};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 12.0;

pub const LOGO_WIDTH_MM: f32 = 120.0 * PT_TO_MM;
pub const LOGO_HEIGHT_MM: f32 = 40.0 * PT_TO_MM;
pub const HEADER_SPACER_MM: f32 = 6.0;

/// Inner padding on each side of a card; the card image spans the rest
pub const CARD_PADDING_MM: f32 = 5.0 * PT_TO_MM;
pub const IMAGE_ASPECT: f32 = 0.75;
pub const IMAGE_GAP_MM: f32 = 1.5;
/// Space below every full band
pub const BAND_GAP_MM: f32 = 10.0 * PT_TO_MM;
pub const DESCRIPTION_MAX_CHARS: usize = 240;

const LEADING: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Heading,
    Body,
}

impl TextStyle {
    pub fn size_pt(self) -> f32 {
        match self {
            TextStyle::Title => 18.0,
            TextStyle::Heading => 11.0,
            TextStyle::Body => 9.0,
        }
    }

    pub fn bold(self) -> bool {
        matches!(self, TextStyle::Title | TextStyle::Heading)
    }

    pub fn line_height_mm(self) -> f32 {
        self.size_pt() * LEADING * PT_TO_MM
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub path: PathBuf,
    pub width: f32,
    pub height: f32,
}

/// One product's block: optional image over a few lines of text
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub sku: String,
    pub image: Option<PlacedImage>,
    pub lines: Vec<TextLine>,
}

impl Card {
    pub fn height(&self) -> f32 {
        let image = self
            .image
            .as_ref()
            .map(|img| img.height + IMAGE_GAP_MM)
            .unwrap_or(0.0);
        let text: f32 = self.lines.iter().map(|l| l.style.line_height_mm()).sum();
        CARD_PADDING_MM * 2.0 + image + text
    }
}

/// A horizontal row of cards
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub cards: Vec<Card>,
    pub column_width: f32,
    pub bottom_gap: f32,
}

impl Band {
    /// Number of column slots; a trailing band only spans its own cards
    pub fn slots(&self) -> usize {
        self.cards.len()
    }

    pub fn width(&self) -> f32 {
        self.column_width * self.slots() as f32
    }

    pub fn height(&self) -> f32 {
        let tallest = self.cards.iter().map(Card::height).fold(0.0, f32::max);
        tallest + self.bottom_gap
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Logo(PlacedImage),
    Title(Vec<TextLine>),
    Spacer(f32),
    Band(Band),
}

impl Block {
    pub fn height(&self) -> f32 {
        match self {
            Block::Logo(img) => img.height,
            Block::Title(lines) => lines.iter().map(|l| l.style.line_height_mm()).sum(),
            Block::Spacer(h) => *h,
            Block::Band(band) => band.height(),
        }
    }
}

/// The full catalog story, in reading order
#[derive(Debug, Clone, Default)]
pub struct CatalogLayout {
    pub columns: usize,
    pub column_width: f32,
    pub blocks: Vec<Block>,
    pub warnings: Vec<RenderWarning>,
}

impl CatalogLayout {
    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Band(band) => Some(band),
            _ => None,
        })
    }

    pub fn band_count(&self) -> usize {
        self.bands().count()
    }

    pub fn has_logo(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Logo(_)))
    }

    pub fn has_company(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Title(_)))
    }
}

pub fn column_width(columns: usize) -> f32 {
    (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / columns.max(1) as f32
}

/// Build the catalog story for `products`
pub fn build_layout(products: &[Product], request: &CatalogLayoutRequest) -> CatalogLayout {
    let columns = request.design.columns();
    let col_w = column_width(columns);
    let mut layout = CatalogLayout {
        columns,
        column_width: col_w,
        ..CatalogLayout::default()
    };

    if request.show_logo {
        if let Some(path) = &request.logo_path {
            match check_image(path) {
                Ok(()) => layout.blocks.push(Block::Logo(PlacedImage {
                    path: path.clone(),
                    width: LOGO_WIDTH_MM,
                    height: LOGO_HEIGHT_MM,
                })),
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "logo skipped");
                    layout.warnings.push(RenderWarning::LogoUnavailable {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }
    }

    if request.show_company && !request.company_name.trim().is_empty() {
        let lines = wrap(
            &request.company_name,
            PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
            TextStyle::Title.size_pt(),
            true,
        )
        .into_iter()
        .map(|text| TextLine {
            text,
            style: TextStyle::Title,
        })
        .collect();
        layout.blocks.push(Block::Title(lines));
    }

    layout.blocks.push(Block::Spacer(HEADER_SPACER_MM));

    let mut pending: Vec<Card> = Vec::with_capacity(columns);
    for product in products {
        let card = build_card(product, request, col_w, &mut layout.warnings);
        pending.push(card);
        if pending.len() == columns {
            layout.blocks.push(Block::Band(Band {
                cards: std::mem::take(&mut pending),
                column_width: col_w,
                bottom_gap: BAND_GAP_MM,
            }));
        }
    }
    if !pending.is_empty() {
        layout.blocks.push(Block::Band(Band {
            cards: pending,
            column_width: col_w,
            bottom_gap: 0.0,
        }));
    }

    debug!(
        design = %request.design,
        columns,
        bands = layout.band_count(),
        "catalog layout built"
    );
    layout
}

fn build_card(
    product: &Product,
    request: &CatalogLayoutRequest,
    col_w: f32,
    warnings: &mut Vec<RenderWarning>,
) -> Card {
    let inner_w = col_w - 2.0 * CARD_PADDING_MM;

    let image = product.primary_image().and_then(|path| match check_image(path) {
        Ok(()) => Some(PlacedImage {
            path: path.clone(),
            width: inner_w,
            height: inner_w * IMAGE_ASPECT,
        }),
        Err(reason) => {
            warn!(sku = %product.sku, path = %path.display(), %reason, "card image skipped");
            warnings.push(RenderWarning::CardImageUnavailable {
                sku: product.sku.clone(),
                path: path.clone(),
                reason,
            });
            None
        }
    });

    let mut lines = Vec::new();
    let mut push_wrapped = |text: &str, style: TextStyle| {
        for line in wrap(text, inner_w, style.size_pt(), style.bold()) {
            lines.push(TextLine { text: line, style });
        }
    };

    push_wrapped(&product.name, TextStyle::Heading);
    push_wrapped(&format!("SKU: {}", product.sku), TextStyle::Body);
    if let Some(price) = product.price {
        push_wrapped(&price_line(price, request), TextStyle::Body);
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        push_wrapped(
            &truncate_chars(description, DESCRIPTION_MAX_CHARS),
            TextStyle::Body,
        );
    }

    Card {
        sku: product.sku.clone(),
        image,
        lines,
    }
}

pub fn price_line(price: f64, request: &CatalogLayoutRequest) -> String {
    format!(
        "{}: {:.2} {}",
        request.price_label, price, request.currency_suffix
    )
}

/// Check that a file exists and carries a decodable image header
fn check_image(path: &Path) -> Result<(), String> {
    if !path.is_file() {
        return Err("file not found".to_string());
    }
    image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())?
        .into_dimensions()
        .map(|_| ())
        .map_err(|e| e.to_string())
}
