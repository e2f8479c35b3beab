//! Printable PDF catalog
//!
//! Rendering runs in three steps:
//! - [`layout`] builds the story: header blocks and bands of product cards
//! - [`flow`] places the measured blocks onto A4 pages
//! - [`pdf`] draws the pages and writes the file
//!
//! Text is set in DejaVu Sans, embedded in the binary, so Turkish letters
//! and the lira sign survive into the PDF.

mod fonts;
pub mod flow;
pub mod layout;
mod pdf;
pub mod text;

use crate::error::CatalogResult;
use crate::types::{CatalogLayoutRequest, Product};
use flow::{paginate, PageGeometry};
use layout::{build_layout, CatalogLayout};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// A recoverable asset problem met while rendering
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    LogoUnavailable {
        path: PathBuf,
        reason: String,
    },
    CardImageUnavailable {
        sku: String,
        path: PathBuf,
        reason: String,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::LogoUnavailable { path, reason } => {
                write!(f, "logo {} left out ({})", path.display(), reason)
            }
            RenderWarning::CardImageUnavailable { sku, path, reason } => write!(
                f,
                "{}: image {} left out ({})",
                sku,
                path.display(),
                reason
            ),
        }
    }
}

/// Summary of a finished render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub pages: usize,
    pub bands: usize,
    pub warnings: Vec<RenderWarning>,
}

/// Renders product records into a paginated, multi-column PDF catalog
pub struct CatalogRenderer {
    request: CatalogLayoutRequest,
    geometry: PageGeometry,
}

impl CatalogRenderer {
    pub fn new(request: CatalogLayoutRequest) -> Self {
        Self {
            request,
            geometry: PageGeometry::a4(),
        }
    }

    pub fn request(&self) -> &CatalogLayoutRequest {
        &self.request
    }

    /// Build the catalog story without drawing it
    pub fn layout(&self, products: &[Product]) -> CatalogLayout {
        build_layout(products, &self.request)
    }

    /// Render `products` and write the document to `output`
    pub fn render(&self, products: &[Product], output: &Path) -> CatalogResult<RenderReport> {
        let layout = self.layout(products);
        let heights: Vec<f32> = layout.blocks.iter().map(|block| block.height()).collect();
        let pages = paginate(&heights, &self.geometry);

        let mut warnings = layout.warnings.clone();
        warnings.extend(pdf::write_pdf(
            &layout,
            &pages,
            &self.geometry,
            &self.request.title,
            output,
        )?);

        let report = RenderReport {
            pages: pages.len(),
            bands: layout.band_count(),
            warnings,
        };
        info!(
            design = %self.request.design,
            products = products.len(),
            pages = report.pages,
            bands = report.bands,
            warnings = report.warnings.len(),
            "catalog rendered"
        );
        Ok(report)
    }
}
