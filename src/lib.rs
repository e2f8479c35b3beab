//! Ozkul Catalog - product spreadsheet import and PDF catalog rendering
//!
//! This library reads product sheets with embedded pictures, stores the
//! products, and renders them into printable multi-column catalogs.
//!
//! # Features
//!
//! - Header aliases (`stok_kodu`, `ürün adı`, `fiyat`, ...) matched without case
//! - Pictures matched to rows by their drawing anchor and saved as files
//! - Per-row degradation: broken pictures and prices become warnings
//! - Multi-column A4 layout with pagination and optional logo header
//! - Excel export of the stored products
//!
//! # Example
//!
//! ```no_run
//! use ozkul_catalog::{CatalogImporter, CatalogLayoutRequest, CatalogRenderer, Design, Product};
//! use std::path::Path;
//!
//! let report = CatalogImporter::new("urunler.xlsx", "uploads").import()?;
//! println!("Rows: {}", report.rows.len());
//!
//! let products: Vec<Product> = report.rows.into_iter().map(Product::from).collect();
//! let renderer = CatalogRenderer::new(CatalogLayoutRequest::new(Design::Modern));
//! let render = renderer.render(&products, Path::new("katalog.pdf"))?;
//! println!("Pages: {}", render.pages);
//! # Ok::<(), ozkul_catalog::error::CatalogError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use catalog::{CatalogRenderer, RenderReport, RenderWarning};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use excel::{CatalogExporter, CatalogImporter, ImportReport, ImportWarning, WarningKind};
pub use store::{ProductStore, UpsertSummary};
pub use types::{CatalogLayoutRequest, Design, ImportedRow, Product};
