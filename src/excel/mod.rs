//! Excel import/export for product catalogs
//!
//! - Import: Excel (.xlsx) → normalized rows, with embedded pictures
//!   extracted to an upload directory
//! - Export: products → flat Excel (.xlsx)

pub mod drawing;
mod exporter;
pub mod header;
mod importer;

pub use exporter::{CatalogExporter, EXPORT_HEADERS};
pub use importer::{
    CatalogImporter, ImageFailure, ImportReport, ImportWarning, WarningKind, WorkbookSource,
    IMAGE_EXTENSION,
};
