//! Spreadsheet importer - Excel (.xlsx) → catalog rows with extracted images

use crate::error::{CatalogError, CatalogResult};
use crate::excel::drawing::{AnchorScan, ImageAnchor, WorkbookPackage};
use crate::excel::header::{
    cell_text, HeaderMap, PriceCell, DESCRIPTION_ALIASES, NAME_ALIASES, PRICE_ALIASES,
    SKU_ALIASES,
};
use crate::types::ImportedRow;
use calamine::{Data, Range, Reader, Xlsx};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extracted images are always written with this extension
pub const IMAGE_EXTENSION: &str = "png";

/// Where the workbook bytes come from
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Why a single embedded image was not extracted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageFailure {
    #[error("media part '{0}' is missing from the workbook")]
    MissingMedia(String),

    #[error("cannot read media part: {0}")]
    Read(String),

    #[error("cannot write image file: {0}")]
    Write(String),
}

/// A recoverable problem met while importing
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    ImageExtraction { index: usize, reason: ImageFailure },
    UnparseablePrice { raw: String },
    /// A picture whose anchor row or media target could not be read
    UnresolvedAnchor,
    /// A picture anchored to the header row or below the last data row
    OrphanImage { media: String },
    UnreadableDrawing { reason: String },
    /// An image file already written earlier in the same import, e.g. by a
    /// repeated SKU or by SKUs that sanitize to the same file name
    ImageOverwritten { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportWarning {
    /// 1-based sheet row, when the problem belongs to one
    pub row: Option<u32>,
    pub kind: WarningKind,
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "row {}: ", row)?;
        }
        match &self.kind {
            WarningKind::ImageExtraction { index, reason } => {
                write!(f, "image #{} skipped ({})", index, reason)
            }
            WarningKind::UnparseablePrice { raw } => {
                write!(f, "price '{}' is not a number, left empty", raw)
            }
            WarningKind::UnresolvedAnchor => write!(f, "picture without a readable anchor ignored"),
            WarningKind::OrphanImage { media } => {
                write!(f, "picture '{}' is not anchored to a data row", media)
            }
            WarningKind::UnreadableDrawing { reason } => {
                write!(f, "sheet drawings unreadable, images ignored ({})", reason)
            }
            WarningKind::ImageOverwritten { path } => {
                write!(f, "image {} overwrites one from an earlier row", path.display())
            }
        }
    }
}

/// Rows produced by one import run, plus everything that degraded on the way
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub sheet: String,
    pub rows: Vec<ImportedRow>,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    /// Sheet rows that were emitted with at least one degraded field
    pub fn degraded_rows(&self) -> BTreeSet<u32> {
        self.warnings.iter().filter_map(|w| w.row).collect()
    }

    pub fn image_count(&self) -> usize {
        self.rows.iter().map(|row| row.images.len()).sum()
    }

    fn push_warning(&mut self, row: Option<u32>, kind: WarningKind) {
        let warning = ImportWarning { row, kind };
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Spreadsheet importer for product workbooks
pub struct CatalogImporter {
    source: WorkbookSource,
    upload_dir: PathBuf,
}

impl CatalogImporter {
    /// Create an importer reading `path` and extracting images into `upload_dir`
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(path: P, upload_dir: Q) -> Self {
        Self {
            source: WorkbookSource::Path(path.as_ref().to_path_buf()),
            upload_dir: upload_dir.as_ref().to_path_buf(),
        }
    }

    /// Create an importer over an in-memory workbook (e.g. an upload body)
    pub fn from_bytes<Q: AsRef<Path>>(bytes: Vec<u8>, upload_dir: Q) -> Self {
        Self {
            source: WorkbookSource::Bytes(bytes),
            upload_dir: upload_dir.as_ref().to_path_buf(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Import every data row of the workbook's active sheet
    pub fn import(&self) -> CatalogResult<ImportReport> {
        let owned;
        let bytes: &[u8] = match &self.source {
            WorkbookSource::Path(path) => {
                owned = fs::read(path).map_err(|e| {
                    CatalogError::Workbook(format!("cannot read file {}: {}", path.display(), e))
                })?;
                &owned
            }
            WorkbookSource::Bytes(bytes) => bytes,
        };

        let mut package = WorkbookPackage::new(Cursor::new(bytes)).map_err(|e| {
            CatalogError::Workbook(format!("not a readable .xlsx workbook ({})", e))
        })?;
        let sheet = package.active_sheet()?;

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| CatalogError::Workbook(format!("cannot parse workbook: {}", e)))?;
        let range = workbook.worksheet_range(&sheet.name).map_err(|e| {
            CatalogError::Workbook(format!("cannot read sheet '{}': {}", sheet.name, e))
        })?;

        fs::create_dir_all(&self.upload_dir).map_err(|e| {
            CatalogError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot create {}: {}", self.upload_dir.display(), e),
            ))
        })?;

        let mut report = ImportReport {
            sheet: sheet.name.clone(),
            ..ImportReport::default()
        };

        let scan = match package.image_anchors(&sheet) {
            Ok(scan) => scan,
            Err(e) => {
                report.push_warning(
                    None,
                    WarningKind::UnreadableDrawing {
                        reason: e.to_string(),
                    },
                );
                AnchorScan::default()
            }
        };
        for _ in 0..scan.unresolved {
            report.push_warning(None, WarningKind::UnresolvedAnchor);
        }

        self.process_rows(&range, &scan, &mut package, &mut report);

        info!(
            sheet = %report.sheet,
            rows = report.rows.len(),
            images = report.image_count(),
            warnings = report.warnings.len(),
            "import finished"
        );
        Ok(report)
    }

    fn process_rows<R: Read + Seek>(
        &self,
        range: &Range<Data>,
        scan: &AnchorScan,
        package: &mut WorkbookPackage<R>,
        report: &mut ImportReport,
    ) {
        // Zero-based (row, column) of the last populated cell
        let Some((last_row, last_col)) = range.end() else {
            debug!("sheet is empty");
            return;
        };

        let headers = HeaderMap::from_cells((0..=last_col).map(|col| range.get_value((0, col))));
        debug!(columns = headers.len(), "resolved header row");

        let images_by_row = scan.by_row();
        let last_sheet_row = last_row + 1;
        let mut written = HashSet::new();

        for row in 2..=last_sheet_row {
            let record = self.read_row(range, &headers, row, report);
            let anchors = images_by_row.get(&row).map(Vec::as_slice).unwrap_or(&[]);
            let images =
                self.extract_images(&record.sku, anchors, row, package, &mut written, report);
            report.rows.push(ImportedRow { images, ..record });
        }

        for anchor in &scan.anchors {
            if anchor.row < 2 || anchor.row > last_sheet_row {
                report.push_warning(
                    Some(anchor.row),
                    WarningKind::OrphanImage {
                        media: anchor.media.clone(),
                    },
                );
            }
        }
    }

    /// Read the text fields of one 1-based sheet row
    fn read_row(
        &self,
        range: &Range<Data>,
        headers: &HeaderMap,
        row: u32,
        report: &mut ImportReport,
    ) -> ImportedRow {
        let ordinal = row - 1;
        let lookup = |aliases: &[&str]| first_value(range, headers, aliases, row);

        let sku = lookup(SKU_ALIASES)
            .and_then(cell_text)
            .unwrap_or_else(|| format!("SKU-{:05}", ordinal));
        let name = lookup(NAME_ALIASES)
            .and_then(cell_text)
            .unwrap_or_else(|| format!("Ürün {}", ordinal));
        let description = lookup(DESCRIPTION_ALIASES)
            .and_then(cell_text)
            .unwrap_or_default();

        let price = match lookup(PRICE_ALIASES).map(PriceCell::from_cell) {
            Some(PriceCell::Value(value)) => Some(value),
            Some(PriceCell::Unparseable(raw)) => {
                report.push_warning(Some(row), WarningKind::UnparseablePrice { raw });
                None
            }
            Some(PriceCell::Missing) | None => None,
        };

        ImportedRow {
            sku,
            name,
            description,
            price,
            images: Vec::new(),
        }
    }

    fn extract_images<R: Read + Seek>(
        &self,
        sku: &str,
        anchors: &[&ImageAnchor],
        row: u32,
        package: &mut WorkbookPackage<R>,
        written: &mut HashSet<PathBuf>,
        report: &mut ImportReport,
    ) -> Vec<PathBuf> {
        let stem = file_stem_for(sku);
        let mut paths = Vec::with_capacity(anchors.len());
        for (index, anchor) in anchors.iter().enumerate() {
            let out_path = self
                .upload_dir
                .join(format!("{}_{}.{}", stem, index, IMAGE_EXTENSION));
            match extract_image(package, &anchor.media, &out_path) {
                Ok(()) => {
                    debug!(row, index, path = %out_path.display(), "extracted image");
                    if !written.insert(out_path.clone()) {
                        report.push_warning(
                            Some(row),
                            WarningKind::ImageOverwritten {
                                path: out_path.clone(),
                            },
                        );
                    }
                    paths.push(out_path);
                }
                Err(reason) => {
                    report.push_warning(Some(row), WarningKind::ImageExtraction { index, reason })
                }
            }
        }
        paths
    }
}

/// First non-empty cell under any of the aliases, in alias order
fn first_value<'a>(
    range: &'a Range<Data>,
    headers: &HeaderMap,
    aliases: &[&str],
    row: u32,
) -> Option<&'a Data> {
    headers
        .resolve(aliases)
        .into_iter()
        .filter_map(|col| range.get_value((row - 1, col - 1)))
        .find(|cell| cell_text(cell).is_some())
}

fn extract_image<R: Read + Seek>(
    package: &mut WorkbookPackage<R>,
    media: &str,
    out_path: &Path,
) -> Result<(), ImageFailure> {
    let bytes = package
        .read_part(media)
        .map_err(|e| ImageFailure::Read(e.to_string()))?
        .ok_or_else(|| ImageFailure::MissingMedia(media.to_string()))?;
    fs::write(out_path, bytes).map_err(|e| {
        // Never leave a truncated file behind
        let _ = fs::remove_file(out_path);
        ImageFailure::Write(e.to_string())
    })
}

/// SKU made safe for use as a file name
fn file_stem_for(sku: &str) -> String {
    let stem: String = sku
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => stem,
    }
}
