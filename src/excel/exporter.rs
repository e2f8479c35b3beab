//! Flat catalog export - products → Excel (.xlsx)

use crate::error::{CatalogError, CatalogResult};
use crate::types::Product;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

/// Fixed export column order
pub const EXPORT_HEADERS: [&str; 5] = ["SKU", "Name", "Description", "Price", "ImagePaths"];

/// Writes products as one flat worksheet, one row per product
pub struct CatalogExporter<'a> {
    products: &'a [Product],
}

impl<'a> CatalogExporter<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        Self { products }
    }

    /// Export the products to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> CatalogResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Products")?;

        let bold = Format::new().set_bold();
        for (col, header) in EXPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }

        for (idx, product) in self.products.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, &product.sku)?;
            worksheet.write_string(row, 1, &product.name)?;
            worksheet.write_string(row, 2, product.description.as_deref().unwrap_or(""))?;
            if let Some(price) = product.price {
                worksheet.write_number(row, 3, price)?;
            }
            worksheet.write_string(row, 4, &join_image_paths(product))?;
        }

        worksheet.set_column_width(1, 32)?;
        worksheet.set_column_width(2, 48)?;

        workbook.save(output_path).map_err(|e| {
            CatalogError::Export(format!("cannot write {}: {}", output_path.display(), e))
        })?;

        info!(products = self.products.len(), path = %output_path.display(), "export finished");
        Ok(())
    }
}

fn join_image_paths(product: &Product) -> String {
    product
        .images
        .iter()
        .map(|path| path.to_string_lossy())
        .collect::<Vec<_>>()
        .join(",")
}
