use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

//==============================================================================
// Records
//==============================================================================

/// One normalized data row produced by the spreadsheet importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRow {
    pub sku: String,
    pub name: String,
    /// Never null; missing descriptions are empty strings
    pub description: String,
    pub price: Option<f64>,
    /// Extracted image files, in visual order within the source row
    pub images: Vec<PathBuf>,
}

/// A stored product, as consumed by the catalog renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<PathBuf>,
}

impl Product {
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: None,
            price: None,
            images: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.images.push(path.into());
        self
    }

    /// Primary image shown on the catalog card
    pub fn primary_image(&self) -> Option<&PathBuf> {
        self.images.first()
    }
}

impl From<ImportedRow> for Product {
    fn from(row: ImportedRow) -> Self {
        Self {
            sku: row.sku,
            name: row.name,
            description: if row.description.is_empty() {
                None
            } else {
                Some(row.description)
            },
            price: row.price,
            images: row.images,
        }
    }
}

//==============================================================================
// Catalog layout
//==============================================================================

/// Catalog design variant, which fixes the number of card columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Design {
    #[default]
    Classic,
    Modern,
    /// Any other name; rendered as a single column list
    Other(String),
}

impl Design {
    pub fn parse(name: &str) -> Self {
        match name {
            "classic" => Design::Classic,
            "modern" => Design::Modern,
            other => Design::Other(other.to_string()),
        }
    }

    pub fn columns(&self) -> usize {
        match self {
            Design::Classic => 2,
            Design::Modern => 3,
            Design::Other(_) => 1,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Design::Classic => "classic",
            Design::Modern => "modern",
            Design::Other(name) => name,
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the renderer needs besides the products themselves
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLayoutRequest {
    pub design: Design,
    pub show_logo: bool,
    pub show_company: bool,
    pub logo_path: Option<PathBuf>,
    pub company_name: String,
    /// Document title written into the PDF metadata
    pub title: String,
    pub price_label: String,
    pub currency_suffix: String,
}

impl Default for CatalogLayoutRequest {
    fn default() -> Self {
        Self {
            design: Design::Classic,
            show_logo: true,
            show_company: true,
            logo_path: None,
            company_name: String::new(),
            title: "Catalog".to_string(),
            price_label: "Fiyat".to_string(),
            currency_suffix: "₺".to_string(),
        }
    }
}

impl CatalogLayoutRequest {
    pub fn new(design: Design) -> Self {
        Self {
            design,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_columns() {
        assert_eq!(Design::parse("classic").columns(), 2);
        assert_eq!(Design::parse("modern").columns(), 3);
        assert_eq!(Design::parse("minimal").columns(), 1);
        assert_eq!(Design::parse("Classic").columns(), 1);
    }

    #[test]
    fn test_design_default_is_classic() {
        assert_eq!(Design::default(), Design::Classic);
        assert_eq!(CatalogLayoutRequest::default().design.to_string(), "classic");
    }

    #[test]
    fn test_product_from_row_drops_empty_description() {
        let row = ImportedRow {
            sku: "A-1".to_string(),
            name: "Kablo".to_string(),
            description: String::new(),
            price: Some(12.5),
            images: vec![PathBuf::from("uploads/A-1_0.png")],
        };
        let product = Product::from(row);
        assert_eq!(product.description, None);
        assert_eq!(product.price, Some(12.5));
        assert_eq!(
            product.primary_image(),
            Some(&PathBuf::from("uploads/A-1_0.png"))
        );
    }
}
