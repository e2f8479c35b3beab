use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("import failed: {0}")]
    Workbook(String),

    #[error("import failed: broken workbook container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("import failed: malformed workbook part: {0}")]
    Xml(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("catalog failed: {0}")]
    Pdf(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),
}

impl From<quick_xml::Error> for CatalogError {
    fn from(error: quick_xml::Error) -> Self {
        CatalogError::Xml(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for CatalogError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        CatalogError::Xml(error.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for CatalogError {
    fn from(error: quick_xml::encoding::EncodingError) -> Self {
        CatalogError::Xml(error.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CatalogError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        CatalogError::Export(error.to_string())
    }
}
