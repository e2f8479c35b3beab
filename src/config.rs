//! Catalog configuration
//!
//! Replaces process-wide flags with an explicit object handed to the core
//! at call time. Values come from an optional YAML file; the CLI layers
//! flags and environment variables on top.

use crate::error::{CatalogError, CatalogResult};
use crate::types::{CatalogLayoutRequest, Design};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Master switch for the logo header block
    pub allow_logo: bool,
    /// Master switch for the company name block
    pub allow_company_name: bool,
    pub company_name: String,
    pub default_title: String,
    pub logo_path: Option<PathBuf>,
    pub currency_suffix: String,
    pub price_label: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            allow_logo: true,
            allow_company_name: true,
            company_name: "ÖZKUL ELEKTRONİK".to_string(),
            default_title: "Ozkul Catalog".to_string(),
            logo_path: None,
            currency_suffix: "₺".to_string(),
            price_label: "Fiyat".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a YAML file; absent keys keep their defaults
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.default_title.trim().is_empty() {
            return Err(CatalogError::Config(
                "default_title must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the effective layout request for one render call.
    ///
    /// Per-call flags can only narrow what the configuration allows.
    pub fn layout_request(
        &self,
        design: Design,
        show_logo: bool,
        show_company: bool,
    ) -> CatalogLayoutRequest {
        CatalogLayoutRequest {
            design,
            show_logo: show_logo && self.allow_logo,
            show_company: show_company && self.allow_company_name,
            logo_path: if self.allow_logo {
                self.logo_path.clone()
            } else {
                None
            },
            company_name: self.company_name.clone(),
            title: self.default_title.clone(),
            price_label: self.price_label.clone(),
            currency_suffix: self.currency_suffix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert!(config.allow_logo);
        assert!(config.allow_company_name);
        assert_eq!(config.company_name, "ÖZKUL ELEKTRONİK");
        assert_eq!(config.default_title, "Ozkul Catalog");
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, "allow_logo: false\ncompany_name: ACME\n").unwrap();

        let config = CatalogConfig::load(&path).unwrap();
        assert!(!config.allow_logo);
        assert!(config.allow_company_name);
        assert_eq!(config.company_name, "ACME");
        assert_eq!(config.currency_suffix, "₺");
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(CatalogConfig::load(&path).unwrap(), CatalogConfig::default());
    }

    #[test]
    fn test_load_rejects_blank_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "default_title: '  '\n").unwrap();
        assert!(matches!(
            CatalogConfig::load(&path),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_layout_request_respects_master_switches() {
        let config = CatalogConfig {
            allow_logo: false,
            allow_company_name: false,
            logo_path: Some(PathBuf::from("logo.png")),
            ..CatalogConfig::default()
        };
        let request = config.layout_request(Design::Modern, true, true);
        assert!(!request.show_logo);
        assert!(!request.show_company);
        assert_eq!(request.logo_path, None);
        assert_eq!(request.design, Design::Modern);
    }

    #[test]
    fn test_layout_request_passes_flags_through() {
        let config = CatalogConfig {
            logo_path: Some(PathBuf::from("logo.png")),
            ..CatalogConfig::default()
        };
        let request = config.layout_request(Design::Classic, false, true);
        assert!(!request.show_logo);
        assert!(request.show_company);
        assert_eq!(request.logo_path, Some(PathBuf::from("logo.png")));
        assert_eq!(request.title, "Ozkul Catalog");
    }
}
