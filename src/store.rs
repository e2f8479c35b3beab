//! YAML-backed product store
//!
//! Persistence stand-in for the catalog: bulk upsert of imported rows by
//! SKU, search, removal, and the product list handed to the renderer.

use crate::error::{CatalogError, CatalogResult};
use crate::types::{ImportedRow, Product};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub created: usize,
    pub updated: usize,
    pub total: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    products: Vec<Product>,
}

pub struct ProductStore {
    path: PathBuf,
    products: Vec<Product>,
}

impl ProductStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let products = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_yaml::from_str::<StoreFile>(&content)?.products
            }
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), products = products.len(), "opened product store");
        Ok(Self { path, products })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            products: self.products.clone(),
        };
        fs::write(&self.path, serde_yaml::to_string(&file)?)?;
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Insert new SKUs and overwrite existing ones, images included
    pub fn upsert<I>(&mut self, rows: I) -> UpsertSummary
    where
        I: IntoIterator<Item = ImportedRow>,
    {
        let mut summary = UpsertSummary::default();
        for row in rows {
            summary.total += 1;
            let incoming = Product::from(row);
            match self.products.iter_mut().find(|p| p.sku == incoming.sku) {
                Some(existing) => {
                    *existing = incoming;
                    summary.updated += 1;
                }
                None => {
                    self.products.push(incoming);
                    summary.created += 1;
                }
            }
        }
        summary
    }

    /// Case-insensitive substring match on name or SKU
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn remove(&mut self, sku: &str) -> CatalogResult<Product> {
        let idx = self
            .products
            .iter()
            .position(|p| p.sku == sku)
            .ok_or_else(|| CatalogError::NotFound(sku.to_string()))?;
        Ok(self.products.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn row(sku: &str, name: &str, price: Option<f64>, images: &[&str]) -> ImportedRow {
        ImportedRow {
            sku: sku.to_string(),
            name: name.to_string(),
            description: String::new(),
            price,
            images: images.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ProductStore::open(dir.path().join("catalog.yaml")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let dir = TempDir::new().unwrap();
        let mut store = ProductStore::open(dir.path().join("catalog.yaml")).unwrap();

        let summary = store.upsert(vec![
            row("A", "Kablo", Some(10.0), &["a_0.png", "a_1.png"]),
            row("B", "Priz", None, &[]),
        ]);
        assert_eq!(
            summary,
            UpsertSummary {
                created: 2,
                updated: 0,
                total: 2
            }
        );

        let summary = store.upsert(vec![row("A", "Kablo 2m", Some(12.0), &["a_0.png"])]);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 0);

        let a = store.get("A").unwrap();
        assert_eq!(a.name, "Kablo 2m");
        assert_eq!(a.price, Some(12.0));
        assert_eq!(a.images, vec![PathBuf::from("a_0.png")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_duplicate_skus_in_one_batch() {
        let dir = TempDir::new().unwrap();
        let mut store = ProductStore::open(dir.path().join("catalog.yaml")).unwrap();
        let summary = store.upsert(vec![row("A", "first", None, &[]), row("A", "second", None, &[])]);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(store.get("A").unwrap().name, "second");
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("catalog.yaml");
        let mut store = ProductStore::open(&path).unwrap();
        store.upsert(vec![row("A", "Kablo", Some(9.5), &["a_0.png"])]);
        store.save().unwrap();

        let reopened = ProductStore::open(&path).unwrap();
        assert_eq!(reopened.products(), store.products());
    }

    #[test]
    fn test_search() {
        let dir = TempDir::new().unwrap();
        let mut store = ProductStore::open(dir.path().join("c.yaml")).unwrap();
        store.upsert(vec![
            row("KB-1", "Bakır Kablo", None, &[]),
            row("PR-1", "Priz", None, &[]),
        ]);
        let found: Vec<&str> = store.search("kablo").iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(found, vec!["KB-1"]);
        assert_eq!(store.search("pr-").len(), 1);
        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = ProductStore::open(dir.path().join("c.yaml")).unwrap();
        store.upsert(vec![row("A", "Kablo", None, &[])]);
        assert_eq!(store.remove("A").unwrap().name, "Kablo");
        assert!(matches!(store.remove("A"), Err(CatalogError::NotFound(_))));
    }
}
