use crate::catalog::CatalogRenderer;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::excel::{CatalogExporter, CatalogImporter};
use crate::store::ProductStore;
use crate::types::{Design, ImportedRow};
use colored::Colorize;
use std::path::PathBuf;

/// Layout options of the render command, after flag/env resolution
pub struct RenderOptions {
    pub design: String,
    pub show_logo: bool,
    pub show_company: bool,
    pub config: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub allow_logo: Option<bool>,
    pub allow_company_name: Option<bool>,
}

impl RenderOptions {
    /// File configuration with flag/env overrides applied
    pub fn resolve_config(&self) -> CatalogResult<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => CatalogConfig::load(path)?,
            None => CatalogConfig::default(),
        };
        if let Some(allow) = self.allow_logo {
            config.allow_logo = allow;
        }
        if let Some(allow) = self.allow_company_name {
            config.allow_company_name = allow;
        }
        if let Some(name) = &self.company_name {
            config.company_name = name.clone();
        }
        if let Some(title) = &self.title {
            config.default_title = title.clone();
        }
        if let Some(logo) = &self.logo {
            config.logo_path = Some(logo.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute the import command
pub fn import(input: PathBuf, store: PathBuf, uploads: PathBuf, verbose: bool) -> CatalogResult<()> {
    println!("{}", "📦 Catalog - Excel Import".bold().green());
    println!("   Input:   {}", input.display());
    println!("   Uploads: {}", uploads.display());
    println!("   Store:   {}\n", store.display());

    let importer = CatalogImporter::new(&input, &uploads);
    let report = importer.import()?;

    if verbose {
        println!("   Sheet: {}", report.sheet.bright_blue());
        for row in &report.rows {
            println!(
                "   {} {} ({} images)",
                row.sku.bright_blue(),
                row.name,
                row.images.len()
            );
        }
        println!();
    }

    let mut products = ProductStore::open(&store)?;
    let summary = products.upsert(report.rows.iter().cloned());
    products.save()?;

    println!("{}", "✅ Import Complete!".bold().green());
    println!("   Created: {}", summary.created);
    println!("   Updated: {}", summary.updated);
    println!("   Total:   {}", summary.total);
    println!("   Images:  {}\n", report.image_count());

    print_warnings(report.warnings.iter().map(ToString::to_string));
    Ok(())
}

/// Execute the export command
pub fn export(output: PathBuf, store: PathBuf) -> CatalogResult<()> {
    println!("{}", "📦 Catalog - Excel Export".bold().green());
    println!("   Store:  {}", store.display());
    println!("   Output: {}\n", output.display());

    let products = ProductStore::open(&store)?;
    CatalogExporter::new(products.products()).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Products: {}\n", products.len());
    Ok(())
}

/// Execute the render command
pub fn render(output: PathBuf, store: PathBuf, options: RenderOptions) -> CatalogResult<()> {
    println!("{}", "📦 Catalog - PDF Render".bold().green());
    println!("   Store:  {}", store.display());
    println!("   Design: {}", options.design.bright_yellow());
    println!("   Output: {}\n", output.display());

    let config = options.resolve_config()?;
    let request = config.layout_request(
        Design::parse(&options.design),
        options.show_logo,
        options.show_company,
    );

    let products = ProductStore::open(&store)?;
    let report = CatalogRenderer::new(request).render(products.products(), &output)?;

    println!("{}", "✅ Catalog Complete!".bold().green());
    println!("   Products: {}", products.len());
    println!("   Rows:     {}", report.bands);
    println!("   Pages:    {}\n", report.pages);

    print_warnings(report.warnings.iter().map(ToString::to_string));
    Ok(())
}

/// Execute the list command
pub fn list(store: PathBuf, query: Option<String>, json: bool) -> CatalogResult<()> {
    let products = ProductStore::open(&store)?;
    let matches = products.search(query.as_deref().unwrap_or(""));

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{}", "No products found".yellow());
        return Ok(());
    }

    for product in &matches {
        let price = product
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:<40} {:>10}  {} images",
            product.sku.bright_blue(),
            product.name,
            price,
            product.images.len()
        );
    }
    println!("\n   {} of {} products", matches.len(), products.len());
    Ok(())
}

/// Execute the add command: create or replace one product by SKU
pub fn add(
    store: PathBuf,
    sku: String,
    name: String,
    price: Option<f64>,
    description: Option<String>,
    images: Vec<PathBuf>,
) -> CatalogResult<()> {
    let row = manual_row(sku, name, price, description, images)?;
    let missing: Vec<String> = row
        .images
        .iter()
        .filter(|path| !path.is_file())
        .map(|path| format!("image {} does not exist yet", path.display()))
        .collect();

    let mut products = ProductStore::open(&store)?;
    let (sku, name) = (row.sku.clone(), row.name.clone());
    let summary = products.upsert([row]);
    products.save()?;

    let verb = if summary.created > 0 { "Added" } else { "Updated" };
    println!("{} {} ({})", format!("✅ {}", verb).bold().green(), sku, name);
    print_warnings(missing.into_iter());
    Ok(())
}

/// Validate hand-entered product fields into an importable row
fn manual_row(
    sku: String,
    name: String,
    price: Option<f64>,
    description: Option<String>,
    images: Vec<PathBuf>,
) -> CatalogResult<ImportedRow> {
    let sku = sku.trim().to_string();
    let name = name.trim().to_string();
    if sku.is_empty() {
        return Err(CatalogError::InvalidProduct("SKU cannot be empty".to_string()));
    }
    if name.is_empty() {
        return Err(CatalogError::InvalidProduct(format!("{}: name cannot be empty", sku)));
    }
    if let Some(price) = price.filter(|p| !p.is_finite() || *p < 0.0) {
        return Err(CatalogError::InvalidProduct(format!(
            "{}: price {} is not a non-negative number",
            sku, price
        )));
    }
    Ok(ImportedRow {
        sku,
        name,
        description: description.map(|d| d.trim().to_string()).unwrap_or_default(),
        price,
        images,
    })
}

/// Execute the remove command
pub fn remove(store: PathBuf, sku: String) -> CatalogResult<()> {
    let mut products = ProductStore::open(&store)?;
    let removed = products.remove(&sku)?;
    products.save()?;
    println!("{} {} ({})", "🗑  Removed".bold().green(), removed.sku, removed.name);
    Ok(())
}

fn print_warnings<I: Iterator<Item = String>>(warnings: I) {
    let warnings: Vec<String> = warnings.collect();
    if warnings.is_empty() {
        return;
    }
    println!("{}", format!("⚠️  {} warnings", warnings.len()).yellow().bold());
    for warning in warnings {
        println!("   {}", warning.yellow());
    }
    println!();
}
