use clap::{ArgAction, Parser, Subcommand};
use ozkul_catalog::cli;
use ozkul_catalog::error::CatalogResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Spreadsheet product import and printable PDF catalogs.")]
#[command(long_about = "Catalog - Excel product import and PDF catalog rendering

Reads product sheets with embedded pictures, keeps the products in a YAML
store, and renders multi-column A4 catalogs from them.

COMMANDS:
  import  - Excel (.xlsx) with images to the product store
  export  - Product store to a flat Excel sheet
  render  - Product store to a PDF catalog
  add     - Create or replace one product by SKU
  list    - Show stored products
  remove  - Delete one product by SKU

EXAMPLES:
  catalog import urunler.xlsx                  # Import rows and images
  catalog render katalog.pdf --design modern   # Three-column catalog
  catalog render k.pdf --show-logo false       # No logo header
  catalog add KB-1 Priz --price 49.9           # Add a product by hand
  catalog list -q kablo                        # Search by name or SKU
  catalog list --json                          # Machine-readable listing

LOGGING:
  Diagnostics go to stderr. Set RUST_LOG=ozkul_catalog=debug for detail.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import products from an Excel .xlsx file.

Reads the active worksheet. Row 1 holds the headers, matched without
regard to case or surrounding spaces:

  SKU          sku, stok_kodu
  Name         name, ürün adı, urun_adi
  Description  description, açıklama
  Price        price, fiyat

Pictures anchored to a data row are saved to the uploads directory as
<sku>_<n>.png, in workbook order. Missing SKUs and names get placeholders
(SKU-00002, Ürün 2). Unreadable pictures and prices are reported as
warnings; the rest of the row is still imported.

Imported rows are upserted into the store by SKU.

EXAMPLE:
  catalog import urunler.xlsx --store catalog.yaml --uploads uploads")]
    /// Import products and pictures from an Excel .xlsx file
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,

        /// Directory extracted pictures are written to
        #[arg(long, default_value = "uploads")]
        uploads: PathBuf,

        /// Show every imported row
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export stored products to a flat Excel .xlsx sheet
    Export {
        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,
    },

    #[command(long_about = "Render stored products into a PDF catalog.

DESIGNS:
  classic  2 columns (default)
  modern   3 columns
  other    any other name renders a single column

HEADER:
  The logo and company name blocks appear when both the per-call flag
  and the configured switch allow them. The switches come from the
  --config file, overridden by ALLOW_LOGO / ALLOW_COMPANY_NAME.

EXAMPLE:
  catalog render katalog.pdf --design modern --config catalog-config.yaml")]
    /// Render stored products into a PDF catalog
    Render {
        /// Output PDF file path
        output: PathBuf,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,

        /// Layout design: classic, modern, or any other name
        #[arg(short, long, default_value = "classic")]
        design: String,

        /// Show the logo block when allowed
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        show_logo: bool,

        /// Show the company name block when allowed
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        show_company: bool,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Logo image file
        #[arg(long, env = "CATALOG_LOGO")]
        logo: Option<PathBuf>,

        /// Company name printed under the logo
        #[arg(long, env = "COMPANY_NAME")]
        company_name: Option<String>,

        /// Document title
        #[arg(long, env = "APP_TITLE")]
        title: Option<String>,

        /// Master switch for the logo block
        #[arg(long, env = "ALLOW_LOGO")]
        allow_logo: Option<bool>,

        /// Master switch for the company name block
        #[arg(long, env = "ALLOW_COMPANY_NAME")]
        allow_company_name: Option<bool>,
    },

    #[command(long_about = "Create or replace one product by SKU.

An existing product with the same SKU is replaced wholesale, images
included, the same way an import row would replace it.

EXAMPLE:
  catalog add KB-1 \"Bakır Kablo\" --price 149.9 --image uploads/KB-1_0.png")]
    /// Create or replace one product by SKU
    Add {
        /// Stock keeping unit
        sku: String,

        /// Product name
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: Option<f64>,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Image file; repeat for more images, the first is the card picture
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,
    },

    /// List stored products
    List {
        /// Case-insensitive search on name or SKU
        #[arg(short, long)]
        query: Option<String>,

        /// Print the matches as JSON
        #[arg(long)]
        json: bool,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,
    },

    /// Remove a product by SKU
    Remove {
        /// SKU of the product to delete
        sku: String,

        /// Product store file
        #[arg(long, default_value = "catalog.yaml")]
        store: PathBuf,
    },
}

fn main() -> CatalogResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ozkul_catalog=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            store,
            uploads,
            verbose,
        } => cli::import(input, store, uploads, verbose),

        Commands::Export { output, store } => cli::export(output, store),

        Commands::Render {
            output,
            store,
            design,
            show_logo,
            show_company,
            config,
            logo,
            company_name,
            title,
            allow_logo,
            allow_company_name,
        } => cli::render(
            output,
            store,
            cli::RenderOptions {
                design,
                show_logo,
                show_company,
                config,
                logo,
                company_name,
                title,
                allow_logo,
                allow_company_name,
            },
        ),

        Commands::Add {
            sku,
            name,
            price,
            description,
            images,
            store,
        } => cli::add(store, sku, name, price, description, images),

        Commands::List { query, json, store } => cli::list(store, query, json),

        Commands::Remove { sku, store } => cli::remove(store, sku),
    }
}
