//! # Catalog Seeder
//!
//! Loads option catalogs into the database for development and demos.
//!
//! ## Usage
//! ```bash
//! # Built-in LS2000 + TX500 catalogs into the configured database
//! cargo run -p quotecraft-db --bin seed
//!
//! # Catalogs from a JSON file (array of catalog definitions)
//! cargo run -p quotecraft-db --bin seed -- --catalogs ./catalogs.json
//!
//! # Specific database, replacing families that already exist
//! cargo run -p quotecraft-db --bin seed -- --db ./quotecraft_dev.db --force
//! ```
//!
//! Every catalog passes the same integrity checks as at session start; one
//! malformed definition aborts the run before anything is written.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quotecraft_core::{CatalogDefinition, ConfigurationSession, OptionCatalog};
use quotecraft_db::{samples, Database, QuoteConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,quotecraft=debug,sqlx=warn")),
        )
        .init();

    let mut config = QuoteConfig::load_or_default(None);
    let mut force = false;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database.path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--catalogs" | "-c" => {
                if i + 1 < args.len() {
                    config.catalog.seed_file = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("QuoteCraft Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: from quotecraft.toml)");
                println!("  -c, --catalogs <FILE>   JSON catalog file (default: built-in samples)");
                println!("  -f, --force             Replace catalogs that already exist");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let catalogs = match &config.catalog.seed_file {
        Some(path) => load_catalog_file(path)?,
        None => samples::all()?,
    };

    println!("QuoteCraft Catalog Seeder");
    println!("=========================");
    println!("Database: {}", config.database_path().display());
    println!("Catalogs: {}", catalogs.len());
    println!();

    if let Some(parent) = config.database_path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    let existing = db.catalogs().list_families().await?;

    let mut written = 0;
    for catalog in catalogs {
        if existing.iter().any(|f| f == catalog.family()) && !force {
            println!("- {} already present, skipping (use --force to replace)", catalog.family());
            continue;
        }

        db.catalogs().upsert(&catalog).await?;
        written += 1;

        let preview = default_preview(catalog);
        println!(
            "✓ {:<8} {:<28} from {}",
            preview.family,
            preview.model_number,
            config.format_money(preview.unit_price)
        );
    }

    println!();
    println!("✓ Seed complete: {} catalog(s) written", written);
    info!(written, "Seed complete");

    db.close().await;
    Ok(())
}

struct Preview {
    family: String,
    model_number: String,
    unit_price: quotecraft_core::Money,
}

/// Prices the all-defaults configuration of a catalog.
fn default_preview(catalog: OptionCatalog) -> Preview {
    let family = catalog.family().to_string();
    let mut session = ConfigurationSession::start(Arc::new(catalog));
    if let Err(e) = session.apply_defaults() {
        warn!(family = %family, error = %e, "Could not apply defaults");
    }

    let summary = session.summary();
    Preview {
        family,
        model_number: summary.model_number.clone(),
        unit_price: summary.unit_price,
    }
}

/// Reads a JSON array of catalog definitions and validates each one.
fn load_catalog_file(path: &Path) -> Result<Vec<OptionCatalog>, Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Loading catalogs from file");
    let contents = std::fs::read_to_string(path)?;
    let definitions: Vec<CatalogDefinition> = serde_json::from_str(&contents)?;

    let mut catalogs = Vec::with_capacity(definitions.len());
    for definition in definitions {
        catalogs.push(definition.build()?);
    }
    Ok(catalogs)
}
