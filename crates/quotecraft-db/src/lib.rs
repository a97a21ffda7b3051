//! # quotecraft-db: Storage Layer for QuoteCraft
//!
//! Catalog provider and quote store backed by SQLite (sqlx), plus the
//! configuration file and the sample catalogs used by the seed binary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteCraft Data Flow                             │
//! │                                                                         │
//! │  Quoting dialog opens "LS2000"                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  quotecraft-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ QuoteRepo      │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   QuoteConfig (quotecraft.toml + QUOTECRAFT_* env)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<OptionCatalog> → ConfigurationSession (quotecraft-core)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog and quote repositories
//! - [`config`] - `quotecraft.toml` loading
//! - [`samples`] - Built-in sample catalogs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotecraft_core::ConfigurationSession;
//! use quotecraft_db::{Database, QuoteConfig};
//!
//! let config = QuoteConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let catalog = db.catalogs().load_catalog("LS2000").await?;
//! let mut session = ConfigurationSession::start(catalog);
//! session.apply_defaults()?;
//!
//! let quote = db.quotes().create_quote(Some("Acme Chemical")).await?;
//! db.quotes().append_line_item(&quote.id, &session.commit()?).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod samples;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, QuoteConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::CatalogRepository;
pub use repository::quote::QuoteRepository;
