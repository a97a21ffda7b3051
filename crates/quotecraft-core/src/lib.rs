//! # quotecraft-core: Configuration & Pricing Rules Engine
//!
//! This crate turns a product family's option catalog and a salesperson's
//! choices into a priced, validated, model-numbered quote line item. All
//! logic is synchronous and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteCraft Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Quoting Dialogs (presentation)                  │   │
//! │  │    pick family ──► choose options ──► review price ──► add      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ on_select / summary / commit           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ quotecraft-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │  catalog  │  │ selection │  │  pricing  │  │model_number│  │   │
//! │  │   │  Option   │  │ Selection │  │ Breakdown │  │  LS2000-H  │  │   │
//! │  │   │  Catalog  │  │   State   │  │ unit/total│  │  -115VAC   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │          session (ConfigurationSession) ties them together      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CatalogProvider / QuoteStore           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                quotecraft-db (Storage Layer)                    │   │
//! │  │           SQLite catalogs, quotes, line item snapshots          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Option catalog model and load-time integrity checks
//! - [`selection`] - Selection state and its mutation rules
//! - [`pricing`] - Itemized breakdown, unit price, line total
//! - [`validation`] - Completeness check and field validators
//! - [`model_number`] - Model number generation
//! - [`session`] - Configuration session facade
//! - [`provider`] - Catalog provider / quote store traits
//! - [`money`] - Exact decimal money
//! - [`types`] - Shared value types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: pricing, validation and model numbers are
//!    deterministic; same catalog + state = same output
//! 2. **No I/O**: database and file access belong to quotecraft-db
//! 3. **Exact Money**: fixed-point decimal; rounding only at display
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod model_number;
pub mod money;
pub mod pricing;
pub mod provider;
pub mod selection;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use quotecraft_core::Money` instead of
// `use quotecraft_core::money::Money`

pub use catalog::{
    CatalogDefinition, CategoryKind, FlatExtra, NumericRange, OptionCatalog, OptionCategory,
    OptionChoice, SelectionMode,
};
pub use error::{
    CatalogError, CatalogResult, CoreError, CoreResult, IntegrityError, SelectionError,
    SessionError, SessionResult, StoreError, StoreResult, ValidationError,
};
pub use money::Money;
pub use pricing::PriceQuote;
pub use provider::{CatalogProvider, InMemoryCatalogProvider, InMemoryQuoteStore, QuoteStore};
pub use selection::SelectionState;
pub use session::{ConfigurationSession, ConfigurationSummary, SessionStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Separator used between model number tokens when a catalog sets none.
pub const DEFAULT_MODEL_SEPARATOR: &str = "-";

/// Unit label for numeric ranges that do not name one.
pub const DEFAULT_UNIT_NAME: &str = "units";

/// Maximum length of families, choice codes and extra codes.
pub const MAX_CODE_LENGTH: usize = 50;

/// Maximum length of category and display names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest base price, adder, surcharge or extra price a catalog may declare
/// (absolute value, currency units). Keeps every priced line far from the
/// `Decimal` range even at the maximum quantity.
pub const MAX_CATALOG_AMOUNT: i64 = 100_000_000;

/// Largest absolute value a numeric-range bound may take.
pub const MAX_RANGE_MAGNITUDE: i64 = 100_000;
