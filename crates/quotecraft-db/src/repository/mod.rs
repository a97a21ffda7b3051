//! # Repository Module
//!
//! SQLite repositories behind the engine's collaborator seams.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Quoting dialog                                                        │
//! │       │                                                                 │
//! │       │  db.catalogs().load_catalog("LS2000")                          │
//! │       ▼                                                                 │
//! │  CatalogRepository            QuoteRepository                          │
//! │  ├── upsert                   ├── create_quote / get_quote             │
//! │  ├── load_catalog             ├── append_line_item                     │
//! │  ├── list_families            ├── replace_line_item                    │
//! │  └── delete                   ├── get_line_item / list_line_items      │
//! │       │                       └── quote_total                          │
//! │       ▼                              │                                  │
//! │  catalogs table               quotes, quote_line_items tables          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both repositories are async; the engine itself stays synchronous and
//! only meets them at catalog load and line item persistence.

pub mod catalog;
pub mod quote;
