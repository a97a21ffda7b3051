//! # Collaborator Interfaces
//!
//! The engine's two seams to the outside world, plus in-memory
//! implementations used by tests and by callers that keep catalogs in
//! process.
//!
//! ```text
//! ┌──────────────────────┐      load_catalog(family)      ┌──────────────┐
//! │ Product Catalog      │ ─────────────────────────────► │ Configuration│
//! │ Provider             │       Arc<OptionCatalog>        │ Session      │
//! └──────────────────────┘                                 └──────┬───────┘
//!                                                                 │ commit()
//! ┌──────────────────────┐  append / replace_line_item            │
//! │ Quote Store          │ ◄──────────────────────────────────────┘
//! └──────────────────────┘
//! ```
//!
//! The SQLite implementations live in `quotecraft-db`; they are async and
//! expose the same operations as inherent methods.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::OptionCatalog;
use crate::error::{CatalogError, CatalogResult, StoreError, StoreResult};
use crate::types::{LineItemId, QuoteLineItem};

// =============================================================================
// Catalog Provider
// =============================================================================

/// Supplies validated catalogs by product family.
pub trait CatalogProvider {
    /// ## Errors
    /// `CatalogError::NotFound` for unknown families.
    fn load_catalog(&self, family: &str) -> CatalogResult<Arc<OptionCatalog>>;
}

/// Catalogs held in memory, keyed by family.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogProvider {
    catalogs: HashMap<String, Arc<OptionCatalog>>,
}

impl InMemoryCatalogProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the catalog for its family.
    pub fn insert(&mut self, catalog: OptionCatalog) {
        self.catalogs
            .insert(catalog.family().to_string(), Arc::new(catalog));
    }

    pub fn with_catalog(mut self, catalog: OptionCatalog) -> Self {
        self.insert(catalog);
        self
    }

    /// Families in alphabetical order.
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        families.sort_unstable();
        families
    }
}

impl CatalogProvider for InMemoryCatalogProvider {
    fn load_catalog(&self, family: &str) -> CatalogResult<Arc<OptionCatalog>> {
        self.catalogs
            .get(family)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(family.to_string()))
    }
}

// =============================================================================
// Quote Store
// =============================================================================

/// Receives committed line items.
pub trait QuoteStore {
    /// Stores a new line item and returns its assigned identifier.
    fn append_line_item(&mut self, item: QuoteLineItem) -> StoreResult<LineItemId>;

    /// Replaces a previously stored item (re-edit flow).
    ///
    /// ## Errors
    /// `StoreError::LineItemNotFound` when `id` was never issued.
    fn replace_line_item(&mut self, id: &LineItemId, item: QuoteLineItem) -> StoreResult<()>;
}

/// Line items of a single quote, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteStore {
    items: Vec<(LineItemId, QuoteLineItem)>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &LineItemId) -> Option<&QuoteLineItem> {
        self.items
            .iter()
            .find(|(item_id, _)| item_id == id)
            .map(|(_, item)| item)
    }

    /// Items in the order they were appended.
    pub fn items(&self) -> impl Iterator<Item = (&LineItemId, &QuoteLineItem)> {
        self.items.iter().map(|(id, item)| (id, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl QuoteStore for InMemoryQuoteStore {
    fn append_line_item(&mut self, item: QuoteLineItem) -> StoreResult<LineItemId> {
        let id = LineItemId::generate();
        debug!(line_item_id = %id, model_number = %item.model_number, "Line item appended");
        self.items.push((id.clone(), item));
        Ok(id)
    }

    fn replace_line_item(&mut self, id: &LineItemId, item: QuoteLineItem) -> StoreResult<()> {
        let slot = self
            .items
            .iter_mut()
            .find(|(item_id, _)| item_id == id)
            .ok_or_else(|| StoreError::LineItemNotFound(id.to_string()))?;
        slot.1 = item;
        debug!(line_item_id = %id, "Line item replaced");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
