//! # Configuration Session
//!
//! The facade the quoting dialogs talk to. One session configures one line
//! item for one product family.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   start(catalog) / reopen(catalog, item)                                │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   ┌────────────┐  all required selected  ┌─────────┐                    │
//! │   │  Building  │ ──────────────────────► │  Valid  │                    │
//! │   │            │ ◄────────────────────── │         │                    │
//! │   └────────────┘   required cleared      └────┬────┘                    │
//! │                                               │ commit()                │
//! │                                               ▼                         │
//! │                                         ┌───────────┐                   │
//! │                                         │ Committed │  read-only        │
//! │                                         └───────────┘                   │
//! │                                                                         │
//! │  Every state-changing mutation bumps the revision; the cached summary  │
//! │  is recomputed only when the revision moved.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use quotecraft_core::catalog::{CatalogDefinition, OptionCategory, OptionChoice};
//! use quotecraft_core::session::ConfigurationSession;
//! use quotecraft_core::Money;
//!
//! let catalog = CatalogDefinition::new("TX500", Money::from_cents(41000))
//!     .category(OptionCategory::single_choice("Output", true, vec![
//!         OptionChoice::new("420", "4-20 mA", Money::zero()),
//!         OptionChoice::new("HART", "HART", Money::from_cents(9500)),
//!     ]).in_model_number())
//!     .build()
//!     .unwrap();
//!
//! let mut session = ConfigurationSession::start(Arc::new(catalog));
//! assert!(!session.is_valid());
//!
//! session.on_select("Output", "HART").unwrap();
//! let item = session.commit().unwrap();
//! assert_eq!(item.model_number, "TX500-HART");
//! assert_eq!(item.line_total, Money::from_cents(50500));
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::OptionCatalog;
use crate::error::{SelectionResult, SessionError, SessionResult, ValidationError};
use crate::model_number;
use crate::money::Money;
use crate::pricing::{self, PriceQuote};
use crate::selection::SelectionState;
use crate::types::{PriceBreakdownLine, QuoteLineItem, SelectionValue};
use crate::validation;

// =============================================================================
// Status and Summary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// At least one required category is unselected.
    Building,
    /// Ready to commit.
    Valid,
    /// A line item was emitted; the session is read-only.
    Committed,
}

/// Everything the dialog renders after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConfigurationSummary {
    pub breakdown: Vec<PriceBreakdownLine>,
    pub unit_price: Money,
    pub quantity: u32,
    pub total: Money,
    /// Preview; may be partial while required categories are missing.
    pub model_number: String,
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    /// State revision this summary was computed from.
    pub revision: u64,
}

impl ConfigurationSummary {
    fn compute(catalog: &OptionCatalog, state: &SelectionState) -> Self {
        let PriceQuote {
            lines,
            unit_price,
            quantity,
            line_total,
        } = pricing::price(catalog, state);
        let errors = validation::validate(catalog, state);

        ConfigurationSummary {
            breakdown: lines,
            unit_price,
            quantity,
            total: line_total,
            model_number: model_number::generate(catalog, state),
            is_valid: errors.is_empty(),
            errors,
            revision: state.revision(),
        }
    }

    /// Names of the required categories still missing, in catalog order.
    pub fn missing_categories(&self) -> Vec<String> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::MissingRequired { category } => Some(category.clone()),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// Configuration Session
// =============================================================================

/// Interactive configuration of one line item.
///
/// The catalog is shared read-only; the session owns its selection state.
/// Sessions are independent and `Send`.
#[derive(Debug, Clone)]
pub struct ConfigurationSession {
    id: Uuid,
    catalog: Arc<OptionCatalog>,
    state: SelectionState,
    status: SessionStatus,
    summary: ConfigurationSummary,
}

impl ConfigurationSession {
    /// Opens a fresh session on `catalog`.
    pub fn start(catalog: Arc<OptionCatalog>) -> Self {
        let state = SelectionState::new(&catalog);
        let session = Self::with_state(catalog, state);
        debug!(
            session_id = %session.id,
            family = %session.catalog.family(),
            "Configuration session started"
        );
        session
    }

    /// Opens a new session seeded from a previously committed line item.
    ///
    /// The snapshot is re-checked against the current catalog, so removed
    /// choices or narrowed ranges surface as errors here rather than as a
    /// silently different price.
    pub fn reopen(catalog: Arc<OptionCatalog>, item: &QuoteLineItem) -> SessionResult<Self> {
        if item.product_family != catalog.family() {
            return Err(SessionError::FamilyMismatch {
                item_family: item.product_family.clone(),
                catalog_family: catalog.family().to_string(),
            });
        }

        let state = SelectionState::from_snapshot(&catalog, item)?;
        let session = Self::with_state(catalog, state);
        debug!(
            session_id = %session.id,
            model_number = %item.model_number,
            "Configuration session reopened from line item"
        );
        Ok(session)
    }

    fn with_state(catalog: Arc<OptionCatalog>, state: SelectionState) -> Self {
        let summary = ConfigurationSummary::compute(&catalog, &state);
        let status = status_for(&summary);
        ConfigurationSession {
            id: Uuid::new_v4(),
            catalog,
            state,
            status,
            summary,
        }
    }

    // =========================================================================
    // UI Events
    // =========================================================================

    pub fn on_select(
        &mut self,
        category: &str,
        value: impl Into<SelectionValue>,
    ) -> SessionResult<&ConfigurationSummary> {
        let value = value.into();
        self.mutate(|state, catalog| state.select(catalog, category, value))?;
        debug!(
            session_id = %self.id,
            category,
            revision = self.summary.revision,
            "Selection accepted"
        );
        Ok(&self.summary)
    }

    pub fn on_clear(&mut self, category: &str) -> SessionResult<&ConfigurationSummary> {
        self.mutate(|state, catalog| state.clear(catalog, category))?;
        debug!(session_id = %self.id, category, "Selection cleared");
        Ok(&self.summary)
    }

    pub fn on_toggle_extra(&mut self, code: &str, enabled: bool) -> SessionResult<&ConfigurationSummary> {
        self.mutate(|state, catalog| state.set_extra(catalog, code, enabled))?;
        debug!(session_id = %self.id, extra = code, enabled, "Extra toggled");
        Ok(&self.summary)
    }

    pub fn on_quantity_change(&mut self, quantity: i64) -> SessionResult<&ConfigurationSummary> {
        self.mutate(|state, _| state.set_quantity(quantity))?;
        debug!(session_id = %self.id, quantity, "Quantity changed");
        Ok(&self.summary)
    }

    /// Fills every unselected category with its catalog default.
    pub fn apply_defaults(&mut self) -> SessionResult<&ConfigurationSummary> {
        let mut filled = 0;
        self.mutate(|state, catalog| {
            filled = state.apply_defaults(catalog);
            Ok(())
        })?;
        debug!(session_id = %self.id, filled, "Defaults applied");
        Ok(&self.summary)
    }

    /// Runs a state mutation and refreshes the summary if anything changed.
    fn mutate<F>(&mut self, op: F) -> SessionResult<()>
    where
        F: FnOnce(&mut SelectionState, &OptionCatalog) -> SelectionResult<()>,
    {
        if self.status == SessionStatus::Committed {
            return Err(SessionError::Committed(self.id.to_string()));
        }

        op(&mut self.state, self.catalog.as_ref())?;

        if self.state.revision() != self.summary.revision {
            self.summary = ConfigurationSummary::compute(&self.catalog, &self.state);
            self.status = status_for(&self.summary);
        }
        Ok(())
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Builds the line item for the current state without committing.
    ///
    /// ## Errors
    /// `NotValid` listing the missing required categories.
    pub fn to_line_item(&self) -> SessionResult<QuoteLineItem> {
        if !self.summary.is_valid {
            return Err(SessionError::NotValid {
                missing: self.summary.missing_categories(),
            });
        }

        let extras = self
            .catalog
            .extras()
            .iter()
            .filter(|e| self.state.extra_enabled(&e.code))
            .map(|e| e.code.clone())
            .collect();

        Ok(QuoteLineItem {
            product_family: self.catalog.family().to_string(),
            model_number: self.summary.model_number.clone(),
            selections: self.state.selections().clone(),
            extras,
            breakdown: self.summary.breakdown.clone(),
            unit_price: self.summary.unit_price,
            quantity: self.summary.quantity,
            line_total: self.summary.total,
            created_at: Utc::now(),
        })
    }

    /// Emits the line item and locks the session.
    ///
    /// Either the item is returned and the session is `Committed`, or an
    /// error is returned and nothing changed.
    pub fn commit(&mut self) -> SessionResult<QuoteLineItem> {
        if self.status == SessionStatus::Committed {
            return Err(SessionError::Committed(self.id.to_string()));
        }

        let item = self.to_line_item()?;
        self.status = SessionStatus::Committed;

        info!(
            session_id = %self.id,
            model_number = %item.model_number,
            line_total = %item.line_total,
            "Configuration committed"
        );
        Ok(item)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Arc<OptionCatalog> {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn summary(&self) -> &ConfigurationSummary {
        &self.summary
    }

    pub fn is_valid(&self) -> bool {
        self.summary.is_valid
    }

    pub fn selection(&self, category: &str) -> Option<&SelectionValue> {
        self.state.selection(category)
    }

    pub fn model_number_preview(&self) -> &str {
        &self.summary.model_number
    }
}

fn status_for(summary: &ConfigurationSummary) -> SessionStatus {
    if summary.is_valid {
        SessionStatus::Valid
    } else {
        SessionStatus::Building
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
