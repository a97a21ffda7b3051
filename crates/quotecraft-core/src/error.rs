//! # Error Types
//!
//! Domain-specific error types for quotecraft-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quotecraft-core errors (this file)                                    │
//! │  ├── CatalogError     - Catalog cannot be loaded (fatal to a session)  │
//! │  ├── SelectionError   - Mutation rejected, prior state retained        │
//! │  ├── ValidationError  - Advisory; blocks only commit()                 │
//! │  ├── SessionError     - commit()/lifecycle failures                    │
//! │  ├── StoreError       - Quote store failures                           │
//! │  └── CoreError        - Umbrella for callers that mix the above        │
//! │                                                                         │
//! │  quotecraft-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (category, code, value)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is fatal to the process; every error is local to its call

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Catalog Errors
// =============================================================================

/// A catalog failed its load-time integrity checks.
///
/// The family is rejected as a whole: configuration must not begin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("catalog family identifier is empty")]
    EmptyFamily,

    #[error("base price {0} is negative")]
    NegativeBasePrice(Decimal),

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("required category '{0}' has no choices")]
    NoChoices(String),

    #[error("category '{category}' declares choice code '{code}' twice")]
    DuplicateChoice { category: String, code: String },

    /// `min_value <= base_value <= max_value` does not hold.
    #[error("category '{category}' has invalid range: min {min}, base {base}, max {max}")]
    InvalidRange {
        category: String,
        min: Decimal,
        base: Decimal,
        max: Decimal,
    },

    #[error("category '{0}' has a negative unit surcharge")]
    NegativeSurcharge(String),

    #[error("duplicate extra '{0}'")]
    DuplicateExtra(String),

    /// A price or range bound beyond the catalog limits.
    #[error("{field} value {value} is outside the allowed magnitude {limit}")]
    OutOfBounds {
        field: String,
        value: Decimal,
        limit: Decimal,
    },

    /// A code or unit suffix contains the model number separator, so the
    /// model number could not be split back into tokens.
    #[error("'{value}' contains the model number separator '{separator}'")]
    SeparatorInToken { value: String, separator: String },

    /// A code or display name failed field validation.
    #[error("invalid field in catalog: {0}")]
    Field(#[from] ValidationError),
}

/// Errors raised while obtaining a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No catalog exists for the requested product family.
    #[error("Catalog not found for product family: {0}")]
    NotFound(String),

    /// The catalog exists but is malformed.
    #[error("Catalog integrity error in {family}: {source}")]
    Integrity {
        family: String,
        #[source]
        source: IntegrityError,
    },
}

impl CatalogError {
    pub fn integrity(family: impl Into<String>, source: IntegrityError) -> Self {
        CatalogError::Integrity {
            family: family.into(),
            source,
        }
    }
}

// =============================================================================
// Selection Errors
// =============================================================================

/// A selection mutation was rejected.
///
/// ## User Workflow
/// ```text
/// Salesperson types probe length 200
///      │
///      ▼
/// select("ProbeLength", 200)
///      │
///      ▼
/// OutOfRange { category: "ProbeLength", value: 200, min: 6, max: 120 }
///      │
///      ▼
/// UI shows: "ProbeLength must be between 6 and 120" (state unchanged)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The code is not offered by the category, or the value kind does not
    /// match the category kind (numeric value for a single-choice axis).
    #[error("Invalid choice '{value}' for category {category}")]
    InvalidChoice { category: String, value: String },

    #[error("{category} must be between {min} and {max}, got {value}")]
    OutOfRange {
        category: String,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Required categories cannot be returned to "unselected".
    #[error("Category {0} is required and cannot be cleared")]
    RequiredCategory(String),

    #[error("Unknown extra: {0}")]
    UnknownExtra(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Completeness and field validation failures.
///
/// `MissingRequired` is advisory: it accumulates in the session summary and
/// only blocks `commit()`. The field-level variants are raised while a
/// catalog is loaded.
///
/// Serialized into the session summary as `{"kind": "missing_required", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required category has no selection.
    #[error("{category} must be selected")]
    MissingRequired { category: String },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., whitespace in a choice code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Session Error
// =============================================================================

/// Configuration session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `commit()` or `to_line_item()` called while required categories are
    /// still unselected. Recoverable by continuing to edit.
    #[error("Configuration is not valid; missing: {}", missing.join(", "))]
    NotValid { missing: Vec<String> },

    /// The session was committed and is now read-only.
    #[error("Configuration session {0} is already committed")]
    Committed(String),

    /// A stored line item was reopened against another family's catalog.
    #[error("Line item belongs to {item_family}, catalog is {catalog_family}")]
    FamilyMismatch {
        item_family: String,
        catalog_family: String,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// =============================================================================
// Store Error
// =============================================================================

/// Quote store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// Storage backend failure (wrapped message from the backend).
    #[error("Quote store backend error: {0}")]
    Backend(String),
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that drive the whole engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type SelectionResult<T> = Result<T, SelectionError>;
pub type SessionResult<T> = Result<T, SessionError>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_error_messages() {
        let err = SelectionError::OutOfRange {
            category: "ProbeLength".to_string(),
            value: Decimal::from(200),
            min: Decimal::from(6),
            max: Decimal::from(120),
        };
        assert_eq!(
            err.to_string(),
            "ProbeLength must be between 6 and 120, got 200"
        );

        let err = SelectionError::InvalidQuantity(0);
        assert_eq!(err.to_string(), "Quantity must be at least 1, got 0");
    }

    #[test]
    fn test_not_valid_lists_missing_categories() {
        let err = SessionError::NotValid {
            missing: vec!["Material".to_string(), "Voltage".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Configuration is not valid; missing: Material, Voltage"
        );
    }

    #[test]
    fn test_catalog_integrity_message() {
        let err = CatalogError::integrity(
            "LS2000",
            IntegrityError::DuplicateCategory("Material".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Catalog integrity error in LS2000: duplicate category 'Material'"
        );
    }

    #[test]
    fn test_validation_error_json_shape() {
        let err = ValidationError::MissingRequired {
            category: "Voltage".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"missing_required","category":"Voltage"}"#);
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let err: CoreError = SelectionError::UnknownCategory("Color".to_string()).into();
        assert!(matches!(err, CoreError::Selection(_)));

        let err: SessionError = SelectionError::InvalidQuantity(-1).into();
        assert!(matches!(err, SessionError::Selection(_)));
    }
}
