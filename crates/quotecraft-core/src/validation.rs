//! # Validation Module
//!
//! Completeness checks for a configuration, plus the field validators the
//! catalog loader runs over codes and labels.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load (once per family)                               │
//! │  ├── validate_code / validate_display_name                             │
//! │  └── structural integrity (catalog.rs)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Selection mutation (every click)                             │
//! │  ├── unknown category / choice, out-of-range values                    │
//! │  └── rejected synchronously, prior state retained                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE: validate(catalog, state)                        │
//! │  ├── one MissingRequired per unselected required category              │
//! │  └── advisory: blocks only commit()                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quotecraft_core::validation::{validate_code, validate_quantity};
//!
//! validate_code("choice code", "115VAC").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::catalog::OptionCatalog;
use crate::error::ValidationError;
use crate::selection::SelectionState;
use crate::{MAX_CODE_LENGTH, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Configuration Completeness
// =============================================================================

/// Lists every required category that has no selection.
///
/// ## Rules
/// - Optional categories are always satisfied
/// - A required category is satisfied by ANY entry in the selections,
///   including a pre-seeded default
/// - Errors come back in catalog declaration order
///
/// Linear in the number of categories and side-effect free, so the session
/// re-runs it after every mutation.
///
/// ## Example
/// ```text
/// Catalog: Material (req), Voltage (req), ProbeLength (opt)
/// State:   { ProbeLength: 10 }
///      │
///      ▼
/// validate() → [MissingRequired(Material), MissingRequired(Voltage)]
/// ```
pub fn validate(catalog: &OptionCatalog, state: &SelectionState) -> Vec<ValidationError> {
    catalog
        .required_categories()
        .filter(|category| !state.is_selected(&category.name))
        .map(|category| ValidationError::MissingRequired {
            category: category.name.clone(),
        })
        .collect()
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a stable identifier (family, choice code, extra code).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - No whitespace (codes end up inside model numbers)
///
/// ## Example
/// ```rust
/// use quotecraft_core::validation::validate_code;
///
/// assert!(validate_code("code", "24VDC").is_ok());
/// assert!(validate_code("code", "").is_err());
/// assert!(validate_code("code", "24 VDC").is_err());
/// ```
pub fn validate_code(field: &str, code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' must not contain whitespace", code),
        });
    }

    Ok(())
}

/// Validates a human label (category name, choice display name).
///
/// ## Rules
/// - Must not be empty or blank
/// - At most 200 characters
pub fn validate_display_name(field: &str, name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
