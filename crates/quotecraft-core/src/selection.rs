//! # Selection State
//!
//! The user's in-progress choices for one configuration.
//!
//! ## Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Selection State Operations                           │
//! │                                                                         │
//! │  Operation              Checked against catalog       On success        │
//! │  ─────────              ───────────────────────       ──────────        │
//! │  select(cat, value)     category exists, code         selections[cat]   │
//! │                         offered / value in range      revision += 1     │
//! │                                                                         │
//! │  clear(cat)             category exists, optional     remove entry      │
//! │                                                       revision += 1     │
//! │                                                                         │
//! │  set_extra(code, on)    extra exists                  extras ± code     │
//! │                                                       revision += 1     │
//! │                                                                         │
//! │  set_quantity(n)        n >= 1                        quantity = n      │
//! │                                                       revision += 1     │
//! │                                                                         │
//! │  NOTE: a rejected call changes NOTHING, revision included; an         │
//! │        accepted call that leaves the state as it was keeps revision.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The revision counter is the cache-invalidation signal the configuration
//! session uses to decide whether pricing and validation must be recomputed.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::catalog::{CategoryKind, OptionCatalog, OptionCategory};
use crate::error::{SelectionError, SelectionResult};
use crate::money::Money;
use crate::types::{QuoteLineItem, SelectionValue, Selections};
use crate::validation::validate_quantity;

/// Mutable record of choices, extras and quantity for one product family.
///
/// Every method that mutates takes the catalog explicitly; the state never
/// caches or owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    product_family: String,
    base_price: Money,
    selections: Selections,
    extras: BTreeSet<String>,
    quantity: u32,
    revision: u64,
}

impl SelectionState {
    /// Creates a fresh state for `catalog`.
    ///
    /// Numeric-range categories start at their base value (the length that
    /// is included in the base price). Single-choice categories start
    /// unselected. Quantity is 1.
    pub fn new(catalog: &OptionCatalog) -> Self {
        let selections = catalog
            .categories()
            .iter()
            .filter_map(|c| c.range().map(|r| (c.name.clone(), SelectionValue::Numeric(r.base_value))))
            .collect();

        SelectionState {
            product_family: catalog.family().to_string(),
            base_price: catalog.base_price(),
            selections,
            extras: BTreeSet::new(),
            quantity: 1,
            revision: 0,
        }
    }

    /// Rebuilds a state from a committed line item.
    ///
    /// Every stored selection is re-checked against `catalog`, so a snapshot
    /// that no longer fits the current catalog is rejected instead of
    /// silently repriced. Numeric categories absent from the snapshot stay
    /// unselected; the base-value pre-seed of [`SelectionState::new`] does
    /// not apply.
    pub fn from_snapshot(catalog: &OptionCatalog, item: &QuoteLineItem) -> SelectionResult<Self> {
        let mut state = SelectionState::new(catalog);
        state.selections.clear();
        for (category, value) in &item.selections {
            state.select(catalog, category, value.clone())?;
        }
        for code in &item.extras {
            state.set_extra(catalog, code, true)?;
        }
        state.set_quantity(i64::from(item.quantity))?;
        Ok(state)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Records a choice code or numeric value for a category.
    ///
    /// ## Errors
    /// - `UnknownCategory` - the category is not in the catalog
    /// - `InvalidChoice` - the code is not offered, or the value kind does
    ///   not match (numeric text is accepted for numeric-range categories)
    /// - `OutOfRange` - numeric value outside `[min_value, max_value]`
    pub fn select(
        &mut self,
        catalog: &OptionCatalog,
        category: &str,
        value: impl Into<SelectionValue>,
    ) -> SelectionResult<()> {
        let definition = catalog
            .category(category)
            .ok_or_else(|| SelectionError::UnknownCategory(category.to_string()))?;

        let value = check_value(definition, value.into())?;
        if self.selections.get(&definition.name) != Some(&value) {
            self.selections.insert(definition.name.clone(), value);
            self.bump();
        }
        Ok(())
    }

    /// Returns a category to "unselected".
    ///
    /// Only legal for optional categories.
    pub fn clear(&mut self, catalog: &OptionCatalog, category: &str) -> SelectionResult<()> {
        let definition = catalog
            .category(category)
            .ok_or_else(|| SelectionError::UnknownCategory(category.to_string()))?;

        if definition.required {
            return Err(SelectionError::RequiredCategory(definition.name.clone()));
        }

        if self.selections.remove(&definition.name).is_some() {
            self.bump();
        }
        Ok(())
    }

    /// Enables or disables a flat extra.
    pub fn set_extra(&mut self, catalog: &OptionCatalog, code: &str, enabled: bool) -> SelectionResult<()> {
        let extra = catalog
            .extra(code)
            .ok_or_else(|| SelectionError::UnknownExtra(code.to_string()))?;

        let changed = if enabled {
            self.extras.insert(extra.code.clone())
        } else {
            self.extras.remove(&extra.code)
        };
        if changed {
            self.bump();
        }
        Ok(())
    }

    /// Sets the line quantity.
    ///
    /// ## Errors
    /// `InvalidQuantity` when `n < 1` (or beyond `u32::MAX`).
    pub fn set_quantity(&mut self, n: i64) -> SelectionResult<()> {
        validate_quantity(n).map_err(|_| SelectionError::InvalidQuantity(n))?;
        let quantity = u32::try_from(n).map_err(|_| SelectionError::InvalidQuantity(n))?;
        if quantity != self.quantity {
            self.quantity = quantity;
            self.bump();
        }
        Ok(())
    }

    /// Fills every unselected category that has a catalog default.
    ///
    /// Existing selections are kept. Returns how many categories were filled.
    pub fn apply_defaults(&mut self, catalog: &OptionCatalog) -> usize {
        let mut filled = 0;
        for (category, value) in catalog.default_selections() {
            if !self.selections.contains_key(&category) {
                self.selections.insert(category, value);
                filled += 1;
            }
        }
        if filled > 0 {
            self.bump();
        }
        filled
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn product_family(&self) -> &str {
        &self.product_family
    }

    /// Base price copied from the catalog when the state was created.
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn selection(&self, category: &str) -> Option<&SelectionValue> {
        self.selections.get(category)
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selections.contains_key(category)
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn extras(&self) -> &BTreeSet<String> {
        &self.extras
    }

    pub fn extra_enabled(&self, code: &str) -> bool {
        self.extras.contains(code)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Incremented by every mutation that changed the state.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Checks `value` against a category and returns its canonical form.
fn check_value(category: &OptionCategory, value: SelectionValue) -> SelectionResult<SelectionValue> {
    match (&category.kind, value) {
        (CategoryKind::SingleChoice { .. }, SelectionValue::Choice(code)) => {
            if category.choice(&code).is_some() {
                Ok(SelectionValue::Choice(code))
            } else {
                Err(SelectionError::InvalidChoice {
                    category: category.name.clone(),
                    value: code,
                })
            }
        }
        (CategoryKind::SingleChoice { .. }, SelectionValue::Numeric(number)) => {
            Err(SelectionError::InvalidChoice {
                category: category.name.clone(),
                value: number.normalize().to_string(),
            })
        }
        (CategoryKind::NumericRange(range), value) => {
            let number = match value {
                SelectionValue::Numeric(number) => number,
                SelectionValue::Choice(text) => {
                    Decimal::from_str(text.trim()).map_err(|_| SelectionError::InvalidChoice {
                        category: category.name.clone(),
                        value: text.clone(),
                    })?
                }
            };

            if !range.contains(number) {
                return Err(SelectionError::OutOfRange {
                    category: category.name.clone(),
                    value: number,
                    min: range.min_value,
                    max: range.max_value,
                });
            }
            Ok(SelectionValue::Numeric(number.normalize()))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::ls2000;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_state_seeds_numeric_bases_only() {
        let catalog = ls2000();
        let state = SelectionState::new(&catalog);

        assert_eq!(state.product_family(), "LS2000");
        assert_eq!(state.base_price(), Money::from_cents(30000));
        assert_eq!(state.quantity(), 1);
        assert_eq!(state.revision(), 0);
        assert_eq!(state.selection("ProbeLength"), Some(&SelectionValue::Numeric(dec!(10))));
        assert!(!state.is_selected("Material"));
        assert!(!state.is_selected("Voltage"));
    }

    #[test]
    fn test_select_valid_choice() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);

        state.select(&catalog, "Material", "H").unwrap();
        assert_eq!(state.selection("Material"), Some(&SelectionValue::from("H")));
        assert_eq!(state.revision(), 1);

        // Re-selecting replaces the previous choice
        state.select(&catalog, "Material", "S").unwrap();
        assert_eq!(state.selection("Material"), Some(&SelectionValue::from("S")));
        assert_eq!(state.revision(), 2);

        // Same value again: accepted, nothing changed
        state.select(&catalog, "Material", "S").unwrap();
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn test_select_rejections_leave_state_untouched() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "Material", "H").unwrap();
        let before = state.clone();

        assert_eq!(
            state.select(&catalog, "Color", "RED"),
            Err(SelectionError::UnknownCategory("Color".to_string()))
        );
        assert!(matches!(
            state.select(&catalog, "Material", "X"),
            Err(SelectionError::InvalidChoice { .. })
        ));
        assert!(matches!(
            state.select(&catalog, "Material", 14),
            Err(SelectionError::InvalidChoice { .. })
        ));
        assert!(matches!(
            state.select(&catalog, "ProbeLength", 121),
            Err(SelectionError::OutOfRange { .. })
        ));
        assert!(matches!(
            state.select(&catalog, "ProbeLength", 5),
            Err(SelectionError::OutOfRange { .. })
        ));
        assert!(matches!(
            state.select(&catalog, "ProbeLength", "long"),
            Err(SelectionError::InvalidChoice { .. })
        ));

        assert_eq!(state, before);
    }

    #[test]
    fn test_numeric_bounds_are_inclusive_and_text_is_parsed() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);

        state.select(&catalog, "ProbeLength", 6).unwrap();
        state.select(&catalog, "ProbeLength", 120).unwrap();
        state.select(&catalog, "ProbeLength", "14.50").unwrap();
        assert_eq!(state.selection("ProbeLength"), Some(&SelectionValue::Numeric(dec!(14.5))));
    }

    #[test]
    fn test_clear_only_optional() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "Material", "H").unwrap();
        state.select(&catalog, "Connection", "FLG").unwrap();

        state.clear(&catalog, "Connection").unwrap();
        assert!(!state.is_selected("Connection"));

        assert_eq!(
            state.clear(&catalog, "Material"),
            Err(SelectionError::RequiredCategory("Material".to_string()))
        );
        assert!(state.is_selected("Material"));
        assert!(matches!(
            state.clear(&catalog, "Color"),
            Err(SelectionError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_quantity() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);

        state.set_quantity(3).unwrap();
        assert_eq!(state.quantity(), 3);

        assert_eq!(state.set_quantity(0), Err(SelectionError::InvalidQuantity(0)));
        assert_eq!(state.set_quantity(-2), Err(SelectionError::InvalidQuantity(-2)));
        assert_eq!(state.quantity(), 3);
    }

    #[test]
    fn test_extras() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);

        state.set_extra(&catalog, "XP", true).unwrap();
        assert!(state.extra_enabled("XP"));
        state.set_extra(&catalog, "XP", false).unwrap();
        assert!(!state.extra_enabled("XP"));

        assert_eq!(
            state.set_extra(&catalog, "GOLD", true),
            Err(SelectionError::UnknownExtra("GOLD".to_string()))
        );
    }

    #[test]
    fn test_apply_defaults_keeps_existing_choices() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "Material", "H").unwrap();

        let filled = state.apply_defaults(&catalog);
        assert_eq!(filled, 1); // only Voltage; ProbeLength was pre-seeded
        assert_eq!(state.selection("Material"), Some(&SelectionValue::from("H")));
        assert_eq!(state.selection("Voltage"), Some(&SelectionValue::from("115VAC")));

        let revision = state.revision();
        assert_eq!(state.apply_defaults(&catalog), 0);
        assert_eq!(state.revision(), revision);
    }
}
