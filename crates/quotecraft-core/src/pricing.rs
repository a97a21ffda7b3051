//! # Pricing Calculator
//!
//! Turns a catalog plus a selection state into an itemized price.
//!
//! ## Breakdown Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. "<Family> Base"                      catalog.base_price            │
//! │  2. for category in declaration order:                                  │
//! │       single choice, adder != 0  →  "<Category>: <DisplayName>"        │
//! │       numeric, value > base      →  "Extra <Category>: <n> <unit>"     │
//! │  3. for extra in declaration order, if enabled:                        │
//! │                                   →  "<DisplayName>"  (any amount)     │
//! │                                                                         │
//! │  unit_price = Σ lines        line_total = unit_price × quantity        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! ```rust
//! use quotecraft_core::catalog::{CatalogDefinition, NumericRange, OptionCategory, OptionChoice};
//! use quotecraft_core::pricing::price;
//! use quotecraft_core::selection::SelectionState;
//! use quotecraft_core::Money;
//! use rust_decimal::Decimal;
//!
//! let catalog = CatalogDefinition::new("LS2000", Money::from_cents(30000))
//!     .category(OptionCategory::single_choice("Material", true, vec![
//!         OptionChoice::new("S", "316 Stainless", Money::zero()),
//!         OptionChoice::new("H", "Hastelloy C", Money::from_cents(5000)),
//!     ]))
//!     .category(OptionCategory::numeric_range("ProbeLength", false,
//!         NumericRange::new(Decimal::from(6), Decimal::from(10), Decimal::from(120),
//!                           Money::from_cents(800))))
//!     .build()
//!     .unwrap();
//!
//! let mut state = SelectionState::new(&catalog);
//! state.select(&catalog, "Material", "H").unwrap();
//! state.select(&catalog, "ProbeLength", 14).unwrap();
//! state.set_quantity(2).unwrap();
//!
//! let quote = price(&catalog, &state);
//! assert_eq!(quote.unit_price.to_string(), "$382.00");
//! assert_eq!(quote.line_total.to_string(), "$764.00");
//! ```
//!
//! Pricing never fails. Selections that do not resolve against the catalog
//! (stale codes, kind mismatches) contribute nothing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{CategoryKind, OptionCatalog};
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{LineKind, PriceBreakdownLine, SelectionValue};

/// Fully priced configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub lines: Vec<PriceBreakdownLine>,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// Builds the itemized breakdown for one unit.
pub fn compute_breakdown(catalog: &OptionCatalog, state: &SelectionState) -> Vec<PriceBreakdownLine> {
    let mut lines = vec![PriceBreakdownLine::new(
        format!("{} Base", catalog.display_name()),
        catalog.base_price(),
        LineKind::Base,
    )];

    for category in catalog.categories() {
        let Some(value) = state.selection(&category.name) else {
            continue;
        };

        match (&category.kind, value) {
            (CategoryKind::SingleChoice { .. }, SelectionValue::Choice(code)) => {
                if let Some(choice) = category.choice(code) {
                    if !choice.price_adder.is_zero() {
                        lines.push(PriceBreakdownLine::new(
                            format!("{}: {}", category.name, choice.display_name),
                            choice.price_adder,
                            LineKind::Adder,
                        ));
                    }
                }
            }
            (CategoryKind::NumericRange(range), SelectionValue::Numeric(number)) => {
                if let Some(excess) = range.excess_over_base(*number) {
                    lines.push(PriceBreakdownLine::new(
                        format!(
                            "Extra {}: {} {}",
                            category.name,
                            excess.normalize(),
                            range.unit_name
                        ),
                        range.unit_surcharge * excess,
                        LineKind::Surcharge,
                    ));
                }
            }
            _ => {}
        }
    }

    for extra in catalog.extras() {
        if state.extra_enabled(&extra.code) {
            lines.push(PriceBreakdownLine::new(
                extra.display_name.clone(),
                extra.price,
                LineKind::Extra,
            ));
        }
    }

    lines
}

/// Sum of every breakdown line for one unit.
pub fn compute_unit_price(catalog: &OptionCatalog, state: &SelectionState) -> Money {
    compute_breakdown(catalog, state).iter().map(|line| line.amount).sum()
}

/// Unit price × quantity.
pub fn compute_total(catalog: &OptionCatalog, state: &SelectionState) -> Money {
    compute_unit_price(catalog, state).multiply_quantity(state.quantity())
}

/// Computes breakdown, unit price and line total in one pass.
pub fn price(catalog: &OptionCatalog, state: &SelectionState) -> PriceQuote {
    let lines = compute_breakdown(catalog, state);
    let unit_price: Money = lines.iter().map(|line| line.amount).sum();
    let quantity = state.quantity();

    PriceQuote {
        line_total: unit_price.multiply_quantity(quantity),
        unit_price,
        quantity,
        lines,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
