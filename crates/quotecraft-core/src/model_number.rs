//! # Model Number Generator
//!
//! Builds the catalog part number printed on a quote line.
//!
//! ```text
//!   LS2000 - H - 115VAC - 14" - XP
//!   ──┬───   ┬   ──┬───   ─┬─   ┬─
//!     │      │     │       │    └── enabled extra flagged for inclusion
//!     │      │     │       └─────── numeric value + unit suffix
//!     │      └─────┴─────────────── choice codes, declaration order
//!     └──────────────────────────── family
//! ```
//!
//! Categories without a selection are skipped silently; a model number for
//! an incomplete configuration is a preview, not an error.
//!
//! Catalog load rejects codes and unit suffixes that contain the separator,
//! so [`parse_tokens`] recovers exactly the generated tokens.

use crate::catalog::{CategoryKind, OptionCatalog};
use crate::selection::SelectionState;
use crate::types::SelectionValue;

/// Generates the model number for the current state.
///
/// Pure and deterministic: equal states always produce equal strings.
pub fn generate(catalog: &OptionCatalog, state: &SelectionState) -> String {
    let mut tokens = vec![catalog.family().to_string()];

    for category in catalog.categories().iter().filter(|c| c.include_in_model_number) {
        let token = match (&category.kind, state.selection(&category.name)) {
            (CategoryKind::SingleChoice { .. }, Some(SelectionValue::Choice(code))) => code.clone(),
            (CategoryKind::NumericRange(range), Some(SelectionValue::Numeric(value))) => {
                format!("{}{}", value.normalize(), range.unit_suffix)
            }
            _ => continue,
        };
        tokens.push(token);
    }

    tokens.extend(
        catalog
            .extras()
            .iter()
            .filter(|e| e.include_in_model_number && state.extra_enabled(&e.code))
            .map(|e| e.code.clone()),
    );

    tokens.join(catalog.model_separator())
}

/// Splits a model number into its tokens using the catalog separator.
///
/// The first token is the family. An empty separator yields the whole
/// string as a single token.
///
/// ```rust
/// # use quotecraft_core::catalog::CatalogDefinition;
/// # use quotecraft_core::Money;
/// use quotecraft_core::model_number::parse_tokens;
///
/// let catalog = CatalogDefinition::new("LS2000", Money::zero()).build().unwrap();
/// assert_eq!(parse_tokens(&catalog, "LS2000-H-115VAC"), vec!["LS2000", "H", "115VAC"]);
/// ```
pub fn parse_tokens(catalog: &OptionCatalog, model_number: &str) -> Vec<String> {
    let separator = catalog.model_separator();
    if separator.is_empty() {
        return vec![model_number.to_string()];
    }

    model_number
        .split(separator)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::ls2000;
    use crate::catalog::{CatalogDefinition, OptionCategory, OptionChoice};
    use crate::money::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_model_number() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "Material", "H").unwrap();
        state.select(&catalog, "Voltage", "115VAC").unwrap();
        state.select(&catalog, "ProbeLength", 14).unwrap();

        assert_eq!(generate(&catalog, &state), "LS2000-H-115VAC-14\"");
    }

    #[test]
    fn test_missing_selections_are_skipped() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        assert_eq!(generate(&catalog, &state), "LS2000-10\"");

        state.clear(&catalog, "ProbeLength").unwrap();
        assert_eq!(generate(&catalog, &state), "LS2000");
    }

    #[test]
    fn test_only_flagged_categories_and_extras_contribute() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.apply_defaults(&catalog);
        state.select(&catalog, "Connection", "FLG").unwrap();
        state.set_extra(&catalog, "TAG", true).unwrap();
        state.set_extra(&catalog, "XP", true).unwrap();

        // Connection and TAG are not flagged for the model number
        assert_eq!(generate(&catalog, &state), "LS2000-S-115VAC-10\"-XP");
    }

    #[test]
    fn test_fractional_values_are_normalized() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "ProbeLength", dec!(14.50)).unwrap();
        assert_eq!(generate(&catalog, &state), "LS2000-14.5\"");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = ls2000();
        let mut a = SelectionState::new(&catalog);
        let mut b = SelectionState::new(&catalog);

        // Same end state reached in a different order
        a.select(&catalog, "Material", "H").unwrap();
        a.select(&catalog, "Voltage", "24VDC").unwrap();
        b.select(&catalog, "Voltage", "115VAC").unwrap();
        b.select(&catalog, "Voltage", "24VDC").unwrap();
        b.select(&catalog, "Material", "H").unwrap();

        assert_eq!(generate(&catalog, &a), generate(&catalog, &b));
    }

    #[test]
    fn test_custom_separator_and_parse() {
        let catalog = CatalogDefinition::new("TX500", Money::zero())
            .separator("/")
            .category(
                OptionCategory::single_choice(
                    "Output",
                    true,
                    vec![OptionChoice::new("420", "4-20 mA", Money::zero())],
                )
                .in_model_number(),
            )
            .build()
            .unwrap();

        let mut state = SelectionState::new(&catalog);
        state.apply_defaults(&catalog);
        let model = generate(&catalog, &state);
        assert_eq!(model, "TX500/420");
        assert_eq!(parse_tokens(&catalog, &model), vec!["TX500", "420"]);
    }

    #[test]
    fn test_generated_number_splits_into_its_tokens() {
        let catalog = ls2000();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "Material", "H").unwrap();
        state.select(&catalog, "Voltage", "24VDC").unwrap();
        state.select(&catalog, "ProbeLength", dec!(14.5)).unwrap();
        state.set_extra(&catalog, "XP", true).unwrap();

        let model = generate(&catalog, &state);
        assert_eq!(
            parse_tokens(&catalog, &model),
            vec!["LS2000", "H", "24VDC", "14.5\"", "XP"]
        );
    }

    #[test]
    fn test_parse_with_empty_separator() {
        let catalog = CatalogDefinition::new("TX500", Money::zero())
            .separator("")
            .build()
            .unwrap();
        assert_eq!(parse_tokens(&catalog, "TX500420"), vec!["TX500420"]);
    }
}
