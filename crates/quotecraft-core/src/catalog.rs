//! # Option Catalog Model
//!
//! Immutable description of the configurable options for one product family.
//!
//! ## Load Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product Catalog Provider (JSON file, SQLite row, in-memory)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogDefinition   ← plain serde data, may be malformed               │
//! │       │                                                                 │
//! │       │  TryFrom / build()  ← integrity checks run ONCE, here           │
//! │       ▼                                                                 │
//! │  OptionCatalog       ← validated, read-only for the session lifetime   │
//! │       │                                                                 │
//! │       ├── category("Material")                                         │
//! │       ├── default_selections()                                         │
//! │       └── shared as Arc<OptionCatalog> across sessions                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A family that fails the checks is rejected with
//! [`CatalogError::Integrity`]; the UI must not let configuration begin.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{CatalogError, CatalogResult, IntegrityError};
use crate::money::Money;
use crate::types::{SelectionValue, Selections};
use crate::validation::{validate_code, validate_display_name};
use crate::{DEFAULT_MODEL_SEPARATOR, DEFAULT_UNIT_NAME, MAX_CATALOG_AMOUNT, MAX_RANGE_MAGNITUDE};

// =============================================================================
// Choices and Ranges
// =============================================================================

/// One selectable value within a single-choice category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionChoice {
    /// Stable identifier used in model numbers. Never changes once issued.
    pub code: String,
    pub display_name: String,
    /// Added to the base price when selected. Negative = discount option.
    #[serde(default)]
    pub price_adder: Money,
}

impl OptionChoice {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>, price_adder: Money) -> Self {
        OptionChoice {
            code: code.into(),
            display_name: display_name.into(),
            price_adder,
        }
    }
}

fn default_unit_name() -> String {
    DEFAULT_UNIT_NAME.to_string()
}

/// A length-like axis priced per unit above an included base value.
///
/// ```text
///   min_value ─────── base_value ─────────────── max_value
///       6        (free)    10     (+unit_surcharge/unit)   120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumericRange {
    #[ts(type = "string")]
    pub min_value: Decimal,
    #[ts(type = "string")]
    pub max_value: Decimal,
    /// Value included in the base price.
    #[ts(type = "string")]
    pub base_value: Decimal,
    /// Price per unit above `base_value`.
    pub unit_surcharge: Money,
    /// Appended to the value in model numbers, e.g. `"`.
    #[serde(default)]
    pub unit_suffix: String,
    /// Used in breakdown labels, e.g. `Extra ProbeLength: 4 units`.
    #[serde(default = "default_unit_name")]
    pub unit_name: String,
}

impl NumericRange {
    pub fn new(min_value: Decimal, base_value: Decimal, max_value: Decimal, unit_surcharge: Money) -> Self {
        NumericRange {
            min_value,
            max_value,
            base_value,
            unit_surcharge,
            unit_suffix: String::new(),
            unit_name: default_unit_name(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.unit_suffix = suffix.into();
        self
    }

    pub fn with_unit_name(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = unit_name.into();
        self
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    /// Units above the base value, or `None` at or below base.
    /// Under-base values never produce a negative surcharge.
    pub fn excess_over_base(&self, value: Decimal) -> Option<Decimal> {
        if value > self.base_value {
            Some(value - self.base_value)
        } else {
            None
        }
    }
}

// =============================================================================
// Categories
// =============================================================================

/// How a category is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    SingleChoice,
    NumericRange,
}

/// Mode-specific data of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "selection_mode", rename_all = "snake_case")]
pub enum CategoryKind {
    /// Choices in display order; the first is the default.
    SingleChoice { choices: Vec<OptionChoice> },
    NumericRange(NumericRange),
}

/// One configurable axis (e.g. "Material", "Voltage", "ProbeLength").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionCategory {
    /// Unique within a family.
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Whether the selection contributes a model number token.
    #[serde(default)]
    pub include_in_model_number: bool,
    pub kind: CategoryKind,
}

impl OptionCategory {
    pub fn single_choice(name: impl Into<String>, required: bool, choices: Vec<OptionChoice>) -> Self {
        OptionCategory {
            name: name.into(),
            required,
            include_in_model_number: false,
            kind: CategoryKind::SingleChoice { choices },
        }
    }

    pub fn numeric_range(name: impl Into<String>, required: bool, range: NumericRange) -> Self {
        OptionCategory {
            name: name.into(),
            required,
            include_in_model_number: false,
            kind: CategoryKind::NumericRange(range),
        }
    }

    /// Flags the category for inclusion in generated model numbers.
    pub fn in_model_number(mut self) -> Self {
        self.include_in_model_number = true;
        self
    }

    pub fn selection_mode(&self) -> SelectionMode {
        match self.kind {
            CategoryKind::SingleChoice { .. } => SelectionMode::SingleChoice,
            CategoryKind::NumericRange(_) => SelectionMode::NumericRange,
        }
    }

    /// Choices in display order (empty for numeric-range categories).
    pub fn choices(&self) -> &[OptionChoice] {
        match &self.kind {
            CategoryKind::SingleChoice { choices } => choices,
            CategoryKind::NumericRange(_) => &[],
        }
    }

    pub fn choice(&self, code: &str) -> Option<&OptionChoice> {
        self.choices().iter().find(|c| c.code == code)
    }

    pub fn range(&self) -> Option<&NumericRange> {
        match &self.kind {
            CategoryKind::SingleChoice { .. } => None,
            CategoryKind::NumericRange(range) => Some(range),
        }
    }

    /// First choice for single-choice categories, base value for ranges.
    pub fn default_value(&self) -> Option<SelectionValue> {
        match &self.kind {
            CategoryKind::SingleChoice { choices } => choices
                .first()
                .map(|c| SelectionValue::Choice(c.code.clone())),
            CategoryKind::NumericRange(range) => Some(SelectionValue::Numeric(range.base_value)),
        }
    }
}

// =============================================================================
// Flat Extras
// =============================================================================

/// Boolean add-on with a fixed price (e.g. "Explosion Proof").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlatExtra {
    pub code: String,
    pub display_name: String,
    pub price: Money,
    #[serde(default)]
    pub include_in_model_number: bool,
}

impl FlatExtra {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>, price: Money) -> Self {
        FlatExtra {
            code: code.into(),
            display_name: display_name.into(),
            price,
            include_in_model_number: false,
        }
    }

    pub fn in_model_number(mut self) -> Self {
        self.include_in_model_number = true;
        self
    }
}

// =============================================================================
// Catalog Definition (unvalidated)
// =============================================================================

fn default_separator() -> String {
    DEFAULT_MODEL_SEPARATOR.to_string()
}

/// Serializable catalog as delivered by a Product Catalog Provider.
///
/// ## Example JSON
/// ```json
/// {
///   "family": "LS2000",
///   "base_price": "300.00",
///   "categories": [
///     { "name": "Material", "required": true, "include_in_model_number": true,
///       "kind": { "selection_mode": "single_choice", "choices": [
///         { "code": "S", "display_name": "316 Stainless", "price_adder": "0" },
///         { "code": "H", "display_name": "Hastelloy C", "price_adder": "50.00" } ] } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogDefinition {
    /// Product family identifier, also the model number prefix.
    pub family: String,
    /// Label used in the breakdown base line; defaults to `family`.
    #[serde(default)]
    pub display_name: Option<String>,
    pub base_price: Money,
    #[serde(default = "default_separator")]
    pub model_separator: String,
    /// Declaration order drives breakdown and model number order.
    #[serde(default)]
    pub categories: Vec<OptionCategory>,
    #[serde(default)]
    pub extras: Vec<FlatExtra>,
}

impl CatalogDefinition {
    pub fn new(family: impl Into<String>, base_price: Money) -> Self {
        CatalogDefinition {
            family: family.into(),
            display_name: None,
            base_price,
            model_separator: default_separator(),
            categories: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.model_separator = separator.into();
        self
    }

    pub fn category(mut self, category: OptionCategory) -> Self {
        self.categories.push(category);
        self
    }

    pub fn extra(mut self, extra: FlatExtra) -> Self {
        self.extras.push(extra);
        self
    }

    /// Runs integrity checks and freezes the catalog.
    pub fn build(self) -> CatalogResult<OptionCatalog> {
        OptionCatalog::try_from(self)
    }

    fn check_integrity(&self) -> Result<(), IntegrityError> {
        if self.family.trim().is_empty() {
            return Err(IntegrityError::EmptyFamily);
        }
        validate_code("family", &self.family)?;
        self.check_token("family", &self.family)?;

        if self.base_price.is_negative() {
            return Err(IntegrityError::NegativeBasePrice(self.base_price.amount()));
        }
        check_amount("base price", self.base_price)?;

        let mut names = HashSet::new();
        for category in &self.categories {
            validate_display_name("category name", &category.name)?;
            if !names.insert(category.name.as_str()) {
                return Err(IntegrityError::DuplicateCategory(category.name.clone()));
            }

            match &category.kind {
                CategoryKind::SingleChoice { choices } => {
                    if choices.is_empty() {
                        if category.required {
                            return Err(IntegrityError::NoChoices(category.name.clone()));
                        }
                        warn!(
                            family = %self.family,
                            category = %category.name,
                            "Optional category has no choices and can never be selected"
                        );
                    }

                    let mut codes = HashSet::new();
                    for choice in choices {
                        validate_code("choice code", &choice.code)?;
                        validate_display_name("choice display name", &choice.display_name)?;
                        check_amount("price adder", choice.price_adder)?;
                        if category.include_in_model_number {
                            self.check_token("choice code", &choice.code)?;
                        }
                        if !codes.insert(choice.code.as_str()) {
                            return Err(IntegrityError::DuplicateChoice {
                                category: category.name.clone(),
                                code: choice.code.clone(),
                            });
                        }
                    }
                }
                CategoryKind::NumericRange(range) => {
                    if !(range.min_value <= range.base_value && range.base_value <= range.max_value) {
                        return Err(IntegrityError::InvalidRange {
                            category: category.name.clone(),
                            min: range.min_value,
                            base: range.base_value,
                            max: range.max_value,
                        });
                    }
                    if range.unit_surcharge.is_negative() {
                        return Err(IntegrityError::NegativeSurcharge(category.name.clone()));
                    }
                    check_amount("unit surcharge", range.unit_surcharge)?;
                    check_magnitude("range minimum", range.min_value)?;
                    check_magnitude("range maximum", range.max_value)?;
                    if category.include_in_model_number {
                        self.check_numeric_token(range)?;
                    }
                }
            }
        }

        let mut extra_codes = HashSet::new();
        for extra in &self.extras {
            validate_code("extra code", &extra.code)?;
            validate_display_name("extra display name", &extra.display_name)?;
            check_amount("extra price", extra.price)?;
            if extra.include_in_model_number {
                self.check_token("extra code", &extra.code)?;
            }
            if !extra_codes.insert(extra.code.as_str()) {
                return Err(IntegrityError::DuplicateExtra(extra.code.clone()));
            }
        }

        Ok(())
    }

    /// A model number token must not contain the separator.
    fn check_token(&self, field: &str, value: &str) -> Result<(), IntegrityError> {
        let separator = &self.model_separator;
        if !separator.is_empty() && value.contains(separator.as_str()) {
            return Err(IntegrityError::SeparatorInToken {
                value: format!("{} {}", field, value),
                separator: separator.clone(),
            });
        }
        Ok(())
    }

    /// Numeric tokens render as `[-]digits[.digits]` plus the unit suffix.
    fn check_numeric_token(&self, range: &NumericRange) -> Result<(), IntegrityError> {
        let separator = &self.model_separator;
        let clashes = separator.chars().any(|c| {
            c.is_ascii_digit() || c == '.' || (c == '-' && range.min_value.is_sign_negative())
        });
        if clashes {
            return Err(IntegrityError::SeparatorInToken {
                value: format!("numeric value from {}", range.min_value),
                separator: separator.clone(),
            });
        }
        self.check_token("unit suffix", &range.unit_suffix)
    }
}

fn check_amount(field: &str, amount: Money) -> Result<(), IntegrityError> {
    let limit = Decimal::from(MAX_CATALOG_AMOUNT);
    if amount.amount().abs() > limit {
        return Err(IntegrityError::OutOfBounds {
            field: field.to_string(),
            value: amount.amount(),
            limit,
        });
    }
    Ok(())
}

fn check_magnitude(field: &str, value: Decimal) -> Result<(), IntegrityError> {
    let limit = Decimal::from(MAX_RANGE_MAGNITUDE);
    if value.abs() > limit {
        return Err(IntegrityError::OutOfBounds {
            field: field.to_string(),
            value,
            limit,
        });
    }
    Ok(())
}

// =============================================================================
// Option Catalog (validated)
// =============================================================================

/// Validated, read-only option catalog for one product family.
///
/// Deserializing an `OptionCatalog` runs the same integrity checks as
/// [`CatalogDefinition::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDefinition", into = "CatalogDefinition")]
pub struct OptionCatalog {
    definition: CatalogDefinition,
}

impl TryFrom<CatalogDefinition> for OptionCatalog {
    type Error = CatalogError;

    fn try_from(definition: CatalogDefinition) -> Result<Self, Self::Error> {
        definition
            .check_integrity()
            .map_err(|e| CatalogError::integrity(definition.family.clone(), e))?;
        Ok(OptionCatalog { definition })
    }
}

impl From<OptionCatalog> for CatalogDefinition {
    fn from(catalog: OptionCatalog) -> Self {
        catalog.definition
    }
}

impl OptionCatalog {
    pub fn family(&self) -> &str {
        &self.definition.family
    }

    /// Breakdown label prefix; falls back to the family identifier.
    pub fn display_name(&self) -> &str {
        self.definition
            .display_name
            .as_deref()
            .unwrap_or(&self.definition.family)
    }

    pub fn base_price(&self) -> Money {
        self.definition.base_price
    }

    pub fn model_separator(&self) -> &str {
        &self.definition.model_separator
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[OptionCategory] {
        &self.definition.categories
    }

    /// Extras in declaration order.
    pub fn extras(&self) -> &[FlatExtra] {
        &self.definition.extras
    }

    /// Looks up a category by name. `None` means the category is not part of
    /// this family.
    pub fn category(&self, name: &str) -> Option<&OptionCategory> {
        self.definition.categories.iter().find(|c| c.name == name)
    }

    pub fn extra(&self, code: &str) -> Option<&FlatExtra> {
        self.definition.extras.iter().find(|e| e.code == code)
    }

    pub fn required_categories(&self) -> impl Iterator<Item = &OptionCategory> {
        self.definition.categories.iter().filter(|c| c.required)
    }

    /// Default selection for every required category (its first choice) and
    /// every numeric-range category (its base value).
    ///
    /// Optional single-choice categories stay unselected.
    pub fn default_selections(&self) -> Selections {
        self.definition
            .categories
            .iter()
            .filter(|c| c.required || c.selection_mode() == SelectionMode::NumericRange)
            .filter_map(|c| c.default_value().map(|v| (c.name.clone(), v)))
            .collect()
    }

    pub fn definition(&self) -> &CatalogDefinition {
        &self.definition
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::selection::SelectionState;
    use rust_decimal_macros::dec;

    /// The LS2000 level switch catalog used across the crate's tests.
    pub(crate) fn ls2000() -> OptionCatalog {
        CatalogDefinition::new("LS2000", Money::from_cents(30000))
            .category(
                OptionCategory::single_choice(
                    "Material",
                    true,
                    vec![
                        OptionChoice::new("S", "316 Stainless", Money::zero()),
                        OptionChoice::new("H", "Hastelloy C", Money::from_cents(5000)),
                    ],
                )
                .in_model_number(),
            )
            .category(
                OptionCategory::single_choice(
                    "Voltage",
                    true,
                    vec![
                        OptionChoice::new("115VAC", "115 VAC", Money::zero()),
                        OptionChoice::new("24VDC", "24 VDC", Money::zero()),
                    ],
                )
                .in_model_number(),
            )
            .category(
                OptionCategory::numeric_range(
                    "ProbeLength",
                    false,
                    NumericRange::new(dec!(6), dec!(10), dec!(120), Money::from_cents(800))
                        .with_suffix("\""),
                )
                .in_model_number(),
            )
            .category(OptionCategory::single_choice(
                "Connection",
                false,
                vec![
                    OptionChoice::new("NPT", "3/4\" NPT", Money::zero()),
                    OptionChoice::new("FLG", "2\" Flange", Money::from_cents(12500)),
                    OptionChoice::new("PLS", "Plastic Union", Money::from_cents(-1500)),
                ],
            ))
            .extra(FlatExtra::new("XP", "Explosion Proof", Money::from_cents(17500)).in_model_number())
            .extra(FlatExtra::new("TAG", "Stainless Tag", Money::from_cents(1200)))
            .build()
            .expect("LS2000 fixture is valid")
    }

    fn integrity(result: CatalogResult<OptionCatalog>) -> IntegrityError {
        match result {
            Err(CatalogError::Integrity { source, .. }) => source,
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup() {
        let catalog = ls2000();
        assert_eq!(catalog.family(), "LS2000");
        assert_eq!(catalog.display_name(), "LS2000");
        assert_eq!(catalog.categories().len(), 4);

        let material = catalog.category("Material").unwrap();
        assert_eq!(material.selection_mode(), SelectionMode::SingleChoice);
        assert_eq!(material.choice("H").unwrap().price_adder, Money::from_cents(5000));
        assert!(material.choice("X").is_none());

        let probe = catalog.category("ProbeLength").unwrap();
        assert_eq!(probe.selection_mode(), SelectionMode::NumericRange);
        assert!(probe.choices().is_empty());
        assert!(catalog.category("Color").is_none());
        assert!(catalog.extra("XP").is_some());
    }

    #[test]
    fn test_default_selections() {
        let defaults = ls2000().default_selections();
        assert_eq!(defaults.get("Material"), Some(&SelectionValue::from("S")));
        assert_eq!(defaults.get("Voltage"), Some(&SelectionValue::from("115VAC")));
        assert_eq!(defaults.get("ProbeLength"), Some(&SelectionValue::Numeric(dec!(10))));
        // Optional single-choice categories are not defaulted
        assert!(!defaults.contains_key("Connection"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::single_choice(
                "Material",
                true,
                vec![OptionChoice::new("S", "Steel", Money::zero())],
            ))
            .category(OptionCategory::single_choice(
                "Material",
                false,
                vec![OptionChoice::new("H", "Hastelloy", Money::zero())],
            ))
            .build();
        assert_eq!(
            integrity(result),
            IntegrityError::DuplicateCategory("Material".to_string())
        );
    }

    #[test]
    fn test_required_category_without_choices_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::single_choice("Voltage", true, vec![]))
            .build();
        assert_eq!(integrity(result), IntegrityError::NoChoices("Voltage".to_string()));

        // Optional and empty is tolerated
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::single_choice("Coating", false, vec![]))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_choice_code_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::single_choice(
                "Material",
                true,
                vec![
                    OptionChoice::new("S", "Steel", Money::zero()),
                    OptionChoice::new("S", "Other Steel", Money::zero()),
                ],
            ))
            .build();
        assert!(matches!(
            integrity(result),
            IntegrityError::DuplicateChoice { .. }
        ));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::numeric_range(
                "ProbeLength",
                false,
                NumericRange::new(dec!(12), dec!(10), dec!(120), Money::zero()),
            ))
            .build();
        assert!(matches!(integrity(result), IntegrityError::InvalidRange { .. }));

        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::numeric_range(
                "ProbeLength",
                false,
                NumericRange::new(dec!(6), dec!(10), dec!(120), Money::from_cents(-1)),
            ))
            .build();
        assert_eq!(
            integrity(result),
            IntegrityError::NegativeSurcharge("ProbeLength".to_string())
        );
    }

    #[test]
    fn test_bad_codes_rejected() {
        assert_eq!(
            integrity(CatalogDefinition::new("  ", Money::zero()).build()),
            IntegrityError::EmptyFamily
        );

        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::single_choice(
                "Voltage",
                true,
                vec![OptionChoice::new("115 VAC", "115 VAC", Money::zero())],
            ))
            .build();
        assert!(matches!(integrity(result), IntegrityError::Field(_)));

        let result = CatalogDefinition::new("LS2000", Money::zero())
            .extra(FlatExtra::new("XP", "Explosion Proof", Money::zero()))
            .extra(FlatExtra::new("XP", "Explosion Proof", Money::zero()))
            .build();
        assert_eq!(integrity(result), IntegrityError::DuplicateExtra("XP".to_string()));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::numeric_range(
                "ProbeLength",
                false,
                NumericRange::new(dec!(6), dec!(10), Decimal::MAX, Money::from_cents(100000)),
            ))
            .build();
        assert!(matches!(
            integrity(result),
            IntegrityError::OutOfBounds { ref field, .. } if field == "range maximum"
        ));

        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(OptionCategory::numeric_range(
                "ProbeLength",
                false,
                NumericRange::new(dec!(6), dec!(10), dec!(120), Money::from_decimal(dec!(100000000.01))),
            ))
            .build();
        assert!(matches!(integrity(result), IntegrityError::OutOfBounds { .. }));

        let result = CatalogDefinition::new("LS2000", Money::from_decimal(Decimal::from(1_000_000_000))).build();
        assert!(matches!(integrity(result), IntegrityError::OutOfBounds { .. }));

        let result = CatalogDefinition::new("LS2000", Money::zero())
            .extra(FlatExtra::new("XP", "Explosion Proof", Money::from_decimal(Decimal::from(-200_000_000))))
            .build();
        assert!(matches!(integrity(result), IntegrityError::OutOfBounds { .. }));

        // At the limits every line still prices
        let catalog = CatalogDefinition::new("LS2000", Money::from_decimal(dec!(100000000)))
            .category(OptionCategory::numeric_range(
                "ProbeLength",
                false,
                NumericRange::new(dec!(-100000), dec!(-100000), dec!(100000), Money::from_decimal(dec!(100000000))),
            ))
            .build()
            .unwrap();
        let mut state = SelectionState::new(&catalog);
        state.select(&catalog, "ProbeLength", 100000).unwrap();
        state.set_quantity(i64::from(u32::MAX)).unwrap();
        let quote = crate::pricing::price(&catalog, &state);
        assert_eq!(quote.unit_price, Money::from_decimal(dec!(20000100000000)));
        assert!(quote.line_total.is_positive());
    }

    #[test]
    fn test_separator_in_model_number_token_rejected() {
        let result = CatalogDefinition::new("TX500", Money::zero())
            .category(
                OptionCategory::single_choice(
                    "Output",
                    true,
                    vec![OptionChoice::new("4-20", "4-20 mA", Money::zero())],
                )
                .in_model_number(),
            )
            .build();
        assert!(matches!(integrity(result), IntegrityError::SeparatorInToken { .. }));

        // Not part of the model number: accepted
        let result = CatalogDefinition::new("TX500", Money::zero())
            .category(OptionCategory::single_choice(
                "Output",
                true,
                vec![OptionChoice::new("4-20", "4-20 mA", Money::zero())],
            ))
            .build();
        assert!(result.is_ok());

        // Different separator: accepted
        let result = CatalogDefinition::new("TX500", Money::zero())
            .separator("/")
            .category(
                OptionCategory::single_choice(
                    "Output",
                    true,
                    vec![OptionChoice::new("4-20", "4-20 mA", Money::zero())],
                )
                .in_model_number(),
            )
            .build();
        assert!(result.is_ok());

        // Negative lengths would render "-5" with a "-" separator
        let result = CatalogDefinition::new("LS2000", Money::zero())
            .category(
                OptionCategory::numeric_range(
                    "Offset",
                    false,
                    NumericRange::new(dec!(-10), dec!(0), dec!(10), Money::zero()),
                )
                .in_model_number(),
            )
            .build();
        assert!(matches!(integrity(result), IntegrityError::SeparatorInToken { .. }));

        assert!(matches!(
            integrity(CatalogDefinition::new("LS-2000", Money::zero()).build()),
            IntegrityError::SeparatorInToken { .. }
        ));
    }

    #[test]
    fn test_negative_base_price_rejected() {
        let result = CatalogDefinition::new("LS2000", Money::from_cents(-100)).build();
        assert!(matches!(integrity(result), IntegrityError::NegativeBasePrice(_)));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = r#"{
            "family": "LS2000",
            "base_price": "300.00",
            "categories": [
                { "name": "Material", "required": true, "include_in_model_number": true,
                  "kind": { "selection_mode": "single_choice", "choices": [
                    { "code": "S", "display_name": "316 Stainless" },
                    { "code": "H", "display_name": "Hastelloy C", "price_adder": "50.00" } ] } },
                { "name": "ProbeLength",
                  "kind": { "selection_mode": "numeric_range", "min_value": "6",
                            "max_value": "120", "base_value": "10",
                            "unit_surcharge": "8.00", "unit_suffix": "\"" } }
            ]
        }"#;
        let catalog: OptionCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.model_separator(), "-");
        assert_eq!(catalog.category("Material").unwrap().choices()[0].price_adder, Money::zero());
        assert_eq!(catalog.category("ProbeLength").unwrap().range().unwrap().unit_name, "units");

        let bad = json.replace("\"base_value\": \"10\"", "\"base_value\": \"200\"");
        assert!(serde_json::from_str::<OptionCatalog>(&bad).is_err());
    }
}
