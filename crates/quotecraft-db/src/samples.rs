//! # Sample Catalogs
//!
//! Built-in product families loaded by the seed binary when no catalog
//! file is configured. Also the fixtures for this crate's tests.
//!
//! ```text
//!   LS2000  Level switch            base $300.00
//!           Material*  Voltage*  ProbeLength (6..120 in)  Connection
//!           extras: XP, TAG
//!
//!   TX500   Temperature transmitter base $410.00
//!           Sensor*  Output*  Housing  InsertionLength (2..36 in)
//!           extras: CAL
//! ```
//! `*` = required

use quotecraft_core::{
    CatalogDefinition, CatalogResult, FlatExtra, Money, NumericRange, OptionCatalog, OptionCategory,
    OptionChoice,
};
use rust_decimal::Decimal;

/// Every built-in catalog.
pub fn all() -> CatalogResult<Vec<OptionCatalog>> {
    Ok(vec![ls2000_definition().build()?, tx500_definition().build()?])
}

pub fn ls2000_definition() -> CatalogDefinition {
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
                NumericRange::new(
                    Decimal::from(6),
                    Decimal::from(10),
                    Decimal::from(120),
                    Money::from_cents(800),
                )
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
            ],
        ))
        .extra(FlatExtra::new("XP", "Explosion Proof", Money::from_cents(17500)).in_model_number())
        .extra(FlatExtra::new("TAG", "Stainless Tag", Money::from_cents(1200)))
}

pub fn tx500_definition() -> CatalogDefinition {
    CatalogDefinition::new("TX500", Money::from_cents(41000))
        .display_name("TX500 Transmitter")
        .category(
            OptionCategory::single_choice(
                "Sensor",
                true,
                vec![
                    OptionChoice::new("PT100", "Pt100 RTD", Money::zero()),
                    OptionChoice::new("TCK", "Type K Thermocouple", Money::from_cents(-2500)),
                ],
            )
            .in_model_number(),
        )
        .category(
            OptionCategory::single_choice(
                "Output",
                true,
                vec![
                    OptionChoice::new("420", "4-20 mA", Money::zero()),
                    OptionChoice::new("HART", "4-20 mA + HART", Money::from_cents(9500)),
                ],
            )
            .in_model_number(),
        )
        .category(OptionCategory::single_choice(
            "Housing",
            false,
            vec![
                OptionChoice::new("AL", "Aluminum", Money::zero()),
                OptionChoice::new("SS", "Stainless Steel", Money::from_cents(14000)),
            ],
        ))
        .category(
            OptionCategory::numeric_range(
                "InsertionLength",
                false,
                NumericRange::new(
                    Decimal::from(2),
                    Decimal::from(4),
                    Decimal::from(36),
                    Money::from_cents(650),
                )
                .with_suffix("IN")
                .with_unit_name("in"),
            )
            .in_model_number(),
        )
        .extra(FlatExtra::new("CAL", "3-Point Calibration Certificate", Money::from_cents(8500)))
}

#[cfg(test)]
pub(crate) fn ls2000() -> OptionCatalog {
    ls2000_definition().build().expect("LS2000 sample is valid")
}

#[cfg(test)]
pub(crate) fn tx500() -> OptionCatalog {
    tx500_definition().build().expect("TX500 sample is valid")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotecraft_core::ConfigurationSession;
    use std::sync::Arc;

    #[test]
    fn test_all_samples_build() {
        let families: Vec<String> = all()
            .unwrap()
            .iter()
            .map(|c| c.family().to_string())
            .collect();
        assert_eq!(families, vec!["LS2000", "TX500"]);
    }

    #[test]
    fn test_tx500_pricing() {
        let mut session = ConfigurationSession::start(Arc::new(tx500()));
        session.on_select("Sensor", "TCK").unwrap();
        session.on_select("Output", "HART").unwrap();
        session.on_select("InsertionLength", 10).unwrap();

        let summary = session.summary();
        assert_eq!(summary.breakdown[0].label, "TX500 Transmitter Base");
        assert_eq!(summary.breakdown[3].label, "Extra InsertionLength: 6 in");
        // 410.00 - 25.00 + 95.00 + 6 × 6.50
        assert_eq!(summary.unit_price, Money::from_cents(51900));
        assert_eq!(session.model_number_preview(), "TX500-TCK-HART-10IN");
    }
}
