//! # Domain Types
//!
//! Value types shared by the catalog, pricing and session modules.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌────────────────────┐   ┌─────────────────┐    │
//! │  │ SelectionValue  │   │ PriceBreakdownLine │   │ QuoteLineItem   │    │
//! │  │  ─────────────  │   │  ────────────────  │   │  ─────────────  │    │
//! │  │  Choice("H")    │   │  label             │   │  product_family │    │
//! │  │  Numeric(14)    │   │  amount (Money)    │   │  model_number   │    │
//! │  └─────────────────┘   │  kind (LineKind)   │   │  selections     │    │
//! │                        └────────────────────┘   │  unit_price     │    │
//! │  ┌─────────────────┐   ┌────────────────────┐   │  quantity       │    │
//! │  │   LineItemId    │   │      Quote         │   │  line_total     │    │
//! │  │  (UUID v4)      │   │  header for items  │   └─────────────────┘    │
//! │  └─────────────────┘   └────────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `QuoteLineItem` freezes selections, breakdown and prices at commit time.
//! Later catalog changes never alter an emitted line item; editing reopens a
//! fresh session seeded from the snapshot.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Selection Value
// =============================================================================

/// The value chosen for one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SelectionValue {
    /// Code of a single-choice option.
    Choice(String),
    /// Measured value of a numeric-range axis (e.g. probe length).
    Numeric(#[ts(type = "string")] Decimal),
}

impl SelectionValue {
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            SelectionValue::Choice(code) => Some(code),
            SelectionValue::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<Decimal> {
        match self {
            SelectionValue::Choice(_) => None,
            SelectionValue::Numeric(value) => Some(*value),
        }
    }
}

impl fmt::Display for SelectionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionValue::Choice(code) => f.write_str(code),
            SelectionValue::Numeric(value) => write!(f, "{}", value.normalize()),
        }
    }
}

impl From<&str> for SelectionValue {
    fn from(code: &str) -> Self {
        SelectionValue::Choice(code.to_string())
    }
}

impl From<String> for SelectionValue {
    fn from(code: String) -> Self {
        SelectionValue::Choice(code)
    }
}

impl From<Decimal> for SelectionValue {
    fn from(value: Decimal) -> Self {
        SelectionValue::Numeric(value)
    }
}

impl From<i64> for SelectionValue {
    fn from(value: i64) -> Self {
        SelectionValue::Numeric(Decimal::from(value))
    }
}

impl From<i32> for SelectionValue {
    fn from(value: i32) -> Self {
        SelectionValue::Numeric(Decimal::from(value))
    }
}

/// Category name → chosen value. Ordered so snapshots serialize stably.
pub type Selections = BTreeMap<String, SelectionValue>;

// =============================================================================
// Price Breakdown
// =============================================================================

/// What produced a breakdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// The family base price.
    Base,
    /// A single-choice option with a non-zero adder.
    Adder,
    /// Length-based surcharge above the base value.
    Surcharge,
    /// A flat add-on.
    Extra,
}

/// One contributing component of a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdownLine {
    /// Display label, e.g. `"Material: Hastelloy C"`.
    pub label: String,
    /// Exact, unrounded amount.
    pub amount: Money,
    pub kind: LineKind,
}

impl PriceBreakdownLine {
    pub fn new(label: impl Into<String>, amount: Money, kind: LineKind) -> Self {
        PriceBreakdownLine {
            label: label.into(),
            amount,
            kind,
        }
    }
}

/// Renders a row the way the quote line renderer shows it:
/// `Material: Hastelloy C  +$50.00`.
impl fmt::Display for PriceBreakdownLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.kind != LineKind::Base && !self.amount.is_negative() {
            "+"
        } else {
            ""
        };
        write!(f, "{}  {}{}", self.label, sign, self.amount)
    }
}

// =============================================================================
// Line Item Identity
// =============================================================================

/// Identifier assigned by a quote store when a line item is appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemId(pub String);

impl LineItemId {
    /// Generates a fresh UUID v4 identifier.
    pub fn generate() -> Self {
        LineItemId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LineItemId {
    fn from(id: String) -> Self {
        LineItemId(id)
    }
}

// =============================================================================
// Quote Line Item
// =============================================================================

/// A configured, priced product entry attached to a quote.
///
/// Owned by the quote store once emitted. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteLineItem {
    /// Family whose catalog produced this item.
    pub product_family: String,
    /// Catalog part number printed on the quote.
    pub model_number: String,
    /// Category selections at commit time (frozen).
    pub selections: Selections,
    /// Enabled extras at commit time, in catalog order (frozen).
    #[serde(default)]
    pub extras: Vec<String>,
    /// Itemized unit price at commit time (frozen).
    pub breakdown: Vec<PriceBreakdownLine>,
    pub unit_price: Money,
    pub quantity: u32,
    /// unit_price × quantity.
    pub line_total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Quote
// =============================================================================

/// Quote header that line items are attached to in persistent stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    pub id: String,
    /// Human-readable quote number, e.g. `Q-20261015-0042`.
    pub reference: String,
    pub customer_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
