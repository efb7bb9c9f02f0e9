//! Cost splitting over a roster and dish ledger.
//!
//! # Responsibility
//! - Compute what each person owes from a read-only view of session data.
//! - Render the human-readable summary lines.
//!
//! # Invariants
//! - Calculation is pure: no stored state, no I/O, never fails.
//! - Totals stay unrounded until formatting.

pub mod calculator;

use serde::{Deserialize, Serialize};

pub use calculator::{compute_split, PersonTotal, SplitSummary};

/// Default currency symbol used in summary lines.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Who receives a share of the tax/tip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPolicy {
    /// Split among people with a non-zero dish total.
    #[default]
    Participants,
    /// Split among every person in the roster.
    Everyone,
}

/// Presentation and distribution options for a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitOptions {
    pub currency_symbol: String,
    pub tax_policy: TaxPolicy,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            tax_policy: TaxPolicy::default(),
        }
    }
}
