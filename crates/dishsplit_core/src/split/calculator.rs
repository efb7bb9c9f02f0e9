//! Equal-share split with tax/tip distribution.

use crate::model::amount::format_amount;
use crate::model::dish::DishLedger;
use crate::model::person::{PersonId, Roster};
use crate::split::TaxPolicy;

/// What one person owes.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTotal {
    pub person_id: PersonId,
    pub person: String,
    /// Unrounded amount, tax share included.
    pub total: f64,
    /// Dish names in first-seen order, without repeats.
    pub dish_names: Vec<String>,
}

impl PersonTotal {
    /// `"<person> owes <currency><amount:2dp> for: <dish, dish>"`
    pub fn summary_line(&self, currency_symbol: &str) -> String {
        format!(
            "{} owes {}{} for: {}",
            self.person,
            currency_symbol,
            format_amount(self.total),
            self.dish_names.join(", ")
        )
    }
}

/// Result of one split calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    /// One entry per person who owes something, in roster order.
    pub totals: Vec<PersonTotal>,
    /// Tax/tip amount that was distributed.
    pub tax: f64,
    /// Number of people who received a tax share.
    pub tax_recipients: usize,
}

impl SplitSummary {
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every person's total.
    pub fn grand_total(&self) -> f64 {
        self.totals.iter().map(|line| line.total).sum()
    }

    pub fn total_for(&self, person: &str) -> Option<&PersonTotal> {
        self.totals.iter().find(|line| line.person == person)
    }

    pub fn lines(&self, currency_symbol: &str) -> Vec<String> {
        self.totals
            .iter()
            .map(|line| line.summary_line(currency_symbol))
            .collect()
    }

    /// Newline-joined summary, the text handed to clipboard/share targets.
    pub fn to_text(&self, currency_symbol: &str) -> String {
        self.lines(currency_symbol).join("\n")
    }
}

struct Accumulator {
    total: f64,
    dish_names: Vec<String>,
}

/// Splits every dish equally among its sharers, then distributes `tax`.
///
/// # Contract
/// - Sharers that are no longer in `roster` are skipped; their share is lost
///   rather than reassigned.
/// - `TaxPolicy::Participants` splits `tax` among people whose dish total is
///   above zero; `TaxPolicy::Everyone` among the whole roster.
/// - The divisor is the number of people charged, not the roster size. With
///   `Participants` a `tax / roster.len()` share would leave part of the tax
///   unpaid, so the per-person share is `tax / recipients` and the totals
///   always add up to dish prices plus `tax`.
/// - People with neither dishes nor a tax share are left out of the result.
/// - Callers reject an empty ledger and negative tax beforehand.
pub fn compute_split(
    roster: &Roster,
    ledger: &DishLedger,
    tax: f64,
    policy: TaxPolicy,
) -> SplitSummary {
    let mut accumulators: Vec<Accumulator> = roster
        .iter()
        .map(|_| Accumulator {
            total: 0.0,
            dish_names: Vec::new(),
        })
        .collect();

    for dish in ledger.iter() {
        let share = dish.price / dish.shared_by.len() as f64;
        for sharer in &dish.shared_by {
            let Some(position) = roster.position_of(*sharer) else {
                continue;
            };
            let acc = &mut accumulators[position];
            acc.total += share;
            if !acc.dish_names.iter().any(|name| name == &dish.name) {
                acc.dish_names.push(dish.name.clone());
            }
        }
    }

    let mut tax_recipients = 0;
    if tax > 0.0 && !roster.is_empty() {
        let eligible: Vec<usize> = accumulators
            .iter()
            .enumerate()
            .filter(|(_, acc)| match policy {
                TaxPolicy::Participants => acc.total > 0.0,
                TaxPolicy::Everyone => true,
            })
            .map(|(position, _)| position)
            .collect();

        if !eligible.is_empty() {
            let tax_share = tax / eligible.len() as f64;
            for position in &eligible {
                accumulators[*position].total += tax_share;
            }
            tax_recipients = eligible.len();
        }
    }

    let totals = roster
        .iter()
        .zip(accumulators)
        .filter(|(_, acc)| acc.total > 0.0 || !acc.dish_names.is_empty())
        .map(|(person, acc)| PersonTotal {
            person_id: person.id,
            person: person.name.clone(),
            total: acc.total,
            dish_names: acc.dish_names,
        })
        .collect();

    SplitSummary {
        totals,
        tax: if tax_recipients > 0 { tax } else { 0.0 },
        tax_recipients,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_split;
    use crate::model::dish::DishLedger;
    use crate::model::person::Roster;
    use crate::split::TaxPolicy;

    #[test]
    fn repeated_dish_name_is_listed_once() {
        let roster = Roster::from_names(["A"]).unwrap();
        let a = roster.get(0).unwrap().id;
        let mut ledger = DishLedger::new();
        ledger.add_or_update(&roster, "Chai", "10", &[a], None).unwrap();
        ledger.add_or_update(&roster, "Chai", "15", &[a], None).unwrap();

        let summary = compute_split(&roster, &ledger, 0.0, TaxPolicy::Participants);
        let line = summary.total_for("A").unwrap();
        assert_eq!(line.dish_names, vec!["Chai"]);
        assert!((line.total - 25.0).abs() < 1e-9);
    }

    #[test]
    fn summary_line_rounds_for_display_only() {
        let roster = Roster::from_names(["A", "B", "C"]).unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        let mut ledger = DishLedger::new();
        ledger.add_or_update(&roster, "Cake", "100", &ids, None).unwrap();

        let summary = compute_split(&roster, &ledger, 0.0, TaxPolicy::Participants);
        let line = summary.total_for("B").unwrap();
        assert_eq!(line.summary_line("₹"), "B owes ₹33.33 for: Cake");
        assert!((line.total - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_roster_yields_empty_summary() {
        let summary = compute_split(&Roster::new(), &DishLedger::new(), 10.0, TaxPolicy::Everyone);
        assert!(summary.is_empty());
        assert_eq!(summary.tax_recipients, 0);
        assert_eq!(summary.tax, 0.0);
    }
}
