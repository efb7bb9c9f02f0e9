//! Owned session state and the editing API exposed to UI callers.

use crate::model::amount::parse_amount;
use crate::model::dish::{Dish, DishError, DishLedger};
use crate::model::person::{Person, PersonId, Roster, RosterError};
use crate::model::snapshot::{DishRecord, GroupSnapshot};
use crate::split::{compute_split, SplitOptions, SplitSummary};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected session operation.
///
/// The message is suitable for direct display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Roster(RosterError),
    Dish(DishError),
    InvalidTax(String),
    /// Split requested before any dish was added.
    NoDishes,
    /// Person is the only sharer of the listed dishes.
    PersonInUse { name: String, dishes: Vec<String> },
    UnknownPerson(PersonId),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roster(err) => write!(f, "{err}"),
            Self::Dish(err) => write!(f, "{err}"),
            Self::InvalidTax(reason) => write!(f, "invalid tax/tip amount: {reason}"),
            Self::NoDishes => write!(f, "add at least one dish before splitting"),
            Self::PersonInUse { name, dishes } => write!(
                f,
                "{name} is the only person sharing: {}",
                dishes.join(", ")
            ),
            Self::UnknownPerson(id) => write!(f, "person not in roster: {id}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Roster(err) => Some(err),
            Self::Dish(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RosterError> for SessionError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

impl From<DishError> for SessionError {
    fn from(value: DishError) -> Self {
        Self::Dish(value)
    }
}

/// Parses tax/tip input. Blank means no tax.
pub(crate) fn parse_tax(input: &str) -> Result<f64, SessionError> {
    let value = parse_amount(input)
        .map_err(|err| SessionError::InvalidTax(err.to_string()))?
        .unwrap_or(0.0);
    validate_tax(value)
}

fn validate_tax(value: f64) -> Result<f64, SessionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SessionError::InvalidTax(format!(
            "must be zero or more, got {value}"
        )));
    }
    Ok(value)
}

/// One bill being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    roster: Roster,
    ledger: DishLedger,
    tax: f64,
    selection: Vec<PersonId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &DishLedger {
        &self.ledger
    }

    pub fn tax(&self) -> f64 {
        self.tax
    }

    /// People currently ticked for the dish being entered.
    pub fn selection(&self) -> &[PersonId] {
        &self.selection
    }

    /// Adds a person, or renames the person at `edit_index`.
    ///
    /// A rename is visible in every dish that person shares.
    pub fn add_or_update_person(
        &mut self,
        name: &str,
        edit_index: Option<usize>,
    ) -> Result<PersonId, SessionError> {
        let id = self.roster.add_or_update(name, edit_index)?;
        debug!(
            "event=person_saved module=session status=ok mode={} roster_len={}",
            if edit_index.is_some() { "edit" } else { "add" },
            self.roster.len()
        );
        Ok(id)
    }

    /// Removes the person at `index` and drops them from every dish.
    ///
    /// # Errors
    /// - `PersonInUse` when the person is the sole sharer of any dish; those
    ///   dishes must be edited or deleted first.
    /// - `Roster(IndexOutOfRange)` for a bad index.
    pub fn delete_person(&mut self, index: usize) -> Result<Person, SessionError> {
        let Some(person) = self.roster.get(index) else {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.roster.len(),
            }
            .into());
        };
        let id = person.id;

        let sole_shared: Vec<String> = self
            .ledger
            .referencing(id)
            .filter(|dish| dish.shared_by.len() == 1)
            .map(|dish| dish.name.clone())
            .collect();
        if !sole_shared.is_empty() {
            debug!(
                "event=person_delete module=session status=rejected blocking_dishes={}",
                sole_shared.len()
            );
            return Err(SessionError::PersonInUse {
                name: person.name.clone(),
                dishes: sole_shared,
            });
        }

        let affected = self.ledger.referencing(id).count();
        self.ledger.strip_sharer(id);
        self.selection.retain(|selected| *selected != id);
        let removed = self.roster.remove(index)?;
        debug!(
            "event=person_delete module=session status=ok dishes_updated={} roster_len={}",
            affected,
            self.roster.len()
        );
        Ok(removed)
    }

    /// Adds a dish, or replaces the dish at `edit_index`.
    pub fn add_or_update_dish(
        &mut self,
        name: &str,
        price_input: &str,
        shared_by: &[PersonId],
        edit_index: Option<usize>,
    ) -> Result<usize, SessionError> {
        let index = self
            .ledger
            .add_or_update(&self.roster, name, price_input, shared_by, edit_index)?;
        debug!(
            "event=dish_saved module=session status=ok mode={} sharers={} ledger_len={}",
            if edit_index.is_some() { "edit" } else { "add" },
            shared_by.len(),
            self.ledger.len()
        );
        Ok(index)
    }

    /// Commits the dish form using the current selection as sharers.
    ///
    /// Clears the selection on success; keeps it on failure.
    pub fn commit_dish(
        &mut self,
        name: &str,
        price_input: &str,
        edit_index: Option<usize>,
    ) -> Result<usize, SessionError> {
        let shared_by = self.selection.clone();
        let index = self.add_or_update_dish(name, price_input, &shared_by, edit_index)?;
        self.selection.clear();
        Ok(index)
    }

    /// Loads the sharers of the dish at `index` into the selection.
    pub fn begin_dish_edit(&mut self, index: usize) -> Result<&Dish, SessionError> {
        let Some(dish) = self.ledger.get(index) else {
            return Err(DishError::IndexOutOfRange {
                index,
                len: self.ledger.len(),
            }
            .into());
        };
        self.selection = dish.shared_by.clone();
        Ok(dish)
    }

    pub fn delete_dish(&mut self, index: usize) -> Result<Dish, SessionError> {
        let removed = self.ledger.remove(index)?;
        debug!(
            "event=dish_delete module=session status=ok ledger_len={}",
            self.ledger.len()
        );
        Ok(removed)
    }

    /// Flips `person_id` in the selection. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, person_id: PersonId) -> Result<bool, SessionError> {
        if !self.roster.contains(person_id) {
            return Err(SessionError::UnknownPerson(person_id));
        }
        if let Some(position) = self.selection.iter().position(|id| *id == person_id) {
            self.selection.remove(position);
            return Ok(false);
        }
        self.selection.push(person_id);
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Parses and stores the tax/tip input. Blank input stores zero.
    pub fn set_tax(&mut self, input: &str) -> Result<f64, SessionError> {
        self.tax = parse_tax(input)?;
        Ok(self.tax)
    }

    /// Computes the split for the current roster, dishes and tax.
    ///
    /// # Errors
    /// - `NoDishes` when the ledger is empty.
    /// - `InvalidTax` when the stored tax is negative.
    pub fn compute_split(&self, options: &SplitOptions) -> Result<SplitSummary, SessionError> {
        if self.ledger.is_empty() {
            return Err(SessionError::NoDishes);
        }
        let tax = validate_tax(self.tax)?;

        let summary = compute_split(&self.roster, &self.ledger, tax, options.tax_policy);
        info!(
            "event=split_computed module=session status=ok people={} dishes={} lines={} tax_recipients={}",
            self.roster.len(),
            self.ledger.len(),
            summary.totals.len(),
            summary.tax_recipients
        );
        Ok(summary)
    }

    /// Exports raw session data in persisted form. `last_updated` is unset.
    pub fn to_snapshot(&self) -> GroupSnapshot {
        let dishes = self
            .ledger
            .iter()
            .map(|dish| DishRecord {
                name: dish.name.clone(),
                price: dish.price,
                shared_by: dish
                    .shared_by
                    .iter()
                    .filter_map(|id| self.roster.get_by_id(*id))
                    .map(|person| person.name.clone())
                    .collect(),
            })
            .collect();

        GroupSnapshot::new(self.roster.names(), dishes, self.tax)
    }

    /// Rebuilds a session from a persisted snapshot.
    ///
    /// Sharer names missing from `people` are dropped, and a dish left with
    /// no known sharer is skipped.
    pub fn from_snapshot(snapshot: &GroupSnapshot) -> Result<Self, SessionError> {
        let roster = Roster::from_names(&snapshot.people)?;
        let mut ledger = DishLedger::new();
        let mut dropped_sharers = 0usize;
        let mut skipped_dishes = 0usize;

        for record in &snapshot.dishes {
            let mut shared_by = Vec::with_capacity(record.shared_by.len());
            for name in &record.shared_by {
                match roster.find_by_name(name) {
                    Some(person) => shared_by.push(person.id),
                    None => dropped_sharers += 1,
                }
            }
            if shared_by.is_empty() {
                skipped_dishes += 1;
                continue;
            }

            let dish = Dish {
                name: record.name.clone(),
                price: record.price,
                shared_by,
            };
            ledger.insert_dish(&roster, dish, None)?;
        }

        if dropped_sharers > 0 || skipped_dishes > 0 {
            warn!(
                "event=session_hydrate module=session status=partial dropped_sharers={} skipped_dishes={}",
                dropped_sharers, skipped_dishes
            );
        }

        Ok(Self {
            roster,
            ledger,
            tax: validate_tax(snapshot.tax)?,
            selection: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_tax, SessionError};

    #[test]
    fn blank_tax_is_zero() {
        assert_eq!(parse_tax("").unwrap(), 0.0);
        assert_eq!(parse_tax(" 15 ").unwrap(), 15.0);
    }

    #[test]
    fn negative_or_garbage_tax_is_rejected() {
        assert!(matches!(parse_tax("-5"), Err(SessionError::InvalidTax(_))));
        assert!(matches!(parse_tax("tip"), Err(SessionError::InvalidTax(_))));
    }
}
