//! Dish ledger model.
//!
//! # Responsibility
//! - Hold the ordered list of dishes committed in one session.
//! - Validate dish input against the current roster before storing.
//!
//! # Invariants
//! - `price > 0` and finite for every stored dish.
//! - `shared_by` is non-empty and free of duplicates.
//! - Writes validate everything before touching the list.

use crate::model::amount::{parse_amount, AmountError};
use crate::model::person::{PersonId, Roster};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One purchased item split equally among `shared_by`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub name: String,
    pub price: f64,
    pub shared_by: Vec<PersonId>,
}

impl Dish {
    pub fn is_shared_by(&self, person_id: PersonId) -> bool {
        self.shared_by.contains(&person_id)
    }
}

/// Dish ledger validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DishError {
    /// A required field (`name`, `price`, `shared_by`) is blank.
    MissingField(&'static str),
    /// Price is unparsable or not strictly positive.
    InvalidPrice(String),
    /// A sharer id is not part of the roster.
    UnknownSharer(PersonId),
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for DishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required dish field: {field}"),
            Self::InvalidPrice(reason) => write!(f, "invalid price: {reason}"),
            Self::UnknownSharer(id) => write!(f, "sharer is not in the roster: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "dish index {index} out of range (len {len})")
            }
        }
    }
}

impl Error for DishError {}

impl From<AmountError> for DishError {
    fn from(value: AmountError) -> Self {
        Self::InvalidPrice(value.to_string())
    }
}

/// Ordered list of committed dishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishLedger {
    dishes: Vec<Dish>,
}

impl DishLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dish, or replaces the dish at `edit_index` in place.
    ///
    /// Returns the index the dish now occupies.
    ///
    /// # Errors
    /// - `MissingField` for a blank name, blank price or empty `shared_by`,
    ///   checked in that order.
    /// - `InvalidPrice` when the price does not parse or is `<= 0`.
    /// - `UnknownSharer` when a sharer is not in `roster`.
    /// - `IndexOutOfRange` when `edit_index` does not exist.
    pub fn add_or_update(
        &mut self,
        roster: &Roster,
        name: &str,
        price_input: &str,
        shared_by: &[PersonId],
        edit_index: Option<usize>,
    ) -> Result<usize, DishError> {
        if name.trim().is_empty() {
            return Err(DishError::MissingField("name"));
        }
        if price_input.trim().is_empty() {
            return Err(DishError::MissingField("price"));
        }
        if shared_by.is_empty() {
            return Err(DishError::MissingField("shared_by"));
        }
        let price = parse_amount(price_input)?;
        let dish = Self::build_dish(roster, name, price, shared_by)?;
        self.commit(dish, edit_index)
    }

    /// Stores an already-typed dish after the same invariant checks.
    pub fn insert_dish(
        &mut self,
        roster: &Roster,
        dish: Dish,
        edit_index: Option<usize>,
    ) -> Result<usize, DishError> {
        let dish = Self::build_dish(roster, &dish.name, Some(dish.price), &dish.shared_by)?;
        self.commit(dish, edit_index)
    }

    /// Removes and returns the dish at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Dish, DishError> {
        self.check_index(index)?;
        Ok(self.dishes.remove(index))
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Dish> {
        self.dishes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dish> {
        self.dishes.iter()
    }

    /// Sum of all dish prices.
    pub fn total_price(&self) -> f64 {
        self.dishes.iter().map(|dish| dish.price).sum()
    }

    /// Dishes that list `person_id` as a sharer.
    pub fn referencing(&self, person_id: PersonId) -> impl Iterator<Item = &Dish> {
        self.dishes
            .iter()
            .filter(move |dish| dish.is_shared_by(person_id))
    }

    /// Drops `person_id` from every dish's sharers.
    ///
    /// Callers must first make sure no dish is left without sharers.
    pub(crate) fn strip_sharer(&mut self, person_id: PersonId) {
        for dish in &mut self.dishes {
            dish.shared_by.retain(|id| *id != person_id);
        }
    }

    fn build_dish(
        roster: &Roster,
        name: &str,
        price: Option<f64>,
        shared_by: &[PersonId],
    ) -> Result<Dish, DishError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DishError::MissingField("name"));
        }
        let price = price.ok_or(DishError::MissingField("price"))?;
        if shared_by.is_empty() {
            return Err(DishError::MissingField("shared_by"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DishError::InvalidPrice(format!(
                "price must be greater than zero, got {price}"
            )));
        }

        let mut sharers: Vec<PersonId> = Vec::with_capacity(shared_by.len());
        for id in shared_by {
            if !roster.contains(*id) {
                return Err(DishError::UnknownSharer(*id));
            }
            if !sharers.contains(id) {
                sharers.push(*id);
            }
        }

        Ok(Dish {
            name: name.to_string(),
            price,
            shared_by: sharers,
        })
    }

    fn commit(&mut self, dish: Dish, edit_index: Option<usize>) -> Result<usize, DishError> {
        match edit_index {
            Some(index) => {
                self.check_index(index)?;
                self.dishes[index] = dish;
                Ok(index)
            }
            None => {
                self.dishes.push(dish);
                Ok(self.dishes.len() - 1)
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DishError> {
        if index >= self.dishes.len() {
            return Err(DishError::IndexOutOfRange {
                index,
                len: self.dishes.len(),
            });
        }
        Ok(())
    }
}
