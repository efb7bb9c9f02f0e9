//! Person and roster model.
//!
//! # Responsibility
//! - Hold the ordered set of people taking part in one bill.
//! - Give every person a stable id so dishes survive renames.
//!
//! # Invariants
//! - Names are trimmed and non-empty.
//! - Names are pairwise distinct (case-sensitive exact match).
//! - Order is insertion order; edit-in-place keeps position and id.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Session-local identifier for a person.
///
/// Never persisted: snapshots store names, and ids are minted again on load.
pub type PersonId = Uuid;

/// One participant in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

/// Roster validation and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    EmptyName,
    DuplicateName(String),
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::DuplicateName(name) => write!(f, "person already added: {name}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "person index {index} out of range (len {len})")
            }
        }
    }
}

impl Error for RosterError {}

/// Ordered set of unique people.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster by appending each name in order.
    ///
    /// Fails on the first blank or duplicate name.
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add_or_update(name.as_ref(), None)?;
        }
        Ok(roster)
    }

    /// Appends a person, or renames the person at `edit_index` in place.
    ///
    /// # Contract
    /// - `name` is trimmed before any check.
    /// - Renaming an entry to its own current value succeeds without change.
    /// - The person keeps its id when renamed.
    ///
    /// # Errors
    /// - `EmptyName` when the trimmed name is blank.
    /// - `DuplicateName` when another entry already holds the name.
    /// - `IndexOutOfRange` when `edit_index` does not exist.
    pub fn add_or_update(
        &mut self,
        name: &str,
        edit_index: Option<usize>,
    ) -> Result<PersonId, RosterError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if let Some(index) = edit_index {
            self.check_index(index)?;
        }

        if let Some(existing) = self.people.iter().position(|p| p.name == trimmed) {
            if Some(existing) != edit_index {
                return Err(RosterError::DuplicateName(trimmed.to_string()));
            }
        }

        match edit_index {
            Some(index) => {
                let person = &mut self.people[index];
                person.name = trimmed.to_string();
                Ok(person.id)
            }
            None => {
                let person = Person {
                    id: Uuid::new_v4(),
                    name: trimmed.to_string(),
                };
                let id = person.id;
                self.people.push(person);
                Ok(id)
            }
        }
    }

    /// Removes and returns the person at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Person, RosterError> {
        self.check_index(index)?;
        Ok(self.people.remove(index))
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Person> {
        self.people.get(index)
    }

    pub fn get_by_id(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn position_of(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|p| p.id == id)
    }

    /// Exact, case-sensitive lookup on the trimmed name.
    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        let trimmed = name.trim();
        self.people.iter().find(|p| p.name == trimmed)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.people.iter().map(|p| p.name.clone()).collect()
    }

    fn check_index(&self, index: usize) -> Result<(), RosterError> {
        if index >= self.people.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.people.len(),
            });
        }
        Ok(())
    }
}
