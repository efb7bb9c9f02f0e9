//! Persisted group snapshot.
//!
//! # Responsibility
//! - Define the JSON shape stored per group name.
//! - Accept records written by older clients (tax as raw text, missing
//!   fields) without weakening the in-memory invariants.
//!
//! # Invariants
//! - People and sharers are stored by name, never by session id.
//! - `validate()` is the gate between raw JSON and a usable snapshot.

use crate::model::amount::parse_amount;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted dish entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishRecord {
    pub name: String,
    pub price: f64,
    pub shared_by: Vec<String>,
}

/// Unit of persistence for one group.
///
/// Serialized as `{people, dishes, tax, lastUpdated}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub dishes: Vec<DishRecord>,
    #[serde(default, deserialize_with = "deserialize_tax")]
    pub tax: f64,
    /// Set by the group store on every save.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Snapshot invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    EmptyPerson,
    DuplicatePerson(String),
    InvalidDish { index: usize, reason: &'static str },
    InvalidTax(f64),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPerson => write!(f, "snapshot contains an empty person name"),
            Self::DuplicatePerson(name) => write!(f, "snapshot lists `{name}` twice"),
            Self::InvalidDish { index, reason } => {
                write!(f, "snapshot dish #{index} is invalid: {reason}")
            }
            Self::InvalidTax(value) => write!(f, "snapshot tax must be >= 0, got {value}"),
        }
    }
}

impl Error for SnapshotError {}

impl GroupSnapshot {
    pub fn new(people: Vec<String>, dishes: Vec<DishRecord>, tax: f64) -> Self {
        Self {
            people,
            dishes,
            tax,
            last_updated: None,
        }
    }

    /// Checks the structural invariants shared with the live session.
    ///
    /// Sharer names missing from `people` are tolerated; hydration drops them.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for person in &self.people {
            let trimmed = person.trim();
            if trimmed.is_empty() {
                return Err(SnapshotError::EmptyPerson);
            }
            if !seen.insert(trimmed) {
                return Err(SnapshotError::DuplicatePerson(trimmed.to_string()));
            }
        }

        for (index, dish) in self.dishes.iter().enumerate() {
            if dish.name.trim().is_empty() {
                return Err(SnapshotError::InvalidDish {
                    index,
                    reason: "empty name",
                });
            }
            if !dish.price.is_finite() || dish.price <= 0.0 {
                return Err(SnapshotError::InvalidDish {
                    index,
                    reason: "price must be greater than zero",
                });
            }
            if dish.shared_by.is_empty() {
                return Err(SnapshotError::InvalidDish {
                    index,
                    reason: "no sharers",
                });
            }
        }

        if !self.tax.is_finite() || self.tax < 0.0 {
            return Err(SnapshotError::InvalidTax(self.tax));
        }

        Ok(())
    }

    /// Compares people, dishes and tax, ignoring `last_updated`.
    pub fn same_contents(&self, other: &Self) -> bool {
        self.people == other.people && self.dishes == other.dishes && self.tax == other.tax
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaxField {
    Number(f64),
    Text(String),
}

// Older records stored the raw text-field value, e.g. `"50"` or `""`.
fn deserialize_tax<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TaxField>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(TaxField::Number(value)) => Ok(value),
        Some(TaxField::Text(text)) => parse_amount(&text)
            .map(|value| value.unwrap_or(0.0))
            .map_err(D::Error::custom),
    }
}
