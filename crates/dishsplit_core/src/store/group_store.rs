//! Named group persistence on top of a record store.
//!
//! # Responsibility
//! - Map group names to JSON-encoded `GroupSnapshot` records.
//! - Own the save/load/rename/delete lifecycle and rename recovery.
//!
//! # Invariants
//! - Group names are trimmed and non-empty; the trimmed name is the key.
//! - Only snapshots passing `GroupSnapshot::validate()` are written or
//!   returned.
//! - `rename` never overwrites an existing group.

use crate::model::snapshot::{GroupSnapshot, SnapshotError};
use crate::store::record_store::{RecordStore, RecordStoreError};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GroupResult<T> = Result<T, GroupStoreError>;

/// Group persistence errors.
#[derive(Debug)]
pub enum GroupStoreError {
    EmptyName,
    /// No group under this name, or its record cannot be read back.
    NotFound(String),
    DuplicateName(String),
    Invalid(SnapshotError),
    Serialize(serde_json::Error),
    Storage(RecordStoreError),
}

impl Display for GroupStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "group name cannot be empty"),
            Self::NotFound(name) => write!(f, "group not found: {name}"),
            Self::DuplicateName(name) => write!(f, "a group named `{name}` already exists"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode group snapshot: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GroupStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordStoreError> for GroupStoreError {
    fn from(value: RecordStoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<SnapshotError> for GroupStoreError {
    fn from(value: SnapshotError) -> Self {
        Self::Invalid(value)
    }
}

impl From<serde_json::Error> for GroupStoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Outcome of `GroupStore::repair_interrupted_rename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRepair {
    /// At most one of the two keys exists.
    NothingToRepair,
    /// Both keys held the same group; the old key was removed.
    RemovedStale,
    /// Both keys hold different data; nothing was changed.
    Conflict,
}

/// Group persistence facade over any `RecordStore`.
pub struct GroupStore<S: RecordStore> {
    records: S,
}

impl<S: RecordStore> GroupStore<S> {
    pub fn new(records: S) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &S {
        &self.records
    }

    pub fn into_inner(self) -> S {
        self.records
    }

    /// Writes `snapshot` under `name`, replacing any existing group.
    ///
    /// Returns the stored snapshot with `last_updated` set to now.
    pub fn save(&mut self, name: &str, snapshot: &GroupSnapshot) -> GroupResult<GroupSnapshot> {
        let key = normalize_group_name(name)?;
        snapshot.validate()?;

        let mut stored = snapshot.clone();
        stored.last_updated = Some(Utc::now());
        let encoded = serde_json::to_string(&stored)?;
        self.records.set(key, &encoded).inspect_err(|err| {
            warn!("event=group_save module=store status=error error={err}");
        })?;

        info!(
            "event=group_save module=store status=ok people={} dishes={}",
            stored.people.len(),
            stored.dishes.len()
        );
        Ok(stored)
    }

    /// Reads the group stored under `name`.
    ///
    /// # Errors
    /// - `NotFound` when the key is absent, or the record is not valid
    ///   snapshot JSON, or it violates snapshot invariants.
    /// - `Storage` when the record store fails.
    pub fn load(&self, name: &str) -> GroupResult<GroupSnapshot> {
        let key = normalize_group_name(name)?;
        self.read(key)?
            .ok_or_else(|| GroupStoreError::NotFound(key.to_string()))
    }

    pub fn exists(&self, name: &str) -> GroupResult<bool> {
        let key = normalize_group_name(name)?;
        Ok(self.records.get(key)?.is_some())
    }

    /// All stored group names, sorted.
    pub fn list_names(&self) -> GroupResult<Vec<String>> {
        let mut names = self.records.list_keys()?;
        names.sort();
        Ok(names)
    }

    /// Moves a group to a new name.
    ///
    /// Renaming a group to its own name is a no-op.
    ///
    /// # Errors
    /// - `DuplicateName` when `new_name` is already taken.
    /// - `NotFound` when `old_name` does not exist.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> GroupResult<()> {
        let from = normalize_group_name(old_name)?;
        let to = normalize_group_name(new_name)?;
        if from == to {
            return Ok(());
        }
        if self.records.get(to)?.is_some() {
            return Err(GroupStoreError::DuplicateName(to.to_string()));
        }

        if !self.records.move_record(from, to)? {
            return Err(GroupStoreError::NotFound(from.to_string()));
        }
        info!("event=group_rename module=store status=ok");
        Ok(())
    }

    /// Deletes the group under `name`. Returns whether it existed.
    pub fn delete(&mut self, name: &str) -> GroupResult<bool> {
        let key = normalize_group_name(name)?;
        let removed = self.records.remove(key)?;
        info!("event=group_delete module=store status=ok removed={removed}");
        Ok(removed)
    }

    /// Cleans up after a rename that wrote `new_name` but never removed
    /// `old_name`.
    pub fn repair_interrupted_rename(
        &mut self,
        old_name: &str,
        new_name: &str,
    ) -> GroupResult<RenameRepair> {
        let from = normalize_group_name(old_name)?;
        let to = normalize_group_name(new_name)?;
        if from == to {
            return Ok(RenameRepair::NothingToRepair);
        }

        let (Some(stale), Some(current)) = (self.read(from)?, self.read(to)?) else {
            let both_raw = self.records.get(from)?.is_some() && self.records.get(to)?.is_some();
            return Ok(if both_raw {
                RenameRepair::Conflict
            } else {
                RenameRepair::NothingToRepair
            });
        };

        if !stale.same_contents(&current) {
            warn!("event=group_rename_repair module=store status=conflict");
            return Ok(RenameRepair::Conflict);
        }

        self.records.remove(from)?;
        info!("event=group_rename_repair module=store status=ok");
        Ok(RenameRepair::RemovedStale)
    }

    // Absent and unreadable records both come back as `None`.
    fn read(&self, key: &str) -> GroupResult<Option<GroupSnapshot>> {
        let Some(raw) = self.records.get(key)? else {
            return Ok(None);
        };

        let snapshot = match serde_json::from_str::<GroupSnapshot>(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=group_load module=store status=error error_code=malformed_json line={} column={}",
                    err.line(),
                    err.column()
                );
                return Ok(None);
            }
        };
        if snapshot.validate().is_err() {
            warn!("event=group_load module=store status=error error_code=invalid_snapshot");
            return Ok(None);
        }

        Ok(Some(snapshot))
    }
}

fn normalize_group_name(name: &str) -> GroupResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GroupStoreError::EmptyName);
    }
    Ok(trimmed)
}
