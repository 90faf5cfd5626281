use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::error::StoreError;
use crate::model::RecordKind;
use crate::scan::Filter;
use crate::storage::{RecordHandle, RecordStore};

/// Outcome of a duplicate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupOutcome {
    New,
    /// A record of the same kind already carries this identity key.
    Duplicate(RecordHandle),
}

impl DedupOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Stops producers from turning the same input into a second record.
///
/// Every check is a full scan of records of the requested kind. The store is
/// small and append-mostly, so there is no persisted key index.
pub struct Deduplicator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> Deduplicator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Look for an existing record of `kind` whose identity key is `key`.
    pub fn check(&self, key: &str, kind: RecordKind) -> Result<DedupOutcome, StoreError> {
        let existing = self.store.get_all(&Filter::of_kind(kind))?;
        Ok(existing
            .into_iter()
            .find(|s| s.record.identity_key() == Some(key))
            .map_or(DedupOutcome::New, |s| DedupOutcome::Duplicate(s.handle)))
    }

    pub fn seen(&self, key: &str, kind: RecordKind) -> Result<bool, StoreError> {
        Ok(self.check(key, kind)?.is_duplicate())
    }

    /// All identity keys currently stored for `kind`, for producers that
    /// check many candidates in one pass.
    pub fn known_keys(&self, kind: RecordKind) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .store
            .get_all(&Filter::of_kind(kind))?
            .into_iter()
            .filter_map(|s| s.record.identity_key().map(String::from))
            .collect())
    }
}

/// Identity key for a source file: its canonical absolute path.
///
/// Keys are path based, so a renamed or moved file counts as new input.
pub fn identity_key_for(path: &Path) -> io::Result<String> {
    Ok(std::fs::canonicalize(path)?.to_string_lossy().into_owned())
}
