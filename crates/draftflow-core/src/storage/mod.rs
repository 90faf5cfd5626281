pub mod fs_backend;
pub mod naming;
pub mod read;
pub mod write;

pub use fs_backend::FsStore;

use crate::error::{MalformedRecord, StoreError};
use crate::model::Record;
use crate::scan::Filter;

/// Stable, content-free address of a stored record.
///
/// For the filesystem backend this is the file name inside the store root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHandle(String);

impl RecordHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record together with the handle it was loaded from.
///
/// Updates always go back through `handle`; callers never rebuild a path.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub handle: RecordHandle,
    pub record: Record,
}

/// Result of one pass over the store.
#[derive(Debug, Default)]
pub struct Scan {
    /// Matching records, oldest `created_at` first.
    pub records: Vec<StoredRecord>,
    /// Documents that could not be parsed and were skipped.
    pub malformed: Vec<MalformedRecord>,
}

/// Persistence contract shared by every producer and consumer.
///
/// Implementations must not cache between calls: other processes may be
/// writing to the same collection.
pub trait RecordStore {
    /// Persist a new record and return its handle.
    fn put(&self, record: &Record) -> Result<RecordHandle, StoreError>;

    /// Enumerate every record matching `filter`. Unparseable documents are
    /// reported in [`Scan::malformed`], never returned as an error.
    fn scan(&self, filter: &Filter) -> Result<Scan, StoreError>;

    /// Re-read a single record.
    fn load(&self, handle: &RecordHandle) -> Result<StoredRecord, StoreError>;

    /// Rewrite an existing record in place. Readers never see a partial write.
    fn update(&self, stored: &StoredRecord) -> Result<(), StoreError>;

    /// [`RecordStore::scan`] without the malformed report.
    fn get_all(&self, filter: &Filter) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.scan(filter)?.records)
    }
}
