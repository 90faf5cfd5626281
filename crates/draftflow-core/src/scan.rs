use std::path::Path;

use crate::error::StoreError;
use crate::model::{Platform, Record, RecordKind, Status};
use crate::storage::{FsStore, RecordStore, StoredRecord};

/// Conjunction of optional predicates over stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub platform: Option<Platform>,
    pub status: Option<Status>,
    pub kind: Option<RecordKind>,
    /// Substring the file name must contain. Only narrows which files get
    /// parsed; the other predicates still run on the parsed record.
    pub name_hint: Option<String>,
}

impl Filter {
    /// Every record in `draft`.
    pub fn drafts() -> Self {
        Self {
            status: Some(Status::Draft),
            ..Default::default()
        }
    }

    /// Drafts for one platform, with the platform name as file-name hint.
    pub fn drafts_for(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            status: Some(Status::Draft),
            name_hint: Some(platform.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn of_kind(kind: RecordKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.platform.map_or(true, |p| record.platform == Some(p))
            && self.status.map_or(true, |s| s == record.status())
            && self.kind.map_or(true, |k| k == record.kind)
    }

    pub fn matches_name(&self, file_name: &str) -> bool {
        self.name_hint
            .as_deref()
            .map_or(true, |hint| file_name.contains(hint))
    }
}

/// Read every record under `root` matching `filter`, oldest first.
///
/// Always goes to disk. An empty or fully filtered store gives an empty vec;
/// only an unreadable directory is an error.
pub fn select(root: &Path, filter: &Filter) -> Result<Vec<StoredRecord>, StoreError> {
    FsStore::open(root).get_all(filter)
}
