use std::path::Path;

use crate::error::{DocumentError, MalformedRecord};
use crate::model::Record;

use super::RecordHandle;

/// Read and parse the document at `path`, attributing failures to `handle`.
pub fn read_record(path: &Path, handle: &RecordHandle) -> Result<Record, MalformedRecord> {
    let parsed = std::fs::read(path)
        .map_err(DocumentError::Io)
        .and_then(|bytes| Record::from_slice(&bytes));
    parsed.map_err(|source| MalformedRecord {
        location: handle.to_string(),
        source,
    })
}
