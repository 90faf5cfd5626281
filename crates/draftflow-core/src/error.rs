use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Platform, RecordKind, Status};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A producer tried to build a record that breaks the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    #[error("{platform} content is {len} characters (max {limit})")]
    ContentTooLong {
        platform: Platform,
        len: usize,
        limit: usize,
    },
}

/// Why a stored document could not be turned into a record.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("document has neither `platform` nor `type`")]
    MissingDiscriminator,
}

/// A file in the store that a scan had to skip.
#[derive(Error, Debug)]
#[error("Malformed record {location}: {source}")]
pub struct MalformedRecord {
    pub location: String,
    #[source]
    pub source: DocumentError,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot enumerate store {}: {source}", .path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Refusing to move {handle} back from {on_disk} to {attempted}")]
    StatusRegression {
        handle: String,
        on_disk: Status,
        attempted: Status,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("status can only move forward, not from {from} to {to}")]
    NotForward { from: Status, to: Status },
}
