//! Record model, status lifecycle and directory-backed store shared by every
//! draftflow producer and consumer.

pub mod config;
pub mod dedup;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod scan;
pub mod storage;
pub mod summary;

pub use config::DraftflowConfig;
pub use dedup::{identity_key_for, DedupOutcome, Deduplicator};
pub use error::{
    CoreError, DocumentError, MalformedRecord, StoreError, TransitionError, ValidationError,
};
pub use lifecycle::{advance, advance_with, still_pending, Advance};
pub use model::{NewRecord, Platform, PlatformLimits, Record, RecordKind, Status};
pub use scan::{select, Filter};
pub use storage::{FsStore, RecordHandle, RecordStore, Scan, StoredRecord};
pub use summary::PassSummary;
