pub mod content;
pub mod portfolio;
pub mod repository;
pub mod visual;

use draftflow_core::model::{NewRecord, PlatformLimits, Record};
use draftflow_core::storage::{RecordHandle, RecordStore};
use draftflow_core::summary::PassSummary;

/// What a producer did with one candidate input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(RecordHandle),
    /// The input behind this identity key was already drafted.
    DuplicateSkipped(String),
    /// Nothing to produce for this input (e.g. no template for the platform).
    Skipped,
    Failed,
}

impl Outcome {
    pub fn tally(&self, summary: &mut PassSummary) {
        match self {
            Self::Created(_) => summary.created += 1,
            Self::DuplicateSkipped(_) | Self::Skipped => summary.skipped += 1,
            Self::Failed => summary.failed += 1,
        }
    }
}

/// Validate `new` and store it. Validation and write failures are logged and
/// reported as [`Outcome::Failed`]; they never abort the pass.
pub(crate) fn store_new<S: RecordStore + ?Sized>(
    store: &S,
    new: NewRecord,
    limits: &PlatformLimits,
) -> Outcome {
    let record = match Record::new(new, limits) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Rejected draft: {e}");
            return Outcome::Failed;
        }
    };
    match store.put(&record) {
        Ok(handle) => {
            tracing::info!(
                handle = %handle,
                kind = %record.kind,
                platform = record.platform.map_or("none", |p| p.as_str()),
                "draft created"
            );
            Outcome::Created(handle)
        }
        Err(e) => {
            tracing::warn!("Failed to store draft: {e}");
            Outcome::Failed
        }
    }
}
