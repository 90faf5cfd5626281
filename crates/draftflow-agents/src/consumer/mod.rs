pub mod publish;
pub mod review;

use draftflow_core::model::Platform;
use draftflow_core::scan::Filter;
use draftflow_core::storage::{RecordStore, StoredRecord};
use draftflow_core::summary::PassSummary;

use crate::error::AgentError;

/// Drafts a consumer pass should look at, oldest first. Malformed documents
/// are counted into `summary` and otherwise ignored.
pub(crate) fn pending_drafts<S: RecordStore + ?Sized>(
    store: &S,
    platform: Option<Platform>,
    summary: &mut PassSummary,
) -> Result<Vec<StoredRecord>, AgentError> {
    let filter = platform.map_or_else(Filter::drafts, Filter::drafts_for);
    let scan = store.scan(&filter)?;
    summary.malformed += scan.malformed.len();
    tracing::debug!(
        drafts = scan.records.len(),
        malformed = scan.malformed.len(),
        "scanned for drafts"
    );
    Ok(scan.records)
}

/// `pillar_name` -> `Pillar Name`.
pub(crate) fn title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
