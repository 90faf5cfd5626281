use chrono::Utc;

use crate::error::{CoreError, StoreError};
use crate::model::{Record, Status};
use crate::storage::{RecordHandle, RecordStore, StoredRecord};

/// What happened when a consumer tried to move a record forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The transition was applied and written back under this handle.
    Advanced(RecordHandle),
    /// Someone already moved the record to this status; nothing was written.
    AlreadyAdvanced(Status),
}

/// Whether the stored copy of `stored` can still move to `next`.
///
/// Consumers call this right before their side effect so a record another
/// process already handled is skipped.
pub fn still_pending<S: RecordStore + ?Sized>(
    store: &S,
    stored: &StoredRecord,
    next: Status,
) -> Result<bool, StoreError> {
    let current = store.load(&stored.handle)?;
    Ok(current.record.status().can_advance_to(next))
}

/// Move the record behind `stored.handle` to `next`.
///
/// The transition is applied to a fresh read of the document, not to the
/// caller's copy, so fields written by other processes in the meantime
/// survive.
pub fn advance<S: RecordStore + ?Sized>(
    store: &S,
    stored: &StoredRecord,
    next: Status,
) -> Result<Advance, CoreError> {
    advance_with(store, stored, next, |_| {})
}

/// [`advance`], also applying `edit` to the record in the same write.
pub fn advance_with<S, F>(
    store: &S,
    stored: &StoredRecord,
    next: Status,
    edit: F,
) -> Result<Advance, CoreError>
where
    S: RecordStore + ?Sized,
    F: FnOnce(&mut Record),
{
    let mut current = store.load(&stored.handle)?;
    let from = current.record.status();

    if let Err(e) = current.record.transition(next, Utc::now()) {
        tracing::debug!(handle = %stored.handle, "not advancing: {e}");
        return Ok(Advance::AlreadyAdvanced(from));
    }
    edit(&mut current.record);

    store.update(&current)?;
    tracing::info!(handle = %stored.handle, %from, to = %next, "record advanced");
    Ok(Advance::Advanced(current.handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewRecord, Platform, PlatformLimits, RecordKind};
    use crate::storage::FsStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FsStore, StoredRecord) {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let rec = Record::new(
            NewRecord::post(RecordKind::TextPost, Platform::Twitter, "launch day"),
            &PlatformLimits::default(),
        )
        .unwrap();
        let handle = store.put(&rec).unwrap();
        let stored = store.load(&handle).unwrap();
        (tmp, store, stored)
    }

    #[test]
    fn test_advance_draft_to_posted_then_reject_draft() {
        let (_tmp, store, stored) = setup();

        assert_eq!(
            advance(&store, &stored, Status::Posted).unwrap(),
            Advance::Advanced(stored.handle.clone())
        );

        assert_eq!(
            advance(&store, &stored, Status::Draft).unwrap(),
            Advance::AlreadyAdvanced(Status::Posted)
        );
        let on_disk = store.load(&stored.handle).unwrap();
        assert_eq!(on_disk.record.status(), Status::Posted);
        assert!(on_disk.record.posted_at.is_some());
    }

    #[test]
    fn test_second_consumer_sees_already_advanced() {
        let (_tmp, store, stored) = setup();
        // Both consumers loaded the same draft
        let other_copy = stored.clone();

        advance(&store, &stored, Status::DiscordSent).unwrap();
        assert!(!still_pending(&store, &other_copy, Status::DiscordSent).unwrap());
        assert_eq!(
            advance(&store, &other_copy, Status::DiscordSent).unwrap(),
            Advance::AlreadyAdvanced(Status::DiscordSent)
        );

        // Publishing after review is still a forward move
        assert!(still_pending(&store, &other_copy, Status::Posted).unwrap());
        assert!(matches!(
            advance(&store, &other_copy, Status::Posted).unwrap(),
            Advance::Advanced(_)
        ));
    }

    #[test]
    fn test_advance_with_edits_in_same_write() {
        let (_tmp, store, stored) = setup();
        let outcome = advance_with(&store, &stored, Status::Posted, |rec| {
            rec.post_id = Some("1790".into());
        })
        .unwrap();
        assert!(matches!(outcome, Advance::Advanced(_)));

        let on_disk = store.load(&stored.handle).unwrap();
        assert_eq!(on_disk.record.post_id.as_deref(), Some("1790"));

        // Rejected transitions leave the edit unapplied
        advance_with(&store, &stored, Status::Posted, |rec| {
            rec.post_id = Some("other".into());
        })
        .unwrap();
        let on_disk = store.load(&stored.handle).unwrap();
        assert_eq!(on_disk.record.post_id.as_deref(), Some("1790"));
    }

    #[test]
    fn test_advance_missing_record() {
        let (_tmp, store, stored) = setup();
        std::fs::remove_file(store.path_of(&stored.handle)).unwrap();
        assert!(matches!(
            advance(&store, &stored, Status::Posted),
            Err(CoreError::Store(StoreError::NotFound(_)))
        ));
    }
}
