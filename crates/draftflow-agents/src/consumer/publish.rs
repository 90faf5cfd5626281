use std::io::Write;

use chrono::Utc;

use draftflow_core::config::DraftflowConfig;
use draftflow_core::lifecycle::{advance_with, still_pending, Advance};
use draftflow_core::model::{Platform, PlatformLimits, Record, Status};
use draftflow_core::storage::{RecordStore, StoredRecord};
use draftflow_core::summary::PassSummary;

use super::pending_drafts;
use crate::error::{AgentError, DeliveryError};

/// What a publisher hands back after a successful post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub post_id: String,
}

/// Posts a record to its platform.
pub trait Publisher {
    fn publish(&mut self, record: &Record) -> Result<PublishReceipt, DeliveryError>;
}

/// Writes what would be posted instead of calling any platform API.
pub struct DryRunPublisher<W: Write> {
    out: W,
    sent: usize,
}

impl<W: Write> DryRunPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Publisher for DryRunPublisher<W> {
    fn publish(&mut self, record: &Record) -> Result<PublishReceipt, DeliveryError> {
        let platform = record.platform.map_or("none", |p| p.as_str());
        self.sent += 1;
        let post_id = format!(
            "dryrun_{}_{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.sent
        );
        writeln!(self.out, "[dry-run] {platform} {post_id}")?;
        writeln!(self.out, "{}", record.content.as_deref().unwrap_or_default())?;
        self.out.flush()?;
        Ok(PublishReceipt { post_id })
    }
}

/// Publishes drafts and marks them `posted`, recording the post id.
///
/// Content is re-validated against the current limits first; drafts that no
/// longer fit are skipped and left as drafts.
#[derive(Debug, Clone)]
pub struct PublishConsumer {
    platform: Option<Platform>,
    limits: PlatformLimits,
}

impl PublishConsumer {
    pub fn new(config: &DraftflowConfig) -> Self {
        Self {
            platform: None,
            limits: config.platform_limits.clone(),
        }
    }

    pub fn platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn run<S, P>(&self, store: &S, publisher: &mut P) -> Result<PassSummary, AgentError>
    where
        S: RecordStore + ?Sized,
        P: Publisher + ?Sized,
    {
        let mut summary = PassSummary::default();
        for draft in pending_drafts(store, self.platform, &mut summary)? {
            if let Err(reason) = self.publishable(&draft.record) {
                tracing::warn!(handle = %draft.handle, "Not publishing: {reason}");
                summary.skipped += 1;
                continue;
            }
            match publish_one(store, publisher, &draft) {
                Ok(true) => summary.updated += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!(handle = %draft.handle, "Publish failed: {e}");
                    summary.failed += 1;
                }
            }
        }
        summary.log("publish");
        Ok(summary)
    }

    fn publishable(&self, record: &Record) -> Result<(), String> {
        if record.content.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err("content is empty".into());
        }
        record.check_length(&self.limits).map_err(|e| e.to_string())
    }
}

fn publish_one<S, P>(store: &S, publisher: &mut P, draft: &StoredRecord) -> Result<bool, AgentError>
where
    S: RecordStore + ?Sized,
    P: Publisher + ?Sized,
{
    if !still_pending(store, draft, Status::Posted)? {
        tracing::debug!(handle = %draft.handle, "already posted");
        return Ok(false);
    }
    let receipt = publisher.publish(&draft.record)?;
    tracing::info!(handle = %draft.handle, post_id = %receipt.post_id, "published");
    let outcome = advance_with(store, draft, Status::Posted, |rec| {
        rec.post_id = Some(receipt.post_id);
    })?;
    Ok(matches!(outcome, Advance::Advanced(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftflow_core::model::{NewRecord, RecordKind};
    use draftflow_core::scan::Filter;
    use draftflow_core::storage::FsStore;
    use tempfile::TempDir;

    struct Failing;

    impl Publisher for Failing {
        fn publish(&mut self, _record: &Record) -> Result<PublishReceipt, DeliveryError> {
            Err(DeliveryError::Rejected("401 unauthorized".into()))
        }
    }

    /// Advances the record itself before returning, as a concurrent consumer
    /// would between our check and our write.
    struct Racing<'a> {
        store: &'a FsStore,
    }

    impl Publisher for Racing<'_> {
        fn publish(&mut self, _record: &Record) -> Result<PublishReceipt, DeliveryError> {
            let mut all = self.store.get_all(&Filter::drafts()).unwrap();
            let mut other = all.remove(0);
            other.record.transition(Status::Posted, Utc::now()).unwrap();
            other.record.post_id = Some("winner".into());
            self.store.update(&other).unwrap();
            Ok(PublishReceipt {
                post_id: "loser".into(),
            })
        }
    }

    fn put(store: &FsStore, platform: Platform, content: &str) -> StoredRecord {
        let rec = Record::new(
            NewRecord::post(RecordKind::TextPost, platform, content),
            &PlatformLimits::default(),
        )
        .unwrap();
        let handle = store.put(&rec).unwrap();
        store.load(&handle).unwrap()
    }

    #[test]
    fn test_dry_run_publishes_and_records_post_id() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let stored = put(&store, Platform::Twitter, "Ship it");

        let mut publisher = DryRunPublisher::new(Vec::new());
        let summary = PublishConsumer::new(&DraftflowConfig::default())
            .run(&store, &mut publisher)
            .unwrap();
        assert_eq!(summary.updated, 1);

        let posted = store.load(&stored.handle).unwrap().record;
        assert_eq!(posted.status(), Status::Posted);
        assert!(posted.posted_at.is_some());
        assert!(posted.post_id.as_deref().unwrap().starts_with("dryrun_"));

        let out = String::from_utf8(publisher.into_inner()).unwrap();
        assert!(out.contains("[dry-run] twitter"));
        assert!(out.contains("Ship it"));
    }

    #[test]
    fn test_delivery_failure_leaves_draft() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let stored = put(&store, Platform::Twitter, "Ship it");

        let summary = PublishConsumer::new(&DraftflowConfig::default())
            .run(&store, &mut Failing)
            .unwrap();
        assert_eq!(summary.failed, 1);
        let on_disk = store.load(&stored.handle).unwrap().record;
        assert_eq!(on_disk.status(), Status::Draft);
        assert!(on_disk.post_id.is_none());
    }

    #[test]
    fn test_draft_over_tightened_limit_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let stored = put(&store, Platform::Twitter, "twenty characters!!!");

        let mut config = DraftflowConfig::default();
        config.platform_limits.set(Platform::Twitter, 10);
        let summary = PublishConsumer::new(&config)
            .run(&store, &mut DryRunPublisher::new(Vec::new()))
            .unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            store.load(&stored.handle).unwrap().record.status(),
            Status::Draft
        );
    }

    #[test]
    fn test_platform_filter_and_reviewed_records_ignored() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        put(&store, Platform::Twitter, "tweet");
        put(&store, Platform::Linkedin, "article");
        let mut reviewed = put(&store, Platform::Twitter, "reviewed tweet");
        reviewed
            .record
            .transition(Status::DiscordSent, Utc::now())
            .unwrap();
        store.update(&reviewed).unwrap();

        let summary = PublishConsumer::new(&DraftflowConfig::default())
            .platform(Some(Platform::Twitter))
            .run(&store, &mut DryRunPublisher::new(Vec::new()))
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(
            store
                .get_all(&Filter {
                    status: Some(Status::Posted),
                    ..Default::default()
                })
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_concurrent_advance_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let stored = put(&store, Platform::Twitter, "Ship it");

        let summary = PublishConsumer::new(&DraftflowConfig::default())
            .run(&store, &mut Racing { store: &store })
            .unwrap();
        assert_eq!(summary.skipped, 1);
        let on_disk = store.load(&stored.handle).unwrap().record;
        assert_eq!(on_disk.post_id.as_deref(), Some("winner"));
    }
}
