use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DocumentError, StoreError};
use crate::model::Record;
use crate::scan::Filter;

use super::naming::{is_record_file, record_file_name};
use super::read::read_record;
use super::write::write_atomic;
use super::{RecordHandle, RecordStore, Scan, StoredRecord};

/// A directory of JSON documents, one per record. There is no index: every
/// scan lists the directory and parses what it finds.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Point at `root`. Nothing is touched on disk until the first call.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::WriteFailure {
            path: self.root.clone(),
            source,
        })
    }

    /// Absolute location of the document behind `handle`.
    pub fn path_of(&self, handle: &RecordHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }

    fn enumerate_error(&self, source: io::Error) -> StoreError {
        StoreError::Enumerate {
            path: self.root.clone(),
            source,
        }
    }
}

impl RecordStore for FsStore {
    fn put(&self, record: &Record) -> Result<RecordHandle, StoreError> {
        self.ensure_root()?;
        let handle = RecordHandle::new(record_file_name(record));
        let path = self.path_of(&handle);
        let bytes = record.to_json_pretty()?;
        write_atomic(&path, &bytes).map_err(|source| StoreError::WriteFailure { path, source })?;
        tracing::debug!(handle = %handle, kind = %record.kind, "record stored");
        Ok(handle)
    }

    fn scan(&self, filter: &Filter) -> Result<Scan, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| self.enumerate_error(e))?;
        let mut scan = Scan::default();

        for entry in entries {
            let entry = entry.map_err(|e| self.enumerate_error(e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_record_file(&name) || !filter.matches_name(&name) {
                continue;
            }
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }

            let handle = RecordHandle::new(name);
            match read_record(&entry.path(), &handle) {
                Ok(record) => {
                    if filter.matches(&record) {
                        scan.records.push(StoredRecord { handle, record });
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed record: {e}");
                    scan.malformed.push(e);
                }
            }
        }

        // Oldest first so consumers work through drafts in creation order
        scan.records.sort_by(|a, b| {
            a.record
                .created_at()
                .cmp(&b.record.created_at())
                .then_with(|| a.handle.cmp(&b.handle))
        });

        Ok(scan)
    }

    fn load(&self, handle: &RecordHandle) -> Result<StoredRecord, StoreError> {
        let path = self.path_of(handle);
        match read_record(&path, handle) {
            Ok(record) => Ok(StoredRecord {
                handle: handle.clone(),
                record,
            }),
            Err(e) => {
                let missing = matches!(
                    &e.source,
                    DocumentError::Io(io) if io.kind() == io::ErrorKind::NotFound
                );
                if missing {
                    Err(StoreError::NotFound(handle.to_string()))
                } else {
                    Err(StoreError::Malformed(e))
                }
            }
        }
    }

    fn update(&self, stored: &StoredRecord) -> Result<(), StoreError> {
        let path = self.path_of(&stored.handle);
        if !path.is_file() {
            return Err(StoreError::NotFound(stored.handle.to_string()));
        }

        // A stale copy must not drag the on-disk status backwards
        if let Ok(on_disk) = read_record(&path, &stored.handle) {
            let attempted = stored.record.status();
            if on_disk.status().regresses_to(attempted) {
                return Err(StoreError::StatusRegression {
                    handle: stored.handle.to_string(),
                    on_disk: on_disk.status(),
                    attempted,
                });
            }
        }

        let bytes = stored.record.to_json_pretty()?;
        write_atomic(&path, &bytes).map_err(|source| StoreError::WriteFailure { path, source })?;
        tracing::debug!(
            handle = %stored.handle,
            status = %stored.record.status(),
            "record updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewRecord, Platform, PlatformLimits, RecordKind, Status};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn post(platform: Platform, content: &str) -> Record {
        Record::new(
            NewRecord::post(RecordKind::TextPost, platform, content),
            &PlatformLimits::default(),
        )
        .unwrap()
    }

    fn post_at(offset_secs: i64) -> Record {
        let base = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        Record::new_at(
            NewRecord::post(
                RecordKind::TextPost,
                Platform::Twitter,
                format!("post {offset_secs}"),
            ),
            base + Duration::seconds(offset_secs),
            &PlatformLimits::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_put_creates_root_and_roundtrips() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path().join("content").join("generated"));

        let rec = post(Platform::Twitter, "first draft");
        let handle = store.put(&rec).unwrap();
        assert!(store.path_of(&handle).is_file());

        let all = store.get_all(&Filter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].handle, handle);
        assert_eq!(all[0].record, rec);

        // Putting again is fine once the directory exists
        store.put(&post(Platform::Linkedin, "second")).unwrap();
        assert_eq!(store.get_all(&Filter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_put_into_file_root_is_write_failure() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("generated");
        fs::write(&root, b"not a directory").unwrap();
        let store = FsStore::open(&root);

        assert!(matches!(
            store.ensure_root(),
            Err(StoreError::WriteFailure { ref path, .. }) if path == &root
        ));
        assert!(matches!(
            store.put(&post(Platform::Twitter, "hello")),
            Err(StoreError::WriteFailure { .. })
        ));
        assert_eq!(fs::read(&root).unwrap(), b"not a directory");
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let scan = store.scan(&Filter::default()).unwrap();
        assert!(scan.records.is_empty());
        assert!(scan.malformed.is_empty());
    }

    #[test]
    fn test_missing_root_is_enumerate_error() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path().join("nope"));
        assert!(matches!(
            store.get_all(&Filter::default()),
            Err(StoreError::Enumerate { .. })
        ));
    }

    #[test]
    fn test_scan_orders_by_created_at() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        store.put(&post_at(30)).unwrap();
        store.put(&post_at(10)).unwrap();
        store.put(&post_at(20)).unwrap();

        let contents: Vec<_> = store
            .get_all(&Filter::default())
            .unwrap()
            .into_iter()
            .map(|s| s.record.content.unwrap())
            .collect();
        assert_eq!(contents, vec!["post 10", "post 20", "post 30"]);
    }

    #[test]
    fn test_malformed_file_skipped_and_reported() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        store.put(&post(Platform::Twitter, "one")).unwrap();
        store.put(&post(Platform::Linkedin, "two")).unwrap();
        fs::write(tmp.path().join("20250101_broken.json"), "{ not json").unwrap();
        // Not a record file at all, never parsed
        fs::write(tmp.path().join("reef.png"), [0u8, 1, 2]).unwrap();

        let scan = store.scan(&Filter::default()).unwrap();
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.malformed.len(), 1);
        assert_eq!(scan.malformed[0].location, "20250101_broken.json");
    }

    #[test]
    fn test_hidden_temp_files_ignored() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        fs::write(tmp.path().join(".x.json.1234.tmp"), "{").unwrap();
        fs::write(tmp.path().join(".partial.json"), "{").unwrap();
        let scan = store.scan(&Filter::default()).unwrap();
        assert!(scan.records.is_empty());
        assert!(scan.malformed.is_empty());
    }

    #[test]
    fn test_filter_applies_to_scan() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        store.put(&post(Platform::Twitter, "t")).unwrap();
        store.put(&post(Platform::Linkedin, "l")).unwrap();

        let filter = Filter {
            platform: Some(Platform::Twitter),
            ..Default::default()
        };
        let hits = store.get_all(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.content.as_deref(), Some("t"));
    }

    #[test]
    fn test_update_rewrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let handle = store.put(&post(Platform::Twitter, "ship it")).unwrap();

        let mut stored = store.load(&handle).unwrap();
        stored
            .record
            .transition(Status::DiscordSent, Utc::now())
            .unwrap();
        store.update(&stored).unwrap();

        let reloaded = store.load(&handle).unwrap();
        assert_eq!(reloaded.record.status(), Status::DiscordSent);
        assert!(reloaded.record.discord_sent_at.is_some());
        assert_eq!(store.get_all(&Filter::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_update_preserves_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        fs::write(
            tmp.path().join("legacy_twitter.json"),
            r#"{"platform":"twitter","content":"hi","status":"draft",
               "created_at":"2025-01-01T08:00:00","alt_text":"x",
               "metadata":{"source":"portfolio"}}"#,
        )
        .unwrap();

        let mut stored = store.load(&RecordHandle::new("legacy_twitter.json")).unwrap();
        stored.record.transition(Status::Posted, Utc::now()).unwrap();
        store.update(&stored).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(tmp.path().join("legacy_twitter.json")).unwrap())
                .unwrap();
        assert_eq!(raw["status"], "posted");
        assert_eq!(raw["metadata"]["source"], "portfolio");
    }

    #[test]
    fn test_update_vanished_record() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let handle = store.put(&post(Platform::Twitter, "gone soon")).unwrap();
        let stored = store.load(&handle).unwrap();
        fs::remove_file(store.path_of(&handle)).unwrap();

        assert!(matches!(store.update(&stored), Err(StoreError::NotFound(_))));
        assert!(matches!(store.load(&handle), Err(StoreError::NotFound(_))));
        // update never recreates a file it did not find
        assert!(!store.path_of(&handle).exists());
    }

    #[test]
    fn test_stale_copy_cannot_regress_status() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let handle = store.put(&post(Platform::Twitter, "race")).unwrap();

        let stale = store.load(&handle).unwrap();
        let mut fresh = stale.clone();
        fresh.record.transition(Status::Posted, Utc::now()).unwrap();
        store.update(&fresh).unwrap();

        assert!(matches!(
            store.update(&stale),
            Err(StoreError::StatusRegression {
                on_disk: Status::Posted,
                attempted: Status::Draft,
                ..
            })
        ));
        assert_eq!(store.load(&handle).unwrap().record.status(), Status::Posted);
    }
}
