use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use uuid::Uuid;

/// Write `bytes` to `target` via a hidden temp file in the same directory,
/// flushed to disk and then renamed over the target.
///
/// A concurrent reader sees either the old document or the new one.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record");
    let tmp = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4().as_simple()));

    let result = write_and_rename(&tmp, target, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("doc.json");

        write_atomic(&target, b"{\"v\":1}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"v\":1}");

        write_atomic(&target, b"{\"v\":2}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"v\":2}");

        // No temp files left behind
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["doc.json"]);
    }

    #[test]
    fn test_write_atomic_missing_dir_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("missing").join("doc.json");
        assert!(write_atomic(&target, b"{}").is_err());
        assert!(!target.exists());
    }
}
