use uuid::Uuid;

use crate::model::Record;

const RECORD_EXT: &str = ".json";

/// File name for a new record: `<timestamp>_<platform>_<type>_<suffix>.json`.
///
/// The timestamp sorts lexically; the random suffix keeps two records
/// created in the same microsecond apart. Nothing ever parses these names
/// back into fields.
pub fn record_file_name(record: &Record) -> String {
    let ts = record.created_at().format("%Y%m%d_%H%M%S_%6f");
    let platform = record.platform.map_or("none", |p| p.as_str());
    let suffix = Uuid::new_v4().as_simple().to_string();
    format!(
        "{ts}_{platform}_{}_{}{RECORD_EXT}",
        record.kind.as_str(),
        &suffix[..8]
    )
}

/// Whether a directory entry should be parsed as a record. Hidden files
/// (including in-flight temp files) are ignored.
pub fn is_record_file(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(RECORD_EXT)
}
