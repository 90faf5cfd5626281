use anyhow::{Context, Result};
use clap::Args;
use draftflow_core::error::StoreError;
use draftflow_core::scan::Filter;
use draftflow_core::storage::naming::is_record_file;
use draftflow_core::storage::{FsStore, RecordHandle, RecordStore, StoredRecord};

use super::Workspace;
use crate::output::format::format_record_full;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ShowArgs {
    /// Record file name (full or unique prefix)
    pub handle: String,

    /// Print the stored JSON document as-is
    #[arg(long)]
    pub raw: bool,
}

pub fn run(args: &ShowArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (_config, store) = ws.open()?;

    let stored = resolve(&store, &args.handle)?;

    if args.raw {
        let bytes = stored
            .record
            .to_json_pretty()
            .context("Failed to serialize record")?;
        println!("{}", String::from_utf8_lossy(&bytes));
        return Ok(());
    }

    println!("{}", format_record_full(&stored, format));
    Ok(())
}

/// Exact file name first, then a unique prefix among parseable records.
fn resolve(store: &FsStore, query: &str) -> Result<StoredRecord> {
    if is_record_file(query) && !query.contains(['/', '\\']) {
        match store.load(&RecordHandle::new(query)) {
            Ok(stored) => return Ok(stored),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e).with_context(|| format!("Failed to read record '{query}'")),
        }
    }

    let mut matches: Vec<_> = store
        .get_all(&Filter::default())
        .context("Failed to list records")?
        .into_iter()
        .filter(|s| s.handle.as_str().starts_with(query))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("No record matches '{query}'"),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("'{query}' is ambiguous ({n} records match)"),
    }
}
