use anyhow::{Context, Result};
use clap::Args;
use draftflow_core::model::{Platform, RecordKind, Status};
use draftflow_core::scan::Filter;
use draftflow_core::storage::RecordStore;

use super::Workspace;
use crate::output::format::format_record_list;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct LogArgs {
    /// Only records in this status
    #[arg(long)]
    pub status: Option<Status>,

    /// Only records for this platform
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Only records of this type
    #[arg(long = "type")]
    pub kind: Option<RecordKind>,

    /// Show only the newest N records
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

pub fn run(args: &LogArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (_config, store) = ws.open()?;

    let filter = Filter {
        platform: args.platform,
        status: args.status,
        kind: args.kind,
        name_hint: None,
    };
    let mut records = store.get_all(&filter).context("Failed to list records")?;
    if let Some(limit) = args.limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    let output = format_record_list(&records, format);
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(())
}
