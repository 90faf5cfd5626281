use std::collections::BTreeMap;

use anyhow::{Context, Result};
use draftflow_core::scan::Filter;
use draftflow_core::storage::RecordStore;

use super::Workspace;
use crate::output::OutputFormat;

pub fn run(ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (_config, store) = ws.open()?;

    let scan = store
        .scan(&Filter::default())
        .context("Failed to list records")?;

    let total = scan.records.len();
    let malformed = scan.malformed.len();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_platform: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_chars = 0usize;

    let earliest = scan.records.first().map(|s| s.record.created_at());
    let latest = scan.records.last().map(|s| s.record.created_at());

    for s in &scan.records {
        let rec = &s.record;
        *by_status.entry(rec.status().to_string()).or_default() += 1;
        *by_platform
            .entry(rec.platform.map_or("none", |p| p.as_str()).to_string())
            .or_default() += 1;
        *by_type.entry(rec.kind.to_string()).or_default() += 1;
        total_chars += rec.content_len();
    }

    match format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "total_records": total,
                "malformed": malformed,
                "total_chars": total_chars,
                "earliest": earliest,
                "latest": latest,
                "by_status": by_status,
                "by_platform": by_platform,
                "by_type": by_type,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to render stats")?
            );
        }
        OutputFormat::Text => {
            if total == 0 && malformed == 0 {
                println!("No records found.");
                return Ok(());
            }
            println!("Draftflow Statistics");
            println!("====================");
            println!("Total records:  {total}");
            println!("Malformed:      {malformed}");
            println!("Content chars:  {total_chars}");
            if let (Some(e), Some(l)) = (earliest, latest) {
                println!(
                    "Date range:     {} to {}",
                    e.format("%Y-%m-%d"),
                    l.format("%Y-%m-%d")
                );
            }
            for (title, counts) in [
                ("By Status:", &by_status),
                ("By Platform:", &by_platform),
                ("By Type:", &by_type),
            ] {
                println!();
                println!("{title}");
                for (name, count) in counts {
                    println!("  {name}: {count}");
                }
            }
        }
    }

    Ok(())
}
