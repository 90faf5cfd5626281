use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use draftflow_agents::{RepoActivity, RepositoryProducer};

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct CommitsArgs {
    /// JSON file holding an array of repositories with their recent commits
    #[arg(long)]
    pub activity: PathBuf,
}

pub fn run(args: &CommitsArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let raw = std::fs::read_to_string(&args.activity)
        .with_context(|| format!("Failed to read {}", args.activity.display()))?;
    let activity: Vec<RepoActivity> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid activity file {}", args.activity.display()))?;
    tracing::info!("Loaded activity for {} repositories", activity.len());

    let (config, store) = ws.open_for_write()?;
    let summary = RepositoryProducer::new(&config).run(&store, &activity);

    println!("{}", format_summary("commits", &summary, format));
    Ok(())
}
