use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use draftflow_agents::{DryRunPublisher, PublishConsumer};
use draftflow_core::model::Platform;

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct PublishArgs {
    /// Only publish drafts for this platform
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Print posts instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: &PublishArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    if !args.dry_run {
        anyhow::bail!("No live publisher is configured. Rerun with --dry-run.");
    }
    let (config, store) = ws.open()?;

    let out: Box<dyn Write> = match format {
        OutputFormat::Text => Box::new(std::io::stdout()),
        OutputFormat::Json => Box::new(std::io::stderr()),
    };
    let mut publisher = DryRunPublisher::new(out);

    let summary = PublishConsumer::new(&config)
        .platform(args.platform)
        .run(&store, &mut publisher)
        .context("Publish pass failed")?;

    println!("{}", format_summary("publish", &summary, format));
    Ok(())
}
