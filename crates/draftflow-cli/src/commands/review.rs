use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use draftflow_agents::{ConsoleReview, ReviewConsumer};
use draftflow_core::model::Platform;

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ReviewArgs {
    /// Only review drafts for this platform
    #[arg(long)]
    pub platform: Option<Platform>,
}

pub fn run(args: &ReviewArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (_config, store) = ws.open()?;

    // Keep stdout parseable when JSON was asked for
    let out: Box<dyn Write> = match format {
        OutputFormat::Text => Box::new(std::io::stdout()),
        OutputFormat::Json => Box::new(std::io::stderr()),
    };
    let mut channel = ConsoleReview::new(out);

    let summary = ReviewConsumer::new()
        .platform(args.platform)
        .run(&store, &mut channel)
        .context("Review pass failed")?;

    println!("{}", format_summary("review", &summary, format));
    Ok(())
}
