use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use draftflow_agents::PortfolioProducer;
use draftflow_core::model::Platform;

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct PortfolioArgs {
    /// Directory scanned recursively for .png/.jpg/.jpeg images
    #[arg(long)]
    pub dir: PathBuf,

    /// Platform to draft for
    #[arg(long, default_value = "twitter")]
    pub platform: Platform,
}

pub fn run(args: &PortfolioArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (config, store) = ws.open_for_write()?;

    let summary = PortfolioProducer::new(&config, &args.dir)?
        .platform(args.platform)
        .run(&store)
        .context("Portfolio pass failed")?;

    println!("{}", format_summary("portfolio", &summary, format));
    Ok(())
}
