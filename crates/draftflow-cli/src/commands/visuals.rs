use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use draftflow_agents::{MockImageGenerator, VisualCategory, VisualProducer};
use draftflow_core::model::Platform;

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct VisualsArgs {
    /// Directory generated images are written to
    #[arg(long, default_value = "visuals/generated")]
    pub dir: PathBuf,

    /// Categories to generate for (default: all)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<VisualCategory>,

    /// Platforms to draft for (default: twitter and linkedin)
    #[arg(long = "platform", value_delimiter = ',')]
    pub platforms: Vec<Platform>,

    /// Images per category
    #[arg(long, default_value = "1")]
    pub count: usize,
}

pub fn run(args: &VisualsArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (config, store) = ws.open_for_write()?;

    let mut producer = VisualProducer::new(&config, &args.dir).count(args.count);
    if !args.categories.is_empty() {
        producer = producer.categories(args.categories.clone());
    }
    if !args.platforms.is_empty() {
        producer = producer.platforms(args.platforms.clone());
    }
    let summary = producer
        .run(&store, &mut MockImageGenerator::new())
        .context("Visuals pass failed")?;

    println!("{}", format_summary("visuals", &summary, format));
    Ok(())
}
