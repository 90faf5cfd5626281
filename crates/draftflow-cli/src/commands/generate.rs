use anyhow::Result;
use clap::Args;
use draftflow_agents::{ContentProducer, Theme};
use draftflow_core::model::Platform;

use super::Workspace;
use crate::output::format::format_summary;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct GenerateArgs {
    /// Content pillar (team-leadership, problem-solving, technology-trends)
    #[arg(long)]
    pub theme: Theme,

    /// Platforms to write for (default: twitter and linkedin)
    #[arg(long = "platform", value_delimiter = ',')]
    pub platforms: Vec<Platform>,

    /// Which template alternative to use
    #[arg(long, default_value = "0")]
    pub variant: usize,
}

pub fn run(args: &GenerateArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let (config, store) = ws.open_for_write()?;

    let mut producer = ContentProducer::new(&config, args.theme).variant(args.variant);
    if !args.platforms.is_empty() {
        producer = producer.platforms(args.platforms.clone());
    }
    let summary = producer.run(&store);

    println!("{}", format_summary("generate", &summary, format));
    Ok(())
}
