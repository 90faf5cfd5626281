use anyhow::{Context, Result};
use clap::Args;
use draftflow_core::config::DraftflowConfig;

use super::Workspace;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, ws: &Workspace) -> Result<()> {
    let config = if ws.config_path.exists() && !args.force {
        println!(
            "Config {} already exists; keeping it. Use --force to overwrite.",
            ws.config_path.display()
        );
        ws.config()?
    } else {
        let config = DraftflowConfig::default_init(ws.root.clone());
        config
            .save(&ws.config_path)
            .with_context(|| format!("Failed to write {}", ws.config_path.display()))?;
        println!("Wrote {}", ws.config_path.display());
        config
    };

    config
        .store()
        .ensure_root()
        .context("Failed to create record directory")?;

    println!(
        "Draftflow initialized. Records live in {}",
        config.root_directory.display()
    );
    println!();
    println!("Next steps:");
    println!("  draftflow generate --theme team-leadership   Write themed drafts");
    println!("  draftflow portfolio --dir <images>           Draft posts for new images");
    println!("  draftflow review                             Send drafts for review");
    println!("  draftflow log                                List records");
    Ok(())
}
