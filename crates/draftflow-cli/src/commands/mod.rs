pub mod commits;
pub mod generate;
pub mod init;
pub mod log;
pub mod portfolio;
pub mod publish;
pub mod review;
pub mod show;
pub mod stats;
pub mod visuals;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use draftflow_core::config::DraftflowConfig;
use draftflow_core::storage::FsStore;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the record directory
    Init(init::InitArgs),
    /// Write themed text drafts for twitter and linkedin
    Generate(generate::GenerateArgs),
    /// Draft visual posts for new images in a portfolio directory
    Portfolio(portfolio::PortfolioArgs),
    /// Generate placeholder visuals and draft posts around them
    Visuals(visuals::VisualsArgs),
    /// Draft repository posts and commit stories from an activity file
    Commits(commits::CommitsArgs),
    /// Send pending drafts for review and mark them sent
    Review(review::ReviewArgs),
    /// Publish pending drafts and mark them posted
    Publish(publish::PublishArgs),
    /// List records (oldest first)
    Log(log::LogArgs),
    /// Show one record
    Show(show::ShowArgs),
    /// Show counts by status, platform and type
    Stats,
}

/// Global options resolved into config and store for each command.
pub struct Workspace {
    pub root: Option<PathBuf>,
    pub config_path: PathBuf,
}

impl Workspace {
    /// Config file contents with `--root` applied on top.
    pub fn config(&self) -> Result<DraftflowConfig> {
        let mut config = DraftflowConfig::load(&self.config_path)
            .with_context(|| format!("Failed to load {}", self.config_path.display()))?;
        if let Some(root) = &self.root {
            config.root_directory = root.clone();
        }
        Ok(config)
    }

    /// Config plus a store whose directory is known to exist.
    pub fn open(&self) -> Result<(DraftflowConfig, FsStore)> {
        let config = self.config()?;
        let store = config.store();
        if !store.root().is_dir() {
            anyhow::bail!(
                "Record directory {} does not exist. Run `draftflow init` first.",
                store.root().display()
            );
        }
        Ok((config, store))
    }

    /// Config plus a store, creating the directory if needed. Used by producers.
    pub fn open_for_write(&self) -> Result<(DraftflowConfig, FsStore)> {
        let config = self.config()?;
        let store = config.store();
        store
            .ensure_root()
            .context("Failed to create record directory")?;
        Ok((config, store))
    }
}
