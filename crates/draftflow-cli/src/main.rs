use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "draftflow",
    version,
    about = "Generate, review and publish social post drafts kept as JSON files"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Record directory (overrides the config file)
    #[arg(long, global = true, env = "DRAFTFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Config file
    #[arg(
        long,
        global = true,
        env = "DRAFTFLOW_CONFIG",
        default_value = draftflow_core::config::CONFIG_FILE
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ws = commands::Workspace {
        root: cli.root,
        config_path: cli.config,
    };

    match &cli.command {
        commands::Commands::Init(args) => commands::init::run(args, &ws),
        commands::Commands::Generate(args) => commands::generate::run(args, &ws, cli.format),
        commands::Commands::Portfolio(args) => commands::portfolio::run(args, &ws, cli.format),
        commands::Commands::Visuals(args) => commands::visuals::run(args, &ws, cli.format),
        commands::Commands::Commits(args) => commands::commits::run(args, &ws, cli.format),
        commands::Commands::Review(args) => commands::review::run(args, &ws, cli.format),
        commands::Commands::Publish(args) => commands::publish::run(args, &ws, cli.format),
        commands::Commands::Log(args) => commands::log::run(args, &ws, cli.format),
        commands::Commands::Show(args) => commands::show::run(args, &ws, cli.format),
        commands::Commands::Stats => commands::stats::run(&ws, cli.format),
    }
}
