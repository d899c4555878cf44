//! Ask the deployment host whether it is up and print its reply.

use clap::Parser;
use conduit_lib::Config;
use conduit_tool::{config, logging, process};

#[derive(Parser, Debug)]
#[command(name = "conduit-check", author, version, about = "Check the deployment host", long_about = None)]
struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// URL to query
    #[arg(short, long)]
    url: Option<String>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let merged = config::load(Config {
        config: cli.config,
        check_url: cli.url,
        log_level: cli.log_level,
        ..Default::default()
    })?;

    logging::init(merged.log_level())?;
    process::check_within_tokio(&merged)
}
