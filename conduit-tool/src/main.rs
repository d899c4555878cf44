use clap::Parser;
use conduit_lib::Config;
use conduit_tool::{config, logging, process};

#[derive(Parser, Debug)]
#[command(name = "conduit", author, version, about = "Package the working directory and upload it for deployment", long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory to package (defaults to the working directory)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Where to write the archive
    #[arg(short, long)]
    pub archive: Option<String>,

    /// Upload endpoint
    #[arg(short, long)]
    pub url: Option<String>,

    /// Patterns to skip (can be specified multiple times)
    #[arg(short = 's', long)]
    pub skip: Vec<String>,

    /// Enable compression
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub compress: bool,

    /// Dry run (just list the files that would be packaged)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub dry: bool,

    /// Log level or filter directive
    #[arg(long)]
    pub log_level: Option<String>,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,
}

impl Cli {
    /// Flags left unset must not shadow config file or env values.
    fn to_config(&self) -> Config {
        Config {
            config: self.config.clone(),
            root: self.root.clone(),
            archive: self.archive.clone(),
            upload_url: self.url.clone(),
            check_url: None,
            skip: (!self.skip.is_empty()).then(|| self.skip.clone()),
            compress: self.compress.then_some(true),
            dry: self.dry.then_some(true),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let merged = config::load(cli.to_config())?;

    if cli.generate_yaml_config {
        println!("{}", serde_yaml::to_string(&merged)?);
        return Ok(());
    }

    logging::init(merged.log_level())?;
    process::package_and_upload_within_tokio(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_leave_lower_layers_alone() {
        let cli = Cli::parse_from(["conduit"]);
        let cfg = cli.to_config();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn flags_map_onto_config_keys() {
        let cli = Cli::parse_from([
            "conduit", "--url", "http://x/upload", "-s", "target", "-s", "*.log", "--compress", "--dry",
        ]);
        let cfg = cli.to_config();

        assert_eq!(cfg.upload_url.as_deref(), Some("http://x/upload"));
        assert_eq!(cfg.skip, Some(vec!["target".to_string(), "*.log".to_string()]));
        assert_eq!(cfg.compress, Some(true));
        assert_eq!(cfg.dry, Some(true));
    }
}
