//! `brief` - persona-tailored status reports checked by an LLM judge.

mod generate;
mod health;
mod inventory;
mod personas;
mod review;
mod verdict;

use anyhow::{Context, Result};
use brief_core::BriefConfig;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "brief", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: brief.yml or brief.yaml in the current directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a validated report from a ticket snapshot
    Generate(generate::GenerateArgs),

    /// Print the ticket inventory the judge would see
    Inventory(inventory::InventoryArgs),

    /// Parse judge output into a structured verdict
    Verdict(verdict::VerdictArgs),

    /// List available personas
    Personas,

    /// Show or clear the manual review queue
    Review(review::ReviewArgs),

    /// Check configuration and API key readiness
    Health(health::HealthArgs),
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    Explicit(PathBuf),
    /// Found in the working directory.
    Discovered(PathBuf),
    /// No file; built-in defaults.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => {
                write!(f, "{}", path.display())
            }
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Loads configuration from `--config`, a standard file in `root`, or defaults.
pub fn load_config(explicit: Option<&Path>, root: &Path) -> Result<(BriefConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = BriefConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let discovered = BriefConfig::discover(root)
        .with_context(|| format!("Failed to load config from {}", root.display()))?;
    Ok(match discovered {
        Some((config, path)) => (config, ConfigSource::Discovered(path)),
        None => (BriefConfig::default(), ConfigSource::Defaults),
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|filter| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!(
                "warn,brief={level},brief_core={level},brief_adapters={level}",
                level = default_level
            ))
        });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let root = std::env::current_dir().context("Failed to determine current directory")?;
    let (config, source) = load_config(cli.config.as_deref(), &root)?;
    debug!(source = %source, "Configuration loaded");

    match cli.command {
        Commands::Generate(args) => generate::execute(&config, args).await,
        Commands::Inventory(args) => inventory::execute(&config, &args),
        Commands::Verdict(args) => verdict::execute(&args),
        Commands::Personas => personas::execute(&config),
        Commands::Review(args) => review::execute(&args),
        Commands::Health(args) => health::execute(&config, &source, &args),
    }
}
