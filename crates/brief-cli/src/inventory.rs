//! Inventory command: show what the judge checks reports against.

use anyhow::{Context, Result};
use brief_core::{BriefConfig, InventoryFormatter, PersonaCatalog, load_tickets};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct InventoryArgs {
    /// Ticket snapshot (JSON array or tracker search response)
    #[arg(long, value_name = "FILE")]
    pub tickets: PathBuf,

    /// Persona whose detail level to use
    #[arg(short, long, default_value = "team_lead")]
    pub persona: String,
}

pub fn execute(config: &BriefConfig, args: &InventoryArgs) -> Result<()> {
    let catalog = PersonaCatalog::from_config(config).context("Failed to build persona catalog")?;
    let persona = catalog.require(&args.persona)?;
    let tickets = load_tickets(&args.tickets)
        .with_context(|| format!("Failed to load tickets from {}", args.tickets.display()))?;

    let inventory = InventoryFormatter::new()
        .with_description_limit(config.validation.description_max_chars)
        .format(&tickets, &persona.id, persona.detail);
    print!("{inventory}");
    Ok(())
}
