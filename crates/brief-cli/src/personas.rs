//! Personas command.

use anyhow::{Context, Result};
use brief_core::{BriefConfig, PersonaCatalog};
use colored::Colorize;

pub fn execute(config: &BriefConfig) -> Result<()> {
    let catalog = PersonaCatalog::from_config(config).context("Failed to build persona catalog")?;

    for persona in catalog.iter() {
        println!(
            "{:<16} {:<16} detail={:<8} {}",
            persona.id.as_str().bold(),
            persona.display_name,
            persona.detail.as_str(),
            persona.focus.dimmed()
        );
    }
    Ok(())
}
