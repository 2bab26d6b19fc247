//! Generate command: draft, judge, and write a report.

use anyhow::{Context, Result, bail};
use brief_adapters::{ChatClient, LlmDrafter, LlmJudge};
use brief_core::{
    BriefConfig, InventoryFormatter, PersonaCatalog, ReportWriter, ReviewQueue, ValidationLoop,
    ValidationOutcome, load_tickets, trust_indicator,
};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Ticket snapshot (JSON array or tracker search response)
    #[arg(long, value_name = "FILE")]
    pub tickets: PathBuf,

    /// Report audience (e.g. team_lead, "Team Lead", cto)
    #[arg(short, long)]
    pub persona: String,

    /// Report title (default: ticket file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Override validation.max_attempts
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Output directory for report artifacts
    #[arg(long, value_name = "DIR", default_value = ".brief-out")]
    pub out: PathBuf,
}

pub async fn execute(config: &BriefConfig, args: GenerateArgs) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let max_attempts = args.max_attempts.unwrap_or(config.validation.max_attempts);
    if max_attempts == 0 {
        bail!("--max-attempts must be at least 1");
    }

    let catalog = PersonaCatalog::from_config(config).context("Failed to build persona catalog")?;
    let persona = catalog.require(&args.persona)?;

    let tickets = load_tickets(&args.tickets)
        .with_context(|| format!("Failed to load tickets from {}", args.tickets.display()))?;
    if tickets.is_empty() {
        warn!(path = %args.tickets.display(), "Ticket snapshot is empty");
    }

    let drafter = LlmDrafter::new(
        ChatClient::from_settings(&config.drafter).context("Failed to create drafter client")?,
    );
    let judge = LlmJudge::new(
        ChatClient::from_settings(&config.judge).context("Failed to create judge client")?,
    );
    let formatter =
        InventoryFormatter::new().with_description_limit(config.validation.description_max_chars);

    let outcome = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(max_attempts)
        .with_formatter(formatter)
        .run(persona, &tickets)
        .await
        .context("Report generation failed")?;

    let title = args.name.clone().unwrap_or_else(|| default_title(&args.tickets));
    let paths = ReportWriter::new(&args.out)
        .write(&title, &outcome)
        .with_context(|| format!("Failed to write report to {}", args.out.display()))?;

    if outcome.needs_manual_review() {
        ReviewQueue::new(&args.out)
            .record(&title, &outcome, Some(&paths.markdown))
            .context("Failed to update manual review queue")?;
    }

    info!(
        report = %paths.markdown.display(),
        passed = outcome.validation_passed,
        "Report written"
    );
    print_outcome(&title, &outcome, &paths.markdown);
    Ok(())
}

/// Title derived from the ticket file name, e.g. `cloud-migration.json` -> `cloud-migration`.
fn default_title(tickets: &Path) -> String {
    tickets
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("report")
        .to_string()
}

fn print_outcome(title: &str, outcome: &ValidationOutcome, report_path: &Path) {
    println!("{}", format!("# {title}").bold());
    println!();
    println!("{}", outcome.report.trim());
    println!();
    print!("{}", outcome.metrics.to_markdown());
    println!();

    let indicator = trust_indicator(outcome);
    if outcome.validation_passed {
        println!("{}", indicator.green());
    } else {
        println!("{}", indicator.yellow());
        println!(
            "{} {} (attempts used: {} of {})",
            "Manual review required:".red().bold(),
            outcome.status_text(),
            outcome.attempts_used,
            outcome.max_attempts
        );
        if !outcome.verdict.regeneration_instructions.is_empty() {
            println!("Judge instructions: {}", outcome.verdict.regeneration_instructions);
        }
    }
    println!("Saved to {}", report_path.display());
}
