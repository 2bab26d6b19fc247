//! Health command for validating configuration readiness.

use anyhow::{Result, bail};
use brief_core::{BriefConfig, LlmSettings, PersonaCatalog};
use clap::Parser;
use colored::Colorize;
use tracing::warn;

use crate::ConfigSource;

#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Show detailed pass/fail status for each check
    #[arg(long)]
    pub details: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckResult {
    name: &'static str,
    passed: bool,
    message: String,
}

impl CheckResult {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            message: message.into(),
        }
    }
}

pub fn execute(config: &BriefConfig, source: &ConfigSource, args: &HealthArgs) -> Result<()> {
    let results = run_checks(config, source);
    let failed = results.iter().filter(|r| !r.passed).count();

    if !args.quiet {
        for result in &results {
            if result.passed && !args.details {
                continue;
            }
            let label = if result.passed {
                "OK".green()
            } else {
                "FAIL".red().bold()
            };
            println!("[{label}] {}: {}", result.name, result.message);
        }
        if failed == 0 {
            println!("{}", "System OK".green());
        }
    }

    if failed > 0 {
        bail!("{failed} health check(s) failed");
    }
    Ok(())
}

fn run_checks(config: &BriefConfig, source: &ConfigSource) -> Vec<CheckResult> {
    let mut results = Vec::new();

    results.push(match config.validate() {
        Ok(()) => CheckResult::pass("config", format!("loaded from {source}")),
        Err(e) => CheckResult::fail("config", e.to_string()),
    });

    results.push(match PersonaCatalog::from_config(config) {
        Ok(catalog) if catalog.is_empty() => CheckResult::fail("personas", "no personas enabled"),
        Ok(catalog) => CheckResult::pass("personas", format!("{} enabled", catalog.len())),
        Err(e) => CheckResult::fail("personas", e.to_string()),
    });

    results.push(api_key_check("drafter", &config.drafter));
    results.push(api_key_check("judge", &config.judge));
    results
}

fn api_key_check(name: &'static str, settings: &LlmSettings) -> CheckResult {
    let env = settings.api_key_env();
    if settings.api_key().is_some() {
        CheckResult::pass(name, format!("{} via {env} ({})", settings.provider, settings.model))
    } else {
        warn!(check = name, env, "API key not set");
        CheckResult::fail(name, format!("{env} is not set"))
    }
}
