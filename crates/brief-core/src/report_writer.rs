//! Writes validated reports to disk.
//!
//! Each report produces two artifacts in the output directory:
//! - `<slug>-<persona>.md`: human-readable report with trust indicator,
//!   metrics and tables
//! - `<slug>-<persona>.json`: the full serialized outcome, attempts included

use crate::validation_loop::ValidationOutcome;
use brief_proto::TrustLevel;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the artifacts written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
}

/// Writes report artifacts into one directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes both artifacts for `outcome`, creating the directory if needed.
    pub fn write(&self, title: &str, outcome: &ValidationOutcome) -> io::Result<ReportPaths> {
        fs::create_dir_all(&self.output_dir)?;

        let stem = format!("{}-{}", slugify(title), outcome.persona);
        let paths = ReportPaths {
            markdown: self.output_dir.join(format!("{stem}.md")),
            json: self.output_dir.join(format!("{stem}.json")),
        };

        fs::write(&paths.markdown, format_markdown(title, outcome))?;

        let json = serde_json::to_string_pretty(outcome).map_err(io::Error::other)?;
        fs::write(&paths.json, json)?;

        debug!(
            markdown = %paths.markdown.display(),
            json = %paths.json.display(),
            "Wrote report artifacts"
        );
        Ok(paths)
    }
}

/// Trust badge shown at the top of a report.
pub fn trust_indicator(outcome: &ValidationOutcome) -> String {
    let verdict = &outcome.verdict;
    let badge = match (outcome.validation_passed, verdict.trust_level()) {
        (true, TrustLevel::High) => "✅",
        (true, _) | (false, TrustLevel::High | TrustLevel::Medium) => "⚠️",
        (false, TrustLevel::Low) => "🚨",
    };
    format!(
        "{badge} Trust: {} ({}/10) | Validation: {} | Recommendation: {}",
        verdict.trust_level().as_str(),
        verdict.trust_score,
        verdict.status,
        verdict.recommendation
    )
}

fn format_markdown(title: &str, outcome: &ValidationOutcome) -> String {
    let verdict = &outcome.verdict;
    let mut md = String::new();

    md.push_str(&format!("# {title}\n\n"));
    md.push_str(&format!(
        "_Persona: {} | Generated: {}_\n\n",
        outcome.persona,
        outcome.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!("**{}**\n\n", trust_indicator(outcome)));

    if outcome.needs_manual_review() {
        md.push_str(&format!(
            "> **Manual review required.** {} (attempts used: {} of {})\n\n",
            outcome.status_text(),
            outcome.attempts_used,
            outcome.max_attempts
        ));
    }

    md.push_str("## Report\n\n");
    md.push_str(outcome.report.trim());
    md.push_str("\n\n");

    md.push_str("## Metrics\n\n");
    md.push_str(&outcome.metrics.to_markdown());
    md.push('\n');

    if !outcome.primary_table.columns.is_empty() {
        md.push_str("## Tickets\n\n");
        md.push_str(&outcome.primary_table.to_markdown());
        md.push('\n');
    }

    if !outcome.secondary_table.columns.is_empty() {
        md.push_str("## Open Work\n\n");
        if outcome.secondary_table.is_empty() {
            md.push_str("No open tickets.\n\n");
        } else {
            md.push_str(&outcome.secondary_table.to_markdown());
            md.push('\n');
        }
    }

    md.push_str("## Validation\n\n");
    md.push_str(&format!("- **Status:** {}\n", verdict.status));
    md.push_str(&format!("- **Trustworthiness:** {}/10\n", verdict.trust_score));
    md.push_str(&format!(
        "- **Attempts:** {} of {}\n",
        outcome.attempts_used, outcome.max_attempts
    ));
    if !verdict.issues_found.is_empty() {
        md.push_str(&format!("\n### Issues Found\n\n{}\n", verdict.issues_found));
    }
    if verdict.is_degraded() {
        let fields: Vec<&str> = verdict.defaulted_fields.iter().map(|f| f.label()).collect();
        md.push_str(&format!(
            "\n_Low-confidence verdict: defaulted {}._\n",
            fields.join(", ")
        ));
    }

    md
}

/// Lowercases and replaces runs of non-alphanumerics with `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.to_string()
    }
}
