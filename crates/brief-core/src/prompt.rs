//! Prompt assembly for drafting and judging.
//!
//! Drafting prompts carry the no-fabrication policy at the persona prompt's
//! `{policy}` placeholder, ahead of its output cue. Retries add a corrective
//! block carrying the judge's instructions from the previous attempt.

use crate::inventory::TicketInventory;

/// Grounding rules appended to every drafting prompt.
pub const NO_FABRICATION_POLICY: &str = include_str!("../data/no-fabrication-policy.md");

const POLICY_REMINDER: &str = "The previous draft was rejected by a fact-checker. \
Every statement must be supported by the ticket data above. Do not add tickets, \
names, dates or figures that are not in it.";

const POLICY_PLACEHOLDER: &str = "{policy}";

const NO_INSTRUCTIONS_NOTICE: &str = "The fact-checker gave no specific instructions. \
Re-check every claim against the ticket data and remove anything it does not support.";

/// Judge feedback carried into the next drafting attempt.
#[derive(Debug, Clone, Copy)]
pub struct Correction<'a> {
    /// 1-based index of the attempt being drafted.
    pub attempt: u32,
    pub max_attempts: u32,
    /// The prior verdict's regeneration instructions, possibly empty.
    pub instructions: &'a str,
}

/// Builds the drafting prompt for one attempt.
///
/// The policy and any corrections replace `{policy}`; a prompt without the
/// placeholder gets them appended instead. `{tickets_text}` is left for the
/// drafter to fill.
pub fn drafting_prompt(base_prompt: &str, correction: Option<Correction<'_>>) -> String {
    let mut guidance = String::with_capacity(NO_FABRICATION_POLICY.len() + 256);
    guidance.push_str(NO_FABRICATION_POLICY.trim_end());

    if let Some(correction) = correction {
        guidance.push_str(&format!(
            "\n\nCORRECTIONS REQUIRED (attempt {} of {}):\n{}\n\n",
            correction.attempt, correction.max_attempts, POLICY_REMINDER
        ));
        let instructions = correction.instructions.trim();
        if instructions.is_empty() {
            guidance.push_str(NO_INSTRUCTIONS_NOTICE);
        } else {
            guidance.push_str("Fix the following:\n");
            guidance.push_str(instructions);
        }
    }

    if base_prompt.contains(POLICY_PLACEHOLDER) {
        return fill_template(base_prompt, &[("policy", guidance.as_str())]);
    }

    let mut prompt = String::with_capacity(base_prompt.len() + guidance.len() + 4);
    prompt.push_str(base_prompt.trim_end());
    prompt.push_str("\n\n");
    prompt.push_str(&guidance);
    prompt.push('\n');
    prompt
}

/// Fills a judge template with the inventory and the drafted report.
pub fn judge_prompt(
    template: &str,
    persona_name: &str,
    inventory: &TicketInventory,
    report: &str,
) -> String {
    let ticket_count = inventory.ticket_count().to_string();
    fill_template(
        template,
        &[
            ("ticket_data", inventory.as_str()),
            ("summary_text", report),
            ("ticket_count", &ticket_count),
            ("persona", persona_name),
        ],
    )
}

/// Replaces `{name}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so placeholder-like text inside a
/// report or ticket cannot be expanded. Unknown placeholders are left as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];
        let matched = values.iter().find(|(name, _)| {
            candidate.starts_with(name) && candidate[name.len()..].starts_with('}')
        });

        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &candidate[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}
