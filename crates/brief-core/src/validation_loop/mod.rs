//! Validation loop orchestration.
//!
//! Drives bounded draft -> judge -> regenerate cycles for one report. Each
//! attempt drafts with the persona prompt (plus corrections on retries),
//! rebuilds the ticket inventory, asks the judge to check the draft against
//! it, and parses the verdict. The loop never makes more than `max_attempts`
//! drafter calls or judge calls.

mod loop_state;
#[cfg(test)]
mod tests;

pub use loop_state::{ExhaustReason, LoopPhase, LoopState, next_phase};

use crate::inventory::InventoryFormatter;
use crate::metrics::ReportMetrics;
use crate::persona_catalog::PersonaProfile;
use crate::prompt::{self, Correction};
use crate::verdict_parser::VerdictParser;
use brief_proto::{
    CollaboratorError, Draft, JudgeInvoker, JudgeVerdict, PersonaId, ReportDrafter, ReportTable,
    Ticket,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default ceiling on draft/judge cycles.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Hard failures of a validation run.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("drafting failed on attempt {attempt}: {source}")]
    DraftFailed {
        attempt: u32,
        source: CollaboratorError,
    },

    #[error("max_attempts must be at least 1")]
    InvalidAttemptCeiling,

    #[error("unknown persona '{0}'")]
    UnknownPersona(String),

    #[error("no draft was produced")]
    NoDraftProduced,
}

/// One completed draft/judge cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationAttempt {
    /// 1-based attempt index.
    pub index: u32,
    pub draft: Draft,
    pub verdict: JudgeVerdict,
}

/// Terminal result of a validation run.
///
/// Always carries the last drafted report, even when validation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub persona: PersonaId,
    pub report: String,
    pub primary_table: ReportTable,
    pub secondary_table: ReportTable,
    pub verdict: JudgeVerdict,
    pub validation_passed: bool,
    pub attempts_used: u32,
    pub max_attempts: u32,
    pub attempts: Vec<ValidationAttempt>,
    /// Set when the run ended without an accepted report.
    pub exhaust_reason: Option<ExhaustReason>,
    pub metrics: ReportMetrics,
    pub generated_at: DateTime<Utc>,
}

impl ValidationOutcome {
    /// Whether a human should look at this report before it is shared.
    pub fn needs_manual_review(&self) -> bool {
        !self.validation_passed
    }

    /// One-line summary of how the run ended.
    pub fn status_text(&self) -> &'static str {
        match self.exhaust_reason {
            None => "Report validated by judge.",
            Some(reason) => reason.status_text(),
        }
    }
}

/// Runs the draft/judge/regenerate cycle.
pub struct ValidationLoop<'a> {
    drafter: &'a dyn ReportDrafter,
    judge: &'a dyn JudgeInvoker,
    formatter: InventoryFormatter,
    max_attempts: u32,
}

impl<'a> ValidationLoop<'a> {
    pub fn new(drafter: &'a dyn ReportDrafter, judge: &'a dyn JudgeInvoker) -> Self {
        Self {
            drafter,
            judge,
            formatter: InventoryFormatter::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: InventoryFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Produces a report for `persona` from the ticket snapshot.
    ///
    /// Returns an error only when the first draft fails or the attempt
    /// ceiling is zero. Every other ending returns the last report with
    /// `validation_passed` telling whether the judge accepted it.
    pub async fn run(
        &self,
        persona: &PersonaProfile,
        tickets: &[Ticket],
    ) -> Result<ValidationOutcome, ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidAttemptCeiling);
        }

        let mut state = LoopState::new(self.max_attempts);
        let mut attempts: Vec<ValidationAttempt> = Vec::new();

        info!(
            persona = %persona.id,
            tickets = tickets.len(),
            max_attempts = self.max_attempts,
            "Starting report validation"
        );

        while !state.is_terminal() {
            let attempt = state.attempt();

            let correction = (attempt > 1).then(|| Correction {
                attempt,
                max_attempts: self.max_attempts,
                instructions: state.feedback().unwrap_or_default(),
            });
            let draft_prompt = prompt::drafting_prompt(&persona.draft_prompt, correction);

            debug!(persona = %persona.id, attempt, "Drafting report");
            let draft = match self.drafter.draft(&draft_prompt, tickets).await {
                Ok(draft) => draft,
                Err(source) if attempts.is_empty() => {
                    warn!(
                        persona = %persona.id,
                        attempt,
                        error = %source,
                        "Drafter failed on first attempt"
                    );
                    return Err(ValidationError::DraftFailed { attempt, source });
                }
                Err(error) => {
                    warn!(
                        persona = %persona.id,
                        attempt,
                        error = %error,
                        "Drafter failed on retry - keeping previous attempt"
                    );
                    state.draft_failed();
                    break;
                }
            };
            state.draft_completed();

            // Rebuilt from the same snapshot each attempt.
            let inventory = self.formatter.format(tickets, &persona.id, persona.detail);
            let judge_prompt = prompt::judge_prompt(
                &persona.judge_prompt,
                &persona.display_name,
                &inventory,
                &draft.report,
            );

            debug!(persona = %persona.id, attempt, "Judging draft");
            let verdict = match self.judge.evaluate(&judge_prompt).await {
                Ok(text) => {
                    let verdict = VerdictParser::parse(&text);
                    state.verdict_received(&verdict);
                    verdict
                }
                Err(error) => {
                    warn!(
                        persona = %persona.id,
                        attempt,
                        error = %error,
                        "Judge unavailable - surfacing report for manual review"
                    );
                    state.judge_failed();
                    JudgeVerdict::judge_unavailable(error.to_string())
                }
            };

            info!(
                persona = %persona.id,
                attempt,
                status = %verdict.status,
                score = verdict.trust_score,
                regenerate = verdict.regeneration_required,
                next = ?state.phase(),
                "Judge verdict"
            );

            attempts.push(ValidationAttempt {
                index: attempt,
                draft,
                verdict,
            });
        }

        let Some(last) = attempts.last().cloned() else {
            return Err(ValidationError::NoDraftProduced);
        };

        let exhaust_reason = match state.phase() {
            LoopPhase::Exhausted(reason) => Some(reason),
            _ => None,
        };
        let validation_passed = state.phase() == LoopPhase::Accepted;

        info!(
            persona = %persona.id,
            passed = validation_passed,
            attempts = attempts.len(),
            reason = exhaust_reason.map_or("accepted", ExhaustReason::as_str),
            elapsed_ms = u64::try_from(state.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Report validation finished"
        );

        let generated_at = Utc::now();
        Ok(ValidationOutcome {
            persona: persona.id.clone(),
            report: last.draft.report,
            primary_table: last.draft.primary,
            secondary_table: last.draft.secondary,
            verdict: last.verdict,
            validation_passed,
            attempts_used: state.attempt(),
            max_attempts: self.max_attempts,
            attempts,
            exhaust_reason,
            metrics: ReportMetrics::compute(tickets, generated_at.date_naive()),
            generated_at,
        })
    }
}
