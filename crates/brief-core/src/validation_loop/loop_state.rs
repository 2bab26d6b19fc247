//! Validation loop state machine.

use brief_proto::JudgeVerdict;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Why the loop stopped without an accepted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustReason {
    /// The final permitted attempt still failed validation.
    AttemptCeiling,
    /// The judge failed the draft but said regenerating would not help.
    RetryDeclined,
    /// The judge collaborator itself failed.
    JudgeUnavailable,
    /// The drafter failed on a retry; the previous attempt stands.
    DraftFailedOnRetry,
}

impl ExhaustReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExhaustReason::AttemptCeiling => "attempt_ceiling",
            ExhaustReason::RetryDeclined => "retry_declined",
            ExhaustReason::JudgeUnavailable => "judge_unavailable",
            ExhaustReason::DraftFailedOnRetry => "draft_failed_on_retry",
        }
    }

    /// Human-readable explanation for reports and review queue entries.
    pub fn status_text(self) -> &'static str {
        match self {
            ExhaustReason::AttemptCeiling => "Validation still failing at the attempt limit.",
            ExhaustReason::RetryDeclined => {
                "Judge rejected the report and advised against regenerating."
            }
            ExhaustReason::JudgeUnavailable => {
                "Judge could not be reached; the report is unverified."
            }
            ExhaustReason::DraftFailedOnRetry => {
                "Regeneration failed; showing the previous attempt's report."
            }
        }
    }
}

impl std::fmt::Display for ExhaustReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phases of the draft/judge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Drafting,
    Judging,
    Accepted,
    Exhausted(ExhaustReason),
}

impl LoopPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopPhase::Accepted | LoopPhase::Exhausted(_))
    }
}

/// Decides the phase that follows a parsed verdict.
///
/// `attempt` is 1-based. Pure function: the loop's retry policy lives here.
pub fn next_phase(attempt: u32, max_attempts: u32, verdict: &JudgeVerdict) -> LoopPhase {
    if verdict.is_pass() {
        LoopPhase::Accepted
    } else if attempt >= max_attempts {
        LoopPhase::Exhausted(ExhaustReason::AttemptCeiling)
    } else if !verdict.regeneration_required {
        LoopPhase::Exhausted(ExhaustReason::RetryDeclined)
    } else {
        LoopPhase::Drafting
    }
}

/// Current state of one validation run.
#[derive(Debug)]
pub struct LoopState {
    phase: LoopPhase,
    attempt: u32,
    max_attempts: u32,
    /// Instructions from the last rejected draft, fed into the next one.
    feedback: Option<String>,
    started_at: Instant,
}

impl LoopState {
    /// Creates a state at attempt 1. `max_attempts` must be at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            phase: LoopPhase::Drafting,
            attempt: 1,
            max_attempts,
            feedback: None,
            started_at: Instant::now(),
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Drafting -> Judging.
    pub fn draft_completed(&mut self) {
        if self.phase == LoopPhase::Drafting {
            self.phase = LoopPhase::Judging;
        }
    }

    /// A retry draft failed; the previous attempt becomes final.
    pub fn draft_failed(&mut self) {
        self.phase = LoopPhase::Exhausted(ExhaustReason::DraftFailedOnRetry);
    }

    /// The judge call failed; stop without retrying.
    pub fn judge_failed(&mut self) {
        self.phase = LoopPhase::Exhausted(ExhaustReason::JudgeUnavailable);
    }

    /// Applies a verdict, advancing to the next attempt when a retry is due.
    pub fn verdict_received(&mut self, verdict: &JudgeVerdict) -> LoopPhase {
        if self.phase != LoopPhase::Judging {
            return self.phase;
        }

        self.phase = next_phase(self.attempt, self.max_attempts, verdict);
        if self.phase == LoopPhase::Drafting {
            self.attempt += 1;
            self.feedback = Some(verdict.regeneration_instructions.clone());
        }
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_proto::{Recommendation, ValidationStatus};

    fn verdict(status: ValidationStatus, regenerate: bool) -> JudgeVerdict {
        JudgeVerdict {
            status,
            trust_score: 5,
            regeneration_required: regenerate,
            regeneration_instructions: "fix it".to_string(),
            recommendation: Recommendation::Regenerate,
            issues_found: String::new(),
            defaulted_fields: Vec::new(),
        }
    }

    #[test]
    fn test_pass_is_accepted_even_on_last_attempt() {
        let v = verdict(ValidationStatus::Pass, false);
        assert_eq!(next_phase(2, 2, &v), LoopPhase::Accepted);
    }

    #[test]
    fn test_ceiling_checked_before_retry_flag() {
        let v = verdict(ValidationStatus::Fail, true);
        assert_eq!(
            next_phase(2, 2, &v),
            LoopPhase::Exhausted(ExhaustReason::AttemptCeiling)
        );
        assert_eq!(
            next_phase(1, 1, &verdict(ValidationStatus::Fail, false)),
            LoopPhase::Exhausted(ExhaustReason::AttemptCeiling)
        );
    }

    #[test]
    fn test_declined_retry_exhausts() {
        let v = verdict(ValidationStatus::InsufficientData, false);
        assert_eq!(
            next_phase(1, 3, &v),
            LoopPhase::Exhausted(ExhaustReason::RetryDeclined)
        );
    }

    #[test]
    fn test_retry_advances_attempt_and_keeps_feedback() {
        let mut state = LoopState::new(2);
        state.draft_completed();
        assert_eq!(state.phase(), LoopPhase::Judging);

        let phase = state.verdict_received(&verdict(ValidationStatus::Fail, true));
        assert_eq!(phase, LoopPhase::Drafting);
        assert_eq!(state.attempt(), 2);
        assert_eq!(state.feedback(), Some("fix it"));
    }

    #[test]
    fn test_verdict_ignored_outside_judging() {
        let mut state = LoopState::new(2);
        let phase = state.verdict_received(&verdict(ValidationStatus::Pass, false));
        assert_eq!(phase, LoopPhase::Drafting);
        assert_eq!(state.attempt(), 1);
    }

    #[test]
    fn test_judge_failure_is_terminal() {
        let mut state = LoopState::new(3);
        state.draft_completed();
        state.judge_failed();
        assert!(state.is_terminal());
        assert_eq!(
            state.phase(),
            LoopPhase::Exhausted(ExhaustReason::JudgeUnavailable)
        );
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(ExhaustReason::AttemptCeiling.as_str(), "attempt_ceiling");
        assert_eq!(ExhaustReason::DraftFailedOnRetry.to_string(), "draft_failed_on_retry");
    }
}
