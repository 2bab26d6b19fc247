use crate::validation_loop::ValidationOutcome;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Manages the MANUAL_REVIEW.md file listing reports that need a human check.
pub struct ReviewQueue {
    path: PathBuf,
}

impl ReviewQueue {
    /// Creates a queue rooted in `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("MANUAL_REVIEW.md"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks if any report is waiting for review.
    pub fn is_pending(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|content| !content.trim().is_empty())
            .unwrap_or(false)
    }

    /// Appends an entry for an outcome that did not pass validation.
    ///
    /// Returns `Ok(false)` without writing when the outcome passed.
    pub fn record(
        &self,
        title: &str,
        outcome: &ValidationOutcome,
        report_path: Option<&Path>,
    ) -> io::Result<bool> {
        if outcome.validation_passed {
            return Ok(false);
        }

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let verdict = &outcome.verdict;
        let instructions = if verdict.regeneration_instructions.is_empty() {
            "*None given.*"
        } else {
            verdict.regeneration_instructions.as_str()
        };
        let reason = outcome
            .exhaust_reason
            .map_or("unknown", |r| r.as_str());
        let report = report_path.map_or_else(
            || "*Not written to disk.*".to_string(),
            |p| format!("`{}`", p.display()),
        );

        let entry = format!(
            "## 🔎 {title} ({persona}) - {timestamp}\n\n\
             - **Reason:** {reason} - {status_text}\n\
             - **Attempts:** {used} of {max}\n\
             - **Validation:** {status} (trust {score}/10)\n\
             - **Recommendation:** {recommendation}\n\
             - **Report:** {report}\n\n\
             ### Judge Instructions\n\n\
             {instructions}\n\n\
             ---\n\n",
            persona = outcome.persona,
            status_text = outcome.status_text(),
            used = outcome.attempts_used,
            max = outcome.max_attempts,
            status = verdict.status,
            score = verdict.trust_score,
            recommendation = verdict.recommendation,
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(true)
    }

    /// Clears the queue once reports have been reviewed.
    pub fn clear(&self) -> io::Result<()> {
        if self.path.exists() {
            fs::write(&self.path, "")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ReportMetrics;
    use crate::validation_loop::ExhaustReason;
    use brief_proto::{JudgeVerdict, PersonaId, ReportTable};
    use tempfile::TempDir;

    fn failed_outcome() -> ValidationOutcome {
        let mut verdict = JudgeVerdict::judge_unavailable("ignored");
        verdict.regeneration_instructions = "Remove AWS-42.".to_string();
        ValidationOutcome {
            persona: PersonaId::new("manager"),
            report: "text".to_string(),
            primary_table: ReportTable::default(),
            secondary_table: ReportTable::default(),
            verdict,
            validation_passed: false,
            attempts_used: 2,
            max_attempts: 2,
            attempts: Vec::new(),
            exhaust_reason: Some(ExhaustReason::AttemptCeiling),
            metrics: ReportMetrics::default(),
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_queue_is_not_pending() {
        let dir = TempDir::new().unwrap();
        let queue = ReviewQueue::new(dir.path());
        assert!(!queue.is_pending());
        queue.clear().unwrap();
        assert!(!queue.is_pending());
    }

    #[test]
    fn test_record_appends_entries() {
        let dir = TempDir::new().unwrap();
        let queue = ReviewQueue::new(dir.path());

        assert!(queue.record("Q3 Migration", &failed_outcome(), None).unwrap());
        assert!(queue.record("Q4 Migration", &failed_outcome(), None).unwrap());
        assert!(queue.is_pending());

        let content = fs::read_to_string(queue.path()).unwrap();
        assert!(content.contains("Q3 Migration (manager)"));
        assert!(content.contains("Q4 Migration (manager)"));
        assert!(content.contains("attempt_ceiling"));
        assert!(content.contains("**Attempts:** 2 of 2"));
        assert!(content.contains("Remove AWS-42."));
    }

    #[test]
    fn test_passed_outcome_is_not_queued() {
        let dir = TempDir::new().unwrap();
        let queue = ReviewQueue::new(dir.path());
        let mut outcome = failed_outcome();
        outcome.validation_passed = true;

        assert!(!queue.record("Done", &outcome, None).unwrap());
        assert!(!queue.is_pending());
    }

    #[test]
    fn test_clear_empties_queue() {
        let dir = TempDir::new().unwrap();
        let queue = ReviewQueue::new(dir.path());
        queue.record("Q3", &failed_outcome(), None).unwrap();
        queue.clear().unwrap();
        assert!(!queue.is_pending());
    }
}
