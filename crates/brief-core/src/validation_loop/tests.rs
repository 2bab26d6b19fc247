use super::*;
use crate::testing::{ScriptedDrafter, ScriptedJudge};
use brief_proto::{InventoryDetail, Recommendation, TicketStatus, ValidationStatus};

const PASS: &str = "VALIDATION_STATUS: PASS\nTRUSTWORTHINESS_SCORE: 9\nRECOMMENDATION: APPROVE";

fn persona() -> PersonaProfile {
    PersonaProfile {
        id: PersonaId::new("team_lead"),
        display_name: "Team Lead".to_string(),
        focus: String::new(),
        detail: InventoryDetail::Full,
        draft_prompt: "Summarize:\n{tickets_text}".to_string(),
        judge_prompt: "{ticket_data}\n---\n{summary_text}".to_string(),
    }
}

fn tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("T-1", "Build API", TicketStatus::Done),
        Ticket::new("T-2", "Write docs", TicketStatus::InProgress),
    ]
}

fn fail_with(instructions: &str) -> String {
    format!(
        "VALIDATION_STATUS: FAIL\nTRUSTWORTHINESS_SCORE: 3\nREGENERATION_REQUIRED: YES\n\
         REGENERATION_INSTRUCTIONS: {instructions}\nRECOMMENDATION: REGENERATE"
    )
}

#[tokio::test]
async fn test_zero_ceiling_is_rejected_without_calls() {
    let drafter = ScriptedDrafter::from_reports(["r1"]);
    let judge = ScriptedJudge::always(PASS);
    let result = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(0)
        .run(&persona(), &tickets())
        .await;

    assert!(matches!(result, Err(ValidationError::InvalidAttemptCeiling)));
    assert_eq!(drafter.call_count(), 0);
    assert_eq!(judge.call_count(), 0);
}

#[tokio::test]
async fn test_first_draft_failure_propagates() {
    let drafter = ScriptedDrafter::new([Err(CollaboratorError::Failed("boom".to_string()))]);
    let judge = ScriptedJudge::always(PASS);
    let result = ValidationLoop::new(&drafter, &judge)
        .run(&persona(), &tickets())
        .await;

    match result {
        Err(ValidationError::DraftFailed { attempt, source }) => {
            assert_eq!(attempt, 1);
            assert_eq!(source, CollaboratorError::Failed("boom".to_string()));
        }
        other => panic!("expected DraftFailed, got {other:?}"),
    }
    assert_eq!(judge.call_count(), 0);
}

#[tokio::test]
async fn test_retry_draft_failure_keeps_previous_attempt() {
    let drafter = ScriptedDrafter::new([
        Ok(Draft::new("first report")),
        Err(CollaboratorError::Timeout { seconds: 30 }),
    ]);
    let judge = ScriptedJudge::always(fail_with("mention T-2"));
    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    assert!(!outcome.validation_passed);
    assert_eq!(outcome.report, "first report");
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::DraftFailedOnRetry));
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.attempts_used, 2);
    assert_eq!(drafter.call_count(), 2);
    assert_eq!(judge.call_count(), 1);
}

#[tokio::test]
async fn test_corrective_block_only_on_retry() {
    let drafter = ScriptedDrafter::from_reports(["r1", "r2"]);
    let judge =
        ScriptedJudge::from_texts([fail_with("Drop the claim about T-9."), PASS.to_string()]);
    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    let prompts = drafter.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(!prompts[0].contains("CORRECTIONS REQUIRED"));
    assert!(prompts[0].contains("GROUNDING RULES"));
    assert!(prompts[1].contains("CORRECTIONS REQUIRED (attempt 2 of 2)"));
    assert!(prompts[1].contains("Drop the claim about T-9."));
    assert!(prompts[1].starts_with("Summarize:\n{tickets_text}"));
    assert!(outcome.validation_passed);
    assert_eq!(outcome.report, "r2");
}

#[tokio::test]
async fn test_judge_sees_same_inventory_each_attempt() {
    let drafter = ScriptedDrafter::from_reports(["r1", "r2"]);
    let judge = ScriptedJudge::from_texts([fail_with("x"), PASS.to_string()]);
    ValidationLoop::new(&drafter, &judge)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    let prompts = judge.prompts();
    let inventory_of = |p: &str| p.split("\n---\n").next().unwrap_or_default().to_string();
    assert_eq!(inventory_of(&prompts[0]), inventory_of(&prompts[1]));
    assert!(prompts[0].contains("- T-1 | Build API | Status: Done"));
    assert!(prompts[0].ends_with("r1"));
    assert!(prompts[1].ends_with("r2"));
}

#[tokio::test]
async fn test_single_attempt_ceiling_never_retries() {
    let drafter = ScriptedDrafter::always(Draft::new("only"));
    let judge = ScriptedJudge::always(fail_with("retry please"));
    let outcome = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(1)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    assert_eq!(drafter.call_count(), 1);
    assert_eq!(judge.call_count(), 1);
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::AttemptCeiling));
}

#[tokio::test]
async fn test_unparsable_judge_output_retries_then_exhausts() {
    let drafter = ScriptedDrafter::always(Draft::new("report"));
    let judge = ScriptedJudge::always("Looks fine to me!");
    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    // Missing status fails closed and the default asks for regeneration
    assert_eq!(judge.call_count(), 2);
    assert!(!outcome.validation_passed);
    assert_eq!(outcome.verdict.status, ValidationStatus::Fail);
    assert_eq!(outcome.verdict.recommendation, Recommendation::ManualReview);
    assert!(drafter.prompts()[1].contains("gave no specific instructions"));
}

#[tokio::test]
async fn test_outcome_records_every_attempt() {
    let drafter = ScriptedDrafter::from_reports(["r1", "r2", "r3"]);
    let judge = ScriptedJudge::from_texts([fail_with("a"), fail_with("b"), PASS.to_string()]);
    let outcome = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(3)
        .run(&persona(), &tickets())
        .await
        .unwrap();

    let indices: Vec<u32> = outcome.attempts.iter().map(|a| a.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(outcome.attempts_used, 3);
    assert!(outcome.validation_passed);
    assert!(outcome.exhaust_reason.is_none());
    assert_eq!(outcome.status_text(), "Report validated by judge.");
}
