//! End-to-end validation loop scenarios driven by scripted collaborators.

use brief_core::testing::{ScriptedDrafter, ScriptedJudge};
use brief_core::{
    ExhaustReason, PersonaCatalog, PersonaProfile, ValidationLoop, VerdictParser,
};
use brief_proto::{
    CollaboratorError, Draft, Recommendation, Ticket, TicketStatus, ValidationStatus,
};

fn team_lead() -> PersonaProfile {
    PersonaCatalog::builtin()
        .expect("built-in catalog loads")
        .require("team_lead")
        .expect("team_lead is built in")
        .clone()
}

fn one_ticket() -> Vec<Ticket> {
    vec![Ticket::new("T-1", "Provision database", TicketStatus::Done).with_assignee("Ana")]
}

#[tokio::test]
async fn scenario_immediate_pass() {
    let drafter = ScriptedDrafter::from_reports(["T-1 provisioned the database."]);
    let judge = ScriptedJudge::from_texts([
        "VALIDATION_STATUS: PASS\nTRUSTWORTHINESS_SCORE: 9\nRECOMMENDATION: APPROVE",
    ]);

    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    assert_eq!(drafter.call_count(), 1);
    assert_eq!(judge.call_count(), 1);
    assert!(outcome.validation_passed);
    assert_eq!(outcome.verdict.trust_score, 9);
    assert_eq!(outcome.verdict.recommendation, Recommendation::Approve);
    assert_eq!(outcome.attempts_used, 1);
    assert!(outcome.exhaust_reason.is_none());
    assert_eq!(outcome.metrics.total, 1);
    assert_eq!(outcome.metrics.completion_percent(), 100);
}

#[tokio::test]
async fn scenario_one_retry_then_pass() {
    let tickets = vec![
        Ticket::new("T-1", "Provision database", TicketStatus::Done),
        Ticket::new("T-2", "Configure backups", TicketStatus::Done),
    ];
    let drafter = ScriptedDrafter::from_reports(["Only T-1 done.", "T-1 and T-2 done."]);
    let judge = ScriptedJudge::from_texts([
        "VALIDATION_STATUS: FAIL\nREGENERATION_REQUIRED: YES\nREGENERATION_INSTRUCTIONS: include ticket T-2",
        "VALIDATION_STATUS: PASS\nTRUSTWORTHINESS_SCORE: 8\nRECOMMENDATION: APPROVE",
    ]);

    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&team_lead(), &tickets)
        .await
        .unwrap();

    let prompts = drafter.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(!prompts[0].contains("include ticket T-2"));
    assert!(prompts[1].contains("include ticket T-2"));
    assert_eq!(judge.call_count(), 2);
    assert!(outcome.validation_passed);
    assert_eq!(outcome.report, "T-1 and T-2 done.");
    assert_eq!(outcome.attempts_used, 2);
}

#[tokio::test]
async fn scenario_ceiling_reached() {
    let drafter = ScriptedDrafter::from_reports(["first draft", "second draft"]);
    let judge = ScriptedJudge::always(
        "VALIDATION_STATUS: FAIL\nREGENERATION_REQUIRED: YES\nREGENERATION_INSTRUCTIONS: try again",
    );

    let outcome = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(2)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    assert_eq!(drafter.call_count(), 2);
    assert_eq!(judge.call_count(), 2);
    assert!(!outcome.validation_passed);
    assert_eq!(outcome.report, "second draft");
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::AttemptCeiling));
    assert!(outcome.needs_manual_review());
}

#[tokio::test]
async fn scenario_judge_declines_retry() {
    let drafter = ScriptedDrafter::from_reports(["draft", "never used"]);
    let judge = ScriptedJudge::from_texts([
        "VALIDATION_STATUS: FAIL\nREGENERATION_REQUIRED: NO\nRECOMMENDATION: MANUAL_REVIEW",
    ]);

    let outcome = ValidationLoop::new(&drafter, &judge)
        .with_max_attempts(2)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    assert_eq!(drafter.call_count(), 1);
    assert_eq!(judge.call_count(), 1);
    assert!(!outcome.validation_passed);
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::RetryDeclined));
}

#[tokio::test]
async fn scenario_judge_collaborator_failure() {
    let drafter = ScriptedDrafter::from_reports(["attempt one report", "never used"]);
    let judge = ScriptedJudge::failing(CollaboratorError::Unavailable("401 Unauthorized".into()));

    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    assert_eq!(drafter.call_count(), 1);
    assert_eq!(judge.call_count(), 1);
    assert!(!outcome.validation_passed);
    assert_eq!(outcome.report, "attempt one report");
    assert_eq!(outcome.verdict.status, ValidationStatus::Unknown);
    assert_eq!(outcome.verdict.recommendation, Recommendation::ManualReview);
    assert!(!outcome.verdict.regeneration_required);
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::JudgeUnavailable));
}

#[tokio::test]
async fn attempt_bound_holds_for_always_failing_judge() {
    for max_attempts in 1..=4 {
        let drafter = ScriptedDrafter::always(Draft::new("report"));
        let judge = ScriptedJudge::always(
            "VALIDATION_STATUS: FAIL\nREGENERATION_REQUIRED: YES\nREGENERATION_INSTRUCTIONS: again",
        );

        let outcome = ValidationLoop::new(&drafter, &judge)
            .with_max_attempts(max_attempts)
            .run(&team_lead(), &one_ticket())
            .await
            .unwrap();

        let expected = usize::try_from(max_attempts).unwrap();
        assert_eq!(drafter.call_count(), expected, "max_attempts = {max_attempts}");
        assert_eq!(judge.call_count(), expected, "max_attempts = {max_attempts}");
        assert_eq!(outcome.attempts.len(), expected);
        assert!(!outcome.validation_passed);
    }
}

#[tokio::test]
async fn judge_prompt_carries_inventory_and_report() {
    let drafter = ScriptedDrafter::from_reports(["Ana provisioned the database (T-1)."]);
    let judge = ScriptedJudge::always("VALIDATION_STATUS: PASS");

    ValidationLoop::new(&drafter, &judge)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    let prompt = &judge.prompts()[0];
    assert!(prompt.contains("TICKET INVENTORY"));
    assert!(prompt.contains("- T-1 | Provision database | Status: Done | Assignee: Ana"));
    assert!(prompt.contains("Ana provisioned the database (T-1)."));
    assert!(prompt.contains("It lists 1 tickets."));
    assert!(!prompt.contains("{ticket_data}"));
    assert!(!prompt.contains("{summary_text}"));
}

#[tokio::test]
async fn judge_echoing_the_answer_template_is_never_accepted() {
    let drafter = ScriptedDrafter::always(Draft::new("T-1 is done."));
    let judge = ScriptedJudge::always(
        "TRUSTWORTHINESS_SCORE: <1-10>\n\
         VALIDATION_STATUS: <PASS | FAIL | INSUFFICIENT_DATA>\n\
         RECOMMENDATION: <APPROVE | REGENERATE | MANUAL_REVIEW>",
    );

    let outcome = ValidationLoop::new(&drafter, &judge)
        .run(&team_lead(), &one_ticket())
        .await
        .unwrap();

    assert!(!outcome.validation_passed);
    assert_eq!(outcome.verdict.status, ValidationStatus::Fail);
    assert_eq!(outcome.verdict.recommendation, Recommendation::ManualReview);
    assert_eq!(outcome.exhaust_reason, Some(ExhaustReason::AttemptCeiling));
    assert_eq!(judge.call_count(), 2);
}

#[test]
fn unlabeled_judge_text_fails_closed() {
    let verdict = VerdictParser::parse("Everything checks out, great report. Approve!");
    assert_eq!(verdict.status, ValidationStatus::Fail);
    assert_eq!(verdict.recommendation, Recommendation::ManualReview);
}

#[test]
fn parsing_is_total_for_arbitrary_text() {
    let inputs = [
        String::new(),
        "   \n\n\t".to_string(),
        "TRUSTWORTHINESS_SCORE:".to_string(),
        "RECOMMENDATION: APPROVE".to_string(),
        "VALIDATION_STATUS: maybe\nREGENERATION_REQUIRED: perhaps".to_string(),
        "\u{1F600}".repeat(100),
        "VALIDATION_STATUS".repeat(50),
    ];

    for input in &inputs {
        let verdict = VerdictParser::parse(input);
        assert!((1..=10).contains(&verdict.trust_score), "input: {input:?}");
        assert_ne!(verdict.status, ValidationStatus::Pass, "input: {input:?}");
    }
}
