//! LLM-backed drafter and judge.

use crate::chat_client::{ChatClient, Completion};
use crate::tables::{primary_table, secondary_table, tickets_text};
use async_trait::async_trait;
use brief_core::fill_template;
use brief_proto::{CollaboratorError, Draft, JudgeInvoker, ReportDrafter, Ticket};
use tracing::debug;

/// Drafts reports by filling `{tickets_text}` and asking the model.
///
/// The tables come straight from the tickets, never from the model.
pub struct LlmDrafter<C = ChatClient> {
    client: C,
}

impl<C: Completion> LlmDrafter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: Completion> ReportDrafter for LlmDrafter<C> {
    async fn draft(&self, prompt: &str, tickets: &[Ticket]) -> Result<Draft, CollaboratorError> {
        let listing = tickets_text(tickets);
        let filled = fill_template(prompt, &[("tickets_text", listing.as_str())]);
        let report = self.client.complete(&filled).await?;
        debug!(chars = report.len(), "Drafter returned report");
        Ok(Draft::new(report).with_tables(primary_table(tickets), secondary_table(tickets)))
    }
}

/// Forwards filled judge prompts to the model.
pub struct LlmJudge<C = ChatClient> {
    client: C,
}

impl<C: Completion> LlmJudge<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: Completion> JudgeInvoker for LlmJudge<C> {
    async fn evaluate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let text = self.client.complete(prompt).await?;
        debug!(chars = text.len(), "Judge returned evaluation");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_client::ProviderError;
    use brief_proto::TicketStatus;
    use std::sync::Mutex;

    /// Returns a fixed reply (or a rate limit) and remembers the last prompt.
    struct FakeCompletion {
        reply: Option<String>,
        last_prompt: Mutex<String>,
    }

    impl FakeCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                last_prompt: Mutex::new(String::new()),
            }
        }

        fn rate_limited() -> Self {
            Self {
                reply: None,
                last_prompt: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for FakeCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            self.reply.clone().ok_or_else(|| ProviderError::RateLimited {
                provider: "openai".to_string(),
            })
        }
    }

    fn tickets() -> Vec<Ticket> {
        vec![
            Ticket::new("T-1", "Build API", TicketStatus::Done),
            Ticket::new("T-2", "Write docs", TicketStatus::ToDo),
        ]
    }

    #[tokio::test]
    async fn test_drafter_fills_listing_and_derives_tables() {
        let drafter = LlmDrafter::new(FakeCompletion::replying("T-1 is done."));
        let draft = drafter
            .draft("Tickets:\n{tickets_text}\nWrite.", &tickets())
            .await
            .unwrap();

        let prompt = drafter.client.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("- T-1: Build API (Status: Done"));
        assert!(!prompt.contains("{tickets_text}"));

        assert_eq!(draft.report, "T-1 is done.");
        assert_eq!(draft.primary.len(), 2);
        assert_eq!(draft.secondary.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_errors_become_collaborator_errors() {
        let drafter = LlmDrafter::new(FakeCompletion::rate_limited());
        let err = drafter.draft("{tickets_text}", &tickets()).await.unwrap_err();
        assert_eq!(
            err,
            CollaboratorError::RateLimited {
                provider: "openai".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_judge_forwards_prompt_verbatim() {
        let judge = LlmJudge::new(FakeCompletion::replying("VALIDATION_STATUS: PASS"));
        let text = judge.evaluate("filled prompt {summary_text}").await.unwrap();
        assert_eq!(text, "VALIDATION_STATUS: PASS");
        assert_eq!(
            *judge.client.last_prompt.lock().unwrap(),
            "filled prompt {summary_text}"
        );
    }
}
