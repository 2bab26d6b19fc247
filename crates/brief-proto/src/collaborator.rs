//! Collaborator traits consumed by the validation loop.
//!
//! The drafter and the judge are external, usually LLM-backed, services.
//! The core only depends on these traits; transports live in adapter crates
//! and tests substitute scripted implementations.

use crate::{Draft, Ticket};
use async_trait::async_trait;

/// Failure of an external collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("generation failed: {0}")]
    Failed(String),

    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Produces a report draft from a prompt and the ticket snapshot.
///
/// Implementations must not be assumed idempotent: two calls with
/// different prompts may return unrelated drafts.
#[async_trait]
pub trait ReportDrafter: Send + Sync {
    async fn draft(&self, prompt: &str, tickets: &[Ticket]) -> Result<Draft, CollaboratorError>;
}

/// Evaluates a fully filled judge prompt and returns the judge's free text.
#[async_trait]
pub trait JudgeInvoker: Send + Sync {
    async fn evaluate(&self, prompt: &str) -> Result<String, CollaboratorError>;
}
