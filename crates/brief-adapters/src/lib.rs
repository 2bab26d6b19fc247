//! # brief-adapters
//!
//! Concrete collaborators for the Brief validation loop:
//! - [`ChatClient`]: OpenAI-compatible chat-completions over HTTP
//! - [`LlmDrafter`] / [`LlmJudge`]: the drafter and judge traits backed by it
//! - Ticket tables derived for every drafted report

mod chat_client;
mod collaborators;
pub mod tables;

pub use chat_client::{ChatClient, Completion, ProviderError, parse_completion};
pub use collaborators::{LlmDrafter, LlmJudge};
pub use tables::{primary_table, secondary_table, tickets_text};
