//! Scripted collaborators for exercising the validation loop without an LLM.
//!
//! Each collaborator plays back a queue of responses and records every prompt
//! it receives. When the queue runs dry it repeats its fallback response, or
//! fails if none was set.

use async_trait::async_trait;
use brief_proto::{CollaboratorError, Draft, JudgeInvoker, ReportDrafter, Ticket};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Response queue plus call log shared by both scripted collaborators.
#[derive(Debug)]
struct Script<T> {
    queue: Mutex<VecDeque<Result<T, CollaboratorError>>>,
    fallback: Option<Result<T, CollaboratorError>>,
    prompts: Mutex<Vec<String>>,
}

impl<T: Clone> Script<T> {
    fn new(
        responses: impl IntoIterator<Item = Result<T, CollaboratorError>>,
        fallback: Option<Result<T, CollaboratorError>>,
    ) -> Self {
        Self {
            queue: Mutex::new(responses.into_iter().collect()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn next(&self, prompt: &str) -> Result<T, CollaboratorError> {
        lock(&self.prompts).push(prompt.to_string());
        match lock(&self.queue).pop_front() {
            Some(response) => response,
            None => self.fallback.clone().unwrap_or_else(|| {
                Err(CollaboratorError::Failed("script exhausted".to_string()))
            }),
        }
    }

    fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

/// A drafter that returns scripted drafts.
#[derive(Debug)]
pub struct ScriptedDrafter {
    script: Script<Draft>,
}

impl ScriptedDrafter {
    /// Plays back `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = Result<Draft, CollaboratorError>>) -> Self {
        Self {
            script: Script::new(responses, None),
        }
    }

    /// Returns one report per call, in order.
    pub fn from_reports<I, S>(reports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(reports.into_iter().map(|r| Ok(Draft::new(r))))
    }

    /// Returns the same draft on every call.
    pub fn always(draft: Draft) -> Self {
        Self {
            script: Script::new(Vec::new(), Some(Ok(draft))),
        }
    }

    pub fn call_count(&self) -> usize {
        lock(&self.script.prompts).len()
    }

    /// Every drafting prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.script.prompts()
    }
}

#[async_trait]
impl ReportDrafter for ScriptedDrafter {
    async fn draft(&self, prompt: &str, _tickets: &[Ticket]) -> Result<Draft, CollaboratorError> {
        self.script.next(prompt)
    }
}

/// A judge that returns scripted evaluation text.
#[derive(Debug)]
pub struct ScriptedJudge {
    script: Script<String>,
}

impl ScriptedJudge {
    /// Plays back `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = Result<String, CollaboratorError>>) -> Self {
        Self {
            script: Script::new(responses, None),
        }
    }

    /// Returns one evaluation per call, in order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Ok(t.into())))
    }

    /// Returns the same evaluation on every call.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            script: Script::new(Vec::new(), Some(Ok(text.into()))),
        }
    }

    /// Fails every call with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            script: Script::new(Vec::new(), Some(Err(error))),
        }
    }

    pub fn call_count(&self) -> usize {
        lock(&self.script.prompts).len()
    }

    /// Every filled judge prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.script.prompts()
    }
}

#[async_trait]
impl JudgeInvoker for ScriptedJudge {
    async fn evaluate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.script.next(prompt)
    }
}
