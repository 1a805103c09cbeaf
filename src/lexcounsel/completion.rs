//! The text-completion capability consumed by every agent turn.
//!
//! A [`CompletionClient`] wraps one hosted (or mock) text-completion backend
//! behind a single method. It keeps no conversation state of its own; the
//! [`Orchestrator`](crate::lexcounsel::orchestrator::Orchestrator) owns the log
//! and hands the full conversation to the client on every call.
//!
//! Implementations must be safe to call repeatedly with the same input. An
//! empty or whitespace-only return is treated as empty content, not an error;
//! transport or provider errors propagate unchanged and are fatal to the
//! discussion.

use async_trait::async_trait;
use std::error::Error;

use crate::lexcounsel::schema::{Document, Message};

/// Send-able boxed error returned by completion backends.
pub type CompletionError = Box<dyn Error + Send + Sync>;

/// Interface to a text-completion backend.
///
/// `agent_name` identifies the persona issuing the call (e.g. `"Lawyer"`,
/// `"Judge"`, `"FinalSummary"`) so backends may vary behavior per persona;
/// the mock client does exactly that.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        agent_name: &str,
        system_prompt: &str,
        conversation: &[Message],
        documents: &[Document],
    ) -> Result<String, CompletionError>;
}
