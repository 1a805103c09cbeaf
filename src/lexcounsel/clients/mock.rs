//! Deterministic offline backend for demos and tests.

use async_trait::async_trait;
use std::path::Path;

use crate::lexcounsel::completion::{CompletionClient, CompletionError};
use crate::lexcounsel::schema::{Document, Message, Role};

/// Canned-response client keyed on the requesting agent's name.
///
/// Replies echo the latest user message as a `User focus:` suffix so a
/// transcript shows what each turn was reacting to. The judge reply always
/// carries a clarifying question, which exercises the question-routing path
/// without a live model.
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        MockCompletionClient
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        MockCompletionClient::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        agent_name: &str,
        _system_prompt: &str,
        conversation: &[Message],
        documents: &[Document],
    ) -> Result<String, CompletionError> {
        let user_message = latest_user_message(conversation);
        let doc_list = document_list(documents);

        let agent_key = agent_name.to_lowercase();
        if agent_key.contains("lawyer") {
            return Ok(format!(
                "Legal position: I advocate for the user's requested outcome. \
                 Key facts referenced from {}. User focus: {}",
                doc_list, user_message
            ));
        }
        if agent_key.contains("judge") {
            return Ok(format!(
                "Judicial view: I weigh the arguments and evidence neutrally. \
                 Clarifying question: What jurisdiction or governing law applies? \
                 User focus: {}",
                user_message
            ));
        }
        if agent_key.contains("finalsummary") {
            return Ok(
                "Recommendation: Proceed with the user's requested position.\n\
                 Rationale: The discussion supports the user's arguments based on the provided facts."
                    .to_string(),
            );
        }

        Ok(format!(
            "Response prepared for {}. User focus: {}",
            agent_name, user_message
        ))
    }
}

fn latest_user_message(conversation: &[Message]) -> String {
    conversation
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(|message| message.content.clone())
        .unwrap_or_default()
}

fn document_list(documents: &[Document]) -> String {
    let names: Vec<String> = documents
        .iter()
        .take(3)
        .map(|doc| {
            Path::new(&doc.path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| doc.path.clone())
        })
        .collect();
    if names.is_empty() {
        "no documents".to_string()
    } else {
        names.join(", ")
    }
}
