//! Wire types and prompt assembly shared by the chat-completion backends.
//!
//! Both hosted providers speak the same chat-completions JSON shape, so the
//! request/response structs and the conversation flattening live here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::lexcounsel::schema::{Document, Message, Role};

/// Total character budget for the injected document context.
pub const MAX_CONTEXT_CHARS: usize = 4000;

/// Per-document character budget inside the context block.
pub const MAX_DOC_CHARS: usize = 800;

/// One chat message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// The first choice's content, trimmed; empty when the provider returned
    /// no choices.
    pub fn first_content(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or("")
            .trim()
            .to_string()
    }
}

/// Flatten a system prompt, optional document context, and the conversation
/// into the provider message list. Assistant turns are prefixed with the
/// speaking agent's name so a multi-agent transcript stays attributable.
pub fn build_wire_messages(
    system_prompt: &str,
    conversation: &[Message],
    documents: &[Document],
) -> Vec<WireMessage> {
    let mut messages = vec![WireMessage {
        role: "system",
        content: system_prompt.to_string(),
    }];
    if !documents.is_empty() {
        messages.push(WireMessage {
            role: "system",
            content: render_documents(documents),
        });
    }
    for message in conversation {
        messages.push(WireMessage {
            role: wire_role(message.role),
            content: format!("{}: {}", message.agent_name, message.content),
        });
    }
    messages
}

/// One bracketed `[filename] snippet` entry per document under a total budget.
pub fn render_documents(documents: &[Document]) -> String {
    let mut chunks = vec!["Context documents:".to_string()];
    let mut total = 0;
    for doc in documents {
        let header = format!("[{}]", file_name(&doc.path));
        let body: String = doc
            .content
            .trim()
            .replace('\n', " ")
            .chars()
            .take(MAX_DOC_CHARS)
            .collect();
        let entry = format!("{} {}", header, body);
        total += entry.chars().count();
        if total > MAX_CONTEXT_CHARS {
            break;
        }
        chunks.push(entry);
    }
    chunks.join("\n")
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, content: &str) -> Document {
        Document {
            doc_id: "doc-1".to_string(),
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn wire_messages_carry_agent_names_and_context() {
        let conversation = vec![
            Message::user("I need advice."),
            Message::assistant("Lawyer", "Here it is.", Vec::new()),
        ];
        let documents = vec![doc("/tmp/contract.txt", "term one\nterm two")];

        let messages = build_wire_messages("SYSTEM", &conversation, &documents);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "SYSTEM");
        assert!(messages[1].content.starts_with("Context documents:"));
        assert!(messages[1].content.contains("[contract.txt] term one term two"));
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "User: I need advice.");
        assert_eq!(messages[3].role, "assistant");
        assert_eq!(messages[3].content, "Lawyer: Here it is.");
    }

    #[test]
    fn no_context_block_without_documents() {
        let messages = build_wire_messages("SYSTEM", &[Message::user("hi")], &[]);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn document_budget_truncates_and_stops() {
        let big = "x".repeat(2000);
        let documents = vec![
            doc("a.txt", &big),
            doc("b.txt", &big),
            doc("c.txt", &big),
            doc("d.txt", &big),
            doc("e.txt", &big),
            doc("f.txt", &big),
        ];
        let rendered = render_documents(&documents);
        assert!(rendered.chars().count() <= MAX_CONTEXT_CHARS + MAX_DOC_CHARS + 64);
        assert!(rendered.contains("[a.txt]"));
        assert!(!rendered.contains("[f.txt]"));
    }

    #[test]
    fn empty_response_yields_empty_content() {
        let response = ChatResponse { choices: vec![] };
        assert_eq!(response.first_content(), "");
    }
}
