//! Core data types shared across the discussion pipeline.
//!
//! Everything here is created fresh per discussion and never mutated after the
//! run completes: the orchestrator owns the only mutable view (its append-only
//! conversation buffer), while [`Source`] and [`Document`] stay read-only for
//! every turn.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Role attached to a conversation [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message authored by the human user (or a canonical placeholder for one).
    User,
    /// A reply generated by one of the configured agents.
    Assistant,
    /// Steering content injected by the host application.
    System,
}

/// A ranked document excerpt attached to agent turns for grounding.
///
/// Citations are computed once per discussion by [`select_sources`](crate::lexcounsel::documents::select_sources)
/// and shared read-only by every subsequent turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Base name of the originating document file.
    pub filename: String,
    /// Whitespace-normalized excerpt around the first query-term hit.
    pub snippet: String,
}

/// One entry in the discussion log.
///
/// Messages are appended in true chronological order and never edited or
/// removed; exactly one user message opens every log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Display name of the author: `"User"` for user entries, otherwise the
    /// configured agent name.
    pub agent_name: String,
    pub content: String,
    /// Citations in effect when the message was produced; empty for user entries.
    pub sources: Vec<Source>,
}

impl Message {
    /// Build a user-authored entry (opening instruction, answers, placeholders).
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            agent_name: "User".to_string(),
            content: content.into(),
            sources: Vec::new(),
        }
    }

    /// Build an assistant entry attributed to `agent_name`.
    pub fn assistant(
        agent_name: impl Into<String>,
        content: impl Into<String>,
        sources: Vec<Source>,
    ) -> Self {
        Message {
            role: Role::Assistant,
            agent_name: agent_name.into(),
            content: content.into(),
            sources,
        }
    }
}

/// An immutable reference document supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub path: String,
    pub content: String,
}

/// Which control-flow variant the orchestrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionType {
    /// Single advisory pass; adjudicator review only on explicit user request.
    Advice,
    /// Iterative adjudicated mode; every round ends with a judge decision and
    /// `REJECTED` sends the advocate back for another attempt.
    Court,
}

impl fmt::Display for DiscussionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscussionType::Advice => write!(f, "advice"),
            DiscussionType::Court => write!(f, "court"),
        }
    }
}

/// Error returned when parsing an unknown discussion type string.
#[derive(Debug, Clone)]
pub struct InvalidDiscussionType(pub String);

impl fmt::Display for InvalidDiscussionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported discussion type '{}', expected 'advice' or 'court'",
            self.0
        )
    }
}

impl Error for InvalidDiscussionType {}

impl FromStr for DiscussionType {
    type Err = InvalidDiscussionType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "advice" => Ok(DiscussionType::Advice),
            "court" => Ok(DiscussionType::Court),
            other => Err(InvalidDiscussionType(other.to_string())),
        }
    }
}

/// Terminal artifact of a discussion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionResult {
    pub final_recommendation: String,
    pub judge_rationale: String,
    pub citations: Vec<Source>,
    /// Full conversation log in chronological order.
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discussion_type_parses_known_values() {
        assert_eq!(
            "court".parse::<DiscussionType>().unwrap(),
            DiscussionType::Court
        );
        assert_eq!(
            " Advice ".parse::<DiscussionType>().unwrap(),
            DiscussionType::Advice
        );
        assert!("tribunal".parse::<DiscussionType>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"agent_name\":\"User\""));
    }
}
