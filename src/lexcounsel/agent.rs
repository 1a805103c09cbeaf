//! Persona agents and their factory constructors.
//!
//! An [`Agent`] binds a persona name and a base system prompt to a shared
//! [`CompletionClient`]. It is immutable configuration: one instance per
//! persona per discussion, invoked synchronously by the orchestrator.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lexcounsel::clients::mock::MockCompletionClient;
//! use lexcounsel::agent::{create_lawyer, create_judge};
//!
//! let client = Arc::new(MockCompletionClient::new());
//! let lawyer = create_lawyer(client.clone());
//! let judge = create_judge(client);
//! assert_eq!(lawyer.name(), "Lawyer");
//! assert_eq!(judge.name(), "Judge");
//! ```

use std::sync::Arc;

use crate::lexcounsel::completion::{CompletionClient, CompletionError};
use crate::lexcounsel::schema::{Document, Message, Source};

/// A single LLM-backed persona participating in a discussion.
pub struct Agent {
    name: String,
    system_prompt: String,
    client: Arc<dyn CompletionClient>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Agent {
            name: name.into(),
            system_prompt: system_prompt.into(),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The completion backend this agent delegates to.
    pub fn client(&self) -> &Arc<dyn CompletionClient> {
        &self.client
    }

    /// Produce one reply message for the current conversation.
    ///
    /// Uses `prompt_override` when given, otherwise the agent's base prompt.
    /// The returned text is not validated or retried; backend failures
    /// propagate to the caller and end the discussion.
    pub async fn respond(
        &self,
        conversation: &[Message],
        documents: &[Document],
        citations: &[Source],
        prompt_override: Option<&str>,
    ) -> Result<Message, CompletionError> {
        let prompt = prompt_override.unwrap_or(&self.system_prompt);
        let content = self
            .client
            .complete(&self.name, prompt, conversation, documents)
            .await?;
        Ok(Message::assistant(&self.name, content, citations.to_vec()))
    }
}

/// The advocate persona arguing the user's position.
pub fn create_lawyer(client: Arc<dyn CompletionClient>) -> Agent {
    let system_prompt = "You are a lawyer advocating for the user's position. \
         Ground arguments in the provided documents and identify favorable facts.";
    Agent::new("Lawyer", system_prompt, client)
}

/// The adjudicator persona reviewing and validating the advocate's output.
pub fn create_judge(client: Arc<dyn CompletionClient>) -> Agent {
    let system_prompt = "You are a judge evaluating the lawyer's arguments. \
         Ask clarifying questions, weigh the evidence, and issue a reasoned decision.";
    Agent::new("Judge", system_prompt, client)
}

/// Slovak structured-intake persona: runs a triage flow before substantive advice.
pub fn create_slovak_intake(client: Arc<dyn CompletionClient>) -> Agent {
    let system_prompt = "You are a Slovak legal intake agent representing the client's interests. \
         Run a structured advice intake and guide the client through the next steps.\n\n\
         Follow this flow each round:\n\
         1) Intake/triage: identify dispute type, parties, amount, timelines, urgency.\n\
         2) Document checklist: ask for the relevant documents for the dispute.\n\
         3) Quick review: extract key facts, dates, parties, obligations, breaches, and evidence.\n\
         4) Targeted questions: ask for missing facts or proof gaps.\n\
         5) Close with a short summary, a checklist of missing items, and a proposed next step.\n\n\
         Always distinguish between:\n\
         - facts confirmed in documents,\n\
         - facts stated by the client,\n\
         - facts that still need proof or clarification.\n\
         Ask clear, direct questions and keep the tone professional and practical.";
    Agent::new("IntakeSlovakia", system_prompt, client)
}

/// Pick the advocate persona for a jurisdiction: the Slovak structured-intake
/// persona for Slovakia, the generic lawyer everywhere else.
pub fn create_advocate_for(country: &str, client: Arc<dyn CompletionClient>) -> Agent {
    if crate::lexcounsel::localization::is_slovakia(country) {
        create_slovak_intake(client)
    } else {
        create_lawyer(client)
    }
}
