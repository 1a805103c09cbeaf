//! # LexCounsel
//!
//! LexCounsel is a Rust toolkit for running bounded, multi-turn legal
//! discussions between LLM-backed personas: an advocate ("Lawyer") that argues
//! the user's position and an optional adjudicator ("Judge") that reviews and
//! validates it, grounded in user-supplied documents.
//!
//! The crate provides layered abstractions for:
//!
//! * **Persona Agents**: [`Agent`] binds a persona name and system prompt to
//!   any [`CompletionClient`] backend, with factories for the standard
//!   advocate, adjudicator, and Slovak structured-intake personas
//! * **Discussion Orchestration**: [`Orchestrator`] drives the strictly
//!   sequential advice or court flow with wall-clock budgets, time-boxed user
//!   prompts, embedded-question routing, and a synthesized final summary
//! * **Document Grounding**: [`documents`] loads plain-text case files and
//!   ranks deterministic citation snippets against the user's instruction
//! * **Observability**: [`trace::TraceRecorder`] appends every message and
//!   lifecycle event of a run to a JSONL trace file
//! * **Provider Flexibility**: [`CompletionClient`] implementations for
//!   OpenAI, Azure AI Foundry, and a deterministic offline mock, selectable
//!   through the `LLM_PROVIDER` environment variable
//! * **Case Files**: [`case_store::CaseStore`] persists discussions and
//!   uploaded documents as browsable on-disk case directories
//!
//! ## Getting Started
//!
//! ```rust
//! use std::sync::Arc;
//! use lexcounsel::agent::{create_judge, create_lawyer};
//! use lexcounsel::clients::mock::MockCompletionClient;
//! use lexcounsel::orchestrator::{DiscussionOptions, Orchestrator};
//! use lexcounsel::schema::DiscussionType;
//! use lexcounsel::trace::TraceRecorder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     lexcounsel::init_logger();
//!
//!     let client = Arc::new(MockCompletionClient::new());
//!     let run_dir = tempfile::tempdir()?;
//!     let trace = Arc::new(TraceRecorder::new(run_dir.path())?);
//!
//!     let orchestrator = Orchestrator::new(
//!         create_lawyer(client.clone()),
//!         Some(create_judge(client)),
//!         trace,
//!     );
//!
//!     let mut options = DiscussionOptions::new("SK");
//!     options.language = Some("English".to_string());
//!     options.discussion_type = DiscussionType::Advice;
//!
//!     let result = orchestrator
//!         .run("My supplier delivered late. What can I claim?", &[], &options, None)
//!         .await?;
//!
//!     println!("{}", result.final_recommendation);
//!     Ok(())
//! }
//! ```
//!
//! Continue exploring the modules re-exported from the crate root for the full
//! discussion pipeline.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Lightweight by intention: applications embedding LexCounsel opt in to
/// `RUST_LOG` driven diagnostics without committing to a logging backend.
///
/// ```rust
/// lexcounsel::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

pub mod lexcounsel;

// Re-exporting key items for easier external access.
pub use crate::lexcounsel::agent;
pub use crate::lexcounsel::agent::{
    create_advocate_for, create_judge, create_lawyer, create_slovak_intake, Agent,
};
pub use crate::lexcounsel::case_store;
pub use crate::lexcounsel::case_store::{CaseRecord, CaseStore, CaseStoreError};
pub use crate::lexcounsel::clients;
pub use crate::lexcounsel::completion;
pub use crate::lexcounsel::completion::{CompletionClient, CompletionError};
pub use crate::lexcounsel::documents;
pub use crate::lexcounsel::documents::{load_documents, select_sources};
pub use crate::lexcounsel::localization;
pub use crate::lexcounsel::orchestrator;
pub use crate::lexcounsel::orchestrator::{DiscussionError, DiscussionOptions, Orchestrator};
pub use crate::lexcounsel::schema;
pub use crate::lexcounsel::schema::{
    DiscussionResult, DiscussionType, Document, Message, Role, Source,
};
pub use crate::lexcounsel::trace;
pub use crate::lexcounsel::trace::{create_run_dir, TraceRecorder};
pub use crate::lexcounsel::user_response;
pub use crate::lexcounsel::user_response::{SilentResponder, StdinResponder, UserResponseProvider};
