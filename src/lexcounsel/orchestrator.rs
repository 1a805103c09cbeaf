//! The discussion orchestrator: turn scheduling, budgets, question routing,
//! and final synthesis.
//!
//! One [`Orchestrator`] drives a strictly sequential conversation between an
//! advocate agent ("Lawyer") and an optional adjudicator agent ("Judge"):
//!
//! ```text
//! START ─▶ ADVOCATE_TURN ─▶ QUESTION_CHECK ─▶ MODE BRANCH ─▶ FOLLOWUP_CHECK ─┐
//!   ▲                                     (advice / court)                   │
//!   └──────────────────────────── another round ◀───────────────────────────┘
//!                                                │ finish / timeout
//!                                                ▼
//!                                            FINALIZE
//! ```
//!
//! The wall-clock budget is re-checked before every agent call and every user
//! prompt; exhaustion short-circuits straight to FINALIZE. Question detection
//! and decision parsing are line-oriented heuristics that downstream behavior
//! is pinned to, so they must not be replaced with anything smarter.

use serde_json::json;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::lexcounsel::agent::Agent;
use crate::lexcounsel::documents::{select_sources, DEFAULT_MAX_SOURCES, DEFAULT_SNIPPET_LEN};
use crate::lexcounsel::localization::{translate, user_timeout_message};
use crate::lexcounsel::schema::{
    DiscussionResult, DiscussionType, Document, Message, Role, Source,
};
use crate::lexcounsel::trace::TraceRecorder;
use crate::lexcounsel::user_response::UserResponseProvider;

/// Answers that end the follow-up loop (case-insensitive, trimmed).
const FINISH_TOKENS: [&str; 7] = ["finish", "no", "nope", "done", "exit", "quit", "stop"];

/// Short affirmative answers accepted for the judge-review prompt.
const YES_TOKENS: [&str; 6] = ["yes", "y", "ok", "okay", "sure", "please"];

/// Precondition violations raised before any agent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscussionError {
    /// `country` was empty or blank.
    MissingCountry,
    /// The per-question timeout was not positive.
    InvalidQuestionTimeout,
    /// Court mode was requested but no adjudicator is configured.
    MissingAdjudicator,
}

impl fmt::Display for DiscussionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscussionError::MissingCountry => {
                write!(f, "country is required to scope the jurisdiction")
            }
            DiscussionError::InvalidQuestionTimeout => {
                write!(f, "question_timeout_secs must be positive")
            }
            DiscussionError::MissingAdjudicator => {
                write!(f, "court mode requires an adjudicator agent")
            }
        }
    }
}

impl Error for DiscussionError {}

/// Caller-supplied parameters for one discussion run.
#[derive(Debug, Clone)]
pub struct DiscussionOptions {
    /// Jurisdiction the agents must advise under. Required, non-empty.
    pub country: String,
    /// Output language; `None` means "reply in the user's input language".
    pub language: Option<String>,
    /// Upper bound for each individual user prompt, in seconds. Must be > 0.
    pub question_timeout_secs: f64,
    /// Total wall-clock budget in minutes; 0 means unlimited.
    pub max_discussion_minutes: u64,
    pub discussion_type: DiscussionType,
}

impl DiscussionOptions {
    /// Options with the default budgets: 60s per question, unlimited total,
    /// advisory mode.
    pub fn new(country: impl Into<String>) -> Self {
        DiscussionOptions {
            country: country.into(),
            language: None,
            question_timeout_secs: 60.0,
            max_discussion_minutes: 0,
            discussion_type: DiscussionType::Advice,
        }
    }
}

/// Adjudicator verdict parsed from a terminal `Decision:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Approved,
    Rejected,
}

/// Drives one discussion end-to-end. See the module docs for the state
/// machine.
pub struct Orchestrator {
    advocate: Agent,
    adjudicator: Option<Agent>,
    trace: Arc<TraceRecorder>,
}

/// Mutable per-run state owned exclusively by the orchestrator.
struct RunState<'a> {
    conversation: Vec<Message>,
    citations: Vec<Source>,
    documents: &'a [Document],
    options: &'a DiscussionOptions,
    provider: Option<&'a Arc<dyn UserResponseProvider>>,
    deadline: Option<Instant>,
    /// The answered agent question of the current round, if any. Doubles as
    /// the follow-up input so the user is not prompted twice per round.
    answered_question: Option<String>,
}

impl<'a> RunState<'a> {
    fn language(&self) -> Option<&str> {
        self.options.language.as_deref()
    }

    /// Seconds left in the discussion budget; `None` means unlimited.
    fn remaining_secs(&self) -> Option<f64> {
        self.deadline.map(|deadline| {
            let now = Instant::now();
            if now >= deadline {
                0.0
            } else {
                (deadline - now).as_secs_f64()
            }
        })
    }

    fn budget_exhausted(&self) -> bool {
        matches!(self.remaining_secs(), Some(remaining) if remaining <= 0.0)
    }

    /// Effective timeout for the next user prompt: the per-question limit,
    /// never more than what is left of the discussion budget, clamped >= 0.
    fn prompt_timeout(&self) -> f64 {
        let limit = self.options.question_timeout_secs;
        match self.remaining_secs() {
            Some(remaining) => limit.min(remaining).max(0.0),
            None => limit.max(0.0),
        }
    }
}

impl Orchestrator {
    /// `adjudicator` may be omitted for pure advisory deployments; court mode
    /// then fails its precondition check.
    pub fn new(advocate: Agent, adjudicator: Option<Agent>, trace: Arc<TraceRecorder>) -> Self {
        Orchestrator {
            advocate,
            adjudicator,
            trace,
        }
    }

    /// Run one complete discussion and synthesize the result.
    ///
    /// Precondition violations surface as [`DiscussionError`] before any
    /// agent call; completion-backend failures propagate unchanged.
    pub async fn run(
        &self,
        instruction: &str,
        documents: &[Document],
        options: &DiscussionOptions,
        provider: Option<Arc<dyn UserResponseProvider>>,
    ) -> Result<DiscussionResult, Box<dyn Error + Send + Sync>> {
        self.trace.record_event(
            "case_context",
            json!({
                "country": options.country,
                "language": options.language,
                "discussion_type": options.discussion_type.to_string(),
                "question_timeout_secs": options.question_timeout_secs,
                "max_discussion_minutes": options.max_discussion_minutes,
                "document_count": documents.len(),
            }),
        );

        if options.country.trim().is_empty() {
            return Err(Box::new(DiscussionError::MissingCountry));
        }
        if options.question_timeout_secs <= 0.0 {
            return Err(Box::new(DiscussionError::InvalidQuestionTimeout));
        }
        if options.discussion_type == DiscussionType::Court && self.adjudicator.is_none() {
            return Err(Box::new(DiscussionError::MissingAdjudicator));
        }

        log::info!(
            "Starting {} discussion for {} with {} documents",
            options.discussion_type,
            options.country,
            documents.len()
        );

        let deadline = if options.max_discussion_minutes > 0 {
            Some(Instant::now() + Duration::from_secs(options.max_discussion_minutes * 60))
        } else {
            None
        };

        let mut state = RunState {
            conversation: Vec::new(),
            citations: select_sources(
                documents,
                instruction,
                DEFAULT_MAX_SOURCES,
                DEFAULT_SNIPPET_LEN,
            ),
            documents,
            options,
            provider: provider.as_ref(),
            deadline,
            answered_question: None,
        };
        self.append_message(&mut state, Message::user(instruction));

        let advocate_prompt = augment_prompt(
            self.advocate.system_prompt(),
            &options.country,
            options.language.as_deref(),
            options.discussion_type,
            AgentRole::Advocate,
        );
        let adjudicator_prompt = self.adjudicator.as_ref().map(|judge| {
            augment_prompt(
                judge.system_prompt(),
                &options.country,
                options.language.as_deref(),
                options.discussion_type,
                AgentRole::Adjudicator,
            )
        });

        self.run_rounds(&mut state, &advocate_prompt, adjudicator_prompt.as_deref())
            .await?;
        self.finalize(&state).await
    }

    /// The round loop: advocate turn, mode branch, follow-up check.
    async fn run_rounds(
        &self,
        state: &mut RunState<'_>,
        advocate_prompt: &str,
        adjudicator_prompt: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        'discussion: loop {
            state.answered_question = None;

            if self.budget_gate(state) {
                break;
            }
            let advocate_reply = self.agent_turn(&self.advocate, advocate_prompt, state).await?;
            self.question_check(&advocate_reply, state).await;

            match state.options.discussion_type {
                DiscussionType::Advice => {
                    if let Some(judge) = &self.adjudicator {
                        if self.budget_gate(state) {
                            break;
                        }
                        let review_prompt = translate("judge_review_prompt", state.language());
                        match self.prompt_user(state, &review_prompt).await {
                            Some(answer) if wants_judge_review(&answer) => {
                                if self.budget_gate(state) {
                                    break;
                                }
                                let prompt = adjudicator_prompt.unwrap_or_else(|| judge.system_prompt());
                                let reply = self.agent_turn(judge, prompt, state).await?;
                                self.question_check(&reply, state).await;
                            }
                            Some(_) => {
                                log::info!("User declined adjudicator review");
                            }
                            None => {
                                self.trace
                                    .record_event("user_judge_review_timeout", json!({}));
                            }
                        }
                    }
                }
                DiscussionType::Court => {
                    // Validated before the first advocate turn.
                    let judge = match &self.adjudicator {
                        Some(judge) => judge,
                        None => return Err(Box::new(DiscussionError::MissingAdjudicator)),
                    };
                    let prompt = adjudicator_prompt.unwrap_or_else(|| judge.system_prompt());
                    loop {
                        if self.budget_gate(state) {
                            break 'discussion;
                        }
                        let reply = self.agent_turn(judge, prompt, state).await?;
                        self.question_check(&reply, state).await;

                        match parse_decision(&reply) {
                            Some(Decision::Rejected) => {
                                self.trace
                                    .record_event("judge_decision", json!({"decision": "rejected"}));
                                if self.budget_gate(state) {
                                    break 'discussion;
                                }
                                let retry =
                                    self.agent_turn(&self.advocate, advocate_prompt, state).await?;
                                self.question_check(&retry, state).await;
                            }
                            Some(Decision::Approved) => {
                                self.trace
                                    .record_event("judge_decision", json!({"decision": "approved"}));
                                break;
                            }
                            // No parseable decision line: proceed as approved.
                            None => break,
                        }
                    }
                }
            }

            // FOLLOWUP_CHECK: an answered agent question doubles as the
            // follow-up input for this round.
            if let Some(answer) = state.answered_question.take() {
                if is_finish(&answer) {
                    break;
                }
                continue;
            }

            if self.budget_gate(state) {
                break;
            }
            let followup_prompt = translate("followup_prompt", state.language());
            match self.prompt_user(state, &followup_prompt).await {
                Some(answer) => {
                    self.append_message(state, Message::user(answer.clone()));
                    if is_finish(&answer) {
                        break;
                    }
                }
                None => {
                    self.trace.record_event("user_followup_timeout", json!({}));
                    break;
                }
            }
        }
        Ok(())
    }

    /// Record a `discussion_timeout` event when the budget is exhausted.
    /// Returns true when the caller must short-circuit to FINALIZE.
    fn budget_gate(&self, state: &RunState<'_>) -> bool {
        if state.budget_exhausted() {
            self.trace.record_event(
                "discussion_timeout",
                json!({"max_discussion_minutes": state.options.max_discussion_minutes}),
            );
            true
        } else {
            false
        }
    }

    async fn agent_turn(
        &self,
        agent: &Agent,
        prompt: &str,
        state: &mut RunState<'_>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let message = agent
            .respond(
                &state.conversation,
                state.documents,
                &state.citations,
                Some(prompt),
            )
            .await?;
        let content = message.content.clone();
        self.append_message(state, message);
        Ok(content)
    }

    /// Scan a fresh agent reply for an embedded question and route it to the
    /// user. A missing or empty answer becomes the canonical localized
    /// placeholder; either way exactly one user message is appended.
    ///
    /// An exhausted budget skips the question entirely: no prompt is issued
    /// and no placeholder is appended. The next budget gate records the
    /// timeout and short-circuits to FINALIZE.
    async fn question_check(&self, content: &str, state: &mut RunState<'_>) {
        let question = match extract_question(content) {
            Some(question) => question,
            None => return,
        };
        if state.budget_exhausted() {
            return;
        }

        match self.prompt_user(state, &question).await {
            Some(answer) => {
                self.append_message(state, Message::user(answer.clone()));
                state.answered_question = Some(answer);
            }
            None => {
                self.trace
                    .record_event("user_timeout", json!({"question": question}));
                let placeholder =
                    user_timeout_message(state.language(), state.options.question_timeout_secs);
                self.append_message(state, Message::user(placeholder));
            }
        }
    }

    /// Ask the user-response provider one time-boxed question. `None` covers
    /// every no-answer case: no provider, timeout, or a blank reply.
    async fn prompt_user(&self, state: &RunState<'_>, prompt: &str) -> Option<String> {
        let provider = state.provider?;
        let answer = provider.ask(prompt, state.prompt_timeout()).await?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn append_message(&self, state: &mut RunState<'_>, message: Message) {
        self.trace.record_message(&message);
        state.conversation.push(message);
    }

    /// FINALIZE: one dedicated completion call plus deterministic fallbacks,
    /// so the discussion always completes with defined output.
    async fn finalize(
        &self,
        state: &RunState<'_>,
    ) -> Result<DiscussionResult, Box<dyn Error + Send + Sync>> {
        self.trace.record_event(
            "discussion_finished",
            json!({"message_count": state.conversation.len()}),
        );

        let summary_prompt = final_summary_prompt(&state.options.country, state.language());
        let summary_text = self
            .advocate
            .client()
            .complete(
                "FinalSummary",
                &summary_prompt,
                &state.conversation,
                state.documents,
            )
            .await?;
        let (recommendation, rationale) = parse_final_summary(&summary_text);

        let no_response = translate("no_response", state.language());
        let last_advocate = last_assistant_content(&state.conversation, self.advocate.name())
            .unwrap_or_else(|| no_response.clone());
        let last_adjudicator = self
            .adjudicator
            .as_ref()
            .and_then(|judge| last_assistant_content(&state.conversation, judge.name()));

        let final_recommendation = recommendation.unwrap_or_else(|| {
            fallback_recommendation(&last_advocate, last_adjudicator.as_deref(), &state.citations)
        });
        let judge_rationale =
            rationale.unwrap_or_else(|| last_adjudicator.clone().unwrap_or_else(|| last_advocate.clone()));

        let result = DiscussionResult {
            final_recommendation,
            judge_rationale,
            citations: state.citations.clone(),
            messages: state.conversation.clone(),
        };

        self.trace.record_event(
            "result",
            json!({
                "final_recommendation": result.final_recommendation,
                "judge_rationale": result.judge_rationale,
                "citations": result.citations,
            }),
        );
        log::info!("Discussion complete with {} messages", result.messages.len());
        Ok(result)
    }
}

/// Which persona a prompt augmentation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgentRole {
    Advocate,
    Adjudicator,
}

/// Append jurisdiction, language, and mode directives to a base persona
/// prompt. The literal court-mode phrases are load-bearing: provider prompts
/// and tests key off them.
pub(crate) fn augment_prompt(
    base_prompt: &str,
    country: &str,
    language: Option<&str>,
    discussion_type: DiscussionType,
    role: AgentRole,
) -> String {
    let mut prompt = base_prompt.to_string();
    prompt.push_str(&format!(
        "\n\nJurisdiction: advise strictly under the laws of {}.",
        country
    ));
    match language {
        Some(language) => prompt.push_str(&format!("\nRespond in {}.", language)),
        None => prompt.push_str("\nRespond in the same language the user writes in."),
    }

    if discussion_type == DiscussionType::Court {
        match role {
            AgentRole::Advocate => prompt.push_str(
                "\nYou represent the user's position in a court-style discussion. \
                 When a formal legal step is implied, ask the user whether you \
                 should draft the proposal/pleading for it.",
            ),
            AgentRole::Adjudicator => prompt.push_str(
                "\nYou act as a validator of the lawyer's advice. Challenge weak \
                 points and missing evidence, and end every reply with a final \
                 line reading exactly 'Decision: APPROVED' or 'Decision: REJECTED'.",
            ),
        }
    }

    prompt
}

/// System prompt for the FinalSummary completion call.
fn final_summary_prompt(country: &str, language: Option<&str>) -> String {
    let mut prompt = format!(
        "You summarize a finished legal discussion held under the laws of {}. \
         Reply with exactly two lines:\n\
         Recommendation: <one actionable recommendation for the user>\n\
         Rationale: <one sentence justifying it>",
        country
    );
    match language {
        Some(language) => prompt.push_str(&format!("\nWrite both lines in {}.", language)),
        None => prompt.push_str("\nWrite both lines in the same language the user writes in."),
    }
    prompt
}

/// Detect an embedded question: drop any trailing `User focus:` echo, then
/// take the last non-blank line containing `?`.
pub(crate) fn extract_question(content: &str) -> Option<String> {
    let scan = match content.rfind("User focus:") {
        Some(index) => &content[..index],
        None => content,
    };
    scan.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty() && line.contains('?'))
        .map(|line| line.to_string())
}

/// Parse the adjudicator's terminal `Decision:` line, case-insensitively.
fn parse_decision(content: &str) -> Option<Decision> {
    let line = content
        .lines()
        .rev()
        .map(|line| line.trim().to_lowercase())
        .find(|line| line.contains("decision:"))?;
    if line.contains("rejected") {
        Some(Decision::Rejected)
    } else if line.contains("approved") {
        Some(Decision::Approved)
    } else {
        None
    }
}

/// Parse the two labeled FinalSummary lines; missing lines stay `None` for
/// the fallback path.
fn parse_final_summary(text: &str) -> (Option<String>, Option<String>) {
    let mut recommendation = None;
    let mut rationale = None;
    for line in text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();
        if recommendation.is_none() && lower.starts_with("recommendation:") {
            recommendation = Some(trimmed["recommendation:".len()..].trim().to_string());
        } else if rationale.is_none() && lower.starts_with("rationale:") {
            rationale = Some(trimmed["rationale:".len()..].trim().to_string());
        }
    }
    (recommendation, rationale)
}

/// Deterministic recommendation used when the FinalSummary output carries no
/// `Recommendation:` line.
fn fallback_recommendation(
    last_advocate: &str,
    last_adjudicator: Option<&str>,
    citations: &[Source],
) -> String {
    let closing_point = first_line(last_adjudicator.unwrap_or(last_advocate));
    let sources_note = if citations.is_empty() {
        " No supporting documents were cited."
    } else {
        ""
    };
    format!(
        "Proceed with the user's requested position, address the open questions \
         raised during the discussion, and emphasize the strongest facts. \
         Closing point: {}{}",
        closing_point, sources_note
    )
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(text)
}

fn last_assistant_content(conversation: &[Message], agent_name: &str) -> Option<String> {
    conversation
        .iter()
        .rev()
        .find(|message| message.role == Role::Assistant && message.agent_name == agent_name)
        .map(|message| message.content.clone())
}

/// True when `answer` is one of the canonical finish tokens.
pub(crate) fn is_finish(answer: &str) -> bool {
    let normalized = answer.trim().to_lowercase();
    FINISH_TOKENS.contains(&normalized.as_str())
}

/// True when `answer` asks for adjudicator review in advice mode.
pub(crate) fn wants_judge_review(answer: &str) -> bool {
    let normalized = answer.trim().to_lowercase();
    normalized.contains("judge") || YES_TOKENS.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_question_returns_none_without_question_mark() {
        assert_eq!(extract_question("A plain statement."), None);
        assert_eq!(extract_question(""), None);
    }

    #[test]
    fn extract_question_takes_last_question_line() {
        let content = "First question?\nSome statement.\nSecond question?\nClosing remark.";
        assert_eq!(
            extract_question(content),
            Some("Second question?".to_string())
        );
    }

    #[test]
    fn extract_question_strips_user_focus_echo() {
        let content =
            "Clarifying question: What governing law applies? User focus: is this deadline final?";
        assert_eq!(
            extract_question(content),
            Some("Clarifying question: What governing law applies?".to_string())
        );
    }

    #[test]
    fn extract_question_ignores_content_after_echo() {
        let content = "No questions here. User focus: what should I do?";
        assert_eq!(extract_question(content), None);
    }

    #[test]
    fn decision_parsing_is_case_insensitive() {
        assert_eq!(
            parse_decision("Reasoning...\nDecision: APPROVED"),
            Some(Decision::Approved)
        );
        assert_eq!(
            parse_decision("reasoning...\ndecision: rejected"),
            Some(Decision::Rejected)
        );
        assert_eq!(parse_decision("Decision: PENDING"), None);
        assert_eq!(parse_decision("No verdict at all."), None);
    }

    #[test]
    fn finish_tokens_end_the_followup_loop() {
        for token in ["finish", "No", " DONE ", "exit", "quit", "stop", "nope"] {
            assert!(is_finish(token), "{} should finish", token);
        }
        assert!(!is_finish("what about appeals?"));
        assert!(!is_finish(""));
    }

    #[test]
    fn judge_review_accepts_yes_like_answers() {
        for answer in ["yes", "Y", "ok", "okay", "sure", "please", "ask the judge"] {
            assert!(wants_judge_review(answer), "{} should accept", answer);
        }
        assert!(!wants_judge_review("no"));
        assert!(!wants_judge_review("maybe later"));
    }

    #[test]
    fn court_prompt_guidance_included() {
        let lawyer_prompt = augment_prompt(
            "BASE PROMPT",
            "SK",
            Some("English"),
            DiscussionType::Court,
            AgentRole::Advocate,
        );
        let judge_prompt = augment_prompt(
            "BASE PROMPT",
            "SK",
            Some("English"),
            DiscussionType::Court,
            AgentRole::Adjudicator,
        );

        assert!(lawyer_prompt.contains("represent the user's position"));
        assert!(lawyer_prompt.contains("draft the proposal/pleading"));
        assert!(judge_prompt.contains("validator of the lawyer's advice"));
        assert!(judge_prompt.contains("Decision: APPROVED"));
        assert!(judge_prompt.contains("Decision: REJECTED"));
    }

    #[test]
    fn prompt_respects_language_override() {
        let prompt = augment_prompt(
            "BASE PROMPT",
            "SK",
            Some("English"),
            DiscussionType::Advice,
            AgentRole::Advocate,
        );
        assert!(prompt.contains("Respond in English."));
        assert!(prompt.contains("laws of SK"));

        let prompt = augment_prompt(
            "BASE PROMPT",
            "SK",
            None,
            DiscussionType::Advice,
            AgentRole::Advocate,
        );
        assert!(prompt.contains("same language the user writes in"));
        // No court guidance in advice mode.
        assert!(!prompt.contains("Decision: APPROVED"));
    }

    #[test]
    fn final_summary_parses_labeled_lines() {
        let (rec, rat) =
            parse_final_summary("Recommendation: Settle now.\nRationale: Evidence is thin.");
        assert_eq!(rec.as_deref(), Some("Settle now."));
        assert_eq!(rat.as_deref(), Some("Evidence is thin."));

        let (rec, rat) = parse_final_summary("rationale: lowercase still counts");
        assert_eq!(rec, None);
        assert_eq!(rat.as_deref(), Some("lowercase still counts"));

        let (rec, rat) = parse_final_summary("Nothing labeled here.");
        assert_eq!(rec, None);
        assert_eq!(rat, None);
    }

    #[test]
    fn fallback_recommendation_notes_missing_citations() {
        let text = fallback_recommendation("Strong case.", None, &[]);
        assert!(text.contains("No supporting documents were cited."));
        assert!(text.contains("Strong case."));

        let citations = vec![Source {
            filename: "contract.txt".to_string(),
            snippet: "late delivery".to_string(),
        }];
        let with_sources = fallback_recommendation("Strong case.", Some("Weak point remains."), &citations);
        assert!(!with_sources.contains("No supporting documents were cited."));
        assert!(with_sources.contains("Weak point remains."));
    }
}
