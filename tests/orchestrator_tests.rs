//! End-to-end discussion flows driven through scripted completion backends
//! and scripted user-response providers.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use lexcounsel::agent::{create_judge, create_lawyer};
use lexcounsel::clients::mock::MockCompletionClient;
use lexcounsel::completion::{CompletionClient, CompletionError};
use lexcounsel::orchestrator::{DiscussionError, DiscussionOptions, Orchestrator};
use lexcounsel::schema::{DiscussionType, Document, Message, Role};
use lexcounsel::trace::TraceRecorder;
use lexcounsel::user_response::{SilentResponder, UserResponseProvider};

/// Completion backend replaying queued responses per agent name and
/// recording the order of calls.
struct ScriptedClient {
    responses: Mutex<HashMap<String, VecDeque<String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new() -> Self {
        ScriptedClient {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, agent_name: &str, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(agent_name.to_string())
            .or_insert_with(VecDeque::new)
            .push_back(response.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        agent_name: &str,
        _system_prompt: &str,
        _conversation: &[Message],
        _documents: &[Document],
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(agent_name.to_string());
        let mut responses = self.responses.lock().unwrap();
        if let Some(queue) = responses.get_mut(agent_name) {
            if let Some(next) = queue.pop_front() {
                return Ok(next);
            }
        }
        Ok(format!("Scripted reply for {}.", agent_name))
    }
}

/// Provider replaying a fixed answer script; `None` entries simulate a user
/// who does not answer in time.
struct ScriptedResponder {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedResponder {
    fn new(answers: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(ScriptedResponder {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .map(|answer| answer.map(|a| a.to_string()))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserResponseProvider for ScriptedResponder {
    async fn ask(&self, prompt: &str, _timeout_secs: f64) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

struct Fixture {
    _run_dir: tempfile::TempDir,
    trace: Arc<TraceRecorder>,
}

impl Fixture {
    fn new() -> Self {
        let run_dir = tempfile::tempdir().unwrap();
        let trace = Arc::new(TraceRecorder::new(run_dir.path()).unwrap());
        Fixture {
            _run_dir: run_dir,
            trace,
        }
    }

    fn trace_lines(&self) -> Vec<serde_json::Value> {
        self.trace.close();
        std::fs::read_to_string(self.trace.path())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

fn sample_documents() -> Vec<Document> {
    vec![Document {
        doc_id: "doc-1".to_string(),
        path: "/data/contract.txt".to_string(),
        content: "The supplier must deliver within 14 days. Late delivery incurs penalties."
            .to_string(),
    }]
}

fn options(discussion_type: DiscussionType) -> DiscussionOptions {
    let mut options = DiscussionOptions::new("SK");
    options.language = Some("English".to_string());
    options.discussion_type = discussion_type;
    options
}

#[tokio::test]
async fn advice_run_routes_judge_question_and_records_timeout() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client)),
        fixture.trace.clone(),
    );

    // "yes" to judge review, then silence for the judge's clarifying question
    // and for the follow-up prompt.
    let responder = ScriptedResponder::new(vec![Some("yes"), None, None]);
    let provider: Arc<dyn UserResponseProvider> = responder.clone();

    let result = orchestrator
        .run(
            "My supplier delivered late. What can I claim?",
            &sample_documents(),
            &options(DiscussionType::Advice),
            Some(provider),
        )
        .await
        .unwrap();

    // user, lawyer, judge, timeout placeholder.
    assert_eq!(result.messages.len(), 4);
    assert_eq!(result.messages[0].role, Role::User);
    assert_eq!(result.messages[1].agent_name, "Lawyer");
    assert_eq!(result.messages[2].agent_name, "Judge");
    assert_eq!(result.messages[3].role, Role::User);
    assert_eq!(
        result.messages[3].content,
        "The user could not answer within 1 minutes."
    );

    // The judge-review answer itself never enters the conversation.
    assert!(result.messages.iter().all(|m| m.content != "yes"));

    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].filename, "contract.txt");
    assert_eq!(result.messages[1].sources, result.citations);

    // Mock FinalSummary output is labeled, so it parses directly.
    assert_eq!(
        result.final_recommendation,
        "Proceed with the user's requested position."
    );
    assert_eq!(
        result.judge_rationale,
        "The discussion supports the user's arguments based on the provided facts."
    );

    let lines = fixture.trace_lines();
    assert_eq!(lines[0]["type"], "case_context");
    assert_eq!(lines[0]["country"], "SK");
    assert!(lines.iter().any(|line| line["type"] == "user_timeout"));
    assert!(lines
        .iter()
        .any(|line| line["type"] == "user_followup_timeout"));
    assert!(lines.iter().any(|line| line["type"] == "result"));
    assert!(!lines.iter().any(|line| line["type"] == "discussion_timeout"));
}

#[tokio::test]
async fn silent_court_run_yields_four_messages_and_a_result() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client)),
        fixture.trace.clone(),
    );

    let result = orchestrator
        .run(
            "Late delivery dispute",
            &sample_documents(),
            &options(DiscussionType::Court),
            Some(Arc::new(SilentResponder)),
        )
        .await
        .unwrap();

    // user, advocate, adjudicator, one timeout placeholder.
    assert_eq!(result.messages.len(), 4);
    assert_eq!(result.messages[1].agent_name, "Lawyer");
    assert_eq!(result.messages[2].agent_name, "Judge");
    assert_eq!(result.messages[3].role, Role::User);
    assert!(result.messages[3].content.contains("could not answer"));
    assert!(!result.final_recommendation.is_empty());
    assert!(!result.judge_rationale.is_empty());
}

#[tokio::test]
async fn followup_answers_extend_the_discussion_until_finish() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(create_lawyer(client), None, fixture.trace.clone());

    let responder = ScriptedResponder::new(vec![
        Some("What about damages?"),
        Some("And statutory interest?"),
        Some("finish"),
    ]);
    let provider: Arc<dyn UserResponseProvider> = responder.clone();

    let result = orchestrator
        .run(
            "My supplier delivered late.",
            &[],
            &options(DiscussionType::Advice),
            Some(provider),
        )
        .await
        .unwrap();

    // user, lawyer, answer, lawyer, answer, lawyer, finish.
    assert_eq!(result.messages.len(), 7);
    assert_eq!(result.messages[2].content, "What about damages?");
    assert_eq!(result.messages[4].content, "And statutory interest?");
    assert_eq!(result.messages[6].content, "finish");
    assert_eq!(
        result
            .messages
            .iter()
            .filter(|m| m.agent_name == "Lawyer")
            .count(),
        3
    );

    let prompts = responder.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts
        .iter()
        .all(|prompt| prompt.contains("Type 'finish' to end the discussion.")));
}

#[tokio::test]
async fn court_mode_reuses_answered_question_as_followup() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client)),
        fixture.trace.clone(),
    );

    // One answer for the judge's clarifying question; "finish" both answers
    // the question and ends the run without a separate follow-up prompt.
    let responder = ScriptedResponder::new(vec![Some("finish")]);
    let provider: Arc<dyn UserResponseProvider> = responder.clone();

    let result = orchestrator
        .run(
            "Draft a claim for late delivery.",
            &[],
            &options(DiscussionType::Court),
            Some(provider),
        )
        .await
        .unwrap();

    // user, lawyer, judge, finish answer.
    assert_eq!(result.messages.len(), 4);
    assert_eq!(result.messages[3].content, "finish");
    assert_eq!(responder.prompts().len(), 1);
}

#[tokio::test]
async fn court_mode_retries_advocate_until_approved() {
    let fixture = Fixture::new();
    let client = Arc::new(ScriptedClient::new());
    client.push("Lawyer", "Draft claim, first attempt.");
    client.push("Judge", "The damages theory is unsupported.\nDecision: REJECTED");
    client.push("Lawyer", "Draft claim, revised with penalty clause evidence.");
    client.push("Judge", "The revision addresses the gap.\nDecision: APPROVED");
    client.push(
        "FinalSummary",
        "Recommendation: File the revised claim.\nRationale: The penalty clause covers the delay.",
    );

    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client.clone())),
        fixture.trace.clone(),
    );

    let result = orchestrator
        .run(
            "Sue my supplier for late delivery.",
            &[],
            &options(DiscussionType::Court),
            Some(Arc::new(SilentResponder)),
        )
        .await
        .unwrap();

    assert_eq!(
        client.calls(),
        vec!["Lawyer", "Judge", "Lawyer", "Judge", "FinalSummary"]
    );
    assert_eq!(result.final_recommendation, "File the revised claim.");
    assert_eq!(
        result.judge_rationale,
        "The penalty clause covers the delay."
    );

    let lines = fixture.trace_lines();
    let decisions: Vec<_> = lines
        .iter()
        .filter(|line| line["type"] == "judge_decision")
        .map(|line| line["decision"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(decisions, vec!["rejected", "approved"]);
}

#[tokio::test]
async fn declining_judge_review_skips_the_adjudicator() {
    let fixture = Fixture::new();
    let client = Arc::new(ScriptedClient::new());
    client.push("Lawyer", "You can claim the contractual penalty.");

    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client.clone())),
        fixture.trace.clone(),
    );

    let responder = ScriptedResponder::new(vec![Some("no"), Some("finish")]);
    let provider: Arc<dyn UserResponseProvider> = responder.clone();

    let result = orchestrator
        .run(
            "What can I claim for late delivery?",
            &[],
            &options(DiscussionType::Advice),
            Some(provider),
        )
        .await
        .unwrap();

    assert!(client.calls().iter().all(|name| name != "Judge"));
    // user, lawyer, finish. The review answer "no" is not part of the log.
    assert_eq!(result.messages.len(), 3);
    assert_eq!(result.messages[2].content, "finish");

    let prompts = responder.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("judge"));
}

#[tokio::test]
async fn unlabeled_summary_falls_back_to_deterministic_synthesis() {
    let fixture = Fixture::new();
    let client = Arc::new(ScriptedClient::new());
    client.push("Lawyer", "Claim the penalty under clause 7.");
    client.push("FinalSummary", "I cannot comply with that format.");

    let orchestrator = Orchestrator::new(create_lawyer(client.clone()), None, fixture.trace.clone());

    let result = orchestrator
        .run(
            "What can I claim?",
            &[],
            &options(DiscussionType::Advice),
            Some(Arc::new(SilentResponder)),
        )
        .await
        .unwrap();

    assert!(result
        .final_recommendation
        .contains("Claim the penalty under clause 7."));
    assert!(result
        .final_recommendation
        .contains("No supporting documents were cited."));
    assert_eq!(result.judge_rationale, "Claim the penalty under clause 7.");
}

#[tokio::test]
async fn blank_country_is_rejected_after_the_context_is_traced() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(create_lawyer(client), None, fixture.trace.clone());

    let mut opts = options(DiscussionType::Advice);
    opts.country = "   ".to_string();

    let err = orchestrator
        .run("Anything", &[], &opts, None)
        .await
        .unwrap_err();
    let discussion_err = err.downcast_ref::<DiscussionError>().unwrap();
    assert_eq!(*discussion_err, DiscussionError::MissingCountry);

    // The case context still made it to the trace before validation failed.
    let lines = fixture.trace_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], "case_context");
}

#[tokio::test]
async fn nonpositive_question_timeout_is_rejected() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(create_lawyer(client), None, fixture.trace);

    let mut opts = options(DiscussionType::Advice);
    opts.question_timeout_secs = 0.0;

    let err = orchestrator
        .run("Anything", &[], &opts, None)
        .await
        .unwrap_err();
    assert_eq!(
        *err.downcast_ref::<DiscussionError>().unwrap(),
        DiscussionError::InvalidQuestionTimeout
    );
}

#[tokio::test]
async fn court_mode_requires_an_adjudicator() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(create_lawyer(client), None, fixture.trace);

    let err = orchestrator
        .run("Anything", &[], &options(DiscussionType::Court), None)
        .await
        .unwrap_err();
    assert_eq!(
        *err.downcast_ref::<DiscussionError>().unwrap(),
        DiscussionError::MissingAdjudicator
    );
}

/// Completion backend that burns virtual time on the advocate turn, so a
/// paused-clock test can exhaust the discussion budget deterministically.
struct SlowAdvocateClient {
    delay: std::time::Duration,
    calls: Mutex<Vec<String>>,
}

impl SlowAdvocateClient {
    fn new(delay: std::time::Duration) -> Self {
        SlowAdvocateClient {
            delay,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for SlowAdvocateClient {
    async fn complete(
        &self,
        agent_name: &str,
        _system_prompt: &str,
        _conversation: &[Message],
        _documents: &[Document],
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(agent_name.to_string());
        if agent_name == "Lawyer" {
            tokio::time::sleep(self.delay).await;
            return Ok("Do you have the signed contract?".to_string());
        }
        Ok("Recommendation: Wait for the documents.\nRationale: The record is incomplete."
            .to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_skips_prompts_and_finalizes() {
    let fixture = Fixture::new();
    // One minute of budget; the advocate turn takes 61 seconds.
    let client = Arc::new(SlowAdvocateClient::new(std::time::Duration::from_secs(61)));
    let orchestrator = Orchestrator::new(create_lawyer(client.clone()), None, fixture.trace.clone());

    let responder = ScriptedResponder::new(vec![Some("should never be consumed")]);
    let provider: Arc<dyn UserResponseProvider> = responder.clone();

    let mut opts = options(DiscussionType::Advice);
    opts.max_discussion_minutes = 1;

    let result = orchestrator
        .run("Late delivery dispute", &[], &opts, Some(provider))
        .await
        .unwrap();

    // The advocate's question is dropped: no prompt was issued and no
    // timeout placeholder was appended after exhaustion.
    assert!(responder.prompts().is_empty());
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[1].agent_name, "Lawyer");

    // No further agent turns, straight to the final summary.
    assert_eq!(client.calls(), vec!["Lawyer", "FinalSummary"]);
    assert!(!result.final_recommendation.is_empty());

    let lines = fixture.trace_lines();
    let timeouts = lines
        .iter()
        .filter(|line| line["type"] == "discussion_timeout")
        .count();
    assert_eq!(timeouts, 1);
    assert!(lines
        .iter()
        .any(|line| line["type"] == "discussion_finished"));
    assert!(!lines.iter().any(|line| line["type"] == "user_timeout"));
    assert!(!lines
        .iter()
        .any(|line| line["type"] == "user_followup_timeout"));
}

#[tokio::test]
async fn unattended_run_completes_without_a_provider() {
    let fixture = Fixture::new();
    let client = Arc::new(MockCompletionClient::new());
    let orchestrator = Orchestrator::new(
        create_lawyer(client.clone()),
        Some(create_judge(client)),
        fixture.trace.clone(),
    );

    // No provider at all: every prompt resolves to "no answer" and the run
    // still terminates with a synthesized result.
    let result = orchestrator
        .run(
            "My supplier delivered late.",
            &sample_documents(),
            &options(DiscussionType::Advice),
            None,
        )
        .await
        .unwrap();

    assert!(!result.final_recommendation.is_empty());
    assert!(!result.judge_rationale.is_empty());
    // Only the opening instruction and the advocate turn.
    assert_eq!(result.messages.len(), 2);

    let lines = fixture.trace_lines();
    assert!(lines
        .iter()
        .any(|line| line["type"] == "discussion_finished"));
}
