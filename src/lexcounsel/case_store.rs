//! On-disk case files: one directory per case with a `case.json` summary,
//! uploaded documents, and per-discussion markdown logs.
//!
//! Layout under the store root:
//!
//! ```text
//! CASE-<uuid>/
//!   case.json
//!   description.md
//!   documents/<YYYY-MM-DD>_<filename>
//!   discussions/<YYYY-MM-DDTHH-MM-SSZ>_<type>.md
//!   outputs/
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::lexcounsel::schema::{DiscussionResult, Message, Role};

#[derive(Debug)]
pub enum CaseStoreError {
    /// `create_case` was given an id that already has a directory.
    AlreadyExists(String),
    /// `load_case` or `append_discussion` referenced an unknown case id.
    NotFound(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CaseStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStoreError::AlreadyExists(case_id) => {
                write!(f, "Case already exists: {}", case_id)
            }
            CaseStoreError::NotFound(case_id) => write!(f, "Case not found: {}", case_id),
            CaseStoreError::Io(err) => write!(f, "Case store I/O error: {}", err),
            CaseStoreError::Json(err) => write!(f, "Case store JSON error: {}", err),
        }
    }
}

impl Error for CaseStoreError {}

impl From<std::io::Error> for CaseStoreError {
    fn from(err: std::io::Error) -> Self {
        CaseStoreError::Io(err)
    }
}

impl From<serde_json::Error> for CaseStoreError {
    fn from(err: serde_json::Error) -> Self {
        CaseStoreError::Json(err)
    }
}

/// One loaded case: its id, directory, and parsed `case.json`.
#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub case_id: String,
    pub path: PathBuf,
    pub data: Value,
}

/// Directory-backed store of cases.
pub struct CaseStore {
    root: PathBuf,
}

impl CaseStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CaseStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(CaseStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new case from an intake discussion. Pass `case_id: None` to
    /// mint a fresh `CASE-<uuid>` id.
    pub fn create_case(
        &self,
        instruction: &str,
        country: &str,
        language: Option<&str>,
        messages: &[Message],
        result: &DiscussionResult,
        agent_name: &str,
        data_dir: Option<&Path>,
        case_id: Option<&str>,
    ) -> Result<CaseRecord, CaseStoreError> {
        let created_at = Utc::now();
        let case_id = match case_id {
            Some(id) => id.to_string(),
            None => generate_case_id(),
        };
        let case_dir = self.root.join(&case_id);
        if case_dir.exists() {
            return Err(CaseStoreError::AlreadyExists(case_id));
        }

        ensure_case_dirs(&case_dir)?;
        let documents = copy_documents(data_dir, &case_dir.join("documents"), created_at, 0)?;
        let entry = DiscussionEntry::build(messages, result, agent_name, "intake", created_at);
        let data = build_case_data(
            &case_id,
            instruction,
            country,
            language,
            created_at,
            documents,
            &entry,
        );

        write_case_json(&case_dir.join("case.json"), &data)?;
        write_description(
            &case_dir.join("description.md"),
            &case_id,
            instruction,
            created_at,
        )?;
        write_discussion_log(
            &case_dir.join("discussions").join(&entry.log_filename),
            &entry,
            messages,
        )?;

        log::info!("Created case {} at {}", case_id, case_dir.display());
        Ok(CaseRecord {
            case_id,
            path: case_dir,
            data,
        })
    }

    /// Load an existing case by id.
    pub fn load_case(&self, case_id: &str) -> Result<CaseRecord, CaseStoreError> {
        let case_dir = self.root.join(case_id);
        let case_path = case_dir.join("case.json");
        if !case_path.exists() {
            return Err(CaseStoreError::NotFound(case_id.to_string()));
        }
        let raw = fs::read_to_string(&case_path)?;
        let data: Value = serde_json::from_str(&raw)?;
        Ok(CaseRecord {
            case_id: case_id.to_string(),
            path: case_dir,
            data,
        })
    }

    /// Append a follow-up discussion (and any newly uploaded documents) to an
    /// existing case. The case's open questions are replaced by the questions
    /// asked in this discussion.
    pub fn append_discussion(
        &self,
        case_id: &str,
        messages: &[Message],
        result: &DiscussionResult,
        agent_name: &str,
        data_dir: Option<&Path>,
        discussion_type: &str,
    ) -> Result<CaseRecord, CaseStoreError> {
        let mut record = self.load_case(case_id)?;
        let created_at = Utc::now();

        let existing = record
            .data
            .get("documents")
            .and_then(Value::as_array)
            .map(|docs| docs.len())
            .unwrap_or(0);
        let new_documents = copy_documents(
            data_dir,
            &record.path.join("documents"),
            created_at,
            existing,
        )?;
        if !new_documents.is_empty() {
            match record.data.get_mut("documents").and_then(Value::as_array_mut) {
                Some(docs) => docs.extend(new_documents),
                None => {
                    record.data["documents"] = Value::Array(new_documents);
                }
            }
        }

        let entry = DiscussionEntry::build(messages, result, agent_name, discussion_type, created_at);
        match record
            .data
            .get_mut("discussions")
            .and_then(Value::as_array_mut)
        {
            Some(discussions) => discussions.push(entry.to_json()),
            None => {
                record.data["discussions"] = Value::Array(vec![entry.to_json()]);
            }
        }
        record.data["open_questions"] = json!(entry.questions_asked);

        write_case_json(&record.path.join("case.json"), &record.data)?;
        write_discussion_log(
            &record.path.join("discussions").join(&entry.log_filename),
            &entry,
            messages,
        )?;
        Ok(record)
    }
}

fn generate_case_id() -> String {
    format!("CASE-{}", Uuid::new_v4())
}

fn isoformat(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn ensure_case_dirs(case_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(case_dir.join("documents"))?;
    fs::create_dir_all(case_dir.join("discussions"))?;
    fs::create_dir_all(case_dir.join("outputs"))?;
    Ok(())
}

fn build_case_data(
    case_id: &str,
    instruction: &str,
    country: &str,
    language: Option<&str>,
    created_at: DateTime<Utc>,
    documents: Vec<Value>,
    entry: &DiscussionEntry,
) -> Value {
    json!({
        "case_id": case_id,
        "created_at": isoformat(created_at),
        "status": "intake_open",
        "jurisdiction": {
            "country": country,
            "language": language.unwrap_or("user_input_language"),
        },
        "parties": {
            "client": {
                "type": "",
                "name": "",
                "contact": {"email": "", "phone": ""},
            },
            "opponent": {
                "type": "",
                "name": "",
                "ico": "",
                "address": "",
            },
        },
        "matter": {
            "category": "",
            "topic": "",
            "amount_eur": null,
            "currency": "EUR",
            "key_dates": {},
            "facts_summary": instruction,
            "client_goal": "",
        },
        "documents": documents,
        "open_questions": entry.questions_asked,
        "next_discussion": {"scheduled_for": "", "agenda": []},
        "discussions": [entry.to_json()],
    })
}

/// Copy every file from `data_dir` into `destination` with a date prefix,
/// deduplicating name clashes. `start_index` continues the `DOC-NNN`
/// numbering across appended discussions.
fn copy_documents(
    data_dir: Option<&Path>,
    destination: &Path,
    received_at: DateTime<Utc>,
    start_index: usize,
) -> Result<Vec<Value>, CaseStoreError> {
    let data_dir = match data_dir {
        Some(dir) if dir.exists() => dir,
        _ => return Ok(Vec::new()),
    };

    let mut files: Vec<PathBuf> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let date_prefix = received_at.format("%Y-%m-%d").to_string();
    let mut documents = Vec::new();
    for (offset, path) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().replace(' ', "_"))
            .unwrap_or_else(|| "upload".to_string());
        let target = dedupe_path(destination.join(format!("{}_{}", date_prefix, filename)));
        fs::copy(path, &target)?;

        let target_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(filename);
        documents.push(json!({
            "doc_id": format!("DOC-{:03}", start_index + offset + 1),
            "type": infer_doc_type(path),
            "filename": target_name,
            "path": format!("documents/{}", target_name),
            "source": "user_upload",
            "received_at": isoformat(received_at),
            "notes": "",
        }));
    }
    Ok(documents)
}

/// Append `_1`, `_2`, ... before the extension until the name is free.
fn dedupe_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut counter = 1;
    loop {
        let candidate = path.with_file_name(format!("{}_{}{}", stem, counter, suffix));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn infer_doc_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "txt" | "md" => "text",
        "pdf" => "pdf",
        "eml" | "msg" => "email",
        "png" | "jpg" | "jpeg" => "image",
        "doc" | "docx" => "document",
        _ => "file",
    }
}

/// One discussion's summary row plus the name of its markdown log.
struct DiscussionEntry {
    discussion_id: String,
    date: String,
    discussion_type: String,
    summary: String,
    questions_asked: Vec<String>,
    client_answers: Vec<String>,
    decisions: Vec<String>,
    risks: Vec<String>,
    log_filename: String,
}

impl DiscussionEntry {
    fn build(
        messages: &[Message],
        result: &DiscussionResult,
        agent_name: &str,
        discussion_type: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        let agent_content = last_agent_content(messages, agent_name);
        let questions = extract_questions(agent_content.as_deref().unwrap_or(""));
        let answers = collect_user_answers(messages);
        let mut summary = summarize(agent_content.as_deref().unwrap_or(""));
        if summary.is_empty() {
            summary = if result.final_recommendation.is_empty() {
                "Discussion captured.".to_string()
            } else {
                result.final_recommendation.clone()
            };
        }

        let decisions = if result.final_recommendation.is_empty() {
            Vec::new()
        } else {
            vec![result.final_recommendation.clone()]
        };
        let risks = if result.judge_rationale.is_empty() {
            Vec::new()
        } else {
            vec![result.judge_rationale.clone()]
        };

        DiscussionEntry {
            discussion_id: format!("DISC-{}", created_at.format("%Y-%m-%d-%H%M%S")),
            date: created_at.format("%Y-%m-%d").to_string(),
            discussion_type: discussion_type.to_string(),
            summary,
            questions_asked: questions,
            client_answers: answers,
            decisions,
            risks,
            log_filename: format!(
                "{}_{}.md",
                created_at.format("%Y-%m-%dT%H-%M-%SZ"),
                discussion_type
            ),
        }
    }

    /// The `case.json` representation; the log filename stays out of it.
    fn to_json(&self) -> Value {
        json!({
            "discussion_id": self.discussion_id,
            "date": self.date,
            "type": self.discussion_type,
            "summary": self.summary,
            "questions_asked": self.questions_asked,
            "client_answers": self.client_answers,
            "result": {
                "decisions": self.decisions,
                "risks": self.risks,
                "next_steps": [],
            },
        })
    }
}

fn last_agent_content(messages: &[Message], agent_name: &str) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|message| message.role == Role::Assistant && message.agent_name == agent_name)
        .map(|message| message.content.clone())
}

/// All user messages after the opening instruction.
fn collect_user_answers(messages: &[Message]) -> Vec<String> {
    let user_messages: Vec<&str> = messages
        .iter()
        .filter(|message| message.role == Role::User)
        .map(|message| message.content.as_str())
        .collect();
    if user_messages.len() <= 1 {
        return Vec::new();
    }
    user_messages[1..]
        .iter()
        .filter(|content| !content.is_empty())
        .map(|content| content.to_string())
        .collect()
}

fn extract_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains('?'))
        .map(|line| line.to_string())
        .collect()
}

/// First non-empty line, capped at 240 characters.
fn summarize(text: &str) -> String {
    for line in text.lines() {
        let stripped = line.trim();
        if !stripped.is_empty() {
            return stripped.chars().take(240).collect();
        }
    }
    String::new()
}

fn write_case_json(path: &Path, data: &Value) -> Result<(), CaseStoreError> {
    let rendered = serde_json::to_string_pretty(data)?;
    fs::write(path, rendered)?;
    Ok(())
}

fn write_description(
    path: &Path,
    case_id: &str,
    instruction: &str,
    created_at: DateTime<Utc>,
) -> std::io::Result<()> {
    let content = format!(
        "# Case {}\n\nCreated: {}\n\n## Instruction\n{}\n",
        case_id,
        isoformat(created_at),
        instruction
    );
    fs::write(path, content)
}

fn write_discussion_log(
    path: &Path,
    entry: &DiscussionEntry,
    messages: &[Message],
) -> std::io::Result<()> {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Discussion {}", entry.discussion_id));
    lines.push(String::new());
    lines.push(format!("Date: {}", entry.date));
    lines.push(format!("Type: {}", entry.discussion_type));
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(entry.summary.clone());
    lines.push(String::new());
    if !entry.questions_asked.is_empty() {
        lines.push("## Questions Asked".to_string());
        for question in &entry.questions_asked {
            lines.push(format!("- {}", question));
        }
        lines.push(String::new());
    }
    if !entry.client_answers.is_empty() {
        lines.push("## Client Answers".to_string());
        for answer in &entry.client_answers {
            lines.push(format!("- {}", answer));
        }
        lines.push(String::new());
    }
    lines.push("## Transcript".to_string());
    for message in messages {
        let speaker = if message.role == Role::Assistant {
            message.agent_name.as_str()
        } else {
            "User"
        };
        lines.push(format!("{}: {}", speaker, message.content));
    }
    lines.push(String::new());
    fs::write(path, lines.join("\n"))
}
