//! Time-boxed user input, abstracted behind one provider contract.
//!
//! The orchestrator only ever sees [`UserResponseProvider::ask`]: the call
//! either returns an answer before `timeout_secs` elapses, or returns `None`
//! at (or after) the deadline. It must never block past the timeout. How the
//! answer is obtained (a blocking stdin read on a helper thread, a UI channel,
//! a scripted test double) stays inside the implementation.

use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// External capability that asks the human a question and waits, bounded.
#[async_trait]
pub trait UserResponseProvider: Send + Sync {
    /// Ask `prompt` and wait at most `timeout_secs` (clamped to >= 0) for an
    /// answer. `None` means the user did not answer in time.
    async fn ask(&self, prompt: &str, timeout_secs: f64) -> Option<String>;
}

/// Provider that never answers; useful for unattended runs.
pub struct SilentResponder;

#[async_trait]
impl UserResponseProvider for SilentResponder {
    async fn ask(&self, _prompt: &str, _timeout_secs: f64) -> Option<String> {
        None
    }
}

/// Interactive provider reading one line from stdin.
///
/// The blocking read runs on a dedicated blocking task joined with a tokio
/// timeout. A timed-out reader task is abandoned: its eventual line (if any)
/// is discarded, never attributed to a later prompt.
pub struct StdinResponder;

#[async_trait]
impl UserResponseProvider for StdinResponder {
    async fn ask(&self, prompt: &str, timeout_secs: f64) -> Option<String> {
        let timeout = Duration::from_secs_f64(timeout_secs.max(0.0));

        println!("{}", prompt);
        let _ = io::stdout().flush();

        let read_line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()),
                Err(_) => None,
            }
        });

        match tokio::time::timeout(timeout, read_line).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(join_err)) => {
                log::warn!("stdin reader task failed: {}", join_err);
                None
            }
            Err(_elapsed) => None,
        }
    }
}
