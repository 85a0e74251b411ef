//! `source`: run a script file.

use crate::command::{CommandHandler, CommandRunner, CommandSpec, Invocation};
use crate::error::{ShellError, ShellResult};
use crate::notification::Notifier;
use crate::script::{run_script, ScriptOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "source",
        "file",
        "Read file and execute each line as a command. Blank lines and lines starting \
         with # are ignored. Stops at the first command that fails.",
    )
}

/// `source file`
pub struct SourceHandler {
    runner: CommandRunner,
    notifier: Arc<dyn Notifier>,
    error_message: Mutex<String>,
}

impl SourceHandler {
    pub fn new(runner: CommandRunner, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            runner,
            notifier,
            error_message: Mutex::new(String::new()),
        }
    }

    /// Failure message of the last run, empty if it succeeded.
    pub fn error_message(&self) -> String {
        self.error_message.lock().clone()
    }
}

#[async_trait]
impl CommandHandler for SourceHandler {
    fn command(&self) -> &str {
        "source"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let path = invocation.args().trim();
        if path.is_empty() {
            return Err(ShellError::invalid_argument("file", "source must be given a file"));
        }

        let outcome = run_script(&self.runner, path).await?;
        match &outcome {
            ScriptOutcome::Completed { executed } => {
                tracing::debug!(path, executed, "script completed");
                self.error_message.lock().clear();
                Ok(true)
            }
            ScriptOutcome::Failed { .. } => {
                let message = outcome.to_string();
                self.notifier.error(&message);
                *self.error_message.lock() = message;
                Ok(false)
            }
        }
    }
}
