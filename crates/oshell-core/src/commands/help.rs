//! `help`: command listing and usage.

use crate::command::{CommandHandler, CommandRunner, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::notification::Notifier;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "help",
        "[command]",
        "Show the usage and help text of command, or list every command.",
    )
}

/// `help [command]`
pub struct HelpHandler {
    runner: CommandRunner,
    notifier: Arc<dyn Notifier>,
}

impl HelpHandler {
    pub fn new(runner: CommandRunner, notifier: Arc<dyn Notifier>) -> Self {
        Self { runner, notifier }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn command(&self) -> &str {
        "help"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let registry = self.runner.registry()?;
        let topic = invocation.args().trim();

        if topic.is_empty() {
            self.notifier.info(&registry.names().join(" "));
            return Ok(true);
        }

        match registry.get(topic) {
            Some(entry) => {
                self.notifier
                    .info(&format!("{}\r\n{}", entry.spec.synopsis(), entry.spec.help));
                Ok(true)
            }
            None => {
                self.notifier.error(&format!("help: unknown command {}", topic));
                Ok(false)
            }
        }
    }
}
