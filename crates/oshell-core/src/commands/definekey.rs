//! `definekey`: bind a sub key to a command line.

use super::{key_arg, usage_error};
use crate::command::{CommandHandler, CommandRunner, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::keymap::action;
use crate::keymap_service::KeyMapService;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "definekey",
        "keymap key command",
        "Add a new key binding in keymap for key to execute command. The default keymap \
         is top, bound to C-t.\n\nNote that ':' is written 'colon', '!' is written \
         'exclam' and so on.",
    )
}

/// `definekey keymap key command...`
pub struct DefinekeyHandler {
    keymaps: Arc<KeyMapService>,
    runner: CommandRunner,
}

impl DefinekeyHandler {
    pub fn new(keymaps: Arc<KeyMapService>, runner: CommandRunner) -> Self {
        Self { keymaps, runner }
    }
}

#[async_trait]
impl CommandHandler for DefinekeyHandler {
    fn command(&self) -> &str {
        "definekey"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let tokens = invocation.tokens();
        if tokens.len() < 3 {
            return Err(usage_error("definekey", invocation.args()));
        }

        let keymap = self.keymaps.get_key_map_by_name(tokens[0])?;
        let key = key_arg("definekey", tokens[1])?;
        let command = tokens[2..].join(" ");

        let runner = self.runner.clone();
        keymap.register_action(
            key,
            action(move |_args| {
                let runner = runner.clone();
                let command = command.clone();
                async move { runner.run(&command).await }
            }),
        )?;
        Ok(true)
    }
}
