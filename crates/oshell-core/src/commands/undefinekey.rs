//! `undefinekey`: remove a sub key binding.

use super::{key_arg, usage_error};
use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::keymap_service::KeyMapService;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new("undefinekey", "keymap key", "Remove the binding for key from keymap.")
}

/// `undefinekey keymap key`
pub struct UndefinekeyHandler {
    keymaps: Arc<KeyMapService>,
}

impl UndefinekeyHandler {
    pub fn new(keymaps: Arc<KeyMapService>) -> Self {
        Self { keymaps }
    }
}

#[async_trait]
impl CommandHandler for UndefinekeyHandler {
    fn command(&self) -> &str {
        "undefinekey"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let tokens = invocation.tokens();
        if tokens.len() != 2 {
            return Err(usage_error("undefinekey", invocation.args()));
        }

        let keymap = self.keymaps.get_key_map_by_name(tokens[0])?;
        let key = key_arg("undefinekey", tokens[1])?;
        keymap.unregister_action(&key);
        Ok(true)
    }
}
