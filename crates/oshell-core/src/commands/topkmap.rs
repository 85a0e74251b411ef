//! `topkmap`: give a keymap its global top key.

use super::{key_arg, usage_error};
use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::keymap_service::KeyMapService;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "topkmap",
        "keymap key",
        "Register key as the global hot key that activates keymap. A keymap has at most \
         one top key.",
    )
}

/// `topkmap keymap key`
pub struct TopKMapHandler {
    keymaps: Arc<KeyMapService>,
}

impl TopKMapHandler {
    pub fn new(keymaps: Arc<KeyMapService>) -> Self {
        Self { keymaps }
    }
}

#[async_trait]
impl CommandHandler for TopKMapHandler {
    fn command(&self) -> &str {
        "topkmap"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let tokens = invocation.tokens();
        if tokens.len() != 2 {
            return Err(usage_error("topkmap", invocation.args()));
        }

        let key = key_arg("topkmap", tokens[1])?;
        self.keymaps.set_top_key(tokens[0], key)?;
        Ok(true)
    }
}
