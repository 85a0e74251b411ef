//! `newkmap`: create an empty keymap.

use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::keymap_service::KeyMapService;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "newkmap",
        "keymap",
        "Generate a new, empty keymap named keymap. Bind keys in it with definekey and \
         give it a top key with topkmap.",
    )
}

/// `newkmap keymap`
pub struct NewKMapHandler {
    keymaps: Arc<KeyMapService>,
}

impl NewKMapHandler {
    pub fn new(keymaps: Arc<KeyMapService>) -> Self {
        Self { keymaps }
    }
}

#[async_trait]
impl CommandHandler for NewKMapHandler {
    fn command(&self) -> &str {
        "newkmap"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let name = invocation.args().trim();
        if name.is_empty() {
            return Ok(false);
        }

        self.keymaps.add_key_map(name)?;
        Ok(true)
    }
}
