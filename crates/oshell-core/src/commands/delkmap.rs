//! `delkmap`: delete a keymap and release its top key.

use super::set::{Variables, TOP_KEYMAP_VARIABLE};
use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::keymap_service::KeyMapService;
use crate::notification::Notifier;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "delkmap",
        "keymap",
        "Delete the keymap named keymap, that was generated with newkmap. The top keymap \
         (top, or whatever was specified by set topkmap) cannot be deleted.",
    )
}

/// `delkmap keymap`
pub struct DelKMapHandler {
    keymaps: Arc<KeyMapService>,
    variables: Arc<Variables>,
    notifier: Arc<dyn Notifier>,
}

impl DelKMapHandler {
    pub fn new(
        keymaps: Arc<KeyMapService>,
        variables: Arc<Variables>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            keymaps,
            variables,
            notifier,
        }
    }
}

#[async_trait]
impl CommandHandler for DelKMapHandler {
    fn command(&self) -> &str {
        "delkmap"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let name = invocation.args().trim();
        if name.is_empty() {
            return Ok(false);
        }

        if self.variables.get(TOP_KEYMAP_VARIABLE).as_deref() == Some(name) {
            self.notifier
                .error(&format!("delkmap: cannot delete the top keymap {}", name));
            return Ok(false);
        }

        self.keymaps.remove_key_map(name)?;
        Ok(true)
    }
}
