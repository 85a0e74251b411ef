//! `readkey`: arm the key reader for a keymap.

use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::{ShellError, ShellResult};
use crate::keymap_service::KeyMapService;
use crate::notification::Notifier;
use crate::platform::MainWindow;
use async_trait::async_trait;
use std::sync::Arc;

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "readkey",
        "keymap",
        "Grab the next key pressed and execute the command bound to it in keymap.",
    )
}

/// `readkey keymap`
pub struct ReadkeyHandler {
    keymaps: Arc<KeyMapService>,
    main_window: Arc<dyn MainWindow>,
    notifier: Arc<dyn Notifier>,
}

impl ReadkeyHandler {
    pub fn new(
        keymaps: Arc<KeyMapService>,
        main_window: Arc<dyn MainWindow>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            keymaps,
            main_window,
            notifier,
        }
    }
}

#[async_trait]
impl CommandHandler for ReadkeyHandler {
    fn command(&self) -> &str {
        "readkey"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let name = invocation.args().trim();
        if name.is_empty() {
            return Err(ShellError::invalid_argument(
                "keymap",
                "readkey must be given a keymap",
            ));
        }

        let keymap = self.keymaps.get_key_map_by_name(name)?;
        match keymap.top_key() {
            Some(top_key) => {
                self.main_window.wait_for_next_key(top_key);
                Ok(true)
            }
            None => {
                self.notifier
                    .error(&format!("readkey: keymap {} has no top key", name));
                Ok(false)
            }
        }
    }
}
