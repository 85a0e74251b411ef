//! Hot-key state machine: top key, then one sub key.

use crate::error::KeymapError;
use crate::keymap_service::KeyMapService;
use crate::notification::Notifier;
use crate::platform::MainWindow;
use crossterm::event::{KeyCode, KeyModifiers};
use oshell_keybinds::KeyBinding;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

/// Reader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Keys pass through unless they are a top key.
    Idle,
    /// A top key was pressed; the next key is looked up in its keymap.
    AwaitingSubKey {
        top_key: KeyBinding,
        since: Instant,
    },
}

/// What [`KeyReader::on_key`] did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A top key was pressed; now awaiting a sub key.
    Activated(KeyBinding),
    /// The bound action was spawned.
    Dispatched { keymap: String, key: KeyBinding },
    /// Escape while awaiting a sub key.
    Cancelled,
    /// The sub key came after the timeout and is not a top key.
    TimedOut,
    /// The active keymap has no action for this key.
    Unbound(KeyBinding),
    /// The top key no longer maps to a keymap.
    NoKeyMap(KeyBinding),
    /// Not a key the shell handles.
    PassThrough,
}

/// Turns key presses into keymap actions.
///
/// Actions are spawned on the runtime and never awaited here, so a slow
/// action cannot stall key handling.
pub struct KeyReader {
    keymaps: Arc<KeyMapService>,
    notifier: Arc<dyn Notifier>,
    runtime: Handle,
    timeout: Option<Duration>,
    state: Mutex<ReaderState>,
}

impl KeyReader {
    /// Create an idle reader with no timeout.
    pub fn new(keymaps: Arc<KeyMapService>, notifier: Arc<dyn Notifier>, runtime: Handle) -> Self {
        Self {
            keymaps,
            notifier,
            runtime,
            timeout: None,
            state: Mutex::new(ReaderState::Idle),
        }
    }

    /// Give up on a sub key after `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> ReaderState {
        *self.state.lock()
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state(), ReaderState::AwaitingSubKey { .. })
    }

    /// Platform callback: the hot key `top_key` fired.
    pub fn on_hot_key(&self, top_key: KeyBinding) {
        debug!(key = %top_key, "awaiting sub key");
        *self.state.lock() = ReaderState::AwaitingSubKey {
            top_key,
            since: Instant::now(),
        };
    }

    /// Leave sub-key mode.
    pub fn cancel(&self) {
        *self.state.lock() = ReaderState::Idle;
    }

    /// Time left before the pending sub key times out.
    pub fn remaining_timeout(&self) -> Option<Duration> {
        match (self.state(), self.timeout) {
            (ReaderState::AwaitingSubKey { since, .. }, Some(timeout)) => {
                Some(timeout.saturating_sub(since.elapsed()))
            }
            _ => None,
        }
    }

    /// Handle one key press.
    pub fn on_key(&self, key: KeyBinding) -> KeyOutcome {
        let previous = std::mem::replace(&mut *self.state.lock(), ReaderState::Idle);

        let top_key = match previous {
            ReaderState::Idle => {
                if self.keymaps.is_top_key(&key) {
                    self.on_hot_key(key);
                    return KeyOutcome::Activated(key);
                }
                return KeyOutcome::PassThrough;
            }
            ReaderState::AwaitingSubKey { top_key, since } => {
                if self.timeout.is_some_and(|timeout| since.elapsed() > timeout) {
                    debug!(key = %top_key, "sub key timed out");
                    // A late key that is itself a top key starts a new sequence.
                    if self.keymaps.is_top_key(&key) {
                        self.on_hot_key(key);
                        return KeyOutcome::Activated(key);
                    }
                    return KeyOutcome::TimedOut;
                }
                top_key
            }
        };

        if key.key == KeyCode::Esc && key.modifiers == KeyModifiers::NONE {
            return KeyOutcome::Cancelled;
        }

        let keymap = match self.keymaps.get_key_map_by_top_key(&top_key) {
            Ok(keymap) => keymap,
            Err(e) => {
                warn!(key = %top_key, error = %e, "no keymap for top key");
                return KeyOutcome::NoKeyMap(top_key);
            }
        };

        if !keymap.is_bound(&key) {
            let err = KeymapError::KeyNotBound {
                top_key: Some(top_key),
                key,
            };
            self.notifier.error(&err.to_string());
            return KeyOutcome::Unbound(key);
        }

        let name = keymap.name().to_string();
        let notifier = Arc::clone(&self.notifier);
        debug!(keymap = %name, key = %key, "dispatching key action");
        self.runtime.spawn(async move {
            match keymap.execute(key, String::new()).await {
                Ok(true) => {}
                Ok(false) => warn!(keymap = %keymap.name(), key = %key, "key action returned false"),
                Err(e) => {
                    error!(keymap = %keymap.name(), key = %key, error = %e, "key action failed");
                    notifier.error(&e.to_string());
                }
            }
        });

        KeyOutcome::Dispatched { keymap: name, key }
    }
}

impl MainWindow for KeyReader {
    fn wait_for_next_key(&self, top_key: KeyBinding) {
        self.on_hot_key(top_key);
    }
}
