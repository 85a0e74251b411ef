//! Shell error types.

use oshell_keybinds::{KeyBinding, ParseError};
use thiserror::Error;

/// Errors raised by [`KeyMap`](crate::KeyMap) and [`KeyMapService`](crate::KeyMapService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    /// A required parameter was empty or the "no key" sentinel.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No keymap with this name.
    #[error("Keymap not found: {0}")]
    KeyNotFound(String),

    /// No keymap bound to this top key.
    #[error("No keymap bound to top key {0:#}")]
    TopKeyNotFound(KeyBinding),

    /// The keymap has no action for this sub key.
    #[error("Key {key:#} is not bound{}", top_key_suffix(.top_key))]
    KeyNotBound {
        /// Top key of the keymap that was searched.
        top_key: Option<KeyBinding>,
        /// The sub key that was pressed.
        key: KeyBinding,
    },

    /// The sub key already has an action.
    #[error("Key {0:#} is already bound")]
    DuplicateKeyBinding(KeyBinding),

    /// A keymap with this name already exists.
    #[error("Keymap already exists: {0}")]
    DuplicateKeyMap(String),

    /// The top key is already in use, or the keymap already has one.
    #[error("Top key {0:#} is already bound")]
    DuplicateTopKey(KeyBinding),

    /// The platform refused to (un)register a hot key.
    #[error("Failed to {operation} hot key {key:#} (id {id})")]
    PlatformBinding {
        /// `"register"` or `"unregister"`.
        operation: &'static str,
        /// Key that was being (un)registered.
        key: KeyBinding,
        /// Hot-key id handed to the platform.
        id: u32,
    },

    /// The service has not been started yet.
    #[error("Keymap service not started")]
    ServiceNotStarted,

    /// The service has been stopped.
    #[error("Keymap service stopped")]
    ServiceStopped,
}

fn top_key_suffix(top_key: &Option<KeyBinding>) -> String {
    match top_key {
        Some(top) => format!(" in keymap {:#}", top),
        None => String::new(),
    }
}

impl KeymapError {
    /// Whether this is a "lookup found nothing" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_) | Self::TopKeyNotFound(_))
    }

    /// Whether this is a collision with an existing entry.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKeyBinding(_) | Self::DuplicateKeyMap(_) | Self::DuplicateTopKey(_)
        )
    }
}

/// Errors that can occur in the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A required parameter was missing or malformed.
    #[error("Invalid argument `{param}`: {reason}")]
    InvalidArgument {
        /// Parameter name.
        param: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The command line names an unregistered command.
    #[error("Invalid command: {input}")]
    InvalidCommand {
        /// The original, untrimmed command line.
        input: String,
    },

    /// Registry wiring error: a command has no handler, or more than one.
    #[error("Handler resolution failed for `{command}`: {reason}")]
    HandlerResolution {
        /// Command name.
        command: String,
        /// What was wrong with the wiring.
        reason: String,
    },

    /// Two commands registered under the same name.
    #[error("Duplicate command: {0}")]
    DuplicateCommand(String),

    /// Keymap error.
    #[error(transparent)]
    Keymap(#[from] KeymapError),

    /// Key notation error.
    #[error("Key error: {0}")]
    KeyParse(#[from] ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The command service has not been started yet.
    #[error("Command service not started")]
    ServiceNotStarted,

    /// The command service has been stopped.
    #[error("Command service stopped")]
    ServiceStopped,

    /// A spawned handler panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

impl ShellError {
    /// Shorthand for [`ShellError::InvalidArgument`].
    pub fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ShellError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ShellError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;
