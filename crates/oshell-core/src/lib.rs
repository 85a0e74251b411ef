//! Command dispatch and keymap execution core for the OShell window-manager shell.
//!
//! This crate provides the ratpoison-style control layer: a text command
//! interpreter, hierarchical keymaps reached through global top keys, and
//! the script (`source`) runner that ties them together.
//!
//! # Features
//!
//! - **Command Service**: parses `name args...` lines and dispatches to a
//!   handler validated at registry build time
//! - **KeyMaps**: named sub-key tables with asynchronous actions
//! - **KeyMap Service**: name and top-key indices kept consistent with the
//!   platform's hot-key registrations
//! - **Scripts**: rc files replayed line by line, stopping at the first failure
//! - **Key Reader**: top key → sub key state machine with timeout

pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod keymap;
pub mod keymap_service;
pub mod notification;
pub mod platform;
pub mod reader;
pub mod script;

// Re-exports from shared crates
pub use oshell_keybinds;

// Re-exports
pub use command::{
    CommandHandler, CommandRegistry, CommandRegistryBuilder, CommandRunner, CommandService,
    CommandSpec, Invocation,
};
pub use commands::{CommandContext, SourceHandler, Variables};
pub use config::{LogConfig, ShellConfig};
pub use error::{KeymapError, ShellError, ShellResult};
pub use keymap::{action, Action, HotKeyId, KeyMap};
pub use keymap_service::{KeyMapService, ServiceState};
pub use notification::{
    Notification, NotificationConfig, NotificationLevel, NotificationQueue, Notifier,
    QueueNotifier, TracingNotifier,
};
pub use platform::{HeadlessPlatform, MainWindow, PlatformFacade};
pub use reader::{KeyOutcome, KeyReader, ReaderState};
pub use script::{run_script, ScriptOutcome};

use oshell_keybinds::parse_key;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// The wired-up shell: services, built-in commands and key reader.
pub struct Shell {
    config: ShellConfig,
    keymaps: Arc<KeyMapService>,
    commands: Arc<CommandService>,
    reader: Arc<KeyReader>,
    source: Arc<SourceHandler>,
    variables: Arc<Variables>,
}

impl Shell {
    /// Start both services, register the built-in commands and bind the top
    /// keymap named in `config`.
    ///
    /// The `topkmap` variable always equals `config.top_keymap`; a different
    /// value under `config.variables` is a [`ShellError::Config`].
    ///
    /// Key actions are spawned on `runtime`.
    pub fn new(
        config: ShellConfig,
        platform: Arc<dyn PlatformFacade>,
        notifier: Arc<dyn Notifier>,
        runtime: Handle,
    ) -> ShellResult<Self> {
        if let Some(value) = config.variables.get(commands::TOP_KEYMAP_VARIABLE) {
            if *value != config.top_keymap {
                return Err(ShellError::Config(format!(
                    "variables.{} = {:?} conflicts with top_keymap = {:?}",
                    commands::TOP_KEYMAP_VARIABLE,
                    value,
                    config.top_keymap
                )));
            }
        }

        let keymaps = Arc::new(KeyMapService::new(platform));
        keymaps.start()?;

        let reader = Arc::new(
            KeyReader::new(Arc::clone(&keymaps), Arc::clone(&notifier), runtime)
                .with_timeout(config.sub_key_timeout()),
        );

        let variables = Arc::new(Variables::with_overrides(config.variables.clone()));
        variables.set(commands::TOP_KEYMAP_VARIABLE, config.top_keymap.clone());

        let command_service = Arc::new(CommandService::new());
        let ctx = CommandContext {
            runner: command_service.runner(),
            keymaps: Arc::clone(&keymaps),
            notifier,
            main_window: reader.clone(),
            variables: Arc::clone(&variables),
        };
        let (builder, source) = commands::register_defaults(CommandRegistry::builder(), &ctx);
        command_service.start(builder.build()?)?;

        keymaps.add_key_map(&config.top_keymap)?;
        keymaps.set_top_key(&config.top_keymap, parse_key(&config.top_key)?)?;
        info!(keymap = %config.top_keymap, key = %config.top_key, "shell started");

        Ok(Self {
            config,
            keymaps,
            commands: command_service,
            reader,
            source,
            variables,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn keymaps(&self) -> &Arc<KeyMapService> {
        &self.keymaps
    }

    pub fn commands(&self) -> &Arc<CommandService> {
        &self.commands
    }

    pub fn reader(&self) -> &Arc<KeyReader> {
        &self.reader
    }

    pub fn variables(&self) -> &Arc<Variables> {
        &self.variables
    }

    /// Runner for tasks that outlive a borrow of the shell.
    pub fn runner(&self) -> CommandRunner {
        self.commands.runner()
    }

    /// Run one command line.
    pub async fn run(&self, command_spec: &str) -> ShellResult<bool> {
        self.commands.run(command_spec).await
    }

    /// Source a script through the `source` command.
    pub async fn source(&self, path: &Path) -> ShellResult<bool> {
        self.commands
            .run(&format!("source {}", path.display()))
            .await
    }

    /// Failure message of the last `source`, empty if it succeeded.
    pub fn source_error(&self) -> String {
        self.source.error_message()
    }

    /// Stop both services. Idempotent.
    pub fn stop(&self) {
        self.reader.cancel();
        self.commands.stop();
        self.keymaps.stop();
        info!("shell stopped");
    }
}
