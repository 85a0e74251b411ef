//! Built-in commands.
//!
//! Each module exposes a `spec()` descriptor and a handler; [`register_defaults`]
//! wires them into a registry builder.

mod definekey;
mod delkmap;
mod help;
mod newkmap;
mod readkey;
mod set;
mod source;
mod topkmap;
mod undefinekey;

pub use definekey::DefinekeyHandler;
pub use delkmap::DelKMapHandler;
pub use help::HelpHandler;
pub use newkmap::NewKMapHandler;
pub use readkey::ReadkeyHandler;
pub use set::{SetHandler, Variables};
pub(crate) use set::TOP_KEYMAP_VARIABLE;
pub use source::SourceHandler;
pub use topkmap::TopKMapHandler;
pub use undefinekey::UndefinekeyHandler;

use crate::command::{CommandRegistryBuilder, CommandRunner};
use crate::error::{ShellError, ShellResult};
use crate::keymap_service::KeyMapService;
use crate::notification::Notifier;
use crate::platform::MainWindow;
use oshell_keybinds::{parse_key, KeyBinding};
use std::sync::Arc;

/// Collaborators shared by the built-in handlers.
#[derive(Clone)]
pub struct CommandContext {
    pub runner: CommandRunner,
    pub keymaps: Arc<KeyMapService>,
    pub notifier: Arc<dyn Notifier>,
    pub main_window: Arc<dyn MainWindow>,
    pub variables: Arc<Variables>,
}

/// Add every built-in command to `builder`.
///
/// Returns the source handler as well so callers can read its last error.
pub fn register_defaults(
    builder: CommandRegistryBuilder,
    ctx: &CommandContext,
) -> (CommandRegistryBuilder, Arc<SourceHandler>) {
    let source = Arc::new(SourceHandler::new(ctx.runner.clone(), Arc::clone(&ctx.notifier)));

    let builder = builder
        .register(
            definekey::spec(),
            Arc::new(DefinekeyHandler::new(Arc::clone(&ctx.keymaps), ctx.runner.clone())),
        )
        .register(
            undefinekey::spec(),
            Arc::new(UndefinekeyHandler::new(Arc::clone(&ctx.keymaps))),
        )
        .register(newkmap::spec(), Arc::new(NewKMapHandler::new(Arc::clone(&ctx.keymaps))))
        .register(
            delkmap::spec(),
            Arc::new(DelKMapHandler::new(
                Arc::clone(&ctx.keymaps),
                Arc::clone(&ctx.variables),
                Arc::clone(&ctx.notifier),
            )),
        )
        .register(
            readkey::spec(),
            Arc::new(ReadkeyHandler::new(
                Arc::clone(&ctx.keymaps),
                Arc::clone(&ctx.main_window),
                Arc::clone(&ctx.notifier),
            )),
        )
        .register(topkmap::spec(), Arc::new(TopKMapHandler::new(Arc::clone(&ctx.keymaps))))
        .register(
            set::spec(),
            Arc::new(SetHandler::new(Arc::clone(&ctx.variables), Arc::clone(&ctx.notifier))),
        )
        .register(source::spec(), source.clone())
        .register(
            help::spec(),
            Arc::new(HelpHandler::new(ctx.runner.clone(), Arc::clone(&ctx.notifier))),
        );

    (builder, source)
}

/// Parse a key argument of `command`.
fn key_arg(command: &str, notation: &str) -> ShellResult<KeyBinding> {
    parse_key(notation).map_err(|e| {
        tracing::debug!(command, key = notation, error = %e, "bad key argument");
        ShellError::KeyParse(e)
    })
}

/// Error for a malformed argument list.
fn usage_error(command: &str, args: &str) -> ShellError {
    ShellError::invalid_argument("args", format!("incorrect {} arguments: {}", command, args))
}
