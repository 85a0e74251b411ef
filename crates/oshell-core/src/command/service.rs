//! The command dispatcher.

use super::registry::{CommandHandler, CommandRegistry, Invocation};
use crate::error::{ShellError, ShellResult};
use crate::keymap_service::ServiceState;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::debug;

enum Lifecycle {
    NotStarted,
    Running(Arc<CommandRegistry>),
    Stopped,
}

/// Parses command lines and runs the matching handler.
///
/// Handlers run on the tokio runtime, one task per dispatch, so a slow
/// handler never delays an unrelated [`run`](Self::run).
pub struct CommandService {
    lifecycle: RwLock<Lifecycle>,
}

impl CommandService {
    /// Create a service in the `NotStarted` state.
    ///
    /// Handlers that re-enter the service are built from [`runner`](Self::runner)
    /// before the registry is handed to [`start`](Self::start).
    pub fn new() -> Self {
        Self {
            lifecycle: RwLock::new(Lifecycle::NotStarted),
        }
    }

    /// Create a running service.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            lifecycle: RwLock::new(Lifecycle::Running(Arc::new(registry))),
        }
    }

    /// Install the registry and start accepting commands.
    pub fn start(&self, registry: CommandRegistry) -> ShellResult<()> {
        let mut lifecycle = self.lifecycle.write();
        match *lifecycle {
            Lifecycle::NotStarted => {
                debug!(commands = registry.len(), "command service started");
                *lifecycle = Lifecycle::Running(Arc::new(registry));
                Ok(())
            }
            Lifecycle::Running(_) => Err(ShellError::Config(
                "command service is already running".into(),
            )),
            Lifecycle::Stopped => Err(ShellError::ServiceStopped),
        }
    }

    /// Drop the registry. Idempotent.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle.write();
        if !matches!(*lifecycle, Lifecycle::Stopped) {
            *lifecycle = Lifecycle::Stopped;
            debug!("command service stopped");
        }
    }

    pub fn state(&self) -> ServiceState {
        match *self.lifecycle.read() {
            Lifecycle::NotStarted => ServiceState::NotStarted,
            Lifecycle::Running(_) => ServiceState::Running,
            Lifecycle::Stopped => ServiceState::Stopped,
        }
    }

    /// The installed registry.
    pub fn registry(&self) -> ShellResult<Arc<CommandRegistry>> {
        match &*self.lifecycle.read() {
            Lifecycle::Running(registry) => Ok(Arc::clone(registry)),
            Lifecycle::NotStarted => Err(ShellError::ServiceNotStarted),
            Lifecycle::Stopped => Err(ShellError::ServiceStopped),
        }
    }

    /// Weak handle for handlers and key actions that dispatch commands.
    pub fn runner(self: &Arc<Self>) -> CommandRunner {
        CommandRunner(Arc::downgrade(self))
    }

    /// Parse `command_spec` and run its handler.
    ///
    /// Validation and name resolution finish before anything is spawned.
    /// The handler's boolean is returned unchanged and its errors propagate.
    pub async fn run(&self, command_spec: &str) -> ShellResult<bool> {
        let (invocation, handler) = self.prepare(command_spec)?;
        debug!(command = %invocation.name(), args = %invocation.args(), "dispatching");
        tokio::spawn(async move { handler.execute(invocation).await }).await?
    }

    /// Split `command_spec` into a name and raw arguments and build the invocation.
    pub fn resolve(&self, command_spec: &str) -> ShellResult<Invocation> {
        self.prepare(command_spec).map(|(invocation, _)| invocation)
    }

    fn prepare(&self, command_spec: &str) -> ShellResult<(Invocation, Arc<dyn CommandHandler>)> {
        let trimmed = command_spec.trim();
        if trimmed.is_empty() {
            return Err(ShellError::invalid_argument(
                "command_spec",
                "command line is empty",
            ));
        }

        let (name, args) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (trimmed, ""),
        };

        let registry = self.registry()?;
        let entry = registry
            .get(name)
            .ok_or_else(|| ShellError::InvalidCommand {
                input: command_spec.to_string(),
            })?;

        Ok((
            Invocation::new(Arc::clone(&entry.spec), args),
            Arc::clone(&entry.handler),
        ))
    }
}

impl Default for CommandService {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-owning handle to a [`CommandService`].
///
/// Fails with [`ShellError::ServiceStopped`] once the service is dropped.
#[derive(Clone, Default)]
pub struct CommandRunner(Weak<CommandService>);

impl CommandRunner {
    /// A runner not attached to any service.
    pub fn detached() -> Self {
        Self(Weak::new())
    }

    fn service(&self) -> ShellResult<Arc<CommandService>> {
        self.0.upgrade().ok_or(ShellError::ServiceStopped)
    }

    /// See [`CommandService::run`].
    pub async fn run(&self, command_spec: &str) -> ShellResult<bool> {
        self.service()?.run(command_spec).await
    }

    /// See [`CommandService::registry`].
    pub fn registry(&self) -> ShellResult<Arc<CommandRegistry>> {
        self.service()?.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::registry::CommandSpec;
    use async_trait::async_trait;

    struct Flag(&'static str, bool);

    #[async_trait]
    impl CommandHandler for Flag {
        fn command(&self) -> &str {
            self.0
        }

        async fn execute(&self, _invocation: Invocation) -> ShellResult<bool> {
            Ok(self.1)
        }
    }

    struct Panics;

    #[async_trait]
    impl CommandHandler for Panics {
        fn command(&self) -> &str {
            "panics"
        }

        async fn execute(&self, _invocation: Invocation) -> ShellResult<bool> {
            panic!("handler blew up");
        }
    }

    fn service() -> CommandService {
        let registry = CommandRegistry::builder()
            .register(CommandSpec::new("yes", "", ""), Arc::new(Flag("yes", true)))
            .register(CommandSpec::new("no", "", ""), Arc::new(Flag("no", false)))
            .register(CommandSpec::new("panics", "", ""), Arc::new(Panics))
            .build()
            .unwrap();
        CommandService::with_registry(registry)
    }

    #[test]
    fn test_resolve_splits_name_and_args() {
        let service = service();
        let invocation = service.resolve("  yes \t a  b c  ").unwrap();
        assert_eq!(invocation.name(), "yes");
        assert_eq!(invocation.args(), "a  b c");

        let invocation = service.resolve("no").unwrap();
        assert_eq!(invocation.args(), "");
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let err = service().resolve("YES").unwrap_err();
        assert!(matches!(err, ShellError::InvalidCommand { input } if input == "YES"));
    }

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let service = service();
        assert!(service.run("yes").await.unwrap());
        assert!(!service.run("no arg").await.unwrap());
    }

    #[tokio::test]
    async fn test_panicking_handler_is_task_error() {
        let err = service().run("panics").await.unwrap_err();
        assert!(matches!(err, ShellError::Task(_)));
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let service = Arc::new(CommandService::new());
        assert_eq!(service.state(), ServiceState::NotStarted);
        assert!(matches!(
            service.run("yes").await.unwrap_err(),
            ShellError::ServiceNotStarted
        ));

        let registry = CommandRegistry::builder()
            .register(CommandSpec::new("yes", "", ""), Arc::new(Flag("yes", true)))
            .build()
            .unwrap();
        service.start(registry).unwrap();
        assert!(service.runner().run("yes").await.unwrap());

        service.stop();
        service.stop();
        assert!(matches!(
            service.run("yes").await.unwrap_err(),
            ShellError::ServiceStopped
        ));
    }

    #[tokio::test]
    async fn test_runner_outlives_service() {
        let service = Arc::new(service());
        let runner = service.runner();
        drop(service);
        assert!(matches!(
            runner.run("yes").await.unwrap_err(),
            ShellError::ServiceStopped
        ));
        assert!(matches!(
            CommandRunner::detached().run("yes").await.unwrap_err(),
            ShellError::ServiceStopped
        ));
    }
}
