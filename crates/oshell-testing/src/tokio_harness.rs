//! Tokio-based async test harness.

use crate::doubles::{RecordingNotifier, RecordingPlatform, RecordingWindow, StubHandler};
use crate::fixtures::Fixtures;
use crate::{TestError, TestResult};
use oshell_core::commands::{register_defaults, CommandContext};
use oshell_core::{
    CommandRegistry, CommandService, KeyMapService, ShellResult, SourceHandler, Variables,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Await `future`, failing with [`TestError::Timeout`] after `duration`.
pub async fn completes_within<F: Future>(duration: Duration, future: F) -> TestResult<F::Output> {
    timeout(duration, future).await.map_err(|_| TestError::Timeout)
}

/// Built-in commands plus optional stubs, wired to recording doubles.
pub struct TokioTestHarness {
    pub platform: Arc<RecordingPlatform>,
    pub notifier: Arc<RecordingNotifier>,
    pub window: Arc<RecordingWindow>,
    pub keymaps: Arc<KeyMapService>,
    pub variables: Arc<Variables>,
    pub commands: Arc<CommandService>,
    pub source: Arc<SourceHandler>,
    default_timeout: Duration,
}

impl TokioTestHarness {
    /// Harness with only the built-in commands.
    pub fn new() -> TestResult<Self> {
        Self::with_stubs(&[])
    }

    /// Harness with the built-in commands and `stubs`.
    pub fn with_stubs(stubs: &[Arc<StubHandler>]) -> TestResult<Self> {
        let platform = Arc::new(RecordingPlatform::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let window = Arc::new(RecordingWindow::new());
        let keymaps = Fixtures::keymap_service(Arc::clone(&platform));
        let variables = Arc::new(Variables::new());
        let commands = Arc::new(CommandService::new());

        let ctx = CommandContext {
            runner: commands.runner(),
            keymaps: Arc::clone(&keymaps),
            notifier: notifier.clone(),
            main_window: window.clone(),
            variables: Arc::clone(&variables),
        };
        let (builder, source) = register_defaults(CommandRegistry::builder(), &ctx);
        let builder = stubs
            .iter()
            .fold(builder, |builder, stub| builder.register(stub.spec(), stub.clone()));
        commands.start(builder.build()?)?;

        Ok(Self {
            platform,
            notifier,
            window,
            keymaps,
            variables,
            commands,
            source,
            default_timeout: Duration::from_secs(5),
        })
    }

    /// Set the default timeout for [`run`](Self::run).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Run a command line, bounded by the default timeout.
    pub async fn run(&self, command_spec: &str) -> TestResult<ShellResult<bool>> {
        completes_within(self.default_timeout, self.commands.run(command_spec)).await
    }

    /// Run each line, failing on the first error or `false`.
    pub async fn run_all(&self, lines: &[&str]) -> TestResult<()> {
        for line in lines {
            if !self.run(line).await?? {
                return Err(TestError::Shell(oshell_core::ShellError::Config(format!(
                    "command returned false: {}",
                    line
                ))));
            }
        }
        Ok(())
    }

    /// Poll `condition` until it holds or `timeout_duration` passes.
    pub async fn run_until<F>(&self, condition: F, timeout_duration: Duration) -> TestResult<()>
    where
        F: Fn(&Self) -> bool,
    {
        let check_interval = Duration::from_millis(10);

        completes_within(timeout_duration, async {
            loop {
                if condition(self) {
                    return;
                }
                sleep(check_interval).await;
            }
        })
        .await
    }
}
