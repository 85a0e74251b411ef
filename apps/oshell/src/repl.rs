//! Line-oriented command loop.

use oshell_core::{Shell, ShellError};
use oshell_keybinds::parse_key;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::cli::InputLine;

/// What a loop run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplSummary {
    /// Command lines dispatched.
    pub commands: usize,
    /// Commands that returned `false` or an error.
    pub failed: usize,
    /// `@<key>` lines fed to the key reader.
    pub keys: usize,
    /// Commands still running when `shutdown` fired, then aborted.
    pub aborted: usize,
}

/// Read `input` until EOF or `shutdown`.
///
/// Each command runs on its own task so a slow one does not hold up the next
/// line. On EOF every spawned command is awaited before returning; on
/// `shutdown` the unfinished ones are aborted.
pub async fn run<R, S>(shell: Arc<Shell>, input: R, shutdown: S) -> std::io::Result<ReplSummary>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut tasks: JoinSet<bool> = JoinSet::new();
    let mut summary = ReplSummary::default();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => {
                summary.aborted = tasks.len();
                if summary.aborted > 0 {
                    warn!(aborted = summary.aborted, "interrupted with commands still running");
                } else {
                    info!("interrupted");
                }
                tasks.abort_all();
                return Ok(summary);
            }
        };
        let Some(line) = line else {
            break;
        };

        match InputLine::parse(&line) {
            InputLine::Blank => {}
            InputLine::Key(notation) => {
                summary.keys += 1;
                match parse_key(notation) {
                    Ok(key) => println!("{:?}", shell.reader().on_key(key)),
                    Err(e) => eprintln!("{}", e),
                }
            }
            InputLine::Command(command) => {
                summary.commands += 1;
                let command = command.to_string();
                let shell = Arc::clone(&shell);
                tasks.spawn(async move {
                    let result = shell.run(&command).await;
                    report(&command, result)
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => {}
            Ok(false) => summary.failed += 1,
            Err(e) => {
                warn!(error = %e, "command task failed");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Print the outcome of one command. Returns whether it succeeded.
pub fn report(command: &str, result: Result<bool, ShellError>) -> bool {
    match result {
        Ok(true) => true,
        Ok(false) => {
            eprintln!("{}: failed", command);
            false
        }
        Err(e) => {
            eprintln!("{}: {}", command, e);
            false
        }
    }
}
