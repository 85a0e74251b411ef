//! Command script interpreter.
//!
//! A script is plain text, one command per line. Blank lines and lines whose
//! first non-blank character is `#` are skipped. Execution stops at the first
//! command that returns `false`.

use crate::command::CommandRunner;
use crate::error::ShellResult;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// How a script run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// Every line succeeded or was skipped.
    Completed {
        /// Number of commands dispatched.
        executed: usize,
    },
    /// A command returned `false`; later lines were not run.
    Failed {
        /// 1-based line number.
        line: usize,
        /// The line as written in the file.
        command: String,
    },
}

impl ScriptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl fmt::Display for ScriptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { executed } => write!(f, "Executed {} commands", executed),
            Self::Failed { line, command } => {
                write!(f, "Line: {}: Failed to run command: {}", line, command)
            }
        }
    }
}

/// Read `path` and run each command line through `runner`.
///
/// IO errors and dispatch errors (unknown command, bad arguments) abort the
/// run and propagate; a `false` result is reported as [`ScriptOutcome::Failed`].
pub async fn run_script(runner: &CommandRunner, path: impl AsRef<Path>) -> ShellResult<ScriptOutcome> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), "sourcing script");
    run_text(runner, &text).await
}

/// Run already-loaded script text. See [`run_script`].
pub async fn run_text(runner: &CommandRunner, text: &str) -> ShellResult<ScriptOutcome> {
    let mut executed = 0;
    for (index, line) in split_lines(text).into_iter().enumerate() {
        if is_skipped(line) {
            continue;
        }

        executed += 1;
        if !runner.run(line).await? {
            return Ok(ScriptOutcome::Failed {
                line: index + 1,
                command: line.to_string(),
            });
        }
    }
    Ok(ScriptOutcome::Completed { executed })
}

fn is_skipped(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}

/// Split on `\r\n`, `\n` or a bare `\r`. A trailing terminator does not start
/// an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_mixed_endings() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\r\n\r\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_is_skipped() {
        assert!(is_skipped(""));
        assert!(is_skipped("   \t"));
        assert!(is_skipped("# comment"));
        assert!(is_skipped("   # indented comment"));
        assert!(!is_skipped("set border 2"));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ScriptOutcome::Failed {
            line: 2,
            command: "stubcmd2 arg1 arg2 arg3".into(),
        };
        assert_eq!(
            outcome.to_string(),
            "Line: 2: Failed to run command: stubcmd2 arg1 arg2 arg3"
        );
        assert!(!outcome.is_success());
        assert!(ScriptOutcome::Completed { executed: 0 }.is_success());
    }

    #[tokio::test]
    async fn test_detached_runner_fails_loudly() {
        let err = run_text(&CommandRunner::detached(), "anything").await.unwrap_err();
        assert!(matches!(err, crate::ShellError::ServiceStopped));
    }
}
