//! Testing utilities for OShell.
//!
//! This crate provides:
//! - Recording doubles for the platform facade, notifier and main window
//! - Stub command handlers with scripted results and delays
//! - Script-file fixtures backed by temporary files
//! - A tokio harness wiring services together with the doubles

pub mod doubles;
pub mod fixtures;
pub mod tokio_harness;

// Re-exports
pub use doubles::{RecordingNotifier, RecordingPlatform, RecordingWindow, StubHandler};
pub use fixtures::{Fixtures, ScriptFile};
pub use tokio_harness::{completes_within, TokioTestHarness};

/// Error types for testing operations.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout waiting for condition")]
    Timeout,

    #[error("Shell error: {0}")]
    Shell(#[from] oshell_core::ShellError),
}

/// Result type for testing operations.
pub type TestResult<T> = Result<T, TestError>;
