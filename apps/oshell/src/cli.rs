//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Ratpoison-style command shell
#[derive(Parser, Debug)]
#[command(name = "oshell", version, about = "Ratpoison-style command shell")]
pub struct CliArgs {
    /// Script to source instead of the configured rc file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub rc_file: Option<PathBuf>,

    /// Run one command after the rc file and exit
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub command: Option<String>,

    /// Configuration file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip the rc file entirely
    #[arg(long)]
    pub no_rc: bool,
}

/// A line read from the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// Nothing to do.
    Blank,
    /// `@<key>`: simulate a key press.
    Key(&'a str),
    /// A command line.
    Command(&'a str),
}

impl<'a> InputLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            InputLine::Blank
        } else if let Some(key) = trimmed.strip_prefix('@') {
            InputLine::Key(key.trim())
        } else {
            InputLine::Command(trimmed)
        }
    }
}
