mod cli;
mod logging;
mod message_bar;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use oshell_core::{HeadlessPlatform, Shell, ShellConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use cli::CliArgs;
use message_bar::MessageBar;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config = ShellConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    let log_guard = logging::init(&config.log);

    let bar = MessageBar::new(config.notifications.clone());
    let shell = Arc::new(Shell::new(
        config,
        Arc::new(HeadlessPlatform),
        Arc::new(bar.clone()),
        Handle::current(),
    )?);
    let printer = bar.spawn_printer();

    if !args.no_rc {
        let rc_file = args.rc_file.or_else(|| shell.config().resolve_rc_file());
        source_rc(&shell, rc_file).await;
    }

    let ok = match args.command {
        Some(command) => repl::report(&command, shell.run(&command).await),
        None => {
            let interrupted = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            let summary = repl::run(
                Arc::clone(&shell),
                BufReader::new(tokio::io::stdin()),
                interrupted,
            )
            .await?;
            info!(
                commands = summary.commands,
                failed = summary.failed,
                keys = summary.keys,
                aborted = summary.aborted,
                "input closed"
            );
            true
        }
    };

    shell.stop();
    printer.abort();
    bar.flush_all();

    if !ok {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

/// Source the rc file, if any. Failures are reported but not fatal.
async fn source_rc(shell: &Shell, rc_file: Option<PathBuf>) {
    let Some(path) = rc_file else {
        info!("no rc file");
        return;
    };

    match shell.source(&path).await {
        Ok(true) => info!(path = %path.display(), "rc file loaded"),
        Ok(false) => warn!(path = %path.display(), error = %shell.source_error(), "rc file stopped early"),
        Err(e) => error!(path = %path.display(), error = %e, "failed to source rc file"),
    }
}
