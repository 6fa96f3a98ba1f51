use anyhow::{Context, Result};
use argh::FromArgs;
use seqsh::{Interpreter, ShellError};
use std::env;
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Run `;`-separated commands line by line, from the terminal or a batch file.
struct Args {
    #[argh(positional, greedy)]
    /// file to read commands from; without it commands are read interactively.
    batch_file: Vec<String>,
}

fn init_logging() {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.batch_file.as_slice() {
        [] => {
            debug!("interactive mode");
            Interpreter::default()
                .repl()
                .context("interactive session failed")
        }
        [path] => {
            Interpreter::default()
                .run_batch(Path::new(path))
                .with_context(|| format!("batch session on {path} failed"))
        }
        extra => Err(ShellError::InvalidArgumentCount { count: extra.len() }.into()),
    }
}

/// Exit status for a failed session: 2 for a usage error, 1 otherwise.
fn failure_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ShellError>() {
        Some(ShellError::InvalidArgumentCount { .. }) => 2,
        _ => 1,
    }
}

fn main() -> process::ExitCode {
    init_logging();
    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => process::ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "session failed");
            eprintln!("{err:#}");
            process::ExitCode::from(failure_status(&err))
        }
    }
}
