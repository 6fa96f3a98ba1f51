//! Error taxonomy shared by the parser, the executor and the input sources.

use crate::lexer::LexingError;
use crate::parser::ParsingError;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while running a session.
///
/// Line-level conditions ([`ParsingError`], [`LexingError`]) and launch
/// failures are recoverable: they are reported and the session goes on.
/// The rest abort the session before or while reading input.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Lexing(#[from] LexingError),

    #[error("Error: cannot open batch file {}: {source}", path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error: cannot launch {program}: {reason}")]
    ProcessLaunchFailure { program: String, reason: String },

    #[error("Error: wrong number of arguments ({count}); usage: seqsh [batch-file]")]
    InvalidArgumentCount { count: usize },

    #[error("Error: cannot read from terminal: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Error: cannot read input: {0}")]
    Io(#[from] io::Error),
}
