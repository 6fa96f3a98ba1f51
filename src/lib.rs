//! A minimal sequencing shell.
//!
//! Each input line is split on `;` into commands, each command is split on
//! whitespace into a program name and its arguments, and every command runs
//! as a child process that is waited for before the next one starts. There
//! are no pipes, redirections, quoting or variables; the only built-in is the
//! `quit` keyword, which ends the session.
//!
//! The main entry point is [`Interpreter`], which drives the line parser
//! ([`parser`]), the command tokenizer ([`lexer`]) and an [`Executor`] from
//! either a terminal ([`Interpreter::repl`]) or a file
//! ([`Interpreter::run_batch`]).

pub mod command;
pub mod config;
pub mod error;
mod executor;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod session;

pub use command::{Completion, ExitCode, Executor};
pub use config::{Limits, ShellConfig};
pub use error::ShellError;
pub use executor::{ProcessExecutor, find_command_path};
pub use interpreter::{Flow, Interpreter};
