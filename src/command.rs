use crate::error::ShellError;
use crate::session::Session;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Status reported for a command whose program could not be started.
pub const LAUNCH_FAILURE_STATUS: ExitCode = 1;

/// A finished command: which process ran it and how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: u32,
    pub code: ExitCode,
}

/// Runs one command to completion.
///
/// Implementations must not return before the command has finished, so
/// commands of a line never overlap.
pub trait Executor {
    /// Launch `argv[0]` with `argv` as its argument vector and wait for it.
    ///
    /// A program that cannot be started is reported as
    /// [`ShellError::ProcessLaunchFailure`].
    fn execute(&mut self, argv: &[&str], session: &Session) -> Result<Completion, ShellError>;
}
