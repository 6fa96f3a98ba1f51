use crate::command::{Completion, ExitCode, Executor};
use crate::error::ShellError;
use crate::session::Session;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{debug, trace};

/// Runs each command as a child process of the shell.
///
/// The child inherits the shell's standard streams and the parent blocks
/// until that exact child has exited.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, argv: &[&str], session: &Session) -> Result<Completion, ShellError> {
        let (&program, args) = argv
            .split_first()
            .ok_or_else(|| ShellError::ProcessLaunchFailure {
                program: String::new(),
                reason: "empty command".to_string(),
            })?;

        let search_paths = session.search_path.as_deref().unwrap_or_default();
        let executable = find_command_path(search_paths, Path::new(program)).ok_or_else(|| {
            ShellError::ProcessLaunchFailure {
                program: program.to_string(),
                reason: "command not found".to_string(),
            }
        })?;
        trace!(program, resolved = %executable.display(), "resolved program");

        let mut command = std::process::Command::new(executable.as_ref());
        command.args(args).current_dir(&session.current_dir);
        // argv[0] stays the name as typed, not the resolved path.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::arg0(&mut command, program);

        let mut child = command
            .spawn()
            .map_err(|err| ShellError::ProcessLaunchFailure {
                program: program.to_string(),
                reason: err.to_string(),
            })?;
        let pid = child.id();
        debug!(program, pid, "launched");

        let code = status_code(child.wait()?);
        debug!(program, pid, code, "child exited");
        Ok(Completion { pid, code })
    }
}

/// Exit code of a finished child; a child killed by signal `n` reads as `128 + n`.
#[cfg(unix)]
fn status_code(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn status_code(status: ExitStatus) -> ExitCode {
    status.code().unwrap_or(-1)
}

/// Resolve a program name to the file that should be executed.
///
/// - Absolute path: used if it exists.
/// - `./foo`: used if it exists in the current directory.
/// - Single component (`ls`): the first executable match in `search_paths` wins.
/// - Several components (`bin/tool`): used relative to the current directory.
/// - Empty name: never resolves.
pub fn find_command_path<'a>(search_paths: &OsStr, program: &'a Path) -> Option<Cow<'a, Path>> {
    if program.is_absolute() {
        return existing(program).map(Cow::Borrowed);
    }

    if program.starts_with("./") {
        return existing(program).map(Cow::Borrowed);
    }

    let mut components = program.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(name), None) => search_in(search_paths, name.as_os_str()).map(Cow::Owned),
        _ => existing(program).map(Cow::Borrowed),
    }
}

fn search_in(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn existing(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
