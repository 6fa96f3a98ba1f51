use crate::command::ExitCode;
use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

/// State that lives for the whole session and is shared by every line.
#[derive(Debug, Clone)]
pub struct Session {
    /// Directories searched for programs given without a path (the `PATH` value).
    pub search_path: Option<OsString>,
    /// Working directory handed to every child.
    pub current_dir: PathBuf,
    /// Set once the quit keyword has been seen; nothing else runs afterwards.
    pub should_exit: bool,
    /// Status of the most recently finished command.
    pub last_status: ExitCode,
}

impl Session {
    /// Capture `PATH` and the working directory of the current process.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            search_path: stdenv::var_os("PATH"),
            current_dir,
            should_exit: false,
            last_status: 0,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_reads_from_process_env() {
        let session = Session::new();
        assert!(session.search_path.is_some());
        assert!(!session.should_exit);
        assert_eq!(session.last_status, 0);
    }
}
