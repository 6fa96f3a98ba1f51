use crate::command::{Completion, Executor, LAUNCH_FAILURE_STATUS};
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::executor::ProcessExecutor;
use crate::lexer::{self, TokenList};
use crate::parser::{self, ParsingError};
use crate::session::Session;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// What the input loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// A sequencing shell: every line is split into `;`-separated commands which
/// run one after another, each waited for before the next one starts.
///
/// Example
/// ```
/// use seqsh::{Flow, Interpreter};
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.run_line("   ").unwrap(), Flow::Continue);
/// assert_eq!(sh.run_line("quit").unwrap(), Flow::Terminate);
/// ```
pub struct Interpreter {
    config: ShellConfig,
    session: Session,
    executor: Box<dyn Executor>,
}

impl Interpreter {
    /// Create an interpreter that hands commands to `executor`.
    pub fn new(config: ShellConfig, executor: Box<dyn Executor>) -> Self {
        Self {
            config,
            session: Session::new(),
            executor,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parse `line` and run its commands left to right.
    ///
    /// Once the quit keyword is seen, either as the first command of the line
    /// or as a word of any later command, the command holding it and all
    /// remaining ones are skipped. Commands before it have already finished.
    ///
    /// Returns an error only when the whole line was discarded.
    pub fn run_line(&mut self, line: &str) -> Result<Flow, ParsingError> {
        self.run_raw_line(line.as_bytes())
    }

    /// Same as [`Interpreter::run_line`] for a line read as raw bytes.
    pub fn run_raw_line(&mut self, line: &[u8]) -> Result<Flow, ParsingError> {
        if self.session.should_exit {
            return Ok(Flow::Terminate);
        }

        let parsed = parser::split_raw_line(line, &self.config.limits)?;
        if parsed.terminate {
            debug!("quit keyword opens the line");
            self.session.should_exit = true;
        }

        for command in parsed.commands {
            if self.session.should_exit {
                break;
            }
            let tokens = match lexer::split_into_tokens(command, &self.config.limits) {
                Ok(tokens) => tokens,
                Err(err) if err.saw_quit() => {
                    debug!(command, "quit keyword in oversized command");
                    self.session.should_exit = true;
                    break;
                }
                Err(err) => {
                    report(&ShellError::from(err));
                    continue;
                }
            };
            if tokens.saw_quit() {
                debug!(command, "quit keyword in command");
                self.session.should_exit = true;
                break;
            }
            self.launch(&tokens);
        }

        Ok(if self.session.should_exit {
            Flow::Terminate
        } else {
            Flow::Continue
        })
    }

    fn launch(&mut self, tokens: &TokenList<'_>) {
        if tokens.is_empty() {
            debug!("skipping blank command");
            return;
        }

        match self.executor.execute(tokens.argv(), &self.session) {
            Ok(Completion { pid, code }) => {
                if code == 0 {
                    println!("PID {pid} exited with status {code}");
                }
                self.session.last_status = code;
            }
            Err(err) => {
                report(&err);
                self.session.last_status = LAUNCH_FAILURE_STATUS;
            }
        }
    }

    /// Run one line, reporting a discarded line instead of failing.
    fn dispatch(&mut self, line: &[u8]) -> Flow {
        match self.run_raw_line(line) {
            Ok(flow) => flow,
            Err(err) => {
                report(&ShellError::from(err));
                Flow::Continue
            }
        }
    }

    /// Feed every line of `reader` to the shell until it ends or the session
    /// terminates.
    ///
    /// Lines keep their trailing `\n`, so it counts toward the length limit.
    /// Lines that are not valid UTF-8 are reported and skipped.
    pub fn run_lines<R: BufRead>(&mut self, mut reader: R) -> Result<(), ShellError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input");
                return Ok(());
            }
            debug!(
                length = buf.len(),
                line = %String::from_utf8_lossy(&buf),
                "retrieved line"
            );
            if self.dispatch(&buf) == Flow::Terminate {
                return Ok(());
            }
        }
    }

    /// Run the commands stored in the file at `path`, without prompting.
    pub fn run_batch(&mut self, path: &Path) -> Result<(), ShellError> {
        let file = File::open(path).map_err(|source| ShellError::FileOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "batch mode");
        self.run_lines(BufReader::new(file))
    }

    /// Interactive Read-Eval-Print Loop.
    ///
    /// Ends on the quit keyword, end of input (Ctrl-D) or Ctrl-C.
    pub fn repl(&mut self) -> Result<(), ShellError> {
        let mut rl = DefaultEditor::new()?;

        while !self.session.should_exit {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    // The editor strips the newline a plain read would keep.
                    self.dispatch(format!("{line}\n").as_bytes());
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Default limits and prompt, commands run as child processes.
    fn default() -> Self {
        Self::new(ShellConfig::default(), Box::new(ProcessExecutor))
    }
}

fn report(err: &ShellError) {
    debug!(%err, "reported to user");
    eprintln!("{err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use std::cell::RefCell;
    use std::io::{Cursor, Write};
    use std::rc::Rc;

    /// Records every argv instead of launching anything.
    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Vec<String>>>>,
    }

    impl Executor for Recorder {
        fn execute(&mut self, argv: &[&str], _session: &Session) -> Result<Completion, ShellError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(argv.iter().map(|arg| arg.to_string()).collect());
            Ok(Completion {
                pid: calls.len() as u32,
                code: 0,
            })
        }
    }

    fn recording_shell(config: ShellConfig) -> (Interpreter, Rc<RefCell<Vec<Vec<String>>>>) {
        let recorder = Recorder::default();
        let calls = recorder.calls.clone();
        (Interpreter::new(config, Box::new(recorder)), calls)
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_commands_run_left_to_right() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        assert_eq!(sh.run_line("echo a; echo b ;echo c").unwrap(), Flow::Continue);
        assert_eq!(
            *calls.borrow(),
            vec![argv(&["echo", "a"]), argv(&["echo", "b"]), argv(&["echo", "c"])]
        );
    }

    #[test]
    fn test_blank_lines_do_nothing() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        for line in ["", "   ", "\t", "\r"] {
            assert_eq!(sh.run_line(line).unwrap(), Flow::Continue);
        }
        assert!(calls.borrow().is_empty());
        assert!(!sh.session().should_exit);
    }

    #[test]
    fn test_blank_command_is_skipped() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        sh.run_line("ls;  ;pwd").unwrap();
        assert_eq!(*calls.borrow(), vec![argv(&["ls"]), argv(&["pwd"])]);
    }

    #[test]
    fn test_leading_quit_runs_nothing() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        assert_eq!(sh.run_line("  quit; echo after").unwrap(), Flow::Terminate);
        assert!(calls.borrow().is_empty());
        assert!(sh.session().should_exit);
    }

    #[test]
    fn test_quit_later_in_line_keeps_earlier_commands() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        assert_eq!(
            sh.run_line("echo one; echo quit; echo three").unwrap(),
            Flow::Terminate
        );
        assert_eq!(*calls.borrow(), vec![argv(&["echo", "one"])]);
    }

    #[test]
    fn test_nothing_runs_after_termination() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        sh.run_line("quit").unwrap();
        assert_eq!(sh.run_line("echo late").unwrap(), Flow::Terminate);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_oversized_line_is_discarded() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let long = format!("echo {}", "x".repeat(600));
        assert!(matches!(
            sh.run_line(&long),
            Err(ParsingError::OversizedInput { .. })
        ));
        assert!(calls.borrow().is_empty());

        sh.run_line("echo fresh").unwrap();
        assert_eq!(*calls.borrow(), vec![argv(&["echo", "fresh"])]);
    }

    #[test]
    fn test_command_with_too_many_tokens_is_skipped() {
        let config = ShellConfig {
            limits: Limits {
                max_tokens: 2,
                ..Limits::default()
            },
            ..ShellConfig::default()
        };
        let (mut sh, calls) = recording_shell(config);
        assert_eq!(sh.run_line("a b c; d e").unwrap(), Flow::Continue);
        assert_eq!(*calls.borrow(), vec![argv(&["d", "e"])]);
    }

    #[test]
    fn test_quit_in_command_with_too_many_tokens() {
        let config = ShellConfig {
            limits: Limits {
                max_tokens: 3,
                ..Limits::default()
            },
            ..ShellConfig::default()
        };
        let (mut sh, calls) = recording_shell(config);
        assert_eq!(sh.run_line("ls; echo quit a b c; pwd").unwrap(), Flow::Terminate);
        assert_eq!(*calls.borrow(), vec![argv(&["ls"])]);
        assert!(sh.session().should_exit);
    }

    #[test]
    fn test_run_lines_skips_non_utf8_lines() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let mut input = b"touch m ".to_vec();
        input.extend(std::iter::repeat_n(0xff, 200));
        input.extend(b"\necho next\n");

        sh.run_lines(Cursor::new(input)).unwrap();
        assert_eq!(*calls.borrow(), vec![argv(&["echo", "next"])]);
    }

    #[test]
    fn test_run_lines_counts_newline_in_length() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let exact = "a".repeat(512);
        let input = format!("{exact}\n{exact}");
        sh.run_lines(Cursor::new(input)).unwrap();
        assert_eq!(*calls.borrow(), vec![vec![exact]]);
    }

    #[test]
    fn test_run_lines_stops_at_quit() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let input = Cursor::new("echo first\n\nquit\necho should_not_run\n");
        sh.run_lines(input).unwrap();
        assert_eq!(*calls.borrow(), vec![argv(&["echo", "first"])]);
        assert!(sh.session().should_exit);
    }

    #[test]
    fn test_run_lines_reports_and_continues_past_bad_lines() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let input = format!("echo {}\necho next", "y".repeat(600));
        sh.run_lines(Cursor::new(input)).unwrap();
        assert_eq!(*calls.borrow(), vec![argv(&["echo", "next"])]);
        assert!(!sh.session().should_exit);
    }

    #[test]
    fn test_batch_file_quit_first() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "quit\necho should_not_run\n").unwrap();

        sh.run_batch(file.path()).unwrap();
        assert!(calls.borrow().is_empty());
        assert!(sh.session().should_exit);
    }

    #[test]
    fn test_batch_missing_file() {
        let (mut sh, calls) = recording_shell(ShellConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let err = sh.run_batch(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ShellError::FileOpenFailure { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_launch_failure_does_not_stop_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("after_failure");
        let line = format!("not_a_real_binary_xyz; touch {}", marker.display());

        let mut sh = Interpreter::default();
        assert_eq!(sh.run_line(&line).unwrap(), Flow::Continue);
        assert!(marker.exists());
        assert_eq!(sh.session().last_status, 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_failed_status_is_recorded() {
        let mut sh = Interpreter::default();
        sh.run_line("false").unwrap();
        assert_eq!(sh.session().last_status, 1);

        sh.run_line("not_a_real_binary_xyz").unwrap();
        assert_eq!(sh.session().last_status, LAUNCH_FAILURE_STATUS);
    }

    #[test]
    #[cfg(unix)]
    fn test_batch_file_runs_real_commands() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let never = dir.path().join("never");
        let script = dir.path().join("script.txt");
        std::fs::write(
            &script,
            format!(
                "touch {}; touch {}\nquit\ntouch {}\n",
                first.display(),
                second.display(),
                never.display()
            ),
        )
        .unwrap();

        let mut sh = Interpreter::default();
        sh.run_batch(&script).unwrap();
        assert!(first.exists());
        assert!(second.exists());
        assert!(!never.exists());
    }
}
