//! Line-level parsing: turn one raw input line into the ordered list of
//! `;`-separated commands it contains.

use crate::config::{Limits, QUIT_KEYWORD};

/// Result of splitting a single input line.
///
/// Commands borrow from the line they were split from; nothing is copied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine<'a> {
    /// Commands in execution order (left to right).
    pub commands: Vec<&'a str>,
    /// Set when the first command of the line is exactly the quit keyword.
    pub terminate: bool,
}

impl ParsedLine<'_> {
    /// True for lines that carry nothing to run and do not end the session.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && !self.terminate
    }
}

/// Errors that cause a whole line to be discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsingError {
    /// The line is longer than [`Limits::max_line_length`].
    #[error("Error: Command too long ({length} > {max} bytes). Retry")]
    OversizedInput { length: usize, max: usize },
    /// The line holds more commands than [`Limits::max_commands`].
    #[error("Error: Too many commands on one line ({count} > {max})")]
    TooManyCommands { count: usize, max: usize },
    /// The line is not valid UTF-8; `valid_up_to` bytes were fine.
    #[error("Error: Line is not valid UTF-8 (bad byte at offset {valid_up_to}). Retry")]
    InvalidEncoding { valid_up_to: usize },
}

/// Whitespace as understood by C's `isspace`, which includes `\v` and `\f`
/// unlike [`char::is_ascii_whitespace`].
fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Split `line` into commands.
///
/// Rules, applied in order:
/// - the line ends at its first NUL byte;
/// - a line longer than `limits.max_line_length` bytes is rejected, its
///   trailing newline included;
/// - the trailing newline is removed and the rest must be valid UTF-8;
/// - a line made only of whitespace yields no commands;
/// - leading whitespace is stripped;
/// - the rest is split on `;`, empty segments are skipped and segments equal
///   to exactly `" "` are dropped;
/// - if the first segment is exactly `quit`, `terminate` is set.
pub fn split_line<'a>(line: &'a str, limits: &Limits) -> Result<ParsedLine<'a>, ParsingError> {
    split_raw_line(line.as_bytes(), limits)
}

/// Same as [`split_line`], for a line read as raw bytes.
pub fn split_raw_line<'a>(
    line: &'a [u8],
    limits: &Limits,
) -> Result<ParsedLine<'a>, ParsingError> {
    let line = match line.iter().position(|&byte| byte == 0) {
        Some(nul) => &line[..nul],
        None => line,
    };

    if line.len() > limits.max_line_length {
        return Err(ParsingError::OversizedInput {
            length: line.len(),
            max: limits.max_line_length,
        });
    }

    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = std::str::from_utf8(line).map_err(|err| ParsingError::InvalidEncoding {
        valid_up_to: err.valid_up_to(),
    })?;

    let line = line.trim_start_matches(is_blank);
    if line.is_empty() {
        return Ok(ParsedLine::default());
    }

    let mut segments = line.split(';').filter(|segment| !segment.is_empty()).peekable();
    let terminate = segments
        .peek()
        .is_some_and(|first| *first == QUIT_KEYWORD);

    let commands: Vec<&str> = segments.filter(|segment| *segment != " ").collect();
    if commands.len() > limits.max_commands {
        return Err(ParsingError::TooManyCommands {
            count: commands.len(),
            max: limits.max_commands,
        });
    }

    Ok(ParsedLine {
        commands,
        terminate,
    })
}
