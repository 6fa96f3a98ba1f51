//! Splitting of a single command into its program name and arguments.

use crate::config::{Limits, QUIT_KEYWORD};

/// Words of one command: the program name followed by its arguments.
///
/// The list is length-delimited, so [`TokenList::argv`] always ends exactly
/// after the last argument.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenList<'a> {
    tokens: Vec<&'a str>,
    saw_quit: bool,
}

impl<'a> TokenList<'a> {
    /// Program name, if the command had any word at all.
    pub fn program(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Full argument vector, program name first.
    pub fn argv(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when one of the words is exactly the quit keyword.
    pub fn saw_quit(&self) -> bool {
        self.saw_quit
    }
}

/// Errors raised while splitting a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexingError {
    /// The command has more words than [`Limits::max_tokens`].
    ///
    /// `saw_quit` covers every word of the command, not only the ones before
    /// the limit.
    #[error("Error: Too many arguments in command '{program}' (more than {max})")]
    TooManyTokens {
        program: String,
        max: usize,
        saw_quit: bool,
    },
}

impl LexingError {
    /// True when the rejected command still contained the quit keyword.
    pub fn saw_quit(&self) -> bool {
        match self {
            LexingError::TooManyTokens { saw_quit, .. } => *saw_quit,
        }
    }
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}

/// Split `command` on runs of spaces, tabs and newlines.
///
/// Consecutive delimiters collapse and leading or trailing delimiters yield
/// no empty words.
pub fn split_into_tokens<'a>(
    command: &'a str,
    limits: &Limits,
) -> Result<TokenList<'a>, LexingError> {
    let mut list = TokenList::default();
    let mut words = command.split(is_delimiter).filter(|token| !token.is_empty());

    while let Some(token) = words.next() {
        if token == QUIT_KEYWORD {
            list.saw_quit = true;
        }
        if list.tokens.len() == limits.max_tokens {
            let saw_quit = list.saw_quit || words.any(|rest| rest == QUIT_KEYWORD);
            return Err(LexingError::TooManyTokens {
                program: list.program().unwrap_or(token).to_string(),
                max: limits.max_tokens,
                saw_quit,
            });
        }
        list.tokens.push(token);
    }

    Ok(list)
}
