/// Word that ends the session when it shows up as a whole token.
pub const QUIT_KEYWORD: &str = "quit";

/// Prompt printed before every interactive read.
pub const DEFAULT_PROMPT: &str = "Shell--->";

/// Upper bounds applied while splitting a line.
///
/// Exceeding any of them is reported as an error instead of silently
/// truncating the line or dropping commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of bytes in one line, not counting the trailing newline.
    pub max_line_length: usize,
    /// Maximum number of `;`-separated commands on one line.
    pub max_commands: usize,
    /// Maximum number of words (program name included) in one command.
    pub max_tokens: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_length: 512,
            max_commands: 64,
            max_tokens: 256,
        }
    }
}

/// Static settings of an [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub limits: Limits,
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = ShellConfig::default();
        assert_eq!(config.limits.max_line_length, 512);
        assert_eq!(config.limits.max_commands, 64);
        assert_eq!(config.limits.max_tokens, 256);
        assert_eq!(config.prompt, "Shell--->");
    }
}
