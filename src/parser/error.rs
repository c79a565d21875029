use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}: expected {expected}, found {}", describe_found(.found))]
pub struct ParseError {
    /// Offending token, `None` when input ran out.
    pub found: Option<Token>,
    pub expected: String,
    pub message: String,
}

impl ParseError {
    pub fn new(found: Option<Token>, expected: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            found,
            expected: expected.into(),
            message: message.into(),
        }
    }

    /// Source line of the offending token, when it carries one.
    pub fn line(&self) -> Option<usize> {
        self.found
            .as_ref()
            .map(|token| token.span.line)
            .filter(|line| *line > 0)
    }

    pub fn column(&self) -> Option<usize> {
        self.line()
            .and(self.found.as_ref().map(|token| token.span.column))
    }
}

fn describe_found(found: &Option<Token>) -> String {
    match found {
        Some(token) if token.span.line > 0 => format!(
            "{token} at line {}, column {}",
            token.span.line, token.span.column
        ),
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
