use serde::Serialize;
use thiserror::Error;

use crate::lexer::LexError;
use crate::parser::ParseError;

/// Fatal front-end failure. Scope diagnostics are never reported this way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Serializable shape of a [`CompileError`] handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl CompileError {
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "LexError",
            CompileError::Parse(_) => "ParseError",
        }
    }

    pub fn report(&self) -> ErrorReport {
        let (line, column) = match self {
            CompileError::Lex(err) => (Some(err.line()), Some(err.column())),
            CompileError::Parse(err) => (err.line(), err.column()),
        };
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            line,
            column,
        }
    }
}
