//! Batch front-end run: tokenize, parse, then analyze.
//!
//! Each phase consumes the complete output of the previous one. Lex and
//! parse failures end the run; scope diagnostics ride along with the result.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::{Analyzer, Diagnostic};
use crate::ast::Node;
use crate::error::CompileError;
use crate::lexer::{self, SymbolTable};
use crate::parser::{DEFAULT_MAX_DEPTH, Parser};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    pub max_depth: usize,
    /// Seed the analyzer with the builtin prelude.
    pub builtins: bool,
    pub analyze: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            builtins: true,
            analyze: true,
        }
    }
}

impl CompileOptions {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Parsing compile options")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Loading {}", path.display()))
    }
}

/// Operators used and functions called, read straight off the token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub operators: Vec<String>,
    pub functions: Vec<String>,
}

impl Entities {
    /// A function is any identifier immediately followed by `(`.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut operators = BTreeSet::new();
        let mut functions = BTreeSet::new();
        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Operator => {
                    operators.insert(token.text.clone());
                }
                TokenKind::Identifier
                    if tokens
                        .get(index + 1)
                        .is_some_and(|next| next.is(TokenKind::Separator, "(")) =>
                {
                    functions.insert(token.text.clone());
                }
                _ => {}
            }
        }
        Self {
            operators: operators.into_iter().collect(),
            functions: functions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub program: Node,
    pub diagnostics: Vec<Diagnostic>,
    pub entities: Entities,
    pub node_count: usize,
}

pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let tokenized = lexer::tokenize_with_symbols(source)?;
    debug!(
        tokens = tokenized.tokens.len(),
        symbols = tokenized.symbols.len(),
        "tokenized"
    );

    let program =
        Parser::with_max_depth(tokenized.tokens.clone(), options.max_depth).parse_program()?;
    let node_count = program.node_count();
    debug!(nodes = node_count, "parsed");

    let diagnostics = if options.analyze {
        let analyzer = if options.builtins {
            Analyzer::new()
        } else {
            Analyzer::without_builtins()
        };
        analyzer.analyze(&program)
    } else {
        Vec::new()
    };
    debug!(diagnostics = diagnostics.len(), "analyzed");

    Ok(Compilation {
        entities: Entities::from_tokens(&tokenized.tokens),
        tokens: tokenized.tokens,
        symbols: tokenized.symbols,
        program,
        diagnostics,
        node_count,
    })
}
