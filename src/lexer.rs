//! Line-oriented tokenizer.
//!
//! Each physical line is scanned independently. Indentation changes between
//! non-blank lines become synthetic `INDENT`/`DEDENT` tokens emitted ahead of
//! the line's content tokens.

mod error;
#[cfg(test)]
mod property_tests;
mod symbols;

use crate::token::{Span, Token, TokenKind};

pub use error::{LexError, LexResult};
pub use symbols::SymbolTable;

pub const KEYWORDS: [&str; 22] = [
    "if", "elif", "else", "while", "for", "in", "def", "return", "break", "continue", "print",
    "True", "False", "None", "and", "or", "not", "is", "class", "import", "from", "pass",
];

/// Ordered so that every three-character operator precedes its prefixes.
pub const OPERATORS: [&str; 21] = [
    "**=", "//=", "**", "//", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "+", "-", "*",
    "/", "%", "=", "<", ">",
];

pub const SEPARATORS: [char; 10] = ['(', ')', '{', '}', '[', ']', ',', ':', '.', ';'];

/// Output of a full tokenization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
}

/// Tokenizer state for one invocation: indentation stack, symbol table and
/// line counter live here rather than in any shared location.
pub struct Lexer {
    indent_stack: Vec<usize>,
    symbols: SymbolTable,
    tokens: Vec<Token>,
    line: usize,
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            indent_stack: vec![0],
            symbols: SymbolTable::new(),
            tokens: Vec::new(),
            line: 0,
        }
    }

    /// Scans one physical line. Trailing line terminators are ignored.
    pub fn tokenize_line(&mut self, line: &str) -> LexResult<()> {
        self.line += 1;
        let chars = line
            .trim_end_matches(['\n', '\r'])
            .chars()
            .collect::<Vec<_>>();

        let width = chars.iter().take_while(|c| c.is_whitespace()).count();
        if width == chars.len() {
            return Ok(());
        }
        self.update_indentation(width);

        let mut pos = width;
        while pos < chars.len() {
            let ch = chars[pos];
            if ch.is_whitespace() {
                pos += 1;
            } else if ch == '#' {
                let text = chars[pos..].iter().collect::<String>();
                self.push(TokenKind::Comment, text, pos);
                break;
            } else if ch == '"' || ch == '\'' {
                pos = self.read_string(&chars, pos)?;
            } else if let Some(operator) = match_operator(&chars, pos) {
                self.push_recorded(TokenKind::Operator, operator.to_string(), pos);
                pos += operator.len();
            } else if SEPARATORS.contains(&ch) {
                self.push_recorded(TokenKind::Separator, ch.to_string(), pos);
                pos += 1;
            } else if ch.is_ascii_digit() {
                pos = self.read_number(&chars, pos);
            } else if ch.is_alphabetic() || ch == '_' {
                pos = self.read_word(&chars, pos);
            } else {
                self.push(TokenKind::Unknown, ch.to_string(), pos);
                pos += 1;
            }
        }
        Ok(())
    }

    /// Consumes the lexer. Open indentation levels are left as-is; collapsing
    /// them is up to the caller.
    pub fn finish(self) -> Tokenized {
        Tokenized {
            tokens: self.tokens,
            symbols: self.symbols,
        }
    }

    fn update_indentation(&mut self, width: usize) {
        let top = self.indent_top();
        if width > top {
            self.indent_stack.push(width);
            self.push(TokenKind::Indent, width.to_string(), 0);
        } else if width < top {
            while self.indent_top() > width {
                self.indent_stack.pop();
                self.push(TokenKind::Dedent, width.to_string(), 0);
            }
        }
    }

    fn indent_top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn read_string(&mut self, chars: &[char], start: usize) -> LexResult<usize> {
        let quote = chars[start];
        let mut literal = String::new();
        let mut pos = start + 1;
        while pos < chars.len() {
            let ch = chars[pos];
            if ch == '\\' && pos + 1 < chars.len() {
                literal.push(ch);
                literal.push(chars[pos + 1]);
                pos += 2;
            } else if ch == quote {
                self.push(TokenKind::String, literal, start);
                return Ok(pos + 1);
            } else {
                literal.push(ch);
                pos += 1;
            }
        }
        Err(LexError::UnterminatedString {
            line: self.line,
            column: start,
        })
    }

    fn read_number(&mut self, chars: &[char], start: usize) -> usize {
        let mut pos = start;
        let prefix = chars.get(start + 1).copied();
        if chars[start] == '0' && matches!(prefix, Some('x' | 'X' | 'b' | 'B')) {
            let accepts: fn(char) -> bool = if matches!(prefix, Some('x' | 'X')) {
                |c| c.is_ascii_hexdigit()
            } else {
                |c| c == '0' || c == '1'
            };
            pos += 2;
            while pos < chars.len() && accepts(chars[pos]) {
                pos += 1;
            }
        } else {
            let mut seen_dot = false;
            while pos < chars.len() {
                let ch = chars[pos];
                if ch.is_ascii_digit() {
                    pos += 1;
                } else if ch == '.' && !seen_dot {
                    seen_dot = true;
                    pos += 1;
                } else {
                    break;
                }
            }
        }
        let text = chars[start..pos].iter().collect::<String>();
        self.push_recorded(TokenKind::Number, text, start);
        pos
    }

    fn read_word(&mut self, chars: &[char], start: usize) -> usize {
        let mut pos = start + 1;
        while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
            pos += 1;
        }
        let word = chars[start..pos].iter().collect::<String>();
        if KEYWORDS.contains(&word.as_str()) {
            self.push(TokenKind::Keyword, word, start);
        } else {
            self.push_recorded(TokenKind::Identifier, word, start);
        }
        pos
    }

    fn push(&mut self, kind: TokenKind, text: String, column: usize) {
        self.tokens
            .push(Token::new(kind, text, Span::new(self.line, column)));
    }

    fn push_recorded(&mut self, kind: TokenKind, text: String, column: usize) {
        self.symbols.record(&text, kind);
        self.push(kind, text, column);
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

fn match_operator(chars: &[char], pos: usize) -> Option<&'static str> {
    [3, 2, 1].into_iter().find_map(|len| {
        let candidate = chars.get(pos..pos + len)?;
        OPERATORS
            .iter()
            .copied()
            .find(|op| op.chars().eq(candidate.iter().copied()))
    })
}

pub fn tokenize_lines<I, S>(lines: I) -> LexResult<Tokenized>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lexer = Lexer::new();
    for line in lines {
        lexer.tokenize_line(line.as_ref())?;
    }
    Ok(lexer.finish())
}

pub fn tokenize_with_symbols(source: &str) -> LexResult<Tokenized> {
    tokenize_lines(source.lines())
}

pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Ok(tokenize_with_symbols(source)?.tokens)
}
