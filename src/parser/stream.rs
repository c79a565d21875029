use crate::token::{Token, TokenKind};

/// Cursor over a token sequence with one token of lookahead.
///
/// Comment tokens are trivia for the grammar and are dropped up front.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Comment)
            .collect();
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn check(&self, kind: TokenKind, text: &str) -> bool {
        self.current().is_some_and(|token| token.is(kind, text))
    }

    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|token| token.kind == kind)
    }

    pub fn peek_is(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is_some_and(|token| token.is(kind, text))
    }

    /// Consumes the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind, text: &str) -> bool {
        if self.check(kind, text) {
            self.position += 1;
            true
        } else {
            false
        }
    }
}
