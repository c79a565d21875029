//! Recursive-descent statement parser.
//!
//! Statements dispatch on the current token; expressions are handled by the
//! precedence-climbing routines in [`expression`]. The whole parse is
//! abandoned on the first grammar violation.

mod error;
mod expression;
mod stream;

use crate::ast::{ElifBlock, Node};
use crate::error::CompileError;
use crate::lexer;
use crate::token::{Token, TokenKind};

pub use error::{ParseError, ParseResult};
pub use stream::TokenStream;

/// Nesting limit for blocks and sub-expressions.
pub const DEFAULT_MAX_DEPTH: usize = 100;

pub const AUGMENTED_OPERATORS: [&str; 7] = ["+=", "-=", "*=", "/=", "%=", "**=", "//="];

/// Keywords that can only begin a statement; `return` stops before them.
const STATEMENT_KEYWORDS: [&str; 14] = [
    "if", "elif", "else", "while", "for", "def", "return", "break", "continue", "print", "class",
    "import", "from", "pass",
];

pub struct Parser {
    stream: TokenStream,
    open_parens: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(tokens: Vec<Token>, max_depth: usize) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            open_parens: 0,
            depth: 0,
            max_depth,
        }
    }

    pub fn parse_program(mut self) -> ParseResult<Node> {
        let mut body = Vec::new();
        loop {
            self.skip_separators();
            if self.stream.is_at_end() {
                break;
            }
            body.push(self.parse_statement()?);
        }
        Ok(Node::Program { body })
    }

    fn parse_statement(&mut self) -> ParseResult<Node> {
        let Some(token) = self.stream.current() else {
            return Err(self.unexpected("statement"));
        };
        match (token.kind, token.text.as_str()) {
            (TokenKind::Keyword, "print") => self.parse_print(),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "while") => self.parse_while(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "def") => self.parse_function_definition(),
            (TokenKind::Keyword, "return") => self.parse_return(),
            (TokenKind::Keyword, "break") => {
                self.stream.advance();
                Ok(Node::BreakStatement)
            }
            (TokenKind::Keyword, "continue") => {
                self.stream.advance();
                Ok(Node::ContinueStatement)
            }
            (TokenKind::Identifier, _) => self.parse_assignment(),
            _ => Err(self.error("statement", "invalid statement")),
        }
    }

    /// Body following a `:`. Statements run to the next DEDENT or end of
    /// input, with or without a leading INDENT. Only a block that opened
    /// with an INDENT consumes the closing DEDENT; otherwise it is left for
    /// the enclosing block.
    fn parse_block(&mut self) -> ParseResult<Vec<Node>> {
        self.enter()?;
        let indented = self.eat_kind(TokenKind::Indent);
        let mut body = Vec::new();
        loop {
            self.skip_separators();
            if self.stream.is_at_end() || self.stream.check_kind(TokenKind::Dedent) {
                break;
            }
            body.push(self.parse_statement()?);
        }
        if indented {
            self.eat_kind(TokenKind::Dedent);
        }
        self.leave();
        Ok(body)
    }

    fn parse_assignment(&mut self) -> ParseResult<Node> {
        let is_assignment = self.stream.peek().is_some_and(|token| {
            token.kind == TokenKind::Operator
                && (token.text == "=" || AUGMENTED_OPERATORS.contains(&token.text.as_str()))
        });
        if !is_assignment {
            return self.parse_expression();
        }

        let name = self.expect_identifier()?;
        let operator = self.expect_kind(TokenKind::Operator)?.text;
        let value = self.parse_expression()?;
        if operator == "=" {
            Ok(Node::assignment(name, value))
        } else {
            Ok(Node::AugmentedAssignment {
                operator,
                left: Box::new(Node::identifier(name)),
                right: Box::new(value),
            })
        }
    }

    fn parse_print(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword, "print")?;
        self.open_paren()?;
        let mut arguments = Vec::new();
        while !self.stream.check(TokenKind::Separator, ")") {
            arguments.push(self.parse_expression()?);
            if !self.stream.eat(TokenKind::Separator, ",") {
                break;
            }
        }
        self.close_paren()?;
        Ok(Node::PrintStatement { arguments })
    }

    fn parse_if(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword, "if")?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::Separator, ":")?;
        let body = self.parse_block()?;

        let mut elif_blocks = Vec::new();
        while self.stream.eat(TokenKind::Keyword, "elif") {
            let condition = self.parse_condition()?;
            self.expect(TokenKind::Separator, ":")?;
            let body = self.parse_block()?;
            elif_blocks.push(ElifBlock { condition, body });
        }

        let else_block = if self.stream.eat(TokenKind::Keyword, "else") {
            self.expect(TokenKind::Separator, ":")?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Node::IfStatement {
            condition: Box::new(condition),
            body,
            elif_blocks,
            else_block,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword, "while")?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::Separator, ":")?;
        let body = self.parse_block()?;
        Ok(Node::WhileStatement {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword, "for")?;
        let variable = self.expect_identifier()?;
        self.expect(TokenKind::Keyword, "in")?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::Separator, ":")?;
        let body = self.parse_block()?;
        Ok(Node::ForStatement {
            variable: Box::new(Node::identifier(variable)),
            iterable: Box::new(iterable),
            body,
        })
    }

    fn parse_function_definition(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword, "def")?;
        let name = self.expect_identifier()?;
        self.open_paren()?;
        let mut parameters = Vec::new();
        while !self.stream.check(TokenKind::Separator, ")") {
            parameters.push(self.expect_identifier()?);
            if !self.stream.eat(TokenKind::Separator, ",") {
                break;
            }
        }
        self.close_paren()?;
        self.expect(TokenKind::Separator, ":")?;
        let body = self.parse_block()?;
        Ok(Node::FunctionDefinition {
            name,
            parameters,
            body,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Node> {
        let keyword = self.expect(TokenKind::Keyword, "return")?;
        let value = if self.ends_statement(keyword.span.line) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        Ok(Node::ReturnStatement { value })
    }

    /// Conditions must open with a parenthesis; the parenthesised group is
    /// parsed as an ordinary expression so `(a) and (b)` is accepted too.
    fn parse_condition(&mut self) -> ParseResult<Node> {
        if !self.stream.check(TokenKind::Separator, "(") {
            return Err(self.unexpected(expected_text(TokenKind::Separator, "(")));
        }
        self.parse_expression()
    }

    fn ends_statement(&self, line: usize) -> bool {
        let Some(token) = self.stream.current() else {
            return true;
        };
        match token.kind {
            TokenKind::Dedent | TokenKind::Indent => true,
            TokenKind::Separator => token.text == ";",
            TokenKind::Keyword => STATEMENT_KEYWORDS.contains(&token.text.as_str()),
            _ => line > 0 && token.span.line > line,
        }
    }

    fn skip_separators(&mut self) {
        while self.stream.eat(TokenKind::Separator, ";") {}
    }

    fn open_paren(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Separator, "(")?;
        self.open_parens += 1;
        Ok(())
    }

    fn close_paren(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Separator, ")")?;
        self.open_parens = self.open_parens.saturating_sub(1);
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind, text: &str) -> ParseResult<Token> {
        if self.stream.check(kind, text)
            && let Some(token) = self.stream.advance()
        {
            return Ok(token);
        }
        Err(self.unexpected(expected_text(kind, text)))
    }

    fn expect_kind(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.stream.check_kind(kind)
            && let Some(token) = self.stream.advance()
        {
            return Ok(token);
        }
        Err(self.unexpected(kind.as_str()))
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        self.expect_kind(TokenKind::Identifier)
            .map(|token| token.text)
    }

    fn eat_kind(&mut self, kind: TokenKind) -> bool {
        if self.stream.check_kind(kind) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(
                format!("at most {} nested levels", self.max_depth),
                "nesting too deep",
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.leave_many(1);
    }

    /// Releases the levels taken by a run of left-associative folds.
    fn leave_many(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let message = if self.stream.is_at_end() {
            "unexpected end of input"
        } else {
            "unexpected token"
        };
        self.error(expected, message)
    }

    fn error(&self, expected: impl Into<String>, message: &str) -> ParseError {
        ParseError::new(self.stream.current().cloned(), expected, message)
    }
}

fn expected_text(kind: TokenKind, text: &str) -> String {
    format!("{kind} {text:?}")
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseResult<Node> {
    Parser::new(tokens).parse_program()
}

/// Tokenizes and parses `source` in one step.
pub fn parse(source: &str) -> Result<Node, CompileError> {
    let tokens = lexer::tokenize(source)?;
    Ok(parse_tokens(tokens)?)
}
