//! Precedence-climbing expression grammar, loosest binding first:
//! `or`, `and`, comparisons, `+ -`, `* / % //`, `**`, prefix `+ - not`,
//! then primaries. Every binary level is left-associative except `**`.

use super::{ParseError, ParseResult, Parser, expected_text};
use crate::ast::Node;
use crate::token::TokenKind;

const COMPARISON_OPERATORS: [&str; 6] = ["==", "!=", "<", ">", "<=", ">="];
const TERM_OPERATORS: [&str; 2] = ["+", "-"];
const FACTOR_OPERATORS: [&str; 4] = ["*", "/", "%", "//"];
const UNARY_OPERATORS: [&str; 2] = ["+", "-"];

impl Parser {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Node> {
        self.enter()?;
        let expr = self.parse_or()?;
        self.leave();
        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_and()?;
        let mut folds = 0;
        while self.stream.eat(TokenKind::Keyword, "or") {
            self.fold(&mut folds)?;
            let right = self.parse_and()?;
            expr = Node::binary("or", expr, right);
        }
        self.leave_many(folds);
        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_comparison()?;
        let mut folds = 0;
        while self.stream.eat(TokenKind::Keyword, "and") {
            self.fold(&mut folds)?;
            let right = self.parse_comparison()?;
            expr = Node::binary("and", expr, right);
        }
        self.leave_many(folds);
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_term()?;
        let mut folds = 0;
        while let Some(operator) = self.comparison_operator() {
            self.fold(&mut folds)?;
            let right = self.parse_term()?;
            expr = Node::binary(operator, expr, right);
        }
        self.leave_many(folds);
        Ok(expr)
    }

    /// Consumes a comparison operator, joining the two-keyword forms
    /// `is not` and `not in` into one operator.
    fn comparison_operator(&mut self) -> Option<&'static str> {
        if let Some(operator) = self.eat_operator(&COMPARISON_OPERATORS) {
            return Some(operator);
        }
        if self.stream.eat(TokenKind::Keyword, "is") {
            if self.stream.eat(TokenKind::Keyword, "not") {
                return Some("is not");
            }
            return Some("is");
        }
        if self.stream.eat(TokenKind::Keyword, "in") {
            return Some("in");
        }
        if self.stream.check(TokenKind::Keyword, "not")
            && self.stream.peek_is(TokenKind::Keyword, "in")
        {
            self.stream.advance();
            self.stream.advance();
            return Some("not in");
        }
        None
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_factor()?;
        let mut folds = 0;
        while let Some(operator) = self.eat_operator(&TERM_OPERATORS) {
            self.fold(&mut folds)?;
            let right = self.parse_factor()?;
            expr = Node::binary(operator, expr, right);
        }
        self.leave_many(folds);
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_power()?;
        let mut folds = 0;
        while let Some(operator) = self.eat_operator(&FACTOR_OPERATORS) {
            self.fold(&mut folds)?;
            let right = self.parse_power()?;
            expr = Node::binary(operator, expr, right);
        }
        self.leave_many(folds);
        Ok(expr)
    }

    fn parse_power(&mut self) -> ParseResult<Node> {
        let base = self.parse_unary()?;
        if self.stream.eat(TokenKind::Operator, "**") {
            self.enter()?;
            let exponent = self.parse_power()?;
            self.leave();
            return Ok(Node::binary("**", base, exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let operator = match self.eat_operator(&UNARY_OPERATORS) {
            Some(operator) => Some(operator),
            None if self.stream.eat(TokenKind::Keyword, "not") => Some("not"),
            None => None,
        };
        let Some(operator) = operator else {
            return self.parse_primary();
        };
        self.enter()?;
        let right = self.parse_unary()?;
        self.leave();
        Ok(Node::unary(operator, right))
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let Some(token) = self.stream.current() else {
            return Err(self.missing_operand());
        };
        match token.kind {
            TokenKind::Number => {
                let value = token.text.clone();
                self.stream.advance();
                Ok(Node::number(value))
            }
            TokenKind::String => {
                let value = token.text.clone();
                self.stream.advance();
                Ok(Node::string(value))
            }
            TokenKind::Identifier => {
                let name = token.text.clone();
                self.stream.advance();
                self.parse_calls(Node::identifier(name))
            }
            TokenKind::Keyword if matches!(token.text.as_str(), "True" | "False") => {
                let value = token.text == "True";
                self.stream.advance();
                Ok(Node::boolean(value))
            }
            TokenKind::Keyword if token.text == "None" => {
                self.stream.advance();
                Ok(Node::NoneLiteral)
            }
            TokenKind::Separator if token.text == "(" => {
                self.open_paren()?;
                let expr = self.parse_expression()?;
                self.close_paren()?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Wraps `callee` in one call node per directly following argument list,
    /// so `f(x)(y)` nests left to right.
    fn parse_calls(&mut self, mut callee: Node) -> ParseResult<Node> {
        let mut folds = 0;
        while self.stream.check(TokenKind::Separator, "(") {
            self.fold(&mut folds)?;
            self.open_paren()?;
            let mut arguments = Vec::new();
            while !self.stream.check(TokenKind::Separator, ")") {
                arguments.push(self.parse_expression()?);
                if !self.stream.eat(TokenKind::Separator, ",") {
                    break;
                }
            }
            self.close_paren()?;
            callee = Node::call(callee, arguments);
        }
        self.leave_many(folds);
        Ok(callee)
    }

    /// Each fold deepens the left spine of the tree, so it counts against
    /// the nesting limit until the enclosing loop finishes.
    fn fold(&mut self, folds: &mut usize) -> ParseResult<()> {
        self.enter()?;
        *folds += 1;
        Ok(())
    }

    /// Input ended where an operand was required. Inside an open parenthesis
    /// the closing `)` is what the caller is missing.
    fn missing_operand(&self) -> ParseError {
        if self.open_parens > 0 {
            self.unexpected(expected_text(TokenKind::Separator, ")"))
        } else {
            self.unexpected("expression")
        }
    }

    fn eat_operator(&mut self, operators: &[&'static str]) -> Option<&'static str> {
        let token = self.stream.current()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        let operator = operators
            .iter()
            .copied()
            .find(|operator| *operator == token.text)?;
        self.stream.advance();
        Some(operator)
    }
}
