//! Property-based tests for the tokenizer.
//!
//! 1. Token texts reassemble the non-whitespace input, including when
//!    fragments touch with no whitespace between them
//! 2. Balanced block structure yields as many DEDENTs as INDENTs
//! 3. Tokenizing is deterministic
//! 4. The widest operator always wins

use proptest::prelude::*;

use super::{OPERATORS, tokenize};
use crate::token::TokenKind;

const FRAGMENTS: &[&str] = &[
    "x", "value", "_tmp", "n2", "if", "while", "not", "True", "None", "0", "42", "3.14", "0xFF",
    "0b101", "+", "-", "*", "/", "%", "**", "//", "==", "!=", "<=", ">=", "=", "+=", "**=", "(",
    ")", "[", "]", ",", ":", ".", ";", "@", "$",
];

fn fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

const JOINERS: &[&str] = &["", "", " ", "\t"];

fn line_of_fragments() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 1..12).prop_map(|parts| parts.join(" "))
}

/// Fragments glued together, mostly with nothing in between, so operators,
/// numbers and words abut (`x**=2`, `a//b`, `n2(`, `3.14.`).
fn packed_line() -> impl Strategy<Value = String> {
    prop::collection::vec((fragment(), prop::sample::select(JOINERS)), 1..16).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, joiner)| format!("{fragment}{joiner}"))
            .collect()
    })
}

fn rebuilt_text(line: &str) -> String {
    tokenize(line)
        .expect("fragments always lex")
        .iter()
        .filter(|token| !matches!(token.kind, TokenKind::Indent | TokenKind::Dedent))
        .map(|token| token.text.as_str())
        .collect()
}

fn without_whitespace(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Indentation depths for a block-structured program that returns to the
/// top level on its final line.
fn block_depths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(-3i32..=1, 0..24).prop_map(|deltas| {
        let mut depth = 0i32;
        let mut depths = vec![0usize];
        for delta in deltas {
            depth = (depth + delta).max(0);
            depths.push(depth as usize);
        }
        depths.push(0);
        depths
    })
}

proptest! {
    #[test]
    fn token_texts_reassemble_input(line in line_of_fragments()) {
        prop_assert_eq!(rebuilt_text(&line), without_whitespace(&line));
    }

    #[test]
    fn abutting_fragments_reassemble_input(line in packed_line()) {
        prop_assert_eq!(rebuilt_text(&line), without_whitespace(&line));
    }

    #[test]
    fn balanced_blocks_balance_indent_tokens(depths in block_depths()) {
        let source = depths
            .iter()
            .map(|depth| format!("{}x = 1", "    ".repeat(*depth)))
            .collect::<Vec<_>>()
            .join("\n");
        let tokens = tokenize(&source).expect("assignments always lex");
        let indents = tokens.iter().filter(|token| token.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|token| token.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }

    #[test]
    fn tokenizing_is_deterministic(line in packed_line()) {
        let first = tokenize(&line).expect("fragments always lex");
        let second = tokenize(&line).expect("fragments always lex");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn widest_operator_wins(operator in prop::sample::select(OPERATORS.to_vec())) {
        let source = format!("a {operator} b");
        let tokens = tokenize(&source).expect("operators always lex");
        prop_assert_eq!(tokens.len(), 3);
        prop_assert_eq!(tokens[1].kind, TokenKind::Operator);
        prop_assert_eq!(tokens[1].text.as_str(), operator);

        let packed = tokenize(&format!("a{operator}b")).expect("operators always lex");
        prop_assert_eq!(packed.len(), 3);
        prop_assert_eq!(packed[1].text.as_str(), operator);
    }
}
