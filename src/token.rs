use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Position of a token in the source: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Keyword,
    Operator,
    Separator,
    Identifier,
    Number,
    String,
    Comment,
    Indent,
    Dedent,
    Unknown,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Comment => "COMMENT",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Builds a token without position metadata, as read from the `[kind, text]`
    /// interchange format.
    pub fn bare(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, Span::default())
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.text)
    }
}

// Tokens cross the interchange boundary as `[kind, text]`; spans stay internal.
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.kind, &self.text).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, text) = <(TokenKind, String)>::deserialize(deserializer)?;
        Ok(Token::bare(kind, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_kind_text_pair() {
        let token = Token::new(TokenKind::Identifier, "x", Span::new(3, 4));
        let json = serde_json::to_string(&token).expect("serialize");
        assert_eq!(json, r#"["IDENTIFIER","x"]"#);
    }

    #[test]
    fn reads_interchange_records_without_positions() {
        let tokens: Vec<Token> =
            serde_json::from_str(r#"[["IDENTIFIER","x"],["OPERATOR","="],["NUMBER","5"]]"#)
                .expect("deserialize");
        assert_eq!(
            tokens,
            vec![
                Token::bare(TokenKind::Identifier, "x"),
                Token::bare(TokenKind::Operator, "="),
                Token::bare(TokenKind::Number, "5"),
            ]
        );
        assert_eq!(tokens[0].span(), Span::default());
    }

    #[test]
    fn displays_kind_and_quoted_text() {
        let token = Token::bare(TokenKind::Separator, ")");
        assert_eq!(token.to_string(), r#"SEPARATOR ")""#);
    }
}
