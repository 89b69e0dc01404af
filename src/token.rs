use crate::position::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed token kind set this crate's recognizers produce, a fixed
/// alphabet rather than something a grammar author defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Unknown,
    Comment,
    DelimComma,
    DelimColon,
    DelimSemi,
    Operator,
    Identifier,
    IdentifierKeyword,
    StringLiteral,
    NumberInt,
    NumberFloat,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

impl TokenKind {
    /// True for an opening bracket/paren/brace kind.
    pub fn is_opener(&self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    /// True for a closing bracket/paren/brace kind.
    pub fn is_closer(&self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TokenKind::NumberInt | TokenKind::NumberFloat)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A token produced by the lexer: `kind` + the exact (or escape-processed)
/// source text + where it started.
///
/// Created by the lexer, owned by the token list the lexer returns,
/// read-only thereafter: modeled here as a plain owned `String`, no
/// interior mutability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) @ {}", self.kind, self.lexeme, self.location)
    }
}
