//! Token-driven lexer: drive a cursor across source bytes, skip whitespace,
//! and ask each configured recognizer in order to produce the next token.
//! Advances past whitespace, tries each recognizer in sequence, first match
//! wins, stops once the input is exhausted (there is no EOF sentinel token),
//! and fails with a located diagnostic if nothing consumed.

pub mod config;
pub mod escape;
pub mod recognizer;

use crate::error::{Diagnostic, Error};
use crate::logger::{trace_at, Log};
use crate::position::{Cursor, SourceLocation};
use crate::token::{Token, TokenKind};
use recognizer::{Produced, Recognizer};

pub use config::configure_lexer;

/// A configured, immutable token recognizer pipeline.
///
/// A `Lexer` may be shared across concurrent parses: it holds no mutable
/// state of its own.
#[derive(Debug, Clone)]
pub struct Lexer {
    recognizers: Vec<Recognizer>,
    tab_width: usize,
    log: Log,
}

impl Lexer {
    pub fn new(recognizers: Vec<Recognizer>, tab_width: usize) -> Self {
        Self {
            recognizers,
            tab_width,
            log: Log::None,
        }
    }

    pub fn with_log(mut self, log: Log) -> Self {
        self.log = log;
        self
    }

    pub fn recognizer_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Tokenizes `source` from the start of the file, optionally keeping
    /// comment tokens in the output.
    pub fn tokenize(&self, source: &str, keep_comments: bool) -> Result<Vec<Token>, Error> {
        self.tokenize_from(source, keep_comments, SourceLocation::START)
    }

    pub fn tokenize_from(
        &self,
        source: &str,
        keep_comments: bool,
        initial_location: SourceLocation,
    ) -> Result<Vec<Token>, Error> {
        let bytes = source.as_bytes();
        let mut cursor = Cursor::new(self.tab_width);
        cursor.location = initial_location;
        let mut tokens = Vec::new();

        loop {
            let mut i = cursor.offset;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            cursor.advance_to(bytes, i);

            if cursor.offset >= bytes.len() {
                trace_at!(self.log, Log::Success, "tokenization succeeded, {} tokens", tokens.len());
                return Ok(tokens);
            }

            let location = cursor.location;
            let produced = self
                .recognizers
                .iter()
                .find_map(|r| match r.try_produce(bytes, cursor.offset, location) {
                    Ok(Produced::NoMatch) => None,
                    other => Some(other),
                });

            match produced {
                Some(Ok(Produced::Token { token, end })) => {
                    debug_assert!(end > cursor.offset, "recognizer must advance the cursor");
                    trace_at!(self.log, Log::Verbose, "produced {:?} @ {}", token.kind, location);
                    let keep = token.kind != TokenKind::Comment || keep_comments;
                    cursor.advance_to(bytes, end);
                    if keep {
                        tokens.push(token);
                    }
                }
                Some(Err(diagnostic)) => {
                    trace_at!(self.log, Log::Default, "lex error: {}", diagnostic);
                    return Err(Error::Lex(diagnostic));
                }
                Some(Ok(Produced::NoMatch)) | None => {
                    let diagnostic = Diagnostic::new(
                        location,
                        format!("Unrecognized character '{}'.", bytes[cursor.offset] as char),
                    );
                    trace_at!(self.log, Log::Default, "lex error: {}", diagnostic);
                    return Err(Error::Lex(diagnostic));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn simple_lexer() -> Lexer {
        Lexer::new(
            vec![
                Recognizer::Comment,
                Recognizer::Paren,
                Recognizer::Delimiter,
                Recognizer::StringLiteral {
                    process_escape_sequences: true,
                },
                Recognizer::Number,
                Recognizer::operator(["==", "=", "+", "*"].iter().map(|s| s.to_string()).collect()),
                Recognizer::identifier(HashSet::new()),
            ],
            4,
        )
    }

    #[test]
    fn location_points_at_first_byte_of_every_token() {
        let lexer = simple_lexer();
        let src = "foo  bar\n  baz";
        let tokens = lexer.tokenize(src, false).unwrap();
        for (tok, expected_byte) in tokens.iter().zip(["f", "b", "b"]) {
            let idx = src.find(&tok.lexeme).unwrap();
            assert_eq!(&src[idx..idx + 1], expected_byte);
        }
    }

    #[test]
    fn comment_dropped_unless_kept() {
        let lexer = simple_lexer();
        let src = "# hi\nfoo";
        let without = lexer.tokenize(src, false).unwrap();
        assert!(!without.iter().any(|t| t.kind == TokenKind::Comment));
        let with = lexer.tokenize(src, true).unwrap();
        assert!(with.iter().any(|t| t.kind == TokenKind::Comment));
    }

    #[test]
    fn unrecognized_byte_is_an_error() {
        let lexer = simple_lexer();
        let err = lexer.tokenize("foo @ bar", false).unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
    }

    #[test]
    fn stops_exactly_at_end_of_input() {
        let lexer = simple_lexer();
        let tokens = lexer.tokenize("foo", false).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].lexeme, "foo");
    }
}
