//! Parse algorithm dispatch, AST post-processing, and the public `Parser`
//! facade.

pub mod cache;
pub mod lookahead;
pub mod quick;
pub mod slow;
pub mod token_stream;

use crate::ast::Ast;
use crate::error::{Diagnostic, Error};
use crate::grammar::{AlgorithmKind, Grammar};
use crate::lexer::Lexer;
use lookahead::LookAheadAlgorithm;
use quick::QuickAlgorithm;
use slow::SlowAlgorithm;
use token_stream::TokenStream;

/// Bundles a configured [`Lexer`] with a loaded [`Grammar`] and dispatches to
/// whichever algorithm the grammar names, picking it at parse time rather
/// than baking it into the type.
pub struct Parser {
    lexer: Lexer,
    grammar: Grammar,
}

impl Parser {
    pub fn new(lexer: Lexer, grammar: Grammar) -> Self {
        Self { lexer, grammar }
    }

    /// Tokenizes `text`, runs the grammar's chosen algorithm to completion,
    /// and applies any post-processing flags the grammar carries.
    pub fn parse(&self, text: &str) -> Result<Ast, Error> {
        let tokens = self.lexer.tokenize(text, false)?;
        let stream = TokenStream::new(&tokens);

        let rule = self.grammar.initial().ok_or_else(|| {
            Error::config(format!("unknown initial rule '{}'", self.grammar.initial_rule))
        })?;

        let (ast, consumed, fail_position) = match self.grammar.algorithm {
            AlgorithmKind::Quick => {
                let (ast, consumed, fail) = QuickAlgorithm::new().parse(&stream, &self.grammar, rule);
                (ast, consumed, fail)
            }
            AlgorithmKind::LookAhead => {
                let (ast, consumed, fail) = LookAheadAlgorithm::new().parse(&stream, &self.grammar, rule);
                (ast, consumed, fail)
            }
            AlgorithmKind::Slow => {
                let (ast, fail) = SlowAlgorithm::new().parse(&stream, &self.grammar, rule);
                let consumed = if ast.is_some() { stream.len() } else { 0 };
                (ast, consumed, fail)
            }
        };

        let mut ast = match ast {
            Some(ast) if consumed >= stream.len() => ast,
            Some(_) => return Err(self.fail_diagnostic(&tokens, fail_position.max(consumed))),
            None => return Err(self.fail_diagnostic(&tokens, fail_position)),
        };

        if self.grammar.flags.delete_structure_tokens {
            let set: std::collections::HashSet<String> =
                crate::grammar::STRUCTURE_TOKEN_LEXEMES.iter().map(|s| s.to_string()).collect();
            ast.remove_nodes_with_text(ast.root(), &set);
        }
        if self.grammar.flags.flatten {
            ast.flatten(ast.root());
        }

        Ok(ast)
    }

    /// Reads `path` and parses its contents the same way [`Parser::parse`] does.
    pub fn parse_file(&self, path: impl AsRef<std::path::Path>) -> Result<Ast, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse(&text)
    }

    fn fail_diagnostic(&self, tokens: &[crate::token::Token], position: usize) -> Error {
        let location = tokens.get(position).map(|t| t.location).or_else(|| tokens.last().map(|t| t.location));
        let rule_name = &self.grammar.initial_rule;
        let diagnostic = match location {
            Some(loc) => Diagnostic::new(loc, format!("Failed to parse rule '{rule_name}'.")),
            None => Diagnostic::without_location(format!("Failed to parse rule '{rule_name}': no input.")),
        };
        Error::Parse(diagnostic)
    }
}
