//! `gramlex` is a library for building a recursive-descent parser to turn
//! source text into an abstract syntax tree ([`Ast`]).
//!
//! # Design
//!
//! Where a hand-rolled parser wires together production objects in source
//! code, `gramlex` takes a lexicon and a grammar as data: a lexicon names a
//! pipeline of [recognizers](lexer::recognizer::Recognizer) (parens,
//! delimiters, strings, numbers, operators, identifiers, comments), and a
//! grammar is a set of named [`Rule`](grammar::Rule)s, each a list of
//! alternative match sequences of terminals and non-terminals. Both are
//! loaded from JSON at runtime rather than assembled in Rust source, so a new
//! language can be supported without recompiling.
//!
//! Three parse algorithms implement the same `(tokens, grammar) -> AST`
//! contract and are selected per-grammar:
//! - [`parser::quick`]: top-down recursive descent with packrat memoization
//!   and a left-recursion guard. Cheap and the right default for most
//!   grammars.
//! - [`parser::lookahead`]: top-down, but a bounded token-window probe picks
//!   an alternative before committing to it.
//! - [`parser::slow`]: range-based and balance-aware. Pins terminals at
//!   bracket-depth 0 first, then recurses into the gaps. Handles
//!   infix-recursive rules (`expr : expr OP expr`) that trip up a top-down
//!   parser.
//!
//! # Example
//!
//! ```
//! use gramlex::{configure_lexer, load_grammar, Parser};
//! use serde_json::json;
//!
//! let lexicon = json!({ "token_generators": [
//!     { "name": "Paren" },
//!     { "name": "Delimiter" },
//!     { "name": "Number" },
//!     { "name": "Operator", "config": { "operators": ["+", "*"] } },
//! ]});
//! let grammar = json!({
//!     "initial_rule": "expr",
//!     "algorithm": "slow",
//!     "rules": { "expr": [["expr", "+", "expr"], ["@int"]] }
//! });
//!
//! let parser = Parser::new(configure_lexer(&lexicon).unwrap(), load_grammar(&grammar).unwrap());
//! let ast = parser.parse("1 + 2").unwrap();
//! assert_eq!(ast.text(ast.root()), "expr");
//! ```

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod logger;
pub mod parser;
pub mod position;
pub mod scenarios;
pub mod token;

pub use ast::{deserialize_ast, serialize_ast, Ast};
pub use error::{Diagnostic, Error};
pub use grammar::{load_grammar, Grammar};
pub use lexer::{configure_lexer, Lexer};
pub use parser::Parser;

/// Reads and parses the file at `path`, as a free function over an
/// already-assembled [`Parser`].
pub fn parse_file(parser: &Parser, path: impl AsRef<std::path::Path>) -> Result<Ast, Error> {
    parser.parse_file(path)
}

/// Parses `text`, as a free function over an already-assembled [`Parser`].
pub fn parse(parser: &Parser, text: &str) -> Result<Ast, Error> {
    parser.parse(text)
}
