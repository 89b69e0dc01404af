//! Grammar model: rules, alternative match sequences, terminal/non-terminal
//! grammar tokens, direction-of-match.

pub mod config;
pub mod token;

pub use config::load_grammar;
pub use token::{GrammarToken, MatchOutcome, TerminalMatcher};

use std::collections::HashMap;
use std::fmt::Write as _;

/// Scan direction for terminal pinning within a match sequence. Only the
/// Slow algorithm honors this; Quick and LookAhead always scan left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// One alternative right-hand side of a rule: an ordered list of grammar
/// tokens plus a direction.
#[derive(Debug, Clone)]
pub struct MatchSequence {
    pub tokens: Vec<GrammarToken>,
    pub direction: Direction,
}

impl MatchSequence {
    pub fn new(tokens: Vec<GrammarToken>, direction: Direction) -> Self {
        Self { tokens, direction }
    }
}

/// Named alternatives. A rule succeeds at a position/range iff any
/// alternative succeeds; alternatives are tried in file order.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<MatchSequence>,
}

/// Post-processing flags carried by a grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarFlags {
    pub flatten: bool,
    pub delete_structure_tokens: bool,
}

/// Punctuation lexemes `delete_structure_tokens` prunes.
pub const STRUCTURE_TOKEN_LEXEMES: &[&str] = &[";", ",", "(", ")", "{", "}", "[", "]"];

/// Which parse algorithm a grammar names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    Quick,
    LookAhead,
    Slow,
}

/// A name -> rule mapping plus an initial rule, algorithm choice, and flags,
/// loaded wholesale from JSON rather than assembled from typed production
/// objects in Rust source.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub rules: HashMap<String, Rule>,
    pub initial_rule: String,
    pub algorithm: AlgorithmKind,
    pub flags: GrammarFlags,
}

impl Grammar {
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn initial(&self) -> Option<&Rule> {
        self.rule(&self.initial_rule)
    }

    /// Human-readable grammar listing, for debugging.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "initial_rule: {}", self.initial_rule);
        let _ = writeln!(out, "algorithm: {:?}", self.algorithm);
        let mut names: Vec<&String> = self.rules.keys().collect();
        names.sort();
        for name in names {
            let rule = &self.rules[name];
            for alt in &rule.alternatives {
                let body = alt
                    .tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                let dir = match alt.direction {
                    Direction::LeftToRight => "",
                    Direction::RightToLeft => " <-",
                };
                let _ = writeln!(out, "  {name} : {body}{dir}");
            }
        }
        out
    }
}
