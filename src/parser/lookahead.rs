//! The LookAhead algorithm: a bounded token-window probe decides which
//! alternative to commit to, then a normal recursive descent builds the
//! subtree.

use super::token_stream::TokenStream;
use crate::ast::Ast;
use crate::grammar::{Grammar, MatchOutcome, MatchSequence, Rule};

/// Default bound on how many tokens a probe will consume before giving up
/// and assuming the alternative fits.
pub const DEFAULT_LOOKAHEAD_COUNT: usize = 5;
/// Default bound on how deep a probe will recurse into non-terminals.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 16;

type AttemptStack = Vec<(String, usize)>;

pub struct LookAheadAlgorithm {
    lookahead_count: usize,
    max_recursion_depth: usize,
}

impl LookAheadAlgorithm {
    pub fn new() -> Self {
        Self {
            lookahead_count: DEFAULT_LOOKAHEAD_COUNT,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }

    pub fn with_lookahead_count(mut self, count: usize) -> Self {
        self.lookahead_count = count;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn parse(&self, tokens: &TokenStream, grammar: &Grammar, rule: &Rule) -> (Option<Ast>, usize, usize) {
        let mut stack = AttemptStack::new();
        let mut max_fail = 0usize;
        match self.build_rule(tokens, grammar, rule, 0, &mut stack, &mut max_fail) {
            Some((ast, new_pos)) => (Some(ast), new_pos, max_fail),
            None => (None, 0, max_fail),
        }
    }

    /// Picks the first alternative (in file order) whose bounded probe
    /// doesn't encounter a definite mismatch.
    fn determine_alternative(&self, tokens: &TokenStream, grammar: &Grammar, rule: &Rule, position: usize) -> Option<usize> {
        for (index, alt) in rule.alternatives.iter().enumerate() {
            // Each alternative gets its own fresh budget: tokens spent probing
            // (and rejecting) one alternative must not starve the next.
            let mut budget = 0usize;
            if self.probe_sequence(tokens, grammar, alt, position, &mut budget, 0).is_some() {
                return Some(index);
            }
        }
        None
    }

    /// Walks `alt` from `position`, consuming one unit of `budget` per
    /// terminal checked. Returns the reached position on success, `None` on a
    /// definite mismatch. Running out of budget, exhausting the stream, or
    /// hitting `max_recursion_depth` all count as success: the probe is a
    /// confirmatory window, not a full parse.
    fn probe_sequence(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        alt: &MatchSequence,
        mut position: usize,
        budget: &mut usize,
        depth: usize,
    ) -> Option<usize> {
        for gt in &alt.tokens {
            if *budget >= self.lookahead_count {
                return Some(position);
            }
            match tokens.get(position) {
                None => return Some(position),
                Some(tok) => match gt.matches(tok) {
                    MatchOutcome::Yes => {
                        position += 1;
                        *budget += 1;
                    }
                    MatchOutcome::No => return None,
                    MatchOutcome::Maybe(name) => {
                        if depth >= self.max_recursion_depth {
                            return Some(position);
                        }
                        let sub_rule = grammar.rule(name)?;
                        let mut advanced = None;
                        for sub_alt in &sub_rule.alternatives {
                            if let Some(p) = self.probe_sequence(tokens, grammar, sub_alt, position, budget, depth + 1) {
                                advanced = Some(p);
                                break;
                            }
                        }
                        position = advanced?;
                    }
                },
            }
        }
        Some(position)
    }

    /// The build phase: once `determine_alternative` commits to an
    /// alternative, parse it for real, token by token, recursing into
    /// non-terminals the same way. A left-recursion guard is kept since the
    /// build is the same kind of recursive descent Quick uses and is exposed
    /// to the same infinite-loop hazard.
    fn build_rule(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule: &Rule,
        position: usize,
        stack: &mut AttemptStack,
        max_fail: &mut usize,
    ) -> Option<(Ast, usize)> {
        let Some(chosen) = self.determine_alternative(tokens, grammar, rule, position) else {
            if position > *max_fail {
                *max_fail = position;
            }
            return None;
        };

        stack.push((rule.name.clone(), position));
        let result = self.build_alternative(tokens, grammar, &rule.name, &rule.alternatives[chosen], position, stack, max_fail);
        stack.pop();
        result
    }

    fn build_alternative(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule_name: &str,
        alt: &MatchSequence,
        start_pos: usize,
        stack: &mut AttemptStack,
        max_fail: &mut usize,
    ) -> Option<(Ast, usize)> {
        let location = tokens
            .get(start_pos)
            .map(|t| t.location)
            .unwrap_or(crate::position::SourceLocation::START);
        let mut ast = Ast::new(rule_name, location);
        let root = ast.root();
        let mut position = start_pos;

        for gt in &alt.tokens {
            let tok = match tokens.get(position) {
                Some(t) => t,
                None => {
                    if position > *max_fail {
                        *max_fail = position;
                    }
                    return None;
                }
            };
            match gt.matches(tok) {
                MatchOutcome::Yes => {
                    ast.add_child(root, tok.lexeme.clone(), tok.location);
                    position += 1;
                }
                MatchOutcome::No => {
                    if position > *max_fail {
                        *max_fail = position;
                    }
                    return None;
                }
                MatchOutcome::Maybe(name) => {
                    if stack.iter().any(|(n, p)| n == name && *p == position) {
                        if position > *max_fail {
                            *max_fail = position;
                        }
                        return None;
                    }
                    let sub_rule = grammar.rule(name)?;
                    match self.build_rule(tokens, grammar, sub_rule, position, stack, max_fail) {
                        Some((subtree, new_pos)) => {
                            ast.graft(root, subtree);
                            position = new_pos;
                        }
                        None => return None,
                    }
                }
            }
        }

        Some((ast, position))
    }
}

impl Default for LookAheadAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}
