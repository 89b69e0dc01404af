//! The Quick algorithm: top-down recursive descent with packrat memoization
//! and a left-recursion guard.
//!
//! A stack of in-flight `(rule, position)` attempts guards against left
//! recursion, a cache keyed by the same pair is erased on lookup, and the
//! farthest position any attempt failed at feeds the final diagnostic.

use super::cache::QuickCache;
use super::token_stream::TokenStream;
use crate::ast::{Ast, NodeId};
use crate::grammar::{GrammarToken, Grammar, MatchOutcome, Rule};

/// `(rule name, position)` pairs currently being attempted, guarding against
/// left recursion: trying to match the same rule at the same position while
/// it is already on the stack would recurse forever.
type AttemptStack = Vec<(String, usize)>;

pub struct QuickAlgorithm {
    cache_enabled: bool,
}

impl QuickAlgorithm {
    pub fn new() -> Self {
        Self { cache_enabled: true }
    }

    /// Toggles the packrat cache off, useful for comparing parse output with
    /// and without memoization.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Runs the initial rule at position 0. Returns the parsed subtree, the
    /// number of tokens consumed, and the farthest position any attempt
    /// failed at (for the caller to build a diagnostic on overall failure or
    /// on leftover input).
    pub fn parse(&self, tokens: &TokenStream, grammar: &Grammar, rule: &Rule) -> (Option<Ast>, usize, usize) {
        let mut cache = QuickCache::new();
        let mut stack = AttemptStack::new();
        let result = self.match_rule(tokens, grammar, rule, 0, &mut stack, &mut cache);
        match result {
            Some((ast, new_pos)) => (Some(ast), new_pos, cache.max_fail_position()),
            None => (None, 0, cache.max_fail_position()),
        }
    }

    fn match_rule(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule: &Rule,
        position: usize,
        stack: &mut AttemptStack,
        cache: &mut QuickCache,
    ) -> Option<(Ast, usize)> {
        if self.cache_enabled {
            if let Some((subtree, consumed)) = cache.take(&rule.name, position) {
                return Some((subtree, position + consumed));
            }
        }

        stack.push((rule.name.clone(), position));
        let mut result = None;
        for alt in &rule.alternatives {
            if let Some((ast, new_pos)) = self.try_alternative(tokens, grammar, &rule.name, alt, position, stack, cache) {
                result = Some((ast, new_pos));
                break;
            }
        }
        stack.pop();

        if result.is_none() {
            cache.note_fail_position(position);
        }
        result
    }

    fn try_alternative(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule_name: &str,
        alt: &crate::grammar::MatchSequence,
        start_pos: usize,
        stack: &mut AttemptStack,
        cache: &mut QuickCache,
    ) -> Option<(Ast, usize)> {
        let root_location = tokens
            .get(start_pos)
            .map(|t| t.location)
            .unwrap_or(crate::position::SourceLocation::START);
        let mut ast = Ast::new(rule_name, root_location);
        let root = ast.root();
        let mut position = start_pos;
        // Non-terminal children matched so far, for recaching on failure.
        let mut matched: Vec<(String, usize, NodeId)> = Vec::new();

        for gt in &alt.tokens {
            match gt.matches_at(tokens, position) {
                MatchOutcome::Yes => {
                    let tok = tokens.get(position).expect("Yes outcome implies a token at position");
                    ast.add_child(root, tok.lexeme.clone(), tok.location);
                    position += 1;
                }
                MatchOutcome::No => {
                    cache.note_fail_position(position);
                    self.recache_matched(&mut ast, matched, cache);
                    return None;
                }
                MatchOutcome::Maybe(name) => {
                    if stack.iter().any(|(n, p)| n == name && *p == position) {
                        cache.note_fail_position(position);
                        self.recache_matched(&mut ast, matched, cache);
                        return None;
                    }
                    let sub_rule = match grammar.rule(name) {
                        Some(r) => r,
                        None => {
                            cache.note_fail_position(position);
                            self.recache_matched(&mut ast, matched, cache);
                            return None;
                        }
                    };
                    match self.match_rule(tokens, grammar, sub_rule, position, stack, cache) {
                        Some((subtree, new_pos)) => {
                            let child_id = ast.graft(root, subtree);
                            matched.push((name.to_string(), position, child_id));
                            position = new_pos;
                        }
                        None => {
                            self.recache_matched(&mut ast, matched, cache);
                            return None;
                        }
                    }
                }
            }
        }

        Some((ast, position))
    }

    /// On alternative failure, move already-succeeded non-terminal children
    /// out of the discarded subtree and back into the cache, so a sibling
    /// alternative (or an unrelated caller) asking for the same `(rule,
    /// position)` doesn't redo the work. Mirrors `QuickParseAlgorithm.cpp`'s
    /// handling of a failed `MatchTokensAgainstRule` call.
    fn recache_matched(&self, ast: &mut Ast, matched: Vec<(String, usize, NodeId)>, cache: &mut QuickCache) {
        if !self.cache_enabled {
            return;
        }
        for (name, start_pos, node_id) in matched {
            let subtree = ast.detach(node_id);
            let span = subtree_span(&subtree);
            cache.insert(&name, start_pos, subtree, span);
        }
    }
}

impl Default for QuickAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

/// Token-level trait glue: a `GrammarToken` only knows how to judge a single
/// `&Token`; this resolves that against the stream position, treating
/// running off the end as a terminal mismatch / an unresolved non-terminal.
trait MatchAt {
    fn matches_at<'g>(&'g self, tokens: &TokenStream, position: usize) -> MatchOutcome<'g>;
}

impl MatchAt for GrammarToken {
    fn matches_at<'g>(&'g self, tokens: &TokenStream, position: usize) -> MatchOutcome<'g> {
        match tokens.get(position) {
            Some(tok) => self.matches(tok),
            None => match self {
                GrammarToken::Terminal(_) => MatchOutcome::No,
                GrammarToken::NonTerminal(name) => MatchOutcome::Maybe(name),
            },
        }
    }
}

/// Tokens consumed by a detached subtree: every leaf in this arena
/// corresponds to exactly one consumed token, so a leaf count recovers the
/// span without the caller having to thread it through separately.
fn subtree_span(ast: &Ast) -> usize {
    fn count_leaves(ast: &Ast, id: NodeId) -> usize {
        let children = ast.children(id);
        if children.is_empty() {
            1
        } else {
            children.iter().map(|&c| count_leaves(ast, c)).sum()
        }
    }
    count_leaves(ast, ast.root())
}
