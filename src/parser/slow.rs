//! The Slow algorithm: balance-aware two-phase range partitioning.
//! Pins terminals at bracket-depth 0 first (so an infix rule
//! like `expr : expr OP expr` never has to guess a split point), then fills
//! non-terminal gaps between the pins, recursing into each gap.

use super::cache::SlowCache;
use super::token_stream::TokenStream;
use crate::ast::{Ast, NodeId};
use crate::grammar::{Direction, Grammar, GrammarToken, MatchSequence, Rule, TerminalMatcher};

/// An inclusive `[min, max]` span of token indices.
pub type Range = (usize, usize);

fn range_len(range: Range) -> usize {
    range.1 - range.0 + 1
}

pub struct SlowAlgorithm;

impl SlowAlgorithm {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, tokens: &TokenStream, grammar: &Grammar, rule: &Rule) -> (Option<Ast>, usize) {
        if tokens.is_empty() {
            return (None, 0);
        }
        let mut cache = SlowCache::new();
        let whole = (0, tokens.last_index());
        let result = self.parse_range(tokens, grammar, rule, whole, &mut cache);
        match result {
            Some((ast, _)) => (Some(ast), cache.max_fail_position()),
            None => (None, cache.max_fail_position()),
        }
    }

    /// `ParseRange(range, rule)`.
    fn parse_range(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule: &Rule,
        range: Range,
        cache: &mut SlowCache,
    ) -> Option<(Ast, Range)> {
        if let Some(subtree) = cache.take(&rule.name, range) {
            return Some((subtree, range));
        }

        for alt in &rule.alternatives {
            if let Some(ast) = self.parse_range_match_sequence(tokens, grammar, &rule.name, alt, range, cache) {
                return Some((ast, range));
            }
        }

        cache.note_fail_position(range.0);
        None
    }

    /// `ParseRangeMatchSequence(range, alt, ruleName)`.
    fn parse_range_match_sequence(
        &self,
        tokens: &TokenStream,
        grammar: &Grammar,
        rule_name: &str,
        alt: &MatchSequence,
        range: Range,
        cache: &mut SlowCache,
    ) -> Option<Ast> {
        let depths = bracket_depths(tokens, range);
        let mut sub_ranges: Vec<Option<Range>> = vec![None; alt.tokens.len()];

        // Phase 1: pin terminals at bracket-depth 0.
        let terminal_order: Vec<usize> = match alt.direction {
            Direction::LeftToRight => (0..alt.tokens.len()).collect(),
            Direction::RightToLeft => (0..alt.tokens.len()).rev().collect(),
        };

        let mut cursor = match alt.direction {
            Direction::LeftToRight => range.0 as isize,
            Direction::RightToLeft => range.1 as isize,
        };

        for i in terminal_order {
            let GrammarToken::Terminal(matcher) = &alt.tokens[i] else {
                continue;
            };
            let pos = scan_for_match(tokens, matcher, range, &depths, cursor, alt.direction)?;
            sub_ranges[i] = Some((pos, pos));
            cursor = match alt.direction {
                Direction::LeftToRight => pos as isize + 1,
                Direction::RightToLeft => pos as isize - 1,
            };
        }

        // Phase 2: fill non-terminal gaps between the pinned terminals.
        for i in 0..alt.tokens.len() {
            if !matches!(alt.tokens[i], GrammarToken::NonTerminal(_)) {
                continue;
            }
            let min = if i == 0 {
                range.0
            } else {
                sub_ranges[i - 1]?.1 + 1
            };
            let max = if i == alt.tokens.len() - 1 {
                range.1
            } else {
                sub_ranges[i + 1]?.0.checked_sub(1)?
            };
            sub_ranges[i] = Some((min, max));
        }

        let resolved: Vec<Range> = sub_ranges.into_iter().collect::<Option<Vec<_>>>()?;
        validate_partition(&resolved, range)?;

        // Phase 3: build, recaching already-succeeded non-terminal children on
        // partial failure so a sibling alternative doesn't redo the work.
        let root_location = tokens.get(range.0).map(|t| t.location)?;
        let mut ast = Ast::new(rule_name, root_location);
        let root = ast.root();
        let mut matched: Vec<(String, Range, NodeId)> = Vec::new();

        for (i, gt) in alt.tokens.iter().enumerate() {
            let sub_range = resolved[i];
            match gt {
                GrammarToken::Terminal(matcher) => {
                    let tok = tokens.get(sub_range.0)?;
                    let wrapper = ast.add_child(root, matcher.pattern_text(), tok.location);
                    ast.add_child(wrapper, tok.lexeme.clone(), tok.location);
                }
                GrammarToken::NonTerminal(name) => {
                    let sub_rule = match grammar.rule(name) {
                        Some(r) => r,
                        None => {
                            recache(&mut ast, matched, cache);
                            cache.note_fail_position(sub_range.0);
                            return None;
                        }
                    };
                    match self.parse_range(tokens, grammar, sub_rule, sub_range, cache) {
                        Some((subtree, _)) => {
                            let child_id = ast.graft(root, subtree);
                            matched.push((name.clone(), sub_range, child_id));
                        }
                        None => {
                            recache(&mut ast, matched, cache);
                            return None;
                        }
                    }
                }
            }
        }

        Some(ast)
    }
}

impl Default for SlowAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

fn recache(ast: &mut Ast, matched: Vec<(String, Range, NodeId)>, cache: &mut SlowCache) {
    for (name, range, node_id) in matched {
        let subtree = ast.detach(node_id);
        cache.insert(&name, range, subtree);
    }
}

fn validate_partition(sub_ranges: &[Range], whole: Range) -> Option<()> {
    if sub_ranges.is_empty() {
        return None;
    }
    for r in sub_ranges {
        if r.0 > r.1 {
            return None;
        }
    }
    if sub_ranges[0].0 != whole.0 {
        return None;
    }
    if sub_ranges.last().unwrap().1 != whole.1 {
        return None;
    }
    for pair in sub_ranges.windows(2) {
        if pair[0].1 + 1 != pair[1].0 {
            return None;
        }
    }
    let total: usize = sub_ranges.iter().map(|r| range_len(*r)).sum();
    if total != range_len(whole) {
        return None;
    }
    Some(())
}

/// Running bracket depth of every position in `range`, relative to
/// `range.0` (depth 0 at the start of the range regardless of unmatched
/// brackets outside it). An opener's own depth is recorded *before* the
/// increment and a closer's *after* the decrement, so a matching pair sits
/// at the same depth as the tokens immediately outside it.
fn bracket_depths(tokens: &TokenStream, range: Range) -> Vec<usize> {
    let mut depths = Vec::with_capacity(range_len(range));
    let mut depth = 0usize;
    for pos in range.0..=range.1 {
        let Some(tok) = tokens.get(pos) else { break };
        if tok.kind.is_closer() {
            depth = depth.saturating_sub(1);
            depths.push(depth);
        } else if tok.kind.is_opener() {
            depths.push(depth);
            depth += 1;
        } else {
            depths.push(depth);
        }
    }
    depths
}

/// `ScanForMatch`: the next position in `range`, scanning from `cursor` in
/// `direction`, where the token is at bracket-depth 0 and matches `matcher`.
fn scan_for_match(
    tokens: &TokenStream,
    matcher: &TerminalMatcher,
    range: Range,
    depths: &[usize],
    cursor: isize,
    direction: Direction,
) -> Option<usize> {
    let mut pos = cursor;
    loop {
        if pos < range.0 as isize || pos > range.1 as isize {
            return None;
        }
        let idx = pos as usize;
        let depth = depths[idx - range.0];
        if depth == 0 {
            if let Some(tok) = tokens.get(idx) {
                if matcher.matches(tok) {
                    return Some(idx);
                }
            }
        }
        pos = match direction {
            Direction::LeftToRight => pos + 1,
            Direction::RightToLeft => pos - 1,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{AlgorithmKind, GrammarFlags};
    use crate::position::SourceLocation;
    use crate::token::{Token, TokenKind};
    use std::collections::HashMap;

    fn tok(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, SourceLocation::START)
    }

    fn lit(s: &str) -> GrammarToken {
        GrammarToken::Terminal(TerminalMatcher::parse(s))
    }

    fn nt(name: &str) -> GrammarToken {
        GrammarToken::NonTerminal(name.to_string())
    }

    /// `expr : expr "+" expr | @int`, left-associative (default direction).
    fn expr_grammar() -> Grammar {
        let mut rules = HashMap::new();
        rules.insert(
            "expr".to_string(),
            Rule {
                name: "expr".to_string(),
                alternatives: vec![
                    MatchSequence::new(vec![nt("expr"), lit("+"), nt("expr")], Direction::LeftToRight),
                    MatchSequence::new(vec![GrammarToken::Terminal(TerminalMatcher::ClassInt)], Direction::LeftToRight),
                ],
            },
        );
        Grammar {
            rules,
            initial_rule: "expr".to_string(),
            algorithm: AlgorithmKind::Slow,
            flags: GrammarFlags::default(),
        }
    }

    #[test]
    fn splits_on_top_level_operator() {
        let grammar = expr_grammar();
        let tokens = vec![
            tok(TokenKind::NumberInt, "1"),
            tok(TokenKind::Operator, "+"),
            tok(TokenKind::NumberInt, "2"),
        ];
        let stream = TokenStream::new(&tokens);
        let algo = SlowAlgorithm::new();
        let (ast, _) = algo.parse(&stream, &grammar, grammar.initial().unwrap());
        let ast = ast.expect("should parse");
        assert_eq!(ast.text(ast.root()), "expr");
        assert_eq!(ast.children(ast.root()).len(), 3);
    }

    #[test]
    fn ignores_operator_text_inside_nested_brackets() {
        // grammar: group : "(" expr ")"; expr now tries group as an operand too.
        let mut grammar = expr_grammar();
        grammar.rules.get_mut("expr").unwrap().alternatives.insert(
            0,
            MatchSequence::new(vec![nt("group")], Direction::LeftToRight),
        );
        grammar.rules.insert(
            "group".to_string(),
            Rule {
                name: "group".to_string(),
                alternatives: vec![MatchSequence::new(
                    vec![lit("("), nt("expr"), lit(")")],
                    Direction::LeftToRight,
                )],
            },
        );

        let tokens = vec![
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::NumberInt, "1"),
            tok(TokenKind::Operator, "+"),
            tok(TokenKind::NumberInt, "2"),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Operator, "+"),
            tok(TokenKind::NumberInt, "3"),
        ];
        let stream = TokenStream::new(&tokens);
        let algo = SlowAlgorithm::new();
        let (ast, _) = algo.parse(&stream, &grammar, grammar.initial().unwrap());
        let ast = ast.expect("should parse despite the nested '+' ");
        // Top-level split must be on the *outer* '+' (index 5), not the one
        // buried inside the parens at depth 1.
        assert_eq!(ast.children(ast.root()).len(), 3);
    }

    #[test]
    fn reports_failure_without_panicking_on_unbalanced_input() {
        let grammar = expr_grammar();
        let tokens = vec![tok(TokenKind::Operator, "+"), tok(TokenKind::NumberInt, "2")];
        let stream = TokenStream::new(&tokens);
        let algo = SlowAlgorithm::new();
        let (ast, _) = algo.parse(&stream, &grammar, grammar.initial().unwrap());
        assert!(ast.is_none());
    }
}
