use crate::error::Error;
use crate::grammar::token::{GrammarToken, TerminalMatcher};
use crate::grammar::{AlgorithmKind, Direction, Grammar, GrammarFlags, MatchSequence, Rule};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Parses a grammar JSON document into a [`Grammar`].
pub fn load_grammar(grammar_json: &Value) -> Result<Grammar, Error> {
    let obj = grammar_json
        .as_object()
        .ok_or_else(|| Error::config("grammar file must be a JSON object"))?;

    let initial_rule = obj
        .get("initial_rule")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::config("grammar is missing required key 'initial_rule'"))?
        .to_string();

    let algorithm = match obj.get("algorithm").and_then(Value::as_str) {
        Some("quick") => AlgorithmKind::Quick,
        Some("lookahead") => AlgorithmKind::LookAhead,
        Some("slow") => AlgorithmKind::Slow,
        Some(other) => return Err(Error::config(format!("unknown algorithm '{other}'"))),
        None => return Err(Error::config("grammar is missing required key 'algorithm'")),
    };

    let rules_obj = obj
        .get("rules")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::config("grammar is missing required key 'rules'"))?;

    let rule_names: HashSet<&str> = rules_obj.keys().map(|s| s.as_str()).collect();
    if !rule_names.contains(initial_rule.as_str()) {
        return Err(Error::config(format!(
            "initial_rule '{initial_rule}' is not a rule defined in 'rules'"
        )));
    }

    let mut rules = HashMap::with_capacity(rules_obj.len());
    for (name, alternatives_value) in rules_obj {
        let alternatives_array = alternatives_value
            .as_array()
            .ok_or_else(|| Error::config(format!("rule '{name}' must be an array of alternatives")))?;

        let mut alternatives = Vec::with_capacity(alternatives_array.len());
        for alt_value in alternatives_array {
            alternatives.push(parse_alternative(name, alt_value, &rule_names)?);
        }
        rules.insert(
            name.clone(),
            Rule {
                name: name.clone(),
                alternatives,
            },
        );
    }

    let flags = obj
        .get("flags")
        .map(parse_flags)
        .transpose()?
        .unwrap_or_default();

    Ok(Grammar {
        rules,
        initial_rule,
        algorithm,
        flags,
    })
}

fn parse_alternative(
    rule_name: &str,
    value: &Value,
    rule_names: &HashSet<&str>,
) -> Result<MatchSequence, Error> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::config(format!("alternative in rule '{rule_name}' must be an array")))?;

    let mut direction = Direction::LeftToRight;
    let mut string_items: Vec<&str> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(n) = item.as_i64() {
            if n == -1 && i == items.len() - 1 {
                direction = Direction::RightToLeft;
                continue;
            }
            return Err(Error::config(format!(
                "rule '{rule_name}': only a trailing -1 is allowed as a non-string alternative element"
            )));
        }
        let s = item
            .as_str()
            .ok_or_else(|| Error::config(format!("rule '{rule_name}': alternative elements must be strings")))?;
        string_items.push(s);
    }

    let tokens = string_items
        .into_iter()
        .map(|s| classify(s, rule_names))
        .collect();

    Ok(MatchSequence::new(tokens, direction))
}

fn classify(text: &str, rule_names: &HashSet<&str>) -> GrammarToken {
    if rule_names.contains(text) {
        GrammarToken::NonTerminal(text.to_string())
    } else {
        GrammarToken::Terminal(TerminalMatcher::parse(text))
    }
}

fn parse_flags(value: &Value) -> Result<GrammarFlags, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::config("'flags' must be a JSON object"))?;
    Ok(GrammarFlags {
        flatten: obj.get("flatten").and_then(Value::as_bool).unwrap_or(false),
        delete_structure_tokens: obj
            .get("delete_structure_tokens")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_a_simple_grammar() {
        let g = json!({
            "initial_rule": "expr",
            "algorithm": "quick",
            "flags": {"flatten": true, "delete_structure_tokens": true},
            "rules": {
                "expr": [["expr", "+", "expr"], ["@number"]],
            }
        });
        let grammar = load_grammar(&g).unwrap();
        assert_eq!(grammar.initial_rule, "expr");
        assert_eq!(grammar.algorithm, AlgorithmKind::Quick);
        assert!(grammar.flags.flatten);
        let rule = grammar.rule("expr").unwrap();
        assert_eq!(rule.alternatives.len(), 2);
        assert!(matches!(rule.alternatives[0].tokens[0], GrammarToken::NonTerminal(_)));
    }

    #[test]
    fn trailing_minus_one_sets_right_to_left() {
        let g = json!({
            "initial_rule": "assign",
            "algorithm": "slow",
            "rules": {
                "assign": [["@identifier", "=", "assign", -1], ["@identifier"]],
            }
        });
        let grammar = load_grammar(&g).unwrap();
        let rule = grammar.rule("assign").unwrap();
        assert_eq!(rule.alternatives[0].direction, Direction::RightToLeft);
        assert_eq!(rule.alternatives[1].direction, Direction::LeftToRight);
    }

    #[test]
    fn missing_initial_rule_is_an_error() {
        let g = json!({ "algorithm": "quick", "rules": {} });
        assert!(load_grammar(&g).is_err());
    }
}
