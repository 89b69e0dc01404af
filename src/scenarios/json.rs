//! A JSON-value grammar, built entirely from the JSON configuration surface
//! (`configure_lexer`/`load_grammar`) rather than assembled from typed
//! production objects in Rust source.

use crate::lexer::configure_lexer;
use crate::grammar::load_grammar;
use crate::parser::Parser;
use serde_json::{json, Value};

pub fn lexicon() -> Value {
    json!({
        "token_generators": [
            {"name": "Paren"},
            {"name": "Delimiter"},
            {"name": "String", "config": {"process_escape_sequences": true}},
            {"name": "Number"},
            {"name": "Identifier", "config": {"keywords": ["true", "false", "null"]}},
        ]
    })
}

pub fn grammar() -> Value {
    json!({
        "initial_rule": "json-object",
        "algorithm": "quick",
        "flags": {"delete_structure_tokens": true},
        "rules": {
            "json-object": [["{", "json-member-list", "}"]],
            "json-member-list": [["json-member", ",", "json-member-list"], ["json-member"]],
            "json-member": [["@string", ":", "json-value"]],
            "json-array": [["[", "json-array-list", "]"]],
            "json-array-list": [["json-value", ",", "json-array-list"], ["json-value"]],
            "json-value": [
                ["json-object"],
                ["json-array"],
                ["@string"],
                ["@number"],
                ["true"],
                ["false"],
                ["null"]
            ]
        }
    })
}

pub fn parser() -> Parser {
    Parser::new(configure_lexer(&lexicon()).unwrap(), load_grammar(&grammar()).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, NodeId};

    fn collect(ast: &Ast, id: NodeId, text: &str, out: &mut Vec<NodeId>) {
        if ast.text(id) == text {
            out.push(id);
        }
        for child in ast.children(id) {
            collect(ast, *child, text, out);
        }
    }

    #[test]
    fn quick_parses_nested_json_object_with_array_values() {
        let parser = parser();
        let ast = parser.parse(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        assert_eq!(ast.text(ast.root()), "json-object");

        let mut members = Vec::new();
        collect(&ast, ast.root(), "json-member", &mut members);
        assert_eq!(members.len(), 2);

        let mut arrays = Vec::new();
        collect(&ast, ast.root(), "json-array", &mut arrays);
        assert_eq!(arrays.len(), 1);

        let mut trues = Vec::new();
        collect(&ast, arrays[0], "true", &mut trues);
        let mut nulls = Vec::new();
        collect(&ast, arrays[0], "null", &mut nulls);
        assert_eq!(trues.len(), 1);
        assert_eq!(nulls.len(), 1);
    }
}
