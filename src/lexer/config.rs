use crate::error::Error;
use crate::lexer::recognizer::Recognizer;
use crate::lexer::Lexer;
use serde::Deserialize;
use std::collections::HashSet;

/// Lexicon file shape:
/// `{ "token_generators": [ { "name": "...", "config": {...} } ], "tab_width": N }`.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    token_generators: Vec<GeneratorEntry>,
    #[serde(default)]
    tab_width: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GeneratorEntry {
    name: String,
    #[serde(default)]
    config: serde_json::Value,
}

#[derive(Debug, Deserialize, Default)]
struct StringConfig {
    #[serde(default)]
    process_escape_sequences: bool,
}

#[derive(Debug, Deserialize, Default)]
struct OperatorConfig {
    #[serde(default)]
    operators: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct IdentifierConfig {
    #[serde(default)]
    keywords: Vec<String>,
}

/// Parses a lexicon JSON document and assembles the configured [`Lexer`].
pub fn configure_lexer(lexicon_json: &serde_json::Value) -> Result<Lexer, Error> {
    let file: LexiconFile = serde_json::from_value(lexicon_json.clone())
        .map_err(|e| Error::config(format!("invalid lexicon configuration: {e}")))?;

    let mut recognizers = Vec::with_capacity(file.token_generators.len());
    for entry in &file.token_generators {
        recognizers.push(build_recognizer(entry)?);
    }

    Ok(Lexer::new(recognizers, file.tab_width.unwrap_or(4)))
}

fn build_recognizer(entry: &GeneratorEntry) -> Result<Recognizer, Error> {
    match entry.name.as_str() {
        "Paren" => Ok(Recognizer::Paren),
        "Delimiter" => Ok(Recognizer::Delimiter),
        "Comment" => Ok(Recognizer::Comment),
        "String" => {
            let cfg: StringConfig = parse_config(&entry.config)?;
            Ok(Recognizer::StringLiteral {
                process_escape_sequences: cfg.process_escape_sequences,
            })
        }
        "Number" => Ok(Recognizer::Number),
        "Operator" => {
            let cfg: OperatorConfig = parse_config(&entry.config)?;
            let operators: HashSet<String> = cfg.operators.into_iter().collect();
            Ok(Recognizer::operator(operators))
        }
        "Identifier" => {
            let cfg: IdentifierConfig = parse_config(&entry.config)?;
            let keywords: HashSet<String> = cfg.keywords.into_iter().collect();
            Ok(Recognizer::identifier(keywords))
        }
        other => Err(Error::config(format!("unknown token generator '{other}'"))),
    }
}

fn parse_config<T: for<'de> Deserialize<'de> + Default>(value: &serde_json::Value) -> Result<T, Error> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value.clone()).map_err(|e| Error::config(format!("invalid recognizer config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_a_full_lexicon() {
        let lexicon = json!({
            "token_generators": [
                {"name": "Paren"},
                {"name": "Delimiter"},
                {"name": "String", "config": {"process_escape_sequences": true}},
                {"name": "Number"},
                {"name": "Operator", "config": {"operators": ["+", "==", "="]}},
                {"name": "Identifier", "config": {"keywords": ["if", "else"]}},
                {"name": "Comment"},
            ]
        });
        let lexer = configure_lexer(&lexicon).unwrap();
        assert_eq!(lexer.recognizer_count(), 7);
    }

    #[test]
    fn rejects_unknown_generator() {
        let lexicon = json!({ "token_generators": [ {"name": "Nope"} ] });
        assert!(configure_lexer(&lexicon).is_err());
    }
}
