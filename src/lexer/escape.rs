//! Escape-sequence codec for string literals.
//!
//! `\t -> TAB`, `\n -> LF`, `\r -> CR`, `\" -> "`, `\\ -> \`; any other `\X`
//! passes through as `\X` unchanged.

/// Turn the raw bytes between a string literal's quotes (as they appeared in
/// source, backslash escapes and all) into the canonicalized lexeme value.
pub fn encode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The inverse of [`encode_escapes`]: re-escape a canonical string value back
/// into the form that would encode to it. Used to state and test the
/// encode/decode round-trip property; not needed by the lexer itself, which
/// only ever encodes.
pub fn decode_escapes(canonical: &str) -> String {
    let mut out = String::with_capacity(canonical.len());
    for c in canonical.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_escapes() {
        assert_eq!(encode_escapes(r#"a\tb\nc\r\"\\d"#), "a\tb\nc\r\"\\d");
    }

    #[test]
    fn unknown_escape_passes_through() {
        assert_eq!(encode_escapes(r"\q"), r"\q");
    }

    #[test]
    fn round_trip_over_escape_alphabet() {
        let samples = [
            "plain",
            "tab\there",
            "line\nbreak",
            "carriage\rreturn",
            "quote\"here",
            "back\\slash",
            "mixed\t\n\r\"\\end",
            "",
        ];
        for s in samples {
            assert_eq!(encode_escapes(&decode_escapes(s)), s, "round trip failed for {:?}", s);
        }
    }
}
