use crate::position::SourceLocation;
use std::fmt;
use thiserror::Error;

/// A located failure surfaced from lexing or parsing: the farthest source
/// position a failing scan/match reached, plus a human-readable reason.
///
/// `location` is `None` only when a failure has no meaningful source
/// position to point at (e.g. an empty grammar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            location: Some(location),
            message: message.into(),
        }
    }

    pub fn without_location(message: impl Into<String>) -> Self {
        Self {
            location: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "Line {}, column {}: {}", loc.line, loc.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// The closed set of error kinds this crate can return.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Lex(Diagnostic),

    #[error("malformed configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Parse(Diagnostic),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn lex(location: SourceLocation, message: impl Into<String>) -> Self {
        Error::Lex(Diagnostic::new(location, message))
    }

    pub fn parse(location: SourceLocation, message: impl Into<String>) -> Self {
        Error::Parse(Diagnostic::new(location, message))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// The location carried by this error, if any.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Lex(d) | Error::Parse(d) => d.location,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
