use std::fmt;

/// Failure taxonomy for the parser. Every fatal condition the scheduler can
/// hit belongs to exactly one of these kinds; none are recoverable locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Lex { at: String, reason: String },
    Syntax { at: String, reason: String },
    Structure { at: String, reason: String },
    Capacity { at: String, reason: String },
    Io { at: String, reason: String },
    /// Never constructed by this implementation: Rust aborts the process on
    /// allocation failure rather than surfacing it as a `Result`. Kept for
    /// parity with the full error taxonomy.
    Memory { at: String, reason: String },
}

impl ParseError {
    pub fn lex(at: &str, reason: impl Into<String>) -> Self {
        ParseError::Lex { at: at.to_string(), reason: reason.into() }
    }

    pub fn syntax(at: &str, reason: impl Into<String>) -> Self {
        ParseError::Syntax { at: at.to_string(), reason: reason.into() }
    }

    pub fn structure(at: &str, reason: impl Into<String>) -> Self {
        ParseError::Structure { at: at.to_string(), reason: reason.into() }
    }

    pub fn capacity(at: &str, reason: impl Into<String>) -> Self {
        ParseError::Capacity { at: at.to_string(), reason: reason.into() }
    }

    pub fn io(at: &str, reason: impl Into<String>) -> Self {
        ParseError::Io { at: at.to_string(), reason: reason.into() }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, at, reason) = match self {
            ParseError::Lex { at, reason } => ("lex error", at, reason),
            ParseError::Syntax { at, reason } => ("syntax error", at, reason),
            ParseError::Structure { at, reason } => ("structure error", at, reason),
            ParseError::Capacity { at, reason } => ("capacity error", at, reason),
            ParseError::Io { at, reason } => ("io error", at, reason),
            ParseError::Memory { at, reason } => ("memory error", at, reason),
        };
        write!(f, "{kind} in {at}: {reason}")
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::io("io", err.to_string())
    }
}
