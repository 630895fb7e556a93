//! Errors and warnings

use thiserror::Error;

/// Result type alias for solving
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Malformed surface syntax, with byte offsets into the text being parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("formula is empty")]
    EmptyInput,

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { offset: usize, ch: char },

    #[error("unexpected word {word:?} at offset {offset} (names must be quoted)")]
    UnexpectedWord { offset: usize, word: String },

    #[error("unterminated name starting at offset {offset}")]
    UnterminatedName { offset: usize },

    #[error("empty name at offset {offset}")]
    EmptyName { offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        offset: usize,
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("invalid assignment {0:?}, expected `name := true` or `name := false`")]
    BadAssignment(String),
}

/// Failures of the formula store
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("formula store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("formula store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that can abort a solve
#[derive(Debug, Error)]
pub enum Error {
    /// Syntax error in the input or in a stored formula it references
    #[error("syntax error in {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// A stored formula ends up referencing itself
    #[error("cyclic formula reference: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A pre-assigned variable that doesn't occur anywhere in the expanded
/// formula.  Not fatal: it's reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable {0:?} not found in the formula")]
pub struct UnknownVariable(pub String);
