// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible document and CLI operations return `error::Result<T>`.  Syntax
// errors keep their own `ParseError` (line + position) and are wrapped here
// unchanged, so their message reaches the user verbatim.

use thiserror::Error;

use crate::parser::ParseError;

/// Every error that dlgedit can produce.
#[derive(Debug, Error)]
pub enum DlgError {
    /// The template text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A standard I/O error (file open, read, write, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A control index outside the loaded control list.
    #[error("no control at index {0}")]
    NoSuchControl(usize),

    /// The operation needs a loaded template and there is none.
    #[error("no dialog template loaded")]
    NoTemplate,

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DlgError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;

    #[test]
    fn parse_errors_display_verbatim() {
        let e = DlgError::from(ParseError {
            kind: ParseErrorKind::MissingNewline,
            line: 7,
            pos: 120,
        });
        assert_eq!(e.to_string(), "Parse error on line 7. Missing newline character.");
    }

    #[test]
    fn io_errors_are_prefixed() {
        let e = DlgError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "I/O error: gone");
    }

    #[test]
    fn index_errors_name_the_index() {
        assert_eq!(DlgError::NoSuchControl(4).to_string(), "no control at index 4");
    }
}
