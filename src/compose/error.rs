//! Errors produced while mutating or persisting session state.

use std::io;

use thiserror::Error;

/// Errors that can occur while applying a command to [`ComposeState`] or
/// while moving it to and from a session document.
///
/// Every one of these is reported at the boundary of the single command
/// that produced it; none of them ends the session.
///
/// [`ComposeState`]: crate::compose::ComposeState
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A receiver removal named a position that does not exist.
    #[error("Receiver index {index} is out of range (the list holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A provider preset name outside the known set.
    #[error("Unrecognized preset '{0}', expected one of: gmail, outlook, yahoo")]
    UnknownPreset(String),

    /// A session document was missing a key or held a value of the wrong
    /// shape.
    #[error("Malformed session document: {0}")]
    MalformedDocument(String),

    /// File open/read/write failure at the shell boundary.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for ComposeError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = ComposeError::IndexOutOfRange { index: 3, len: 1 };
        assert_eq!(
            err.to_string(),
            "Receiver index 3 is out of range (the list holds 1)"
        );
    }

    #[test]
    fn unknown_preset_display() {
        let err = ComposeError::UnknownPreset("aol".into());
        assert_eq!(
            err.to_string(),
            "Unrecognized preset 'aol', expected one of: gmail, outlook, yahoo"
        );
    }

    #[test]
    fn json_errors_become_malformed_document() {
        let err = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("unterminated object should not parse");
        assert!(matches!(
            ComposeError::from(err),
            ComposeError::MalformedDocument(_)
        ));
    }
}
