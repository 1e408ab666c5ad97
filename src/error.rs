//! Error types for docmend library.

use std::io;
use thiserror::Error;

/// Result type alias for docmend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while locating sections and applying edits.
#[derive(Error, Debug)]
pub enum Error {
    /// No table row or paragraph set matched the section's keywords, and
    /// no fallback position applied.
    #[error("Section not found: {section}")]
    SectionNotFound {
        /// Section name
        section: String,
    },

    /// No strategy in the cascade produced a match for the target text.
    #[error("Could not resolve target text: {target:?}")]
    IntentUnresolved {
        /// Target text as given by the intent
        target: String,
    },

    /// A removal did not behave as expected (stale reference, row count
    /// mismatch, wrong anchor kind).
    #[error("Structural mutation failed: {0}")]
    StructuralMutation(String),

    /// An intent is missing required fields.
    #[error("Malformed intent: {0}")]
    MalformedIntent(String),

    /// A paragraph reference does not point at a paragraph.
    #[error("Invalid paragraph reference: {0}")]
    InvalidReference(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid template or option configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error came from locating or editing, as opposed to I/O
    /// or configuration.
    pub fn is_edit_failure(&self) -> bool {
        matches!(
            self,
            Error::SectionNotFound { .. }
                | Error::IntentUnresolved { .. }
                | Error::StructuralMutation(_)
                | Error::MalformedIntent(_)
                | Error::InvalidReference(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SectionNotFound {
            section: "4_3".into(),
        };
        assert_eq!(err.to_string(), "Section not found: 4_3");

        let err = Error::IntentUnresolved {
            target: "Check fees.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not resolve target text: \"Check fees.\""
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_edit_failure());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_edit_failures() {
        assert!(Error::MalformedIntent("empty text".into()).is_edit_failure());
        assert!(Error::StructuralMutation("stale".into()).is_edit_failure());
    }
}
