//! Error types for ytnotes.

use thiserror::Error;

/// Library-level error type for note generation operations.
#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    TranscriptUnavailable(String),

    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Failed to generate notes: {0}")]
    Generation(String),

    #[error("PDF generation failed: {0}")]
    Render(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NotesError {
    /// Whether the error reflects a problem with the caller's input or the
    /// requested video rather than a fault in the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NotesError::InvalidInput(_) | NotesError::TranscriptUnavailable(_)
        )
    }
}

/// Result type alias for ytnotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(NotesError::InvalidInput("x".into()).is_client_error());
        assert!(NotesError::TranscriptUnavailable("x".into()).is_client_error());
        assert!(!NotesError::Generation("x".into()).is_client_error());
        assert!(!NotesError::Render("x".into()).is_client_error());
    }

    #[test]
    fn test_transcript_message_is_user_facing() {
        let err = NotesError::TranscriptUnavailable(
            "Transcripts are disabled for this video.".into(),
        );
        assert_eq!(err.to_string(), "Transcripts are disabled for this video.");
    }
}
