//! Error types for Butterfly Earth

use thiserror::Error;

/// The main error type for Butterfly operations.
///
/// None of these are fatal to the application as a whole; each one degrades
/// a single widget (quiz, chat, globe) while the rest stays usable.
#[derive(Debug, Error)]
pub enum ButterflyError {
    #[error("Questions unavailable: {0}")]
    QuestionsUnavailable(String),

    #[error("Chat request failed: {0}")]
    ChatRequestFailed(String),

    #[error("Texture error: {0}")]
    TextureError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Butterfly operations
pub type Result<T> = std::result::Result<T, ButterflyError>;

impl From<serde_json::Error> for ButterflyError {
    fn from(err: serde_json::Error) -> Self {
        ButterflyError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for ButterflyError {
    fn from(err: toml::de::Error) -> Self {
        ButterflyError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: ButterflyError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ButterflyError::JsonError(_)));
    }

    #[test]
    fn test_display_includes_message() {
        let err = ButterflyError::QuestionsUnavailable("topic not found".into());
        assert_eq!(err.to_string(), "Questions unavailable: topic not found");
    }
}
