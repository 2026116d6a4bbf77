use std::path::PathBuf;

use thiserror::Error;

/// Source location information for error reporting and marker reports.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SourceLocation {
    /// Optional file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised around the flexible paragraph transform.
///
/// The transform itself never fails: malformed markers are plain text. These
/// variants cover parsing the host document and loading configuration.
#[derive(Debug, Error)]
pub enum FlexError {
    /// IO error while reading input or configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Dictionary key that is not a single `[a-z0-9]` character.
    #[error("Invalid dictionary key {0:?}: expected a single character in [a-z0-9]")]
    InvalidDictionaryKey(String),
    /// Configuration value with the right type but an unusable shape.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },
    /// JSON configuration failed to deserialize.
    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML configuration failed to deserialize.
    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Configuration file with an extension we do not know how to read.
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedConfigFormat(PathBuf),
}

impl FlexError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MarkdownAdapter {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Create a configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
