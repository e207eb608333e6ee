//! Error types for the normalization crate.

use cfgdiff_types::FormatId;

/// Errors that can occur while resolving or running a normalizer.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The format is known but its support was not compiled in.
    #[error("input format '{0}' is not supported by this build")]
    UnsupportedFormat(FormatId),

    /// The application dialect selector does not name a known grammar.
    #[error("unknown dialect '{name}' (available: {available})")]
    UnknownDialect { name: String, available: String },

    /// A line-oriented parser rejected the input.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// JSON parse or serialization failure.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a third-party parser or writer.
    #[error("{0}")]
    Parse(String),

    /// The input could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl NormalizeError {
    /// Create a syntax error at a 1-based line number.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Wrap any displayable parser error.
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Convenience alias for normalization results.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// A captured, recoverable normalization failure for one document.
///
/// Carried as a value on [`crate::ComparableDocument`]; the affected side of
/// the comparison is treated as an empty file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path} could not be parsed as a {format} file: {message}")]
pub struct ParseError {
    /// The format the file was parsed as.
    pub format: FormatId,
    /// Display form of the source path.
    pub path: String,
    /// The underlying parser message.
    pub message: String,
}
