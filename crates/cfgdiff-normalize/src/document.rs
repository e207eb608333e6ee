use cfgdiff_types::{OrderingMode, Source};
use tracing::{debug, warn};

use crate::error::{NormalizeError, ParseError};
use crate::normalizer::Normalizer;

/// One side of a comparison after normalization.
///
/// Construction never fails: an absent or zero-length source yields empty
/// canonical text, and any read or parse failure is captured as a
/// [`ParseError`] with the document treated as empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparableDocument {
    source: Source,
    ordering: OrderingMode,
    canonical_text: String,
    parse_error: Option<ParseError>,
}

impl ComparableDocument {
    /// Read and normalize `source`.
    pub fn load(source: Source, normalizer: &dyn Normalizer, ordering: OrderingMode) -> Self {
        let result = match source.path() {
            None => Ok(Vec::new()),
            Some(path) => std::fs::read(path).map_err(NormalizeError::from),
        };
        let result = result.and_then(|bytes| {
            if bytes.is_empty() {
                return Ok(String::new());
            }
            let text = String::from_utf8(bytes).map_err(NormalizeError::parse)?;
            normalizer.normalize(&text, ordering)
        });

        let mut document = Self {
            source,
            ordering,
            canonical_text: String::new(),
            parse_error: None,
        };
        match result {
            Ok(text) => {
                debug!(source = %document.source, lines = text.lines().count(), "normalized document");
                document.canonical_text = text;
            }
            Err(err) => {
                let parse_error = ParseError {
                    format: normalizer.format(),
                    path: document.source.to_string(),
                    message: err.to_string(),
                };
                warn!(source = %document.source, format = %parse_error.format, error = %parse_error.message, "treating unparseable file as empty");
                document.parse_error = Some(parse_error);
            }
        }
        document
    }

    /// Normalize in-memory `text` as if it were the contents of `source`.
    pub fn from_text(source: Source, text: &str, normalizer: &dyn Normalizer, ordering: OrderingMode) -> Self {
        let result = if text.is_empty() {
            Ok(String::new())
        } else {
            normalizer.normalize(text, ordering)
        };
        let (canonical_text, parse_error) = match result {
            Ok(text) => (text, None),
            Err(err) => (
                String::new(),
                Some(ParseError {
                    format: normalizer.format(),
                    path: source.to_string(),
                    message: err.to_string(),
                }),
            ),
        };
        Self {
            source,
            ordering,
            canonical_text,
            parse_error,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn ordering(&self) -> OrderingMode {
        self.ordering
    }

    /// The normalized text; empty when absent, empty on disk, or unparseable.
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// The canonical text split into lines, without terminators.
    pub fn lines(&self) -> Vec<&str> {
        self.canonical_text.lines().collect()
    }

    /// The captured failure, if normalization did not succeed.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_text.is_empty()
    }
}
