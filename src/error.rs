//! Error types for ferro-anno
//!
//! Every failure carries an [`ErrorCode`] for programmatic handling. Errors
//! raised while annotating a single transcript are isolated by the
//! [`Annotator`](crate::Annotator): they become `ERROR` candidates and never
//! abort the remaining transcripts or variants.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Sequence/reference errors (E2xxx)
    /// Sequence window needed for annotation is unavailable
    SequenceContext = 2001,
    /// Codon could not be translated
    InvalidCodon = 2002,

    // Input errors (E3xxx)
    /// Caller supplied inconsistent input
    InconsistentInput = 3001,
    /// Invalid coordinate range
    InvalidRange = 3003,

    // Variant errors (E4xxx)
    /// Unsupported variant type
    UnsupportedVariant = 4002,

    // Annotation errors (E5xxx)
    /// Resolver had no candidate to report
    NoAnnotation = 5003,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// Configuration parsing error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E2001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::SequenceContext => "sequence context unavailable",
            ErrorCode::InvalidCodon => "invalid codon",
            ErrorCode::InconsistentInput => "inconsistent input",
            ErrorCode::InvalidRange => "invalid coordinate range",
            ErrorCode::UnsupportedVariant => "unsupported variant type",
            ErrorCode::NoAnnotation => "no annotation to report",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-anno
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// The transcript sequence does not cover the window an annotator needs
    #[error("Sequence context unavailable on {transcript}: {msg}")]
    SequenceContext { transcript: String, msg: String },

    /// A codon contained non-ACGT symbols or had the wrong length
    #[error("Cannot translate codon '{codon}'")]
    Translation { codon: String },

    /// The caller handed over data that contradicts itself
    #[error("Inconsistent input: {msg}")]
    InconsistentInput { msg: String },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// Unsupported variant type
    #[error("Unsupported variant type: {variant_type}")]
    UnsupportedVariant { variant_type: String },

    /// Resolution was requested on a collection holding no candidates
    #[error("No annotation to resolve: {msg}")]
    NoAnnotation { msg: String },

    /// Configuration could not be parsed
    #[error("Configuration error: {msg}")]
    Config { msg: String },

    /// IO error
    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl AnnotationError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AnnotationError::SequenceContext { .. } => ErrorCode::SequenceContext,
            AnnotationError::Translation { .. } => ErrorCode::InvalidCodon,
            AnnotationError::InconsistentInput { .. } => ErrorCode::InconsistentInput,
            AnnotationError::InvalidCoordinates { .. } => ErrorCode::InvalidRange,
            AnnotationError::UnsupportedVariant { .. } => ErrorCode::UnsupportedVariant,
            AnnotationError::NoAnnotation { .. } => ErrorCode::NoAnnotation,
            AnnotationError::Config { .. } => ErrorCode::ConfigError,
            AnnotationError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Shorthand for a [`AnnotationError::SequenceContext`] error.
    pub fn sequence_context(transcript: impl Into<String>, msg: impl Into<String>) -> Self {
        AnnotationError::SequenceContext {
            transcript: transcript.into(),
            msg: msg.into(),
        }
    }
}

impl From<std::io::Error> for AnnotationError {
    fn from(err: std::io::Error) -> Self {
        AnnotationError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnnotationError {
    fn from(err: serde_json::Error) -> Self {
        AnnotationError::Io {
            msg: format!("JSON error: {}", err),
        }
    }
}

impl From<toml::de::Error> for AnnotationError {
    fn from(err: toml::de::Error) -> Self {
        AnnotationError::Config {
            msg: err.to_string(),
        }
    }
}
