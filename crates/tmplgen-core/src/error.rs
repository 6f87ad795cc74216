//! Error types for option resolution, rendering and generation.

use thiserror::Error;

/// Errors from looking up or decoding a custom extension value.
///
/// None of these reach the user: the typed accessors collapse every variant
/// into the zero value of the requested type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtensionError {
    /// No extension with this number is registered against the options type
    #[error("extension {number} not found for {extendee}")]
    NotFound { extendee: String, number: i32 },

    /// The options payload is not valid protobuf
    #[error("malformed options payload: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The field is encoded with a wire type its declared type never uses
    #[error("extension {number} has wire type {found}, expected {expected}")]
    WireTypeMismatch {
        number: i32,
        expected: String,
        found: String,
    },

    /// Length prefix runs past the end of the payload
    #[error("extension {number} is truncated")]
    Truncated { number: i32 },

    /// String extension holding non UTF-8 bytes
    #[error("extension {number} is not valid utf-8")]
    InvalidUtf8 { number: i32 },
}

/// Errors raised by a template encoder.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template directory could not be walked
    #[error("template walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Template file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `{{` without a matching `}}`
    #[error("{template}: unclosed placeholder at byte {offset}")]
    UnclosedPlaceholder { template: String, offset: usize },

    /// Placeholder that does not name anything in scope
    #[error("{template}: unknown placeholder '{name}'")]
    UnknownPlaceholder { template: String, name: String },

    /// Failure reported by an external encoder implementation
    #[error("{0}")]
    Encoder(String),
}

/// Fatal generation errors. Any of these aborts the whole invocation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Template encoder failed for one input file
    #[error("{file}: {source}")]
    Render {
        file: String,
        #[source]
        source: RenderError,
    },
}

/// Result type for generation
pub type GenerateResult<T> = Result<T, GenerateError>;
