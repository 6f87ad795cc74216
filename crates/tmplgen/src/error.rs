//! Common error types for the plugin boundary.

use thiserror::Error;

/// Errors raised while talking to protoc over stdin/stdout.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CodeGeneratorRequest
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// CodeGeneratorResponse could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using the shared Error.
pub type Result<T> = std::result::Result<T, Error>;
