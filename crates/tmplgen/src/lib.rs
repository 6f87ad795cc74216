//! # protoc-gen-tmpl Shared Library
//!
//! Shared infrastructure for the protoc-gen-tmpl crates:
//! - **error**: Common error type for the plugin boundary
//! - **tracing**: Logging setup that keeps stdout free for the protocol
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tmplgen::error::Error;
//! use tmplgen::tracing::prefix;
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};
