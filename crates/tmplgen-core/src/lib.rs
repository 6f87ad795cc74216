//! protoc-gen-tmpl Core Engine
//!
//! The parts of the plugin that sit between protoc and the templates:
//!
//! - `options` - custom option (extension) registry and typed lookups
//! - `params` - plugin parameter parsing
//! - `dispatch` - scope selection and encoder invocation per input file
//! - `output` - merging generated fragments by destination name
//! - `encoder` - the built-in template directory encoder
//! - `plugin` - request/response glue
//!
//! # Example
//!
//! ```rust
//! use tmplgen_core::params::{parse_params, GenerationMode};
//!
//! let (config, diagnostics) = parse_params("all=true,file-mode=true,bogus=1");
//! assert_eq!(config.mode(), GenerationMode::WholeFile);
//! assert_eq!(diagnostics.len(), 1);
//! ```

pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod options;
pub mod output;
pub mod params;
pub mod plugin;

// Re-export main types at crate root
pub use dispatch::{Dispatcher, EncoderContext, EncoderFactory, InputFile, Scope, TemplateEncoder};
pub use encoder::{TemplateDirEncoder, TemplateDirEncoderFactory};
pub use error::{ExtensionError, GenerateError, GenerateResult, RenderError};
pub use options::{ExtensionKind, ExtensionRegistry, ExtensionType, OptionResolver, OptionValue};
pub use output::{EmissionSink, Fragment, GeneratedFile, OutputEntry, OutputSet};
pub use params::{parse_params, Configuration, Diagnostic, GenerationMode};
