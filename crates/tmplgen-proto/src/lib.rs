//! Protocol Buffer types for the protoc plugin boundary.
//!
//! Request and descriptor types are generated at build time from
//! `proto/plugin.proto`, a wire-compatible subset of protoc's own
//! `plugin.proto`/`descriptor.proto` in which every `options` field is kept as
//! raw bytes. The response side needs no extension data and reuses
//! `prost_types::compiler`.
//!
//! Uses protoc-bin-vendored to avoid requiring protoc installation.

pub mod plugin {
    include!(concat!(env!("OUT_DIR"), "/tmplgen.plugin.rs"));
}

pub use plugin::field_descriptor_proto::{Label as FieldLabel, Type as FieldType};
pub use plugin::*;
pub use prost_types::compiler::code_generator_response::{Feature, File as ResponseFile};
pub use prost_types::compiler::CodeGeneratorResponse;
