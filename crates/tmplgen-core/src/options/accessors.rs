//! Typed option accessors
//!
//! Custom options are advisory. A missing descriptor, missing options, an
//! unregistered extension, a malformed payload or a value of another type all
//! read as the zero value of the requested type, so a misconfigured option
//! switches a template feature off instead of failing generation.

use tmplgen::tracing::prefix;
use tmplgen_proto::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto,
};
use tracing::trace;

use super::registry::ExtensionRegistry;
use super::value::OptionValue;

/// Fully qualified names of the options messages extensions attach to.
pub mod extendee {
    pub const FILE_OPTIONS: &str = "google.protobuf.FileOptions";
    pub const MESSAGE_OPTIONS: &str = "google.protobuf.MessageOptions";
    pub const FIELD_OPTIONS: &str = "google.protobuf.FieldOptions";
    pub const ENUM_OPTIONS: &str = "google.protobuf.EnumOptions";
    pub const ENUM_VALUE_OPTIONS: &str = "google.protobuf.EnumValueOptions";
    pub const SERVICE_OPTIONS: &str = "google.protobuf.ServiceOptions";
    pub const METHOD_OPTIONS: &str = "google.protobuf.MethodOptions";
}

/// A descriptor that carries an options message.
pub trait OptionsCarrier {
    /// Options message type extended by this descriptor's custom options.
    const EXTENDEE: &'static str;

    /// Raw encoded options, if any were set.
    fn raw_options(&self) -> Option<&[u8]>;
}

macro_rules! options_carrier {
    ($descriptor:ty, $extendee:expr) => {
        impl OptionsCarrier for $descriptor {
            const EXTENDEE: &'static str = $extendee;

            fn raw_options(&self) -> Option<&[u8]> {
                self.options.as_deref()
            }
        }
    };
}

options_carrier!(FileDescriptorProto, extendee::FILE_OPTIONS);
options_carrier!(DescriptorProto, extendee::MESSAGE_OPTIONS);
options_carrier!(FieldDescriptorProto, extendee::FIELD_OPTIONS);
options_carrier!(EnumDescriptorProto, extendee::ENUM_OPTIONS);
options_carrier!(EnumValueDescriptorProto, extendee::ENUM_VALUE_OPTIONS);
options_carrier!(ServiceDescriptorProto, extendee::SERVICE_OPTIONS);
options_carrier!(MethodDescriptorProto, extendee::METHOD_OPTIONS);

/// Typed custom-option lookups against one registry.
///
/// Private extensions conventionally use field numbers 50000-99999.
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'r> {
    registry: &'r ExtensionRegistry,
}

impl<'r> OptionResolver<'r> {
    pub fn new(registry: &'r ExtensionRegistry) -> Self {
        Self { registry }
    }

    /// Resolver over the process-wide registry.
    pub fn global() -> OptionResolver<'static> {
        OptionResolver::new(ExtensionRegistry::global())
    }

    pub fn registry(&self) -> &'r ExtensionRegistry {
        self.registry
    }

    /// Untyped lookup. Every failure reads as `OptionValue::Absent`.
    pub fn value<D: OptionsCarrier>(&self, field_id: i32, descriptor: Option<&D>) -> OptionValue {
        let Some(options) = descriptor.and_then(|d| d.raw_options()) else {
            return OptionValue::Absent;
        };
        match self.registry.resolve(options, D::EXTENDEE, field_id) {
            Ok(value) => value,
            Err(err) => {
                trace!("{} {} treated as unset: {}", prefix::OPTIONS, field_id, err);
                OptionValue::Absent
            }
        }
    }

    /// String option, or `""`.
    pub fn string_option<D: OptionsCarrier>(&self, field_id: i32, descriptor: Option<&D>) -> String {
        match self.value(field_id, descriptor) {
            OptionValue::String(value) => value,
            OptionValue::Absent
            | OptionValue::Bool(_)
            | OptionValue::Int64(_)
            | OptionValue::Unsupported => String::new(),
        }
    }

    /// Boolean option, or `false`.
    pub fn bool_option<D: OptionsCarrier>(&self, field_id: i32, descriptor: Option<&D>) -> bool {
        match self.value(field_id, descriptor) {
            OptionValue::Bool(value) => value,
            OptionValue::Absent
            | OptionValue::String(_)
            | OptionValue::Int64(_)
            | OptionValue::Unsupported => false,
        }
    }

    /// 64-bit integer option, or `0`.
    pub fn int64_option<D: OptionsCarrier>(&self, field_id: i32, descriptor: Option<&D>) -> i64 {
        match self.value(field_id, descriptor) {
            OptionValue::Int64(value) => value,
            OptionValue::Absent
            | OptionValue::String(_)
            | OptionValue::Bool(_)
            | OptionValue::Unsupported => 0,
        }
    }
}
