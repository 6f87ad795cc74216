//! Extension type registry

use std::collections::HashMap;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tmplgen::tracing::prefix;
use tmplgen_proto::{DescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto};
use tracing::{debug, trace};

use super::value::{decode_extension, OptionValue};
use crate::error::ExtensionError;

lazy_static! {
    static ref GLOBAL_REGISTRY: ExtensionRegistry = ExtensionRegistry::new();
}

/// Declared value type of an extension, as far as decoding cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    String,
    Bool,
    /// `int64`, varint encoded
    Int64,
    /// `sint64`, zigzag varint
    Sint64,
    /// `sfixed64`, little-endian 8 bytes
    Sfixed64,
    /// Any other declared type; carries the raw `FieldDescriptorProto.Type`
    Other(i32),
}

impl ExtensionKind {
    pub fn from_field_type(ty: FieldType) -> Self {
        match ty {
            FieldType::String => ExtensionKind::String,
            FieldType::Bool => ExtensionKind::Bool,
            FieldType::Int64 => ExtensionKind::Int64,
            FieldType::Sint64 => ExtensionKind::Sint64,
            FieldType::Sfixed64 => ExtensionKind::Sfixed64,
            other => ExtensionKind::Other(other as i32),
        }
    }
}

/// A registered extension of some options message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionType {
    /// Fully qualified extension name, e.g. `acme.http_path`
    pub full_name: String,
    /// Options message it extends, without leading dot
    pub extendee: String,
    pub number: i32,
    pub kind: ExtensionKind,
}

impl ExtensionType {
    /// Create an extension type. A leading `.` on the extendee is dropped so
    /// `.google.protobuf.FileOptions` and `google.protobuf.FileOptions` key
    /// the same entry.
    pub fn new(
        full_name: impl Into<String>,
        extendee: impl AsRef<str>,
        number: i32,
        kind: ExtensionKind,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            extendee: extendee.as_ref().trim_start_matches('.').to_string(),
            number,
            kind,
        }
    }

    fn from_field(scope: &str, field: &FieldDescriptorProto) -> Option<Self> {
        if field.extendee.is_none() || field.number.is_none() {
            return None;
        }
        let full_name = if scope.is_empty() {
            field.name().to_string()
        } else {
            format!("{}.{}", scope, field.name())
        };
        Some(Self::new(
            full_name,
            field.extendee(),
            field.number(),
            ExtensionKind::from_field_type(field.r#type()),
        ))
    }
}

/// Registry of known extensions keyed by extendee.
///
/// Every read and write holds the same lock, so a lookup never sees a
/// registration halfway through. One process-wide instance backs the plugin
/// binary (`ExtensionRegistry::global`); tests build their own.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    extensions: Mutex<HashMap<String, Vec<ExtensionType>>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extensions: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ExtensionRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register one extension.
    ///
    /// Returns `false` if the (extendee, number) pair is already taken; the
    /// existing entry is kept.
    pub fn register(&self, extension: ExtensionType) -> bool {
        let mut extensions = self.extensions.lock();
        insert(&mut extensions, extension)
    }

    /// Register every extension declared in a file, including those nested
    /// in messages. Returns how many were newly added.
    pub fn register_file(&self, file: &FileDescriptorProto) -> usize {
        let mut found = Vec::new();
        let package = file.package();
        for field in &file.extension {
            found.extend(ExtensionType::from_field(package, field));
        }
        for message in &file.message_type {
            collect_nested(package, message, &mut found);
        }

        let mut extensions = self.extensions.lock();
        let mut added = 0;
        for extension in found {
            if insert(&mut extensions, extension) {
                added += 1;
            }
        }

        if added > 0 {
            debug!(
                "{} registered {} extension(s) from {}",
                prefix::OPTIONS,
                added,
                file.name()
            );
        }
        added
    }

    /// Find the extension registered for `extendee` with field `number`.
    pub fn find(&self, extendee: &str, number: i32) -> Option<ExtensionType> {
        let extensions = self.extensions.lock();
        scan(&extensions, extendee, number).cloned()
    }

    /// Resolve extension `number` of `extendee` out of a raw options payload.
    ///
    /// Fails with `ExtensionError::NotFound` when nothing is registered for
    /// the pair. A registered extension that is not set in `options` resolves
    /// to `OptionValue::Absent`.
    pub fn resolve(
        &self,
        options: &[u8],
        extendee: &str,
        number: i32,
    ) -> Result<OptionValue, ExtensionError> {
        let extensions = self.extensions.lock();
        let extension =
            scan(&extensions, extendee, number).ok_or_else(|| ExtensionError::NotFound {
                extendee: extendee.trim_start_matches('.').to_string(),
                number,
            })?;

        trace!(
            "{} resolving {} ({}) on {}",
            prefix::OPTIONS,
            extension.full_name,
            number,
            extension.extendee
        );
        decode_extension(options, number, extension.kind)
    }

    /// Number of registered extensions across all extendees.
    pub fn len(&self) -> usize {
        self.extensions.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn scan<'a>(
    extensions: &'a HashMap<String, Vec<ExtensionType>>,
    extendee: &str,
    number: i32,
) -> Option<&'a ExtensionType> {
    extensions
        .get(extendee.trim_start_matches('.'))?
        .iter()
        .find(|extension| extension.number == number)
}

fn insert(extensions: &mut HashMap<String, Vec<ExtensionType>>, extension: ExtensionType) -> bool {
    let entries = extensions.entry(extension.extendee.clone()).or_default();
    if let Some(existing) = entries.iter().find(|e| e.number == extension.number) {
        debug!(
            "{} {} already claims {} on {}, skipping {}",
            prefix::OPTIONS,
            existing.full_name,
            extension.number,
            extension.extendee,
            extension.full_name
        );
        return false;
    }
    entries.push(extension);
    true
}

fn collect_nested(scope: &str, message: &DescriptorProto, found: &mut Vec<ExtensionType>) {
    let scope = if scope.is_empty() {
        message.name().to_string()
    } else {
        format!("{}.{}", scope, message.name())
    };
    for field in &message.extension {
        found.extend(ExtensionType::from_field(&scope, field));
    }
    for nested in &message.nested_type {
        collect_nested(&scope, nested, found);
    }
}
