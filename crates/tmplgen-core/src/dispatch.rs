//! Generation dispatch
//!
//! For every input file protoc asked for, pick the scopes to render from the
//! configured `GenerationMode`, run one template encoder per scope, and fold
//! what they produce into an `OutputSet`. The first encoder failure aborts
//! the run; nothing is committed.

use serde::Serialize;
use tmplgen::tracing::prefix;
use tmplgen_proto::{FileDescriptorProto, ServiceDescriptorProto};
use tracing::{debug, info};

use crate::error::{GenerateError, GenerateResult, RenderError};
use crate::options::{decode_extension, ExtensionKind};
use crate::output::{Fragment, GeneratedFile, OutputSet};
use crate::params::{Configuration, GenerationMode};

/// `go_package` field number in `google.protobuf.FileOptions`.
const GO_PACKAGE_FIELD: i32 = 11;

/// An input file as delivered by protoc.
#[derive(Debug, Clone)]
pub struct InputFile<'a> {
    pub descriptor: &'a FileDescriptorProto,
    /// Whether protoc listed the file in `file_to_generate`
    pub generate: bool,
    /// Import identity recorded for the outputs this file writes first
    pub import_path: String,
}

impl<'a> InputFile<'a> {
    pub fn new(descriptor: &'a FileDescriptorProto, generate: bool) -> Self {
        Self {
            descriptor,
            generate,
            import_path: import_path(descriptor),
        }
    }
}

/// Import identity of a file: the path part of its `go_package` option, or
/// the directory it lives in.
pub fn import_path(file: &FileDescriptorProto) -> String {
    let go_package = file
        .options
        .as_deref()
        .and_then(|options| decode_extension(options, GO_PACKAGE_FIELD, ExtensionKind::String).ok())
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();

    if let Some(path) = go_package.split(';').next().filter(|path| !path.is_empty()) {
        return path.to_string();
    }

    match file.name().rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}

/// Descriptor context handed to one encoder invocation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope<'a> {
    File(&'a FileDescriptorProto),
    Service {
        service: &'a ServiceDescriptorProto,
        file: &'a FileDescriptorProto,
    },
}

impl<'a> Scope<'a> {
    pub fn file(&self) -> &'a FileDescriptorProto {
        match *self {
            Scope::File(file) | Scope::Service { file, .. } => file,
        }
    }

    pub fn service(&self) -> Option<&'a ServiceDescriptorProto> {
        match *self {
            Scope::File(_) => None,
            Scope::Service { service, .. } => Some(service),
        }
    }

    /// Services visible in this scope.
    pub fn services(&self) -> &'a [ServiceDescriptorProto] {
        match *self {
            Scope::File(file) => &file.service,
            Scope::Service { service, .. } => std::slice::from_ref(service),
        }
    }
}

/// Everything an encoder is constructed with.
#[derive(Debug, Clone, Copy)]
pub struct EncoderContext<'a> {
    pub template_dir: &'a str,
    pub scope: Scope<'a>,
    pub debug: bool,
    pub destination_dir: &'a str,
}

/// Renders one scope into output files.
pub trait TemplateEncoder {
    fn files(&self) -> Result<Vec<GeneratedFile>, RenderError>;
}

/// Builds an encoder for each scope.
pub trait EncoderFactory {
    fn encoder<'a>(&'a self, context: EncoderContext<'a>) -> Box<dyn TemplateEncoder + 'a>;
}

impl<T: EncoderFactory + ?Sized> EncoderFactory for &T {
    fn encoder<'a>(&'a self, context: EncoderContext<'a>) -> Box<dyn TemplateEncoder + 'a> {
        (**self).encoder(context)
    }
}

/// Drives encoders over input files according to a configuration.
pub struct Dispatcher<'c, F> {
    config: &'c Configuration,
    factory: F,
}

impl<'c, F: EncoderFactory> Dispatcher<'c, F> {
    pub fn new(config: &'c Configuration, factory: F) -> Self {
        Self { config, factory }
    }

    /// Scopes to render for `file`; `all` wins over `file-mode`.
    pub fn scopes<'a>(&self, file: &'a FileDescriptorProto) -> Vec<Scope<'a>> {
        match self.config.mode() {
            GenerationMode::WholeFile => vec![Scope::File(file)],
            GenerationMode::FileWithServices if file.service.is_empty() => Vec::new(),
            GenerationMode::FileWithServices => vec![Scope::File(file)],
            GenerationMode::Service => file
                .service
                .iter()
                .map(|service| Scope::Service { service, file })
                .collect(),
        }
    }

    /// Render every scope of one file.
    pub fn generate_file(&self, input: &InputFile<'_>) -> GenerateResult<Vec<Fragment>> {
        let scopes = self.scopes(input.descriptor);
        debug!(
            "{} {}: {} scope(s) in {:?} mode",
            prefix::RENDER,
            input.descriptor.name(),
            scopes.len(),
            self.config.mode()
        );

        let mut fragments = Vec::new();
        for scope in scopes {
            let encoder = self.factory.encoder(EncoderContext {
                template_dir: &self.config.template_dir,
                scope,
                debug: self.config.debug,
                destination_dir: &self.config.destination_dir,
            });
            let files = encoder.files().map_err(|source| GenerateError::Render {
                file: input.descriptor.name().to_string(),
                source,
            })?;
            fragments.extend(files.into_iter().map(|file| Fragment {
                name: file.name,
                content: file.content,
                import_path: input.import_path.clone(),
            }));
        }
        Ok(fragments)
    }

    /// Render all generatable inputs, in order, into one output set.
    pub fn run(&self, inputs: &[InputFile<'_>]) -> GenerateResult<OutputSet> {
        let mut output = OutputSet::new();
        for input in inputs.iter().filter(|input| input.generate) {
            output.extend(self.generate_file(input)?);
        }
        info!(
            "{} {} output file(s) from {} input(s)",
            prefix::RENDER,
            output.len(),
            inputs.iter().filter(|input| input.generate).count()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::encoding;

    fn file_named(name: &str) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_import_path_from_go_package() {
        let mut options = Vec::new();
        encoding::string::encode(11, &"github.com/acme/billing;billing".to_string(), &mut options);
        let file = FileDescriptorProto {
            options: Some(options),
            ..file_named("billing/v1/invoice.proto")
        };
        assert_eq!(import_path(&file), "github.com/acme/billing");
    }

    #[test]
    fn test_import_path_falls_back_to_directory() {
        assert_eq!(import_path(&file_named("billing/v1/invoice.proto")), "billing/v1");
        assert_eq!(import_path(&file_named("invoice.proto")), ".");
    }

    #[test]
    fn test_scope_accessors() {
        let file = FileDescriptorProto {
            service: vec![
                ServiceDescriptorProto {
                    name: Some("A".to_string()),
                    ..Default::default()
                },
                ServiceDescriptorProto {
                    name: Some("B".to_string()),
                    ..Default::default()
                },
            ],
            ..file_named("svc.proto")
        };

        let whole = Scope::File(&file);
        assert!(whole.service().is_none());
        assert_eq!(whole.services().len(), 2);

        let single = Scope::Service {
            service: &file.service[1],
            file: &file,
        };
        assert_eq!(single.service().unwrap().name(), "B");
        assert_eq!(single.services().len(), 1);
        assert_eq!(single.file().name(), "svc.proto");
    }
}
