//! protoc request/response handling
//!
//! Turns a decoded `CodeGeneratorRequest` into a `CodeGeneratorResponse`:
//! registers every extension the request declares, dispatches the files
//! protoc asked for, and commits the merged output. A generation failure
//! yields a response carrying only the error message, which protoc reports
//! without writing any file.

use std::collections::HashSet;

use tmplgen::tracing::prefix;
use tmplgen_proto::{CodeGeneratorRequest, CodeGeneratorResponse, Feature, ResponseFile};
use tracing::{debug, error, warn};

use crate::dispatch::{Dispatcher, EncoderFactory, InputFile};
use crate::encoder::TemplateDirEncoderFactory;
use crate::error::GenerateResult;
use crate::options::{ExtensionRegistry, OptionResolver};
use crate::output::{EmissionSink, OutputEntry, OutputSet};
use crate::params::{parse_params, Configuration, Diagnostic};

/// Parse the request parameter.
pub fn configure(request: &CodeGeneratorRequest) -> (Configuration, Vec<Diagnostic>) {
    parse_params(request.parameter())
}

/// Log skipped parameter tokens.
pub fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        warn!("{} {}", prefix::PARAMS, diagnostic);
    }
}

/// Input files in request order, flagged by membership in `file_to_generate`.
pub fn input_files(request: &CodeGeneratorRequest) -> Vec<InputFile<'_>> {
    let targets: HashSet<&str> = request
        .file_to_generate
        .iter()
        .map(String::as_str)
        .collect();

    request
        .proto_file
        .iter()
        .map(|file| InputFile::new(file, targets.contains(file.name())))
        .collect()
}

/// Register the extensions declared anywhere in the request.
pub fn register_extensions(request: &CodeGeneratorRequest, registry: &ExtensionRegistry) -> usize {
    request
        .proto_file
        .iter()
        .map(|file| registry.register_file(file))
        .sum()
}

/// Run the whole pipeline with a caller-supplied encoder factory.
pub fn generate_with<F: EncoderFactory>(
    request: &CodeGeneratorRequest,
    config: &Configuration,
    registry: &ExtensionRegistry,
    factory: F,
) -> GenerateResult<OutputSet> {
    let registered = register_extensions(request, registry);
    debug!("{} {} extension(s) registered", prefix::OPTIONS, registered);

    let inputs = input_files(request);
    Dispatcher::new(config, factory).run(&inputs)
}

/// Run the whole pipeline with the template directory encoder.
pub fn generate(
    request: &CodeGeneratorRequest,
    config: &Configuration,
    registry: &ExtensionRegistry,
) -> CodeGeneratorResponse {
    let factory = TemplateDirEncoderFactory::new(
        OptionResolver::new(registry),
        &request.proto_file,
        config.single_package_mode,
    );
    into_response(generate_with(request, config, registry, factory))
}

/// Build the response for a finished run.
pub fn into_response(result: GenerateResult<OutputSet>) -> CodeGeneratorResponse {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    match result {
        Ok(output) => {
            output.commit(&mut ResponseSink(&mut response));
        }
        Err(err) => {
            error!("{} {}", prefix::RENDER, err);
            response.error = Some(err.to_string());
        }
    }
    response
}

struct ResponseSink<'r>(&'r mut CodeGeneratorResponse);

impl EmissionSink for ResponseSink<'_> {
    fn emit(&mut self, entry: OutputEntry) {
        self.0.file.push(ResponseFile {
            name: Some(entry.name),
            content: Some(entry.content),
            ..Default::default()
        });
    }
}
