//! protoc-gen-tmpl - Main Entry Point
//!
//! protoc plugin: reads a `CodeGeneratorRequest` from stdin, renders the
//! template directory named in the plugin parameter, and writes a
//! `CodeGeneratorResponse` to stdout. Logs go to stderr.
//!
//! Usage:
//!     protoc --tmpl_out=template_dir=templates,all=true:gen api.proto
//!     protoc --plugin=protoc-gen-tmpl --tmpl_out=debug=t:gen api.proto

use std::io::{self, Read, Write};

use clap::Parser;
use prost::Message;
use tmplgen::{Error, Result};
use tmplgen_core::plugin;
use tmplgen_core::ExtensionRegistry;
use tmplgen_proto::CodeGeneratorRequest;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "protoc-gen-tmpl")]
#[command(about = "protoc plugin rendering templates per proto file or service")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error); `debug=true` in the
    /// plugin parameter forces debug
    #[arg(long, default_value = "warn")]
    log_level: String,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("protoc-gen-tmpl: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if !LOG_LEVELS.contains(&args.log_level.as_str()) {
        return Err(Error::Config(format!(
            "invalid log level '{}', expected one of: {}",
            args.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    let request = CodeGeneratorRequest::decode(input.as_slice())?;

    // The parameter decides the log level, so logging starts after parsing
    // and the diagnostics are reported once it is up.
    let (config, diagnostics) = plugin::configure(&request);
    let filter = if config.debug {
        "debug"
    } else {
        args.log_level.as_str()
    };
    tmplgen::tracing::init_with_filter(filter);
    plugin::report_diagnostics(&diagnostics);

    info!("protoc-gen-tmpl v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "  {} proto file(s), {} to generate, mode {:?}",
        request.proto_file.len(),
        request.file_to_generate.len(),
        config.mode()
    );

    let response = plugin::generate(&request, &config, ExtensionRegistry::global());

    let mut out = Vec::new();
    response.encode(&mut out)?;
    io::stdout().write_all(&out)?;
    Ok(())
}
