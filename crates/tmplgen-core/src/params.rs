//! Plugin parameter parsing
//!
//! protoc passes everything after the `:` of `--tmpl_out=<params>:<dir>` as
//! one string of comma-separated `key=value` tokens:
//!
//! ```text
//! template_dir=templates,destination_dir=gen,all=true,debug=t
//! ```
//!
//! Parsing never fails. A bad token is reported as a `Diagnostic` and
//! skipped; the field it would have set keeps its default.
//!
//! Boolean flags only ever switch on. A `false` token is accepted but leaves
//! the flag as it was, so `debug=t,debug=f` still enables debug.

use thiserror::Error;

/// Parsed plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub template_dir: String,
    pub destination_dir: String,
    pub debug: bool,
    /// Render every generated file as a whole, services or not
    pub all: bool,
    /// Resolve message and field lookups across every file in the request
    pub single_package_mode: bool,
    /// Render files that declare services as a whole
    pub file_mode: bool,
}

/// Which descriptor scope each template invocation receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// One invocation per file
    WholeFile,
    /// One invocation per file that declares at least one service
    FileWithServices,
    /// One invocation per service
    Service,
}

impl Configuration {
    /// Generation mode; `all` takes priority over `file-mode`.
    pub fn mode(&self) -> GenerationMode {
        if self.all {
            GenerationMode::WholeFile
        } else if self.file_mode {
            GenerationMode::FileWithServices
        } else {
            GenerationMode::Service
        }
    }
}

/// A parameter token that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Token without exactly one `=`
    #[error("invalid parameter: {0:?}")]
    Malformed(String),

    /// Key is not one of the recognized parameters
    #[error("unknown parameter: {0:?}")]
    UnknownKey(String),

    /// Boolean parameter with an unrecognized value
    #[error("invalid value for {key}: {value:?}")]
    InvalidBool { key: String, value: String },
}

/// Parse a parameter string into a configuration plus the diagnostics for
/// every skipped token.
pub fn parse_params(parameter: &str) -> (Configuration, Vec<Diagnostic>) {
    let mut config = Configuration::default();
    let mut diagnostics = Vec::new();

    if parameter.is_empty() {
        return (config, diagnostics);
    }

    for token in parameter.split(',') {
        let parts: Vec<&str> = token.split('=').collect();
        let &[key, value] = parts.as_slice() else {
            diagnostics.push(Diagnostic::Malformed(token.to_string()));
            continue;
        };

        let flag = match key {
            "template_dir" => {
                config.template_dir = value.to_string();
                continue;
            }
            "destination_dir" => {
                config.destination_dir = value.to_string();
                continue;
            }
            "single-package-mode" => &mut config.single_package_mode,
            "debug" => &mut config.debug,
            "all" => &mut config.all,
            "file-mode" => &mut config.file_mode,
            _ => {
                diagnostics.push(Diagnostic::UnknownKey(token.to_string()));
                continue;
            }
        };

        match parse_bool(value) {
            Some(true) => *flag = true,
            Some(false) => {}
            None => diagnostics.push(Diagnostic::InvalidBool {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    (config, diagnostics)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}
