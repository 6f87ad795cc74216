//! Built-in template encoder
//!
//! Renders every `*.tmpl` file under the template directory. The destination
//! name is the template's path relative to that directory with `.tmpl`
//! dropped, placed under the destination directory. Path and body both go
//! through placeholder substitution, so `{{service.name}}_client.go.tmpl`
//! yields one file per service in service mode.
//!
//! # Placeholders
//!
//! ```text
//! file.name  file.package  file.basename  file.services  file.messages
//! service.name  service.methods
//! file.option.<kind>.<N>
//! service.option.<kind>.<N>
//! method.<Method>.option.<kind>.<N>
//! message.<Message>.option.<kind>.<N>
//! field.<Message>.<field>.option.<kind>.<N>
//! ```
//!
//! `<kind>` is `string`, `bool` or `int64`. Option placeholders never fail;
//! an unset or unregistered option renders as the zero value.

mod context;
mod render;

use std::fs;
use std::path::Path;

use tmplgen::tracing::prefix;
use tmplgen_proto::FileDescriptorProto;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::dispatch::{EncoderContext, EncoderFactory, TemplateEncoder};
use crate::error::RenderError;
use crate::options::OptionResolver;
use crate::output::GeneratedFile;
use context::RenderContext;

const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Encoder for one scope over a template directory.
pub struct TemplateDirEncoder<'a> {
    context: EncoderContext<'a>,
    resolver: OptionResolver<'a>,
    search: &'a [FileDescriptorProto],
}

impl<'a> TemplateDirEncoder<'a> {
    pub fn new(
        context: EncoderContext<'a>,
        resolver: OptionResolver<'a>,
        search: &'a [FileDescriptorProto],
    ) -> Self {
        Self {
            context,
            resolver,
            search,
        }
    }

    fn render_context(&self) -> RenderContext<'a> {
        RenderContext {
            scope: self.context.scope,
            resolver: self.resolver,
            search: self.search,
        }
    }

    fn destination(&self, name: String) -> String {
        let dir = self.context.destination_dir.trim_end_matches('/');
        if dir.is_empty() {
            name
        } else {
            format!("{}/{}", dir, name)
        }
    }
}

impl TemplateEncoder for TemplateDirEncoder<'_> {
    fn files(&self) -> Result<Vec<GeneratedFile>, RenderError> {
        let root = match self.context.template_dir {
            "" => Path::new("."),
            dir => Path::new(dir),
        };
        let context = self.render_context();
        let lookup = |name: &str| context.lookup(name);

        if self.context.debug {
            match serde_json::to_string(&self.context.scope) {
                Ok(scope) => debug!("{} scope {}", prefix::RENDER, scope),
                Err(e) => warn!("{} failed to serialize scope: {}", prefix::RENDER, e),
            }
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            let Some(stem) = relative.strip_suffix(TEMPLATE_SUFFIX) else {
                continue;
            };

            let body = fs::read_to_string(path).map_err(|source| RenderError::Io {
                path: path.display().to_string(),
                source,
            })?;

            let name = render::render(&relative, stem, lookup)?;
            let content = render::render(&relative, &body, lookup)?;
            let name = self.destination(name);

            if self.context.debug {
                debug!(
                    "{} {} -> {} ({} bytes)",
                    prefix::RENDER,
                    relative,
                    name,
                    content.len()
                );
            }
            files.push(GeneratedFile { name, content });
        }
        Ok(files)
    }
}

/// Builds a `TemplateDirEncoder` per scope.
pub struct TemplateDirEncoderFactory<'a> {
    resolver: OptionResolver<'a>,
    /// Every file in the request
    files: &'a [FileDescriptorProto],
    single_package_mode: bool,
}

impl<'a> TemplateDirEncoderFactory<'a> {
    pub fn new(
        resolver: OptionResolver<'a>,
        files: &'a [FileDescriptorProto],
        single_package_mode: bool,
    ) -> Self {
        Self {
            resolver,
            files,
            single_package_mode,
        }
    }
}

impl EncoderFactory for TemplateDirEncoderFactory<'_> {
    fn encoder<'a>(&'a self, context: EncoderContext<'a>) -> Box<dyn TemplateEncoder + 'a> {
        let search = if self.single_package_mode {
            self.files
        } else {
            std::slice::from_ref(context.scope.file())
        };
        Box::new(TemplateDirEncoder::new(context, self.resolver, search))
    }
}
