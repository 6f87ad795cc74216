//! Placeholder resolution against a descriptor scope.

use tmplgen_proto::{DescriptorProto, FileDescriptorProto, MethodDescriptorProto};

use crate::dispatch::Scope;
use crate::options::{OptionResolver, OptionsCarrier};

/// Names a template can refer to while rendering one scope.
pub(crate) struct RenderContext<'a> {
    pub scope: Scope<'a>,
    pub resolver: OptionResolver<'a>,
    /// Files searched for `message.*` and `field.*` lookups
    pub search: &'a [FileDescriptorProto],
}

impl<'a> RenderContext<'a> {
    pub fn lookup(&self, name: &str) -> Option<String> {
        let file = self.scope.file();
        let parts: Vec<&str> = name.split('.').collect();

        match parts.as_slice() {
            ["file", "name"] => Some(file.name().to_string()),
            ["file", "package"] => Some(file.package().to_string()),
            ["file", "basename"] => Some(basename(file.name()).to_string()),
            ["file", "services"] => Some(join(file.service.iter().map(|s| s.name()))),
            ["file", "messages"] => Some(join(file.message_type.iter().map(|m| m.name()))),
            ["file", "option", kind, number] => self.option(file, kind, number),

            ["service", "name"] => self.scope.service().map(|s| s.name().to_string()),
            ["service", "methods"] => self
                .scope
                .service()
                .map(|s| join(s.method.iter().map(|m| m.name()))),
            ["service", "option", kind, number] => {
                self.option(self.scope.service()?, kind, number)
            }

            ["method", method, "option", kind, number] => {
                self.option(self.find_method(method)?, kind, number)
            }
            ["message", message, "option", kind, number] => {
                self.option(self.find_message(message)?, kind, number)
            }
            ["field", message, field, "option", kind, number] => {
                let field = self
                    .find_message(message)?
                    .field
                    .iter()
                    .find(|f| f.name() == *field)?;
                self.option(field, kind, number)
            }
            _ => None,
        }
    }

    fn option<D: OptionsCarrier>(&self, descriptor: &D, kind: &str, number: &str) -> Option<String> {
        let field_id: i32 = number.parse().ok()?;
        let descriptor = Some(descriptor);
        match kind {
            "string" => Some(self.resolver.string_option(field_id, descriptor)),
            "bool" => Some(self.resolver.bool_option(field_id, descriptor).to_string()),
            "int64" => Some(self.resolver.int64_option(field_id, descriptor).to_string()),
            _ => None,
        }
    }

    fn find_method(&self, name: &str) -> Option<&'a MethodDescriptorProto> {
        self.scope
            .services()
            .iter()
            .flat_map(|service| service.method.iter())
            .find(|method| method.name() == name)
    }

    fn find_message(&self, name: &str) -> Option<&'a DescriptorProto> {
        self.search
            .iter()
            .find_map(|file| find_nested(&file.message_type, name))
    }
}

fn find_nested<'a>(messages: &'a [DescriptorProto], name: &str) -> Option<&'a DescriptorProto> {
    messages.iter().find_map(|message| {
        if message.name() == name {
            Some(message)
        } else {
            find_nested(&message.nested_type, name)
        }
    })
}

fn basename(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".proto").unwrap_or(file)
}

fn join<'s>(names: impl Iterator<Item = &'s str>) -> String {
    names.collect::<Vec<_>>().join(",")
}
