//! Typed option accessor tests

use prost::encoding;
use tmplgen_core::options::{extendee, ExtensionKind, ExtensionRegistry, ExtensionType, OptionResolver};
use tmplgen_core::OptionValue;
use tmplgen_proto::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto,
};

const HTTP_PATH: i32 = 50001;
const AUTHENTICATED: i32 = 50002;
const TIMEOUT_MS: i32 = 50003;
const TABLE: i32 = 51001;
const MAX_LEN: i32 = 52001;
const NOT_REGISTERED: i32 = 59999;

/// Registry with a handful of method, message, field and file options.
fn registry() -> ExtensionRegistry {
    let registry = ExtensionRegistry::new();
    for (name, extendee, number, kind) in [
        ("acme.http_path", extendee::METHOD_OPTIONS, HTTP_PATH, ExtensionKind::String),
        ("acme.authenticated", extendee::METHOD_OPTIONS, AUTHENTICATED, ExtensionKind::Bool),
        ("acme.timeout_ms", extendee::METHOD_OPTIONS, TIMEOUT_MS, ExtensionKind::Int64),
        ("acme.table", extendee::MESSAGE_OPTIONS, TABLE, ExtensionKind::String),
        ("acme.max_len", extendee::FIELD_OPTIONS, MAX_LEN, ExtensionKind::Sint64),
        ("acme.owner", extendee::FILE_OPTIONS, HTTP_PATH, ExtensionKind::String),
        ("acme.public", extendee::SERVICE_OPTIONS, AUTHENTICATED, ExtensionKind::Bool),
    ] {
        registry.register(ExtensionType::new(name, extendee, number, kind));
    }
    registry
}

fn method_with_options() -> MethodDescriptorProto {
    let mut options = Vec::new();
    encoding::string::encode(HTTP_PATH as u32, &"/v1/invoices".to_string(), &mut options);
    encoding::bool::encode(AUTHENTICATED as u32, &true, &mut options);
    encoding::int64::encode(TIMEOUT_MS as u32, &1500, &mut options);
    encoding::string::encode(NOT_REGISTERED as u32, &"ignored".to_string(), &mut options);

    MethodDescriptorProto {
        name: Some("CreateInvoice".to_string()),
        options: Some(options),
        ..Default::default()
    }
}

#[test]
fn test_method_options_resolve_by_type() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);
    let method = method_with_options();

    assert_eq!(resolver.string_option(HTTP_PATH, Some(&method)), "/v1/invoices");
    assert!(resolver.bool_option(AUTHENTICATED, Some(&method)));
    assert_eq!(resolver.int64_option(TIMEOUT_MS, Some(&method)), 1500);
}

#[test]
fn test_unregistered_fields_read_as_zero() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);
    let method = method_with_options();

    // present in the payload but never registered
    assert_eq!(resolver.string_option(NOT_REGISTERED, Some(&method)), "");
    assert!(!resolver.bool_option(NOT_REGISTERED, Some(&method)));
    assert_eq!(resolver.int64_option(NOT_REGISTERED, Some(&method)), 0);
    assert_eq!(resolver.value(NOT_REGISTERED, Some(&method)), OptionValue::Absent);
}

#[test]
fn test_empty_registry_reads_everything_as_zero() {
    let registry = ExtensionRegistry::new();
    let resolver = OptionResolver::new(&registry);
    let method = method_with_options();

    for field_id in [HTTP_PATH, AUTHENTICATED, TIMEOUT_MS, 1, 0, -5] {
        assert_eq!(resolver.string_option(field_id, Some(&method)), "");
        assert!(!resolver.bool_option(field_id, Some(&method)));
        assert_eq!(resolver.int64_option(field_id, Some(&method)), 0);
    }
}

#[test]
fn test_type_mismatch_reads_as_zero() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);
    let method = method_with_options();

    // string extension requested as bool / int64, and the reverse
    assert!(!resolver.bool_option(HTTP_PATH, Some(&method)));
    assert_eq!(resolver.int64_option(HTTP_PATH, Some(&method)), 0);
    assert_eq!(resolver.string_option(AUTHENTICATED, Some(&method)), "");
    assert_eq!(resolver.string_option(TIMEOUT_MS, Some(&method)), "");
}

#[test]
fn test_missing_descriptor_or_options() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);

    assert_eq!(resolver.string_option::<MethodDescriptorProto>(HTTP_PATH, None), "");

    let bare = MethodDescriptorProto {
        name: Some("Bare".to_string()),
        ..Default::default()
    };
    assert_eq!(resolver.string_option(HTTP_PATH, Some(&bare)), "");
    assert!(!resolver.bool_option(AUTHENTICATED, Some(&bare)));
    assert_eq!(resolver.int64_option(TIMEOUT_MS, Some(&bare)), 0);
}

#[test]
fn test_extendee_scopes_the_lookup() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);

    // 50001 is a string on both FileOptions and MethodOptions
    let mut options = Vec::new();
    encoding::string::encode(HTTP_PATH as u32, &"platform-team".to_string(), &mut options);
    let file = FileDescriptorProto {
        name: Some("billing.proto".to_string()),
        options: Some(options),
        ..Default::default()
    };
    assert_eq!(resolver.string_option(HTTP_PATH, Some(&file)), "platform-team");

    // 51001 is only registered on MessageOptions
    let service = ServiceDescriptorProto {
        name: Some("Billing".to_string()),
        options: Some({
            let mut options = Vec::new();
            encoding::string::encode(TABLE as u32, &"invoices".to_string(), &mut options);
            options
        }),
        ..Default::default()
    };
    assert_eq!(resolver.string_option(TABLE, Some(&service)), "");
}

#[test]
fn test_message_field_and_service_options() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);

    let mut message_options = Vec::new();
    encoding::string::encode(TABLE as u32, &"invoices".to_string(), &mut message_options);
    let mut field_options = Vec::new();
    encoding::sint64::encode(MAX_LEN as u32, &-1, &mut field_options);
    let mut service_options = Vec::new();
    encoding::bool::encode(AUTHENTICATED as u32, &true, &mut service_options);

    let message = DescriptorProto {
        name: Some("Invoice".to_string()),
        field: vec![FieldDescriptorProto {
            name: Some("memo".to_string()),
            options: Some(field_options),
            ..Default::default()
        }],
        options: Some(message_options),
        ..Default::default()
    };
    let service = ServiceDescriptorProto {
        name: Some("Billing".to_string()),
        options: Some(service_options),
        ..Default::default()
    };

    assert_eq!(resolver.string_option(TABLE, Some(&message)), "invoices");
    assert_eq!(resolver.int64_option(MAX_LEN, Some(&message.field[0])), -1);
    assert!(resolver.bool_option(AUTHENTICATED, Some(&service)));
}

#[test]
fn test_malformed_options_read_as_zero() {
    let registry = registry();
    let resolver = OptionResolver::new(&registry);

    let method = MethodDescriptorProto {
        name: Some("Broken".to_string()),
        // truncated varint key
        options: Some(vec![0xff, 0xff]),
        ..Default::default()
    };
    assert_eq!(resolver.string_option(HTTP_PATH, Some(&method)), "");
    assert_eq!(resolver.value(HTTP_PATH, Some(&method)), OptionValue::Absent);
}

#[test]
fn test_concurrent_lookups_and_registration() {
    let registry = registry();
    let method = method_with_options();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let registry = &registry;
            let method = &method;
            scope.spawn(move || {
                let resolver = OptionResolver::new(registry);
                for i in 0..50 {
                    registry.register(ExtensionType::new(
                        format!("load.ext_{}_{}", worker, i),
                        extendee::ENUM_OPTIONS,
                        60000 + worker * 100 + i,
                        ExtensionKind::Bool,
                    ));
                    assert_eq!(resolver.string_option(HTTP_PATH, Some(method)), "/v1/invoices");
                }
            });
        }
    });

    assert_eq!(registry.len(), 7 + 200);
}
