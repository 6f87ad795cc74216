//! Custom option resolution
//!
//! Custom options are protobuf extensions on the `google.protobuf.*Options`
//! messages. Resolving one takes three pieces:
//!
//! - **registry**: which field numbers are known extensions of which options
//!   type, and what they hold (`ExtensionRegistry`)
//! - **value**: decoding a single extension out of the raw options bytes
//!   (`OptionValue`)
//! - **accessors**: typed lookups per descriptor kind that never fail
//!   (`OptionResolver`)
//!
//! # Example
//!
//! ```rust
//! use tmplgen_core::options::{ExtensionKind, ExtensionRegistry, ExtensionType, OptionResolver};
//! use tmplgen_proto::MethodDescriptorProto;
//!
//! let registry = ExtensionRegistry::new();
//! registry.register(ExtensionType::new(
//!     "acme.http_path",
//!     ".google.protobuf.MethodOptions",
//!     50001,
//!     ExtensionKind::String,
//! ));
//!
//! // field 50001, length-delimited, "/v1/items"
//! let mut options = vec![0x8a, 0xb5, 0x18, 9];
//! options.extend_from_slice(b"/v1/items");
//!
//! let method = MethodDescriptorProto {
//!     name: Some("ListItems".into()),
//!     options: Some(options),
//!     ..Default::default()
//! };
//!
//! let resolver = OptionResolver::new(&registry);
//! assert_eq!(resolver.string_option(50001, Some(&method)), "/v1/items");
//! assert_eq!(resolver.string_option(50002, Some(&method)), "");
//! ```

mod accessors;
mod registry;
mod value;

pub use accessors::{extendee, OptionResolver, OptionsCarrier};
pub use registry::{ExtensionKind, ExtensionRegistry, ExtensionType};
pub use value::OptionValue;
pub(crate) use value::decode_extension;
